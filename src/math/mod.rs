pub mod error;
pub mod functions;
pub mod mesh;
pub mod types;
pub mod utils;
pub mod voronoi;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        error::{MathError, MathResult},
        functions::{constrained_delaunay, delaunay, mesh, tessellate, triangulate, voronoi},
        mesh::{MeshOutput, TriangleMesh, TriangulationConfig, TriangulationMode},
        types::*,
        voronoi::{VoronoiConfig, VoronoiOutput},
    };
}
