// src/math/mesh/mod.rs

//! Triangulation beliebiger Vektorgeometrien: Delaunay, Constrained Delaunay
//! (optional mit Qualitätsverfeinerung) und Tessellation einzelner Polygone.

pub mod adapter;
pub mod config;
pub mod extractor;
pub mod normalizer;
pub mod point_index;
pub mod segments;
pub mod triangle_mesh;

pub use adapter::{MeshInput, MeshVertex, TriangulationAdapter};
pub use config::{MeshOutput, TriangulationConfig, TriangulationMode};
pub use extractor::MeshExtractor;
pub use normalizer::{GeometryNormalizer, Normalized, NormalizedGeometry};
pub use point_index::{CanonicalPoint, PointTable};
pub use segments::{Segment, SegmentBuilder, SegmentSet};
pub use triangle_mesh::TriangleMesh;
