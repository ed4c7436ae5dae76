// src/math/types/mod.rs
pub mod bounds;
pub mod coordinate;
pub mod geometry;

pub use bounds::*;
pub use coordinate::*;
pub use geometry::*;

// Re-export häufig verwendete externe Typen
pub use spade::Point2;

// Einheitlicher 2D-Punkttyp für Backend und Clipping
pub type SpadePoint = Point2<f64>;
