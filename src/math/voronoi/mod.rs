// src/math/voronoi/mod.rs
pub mod clipping;
pub mod composer;
pub mod config;
pub mod dual_graph;

pub use composer::{VoronoiCell, VoronoiComposer};
pub use config::{VoronoiConfig, VoronoiOutput};
pub use dual_graph::{DualGraph, Fan};
