// src/lib.rs
pub mod debug;
pub mod math;
