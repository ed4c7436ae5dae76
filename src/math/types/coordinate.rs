// src/math/types/coordinate.rs
use super::SpadePoint;
use serde::{Deserialize, Serialize};

/// Eine Koordinate mit optionaler Höhe.
///
/// Eine fehlende Höhe (`z == None`) entspricht dem NaN-Wert klassischer Geometriemodelle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: if z.is_nan() { None } else { Some(z) },
        }
    }

    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    /// Die Höhe, wobei eine fehlende Höhe als `0` gilt.
    pub fn z_or_zero(&self) -> f64 {
        self.z.unwrap_or(0.0)
    }

    /// Verwirft die Höhe.
    pub fn to_2d(self) -> Self {
        Self { z: None, ..self }
    }

    pub fn xy(&self) -> SpadePoint {
        SpadePoint::new(self.x, self.y)
    }

    pub fn from_xy(point: SpadePoint) -> Self {
        Self::new(point.x, point.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new_3d(x, y, z)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Coord { x: c.x, y: c.y }
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}
