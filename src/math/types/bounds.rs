// src/math/types/bounds.rs

use crate::math::{error::*, types::*};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box), dient als Envelope und Clip-Bereich.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2D {
    pub min: SpadePoint,
    pub max: SpadePoint,
}

impl Bounds2D {
    /// Erstellt eine neue Bounding Box
    pub fn new(min: SpadePoint, max: SpadePoint) -> MathResult<Self> {
        if min.x > max.x || min.y > max.y {
            return Err(MathError::invalid_argument(format!(
                "Invalid bounds: min {:?} > max {:?}",
                min, max
            )));
        }
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return Err(MathError::invalid_argument("Bounds must be finite"));
        }

        Ok(Self { min, max })
    }

    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: SpadePoint, p2: SpadePoint) -> Self {
        Self {
            min: SpadePoint::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: SpadePoint::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Erstellt eine Bounding Box die alle Punkte umschließt
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = SpadePoint>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut min = first_point;
        let mut max = first_point;

        for point in points_iter {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn center(&self) -> SpadePoint {
        SpadePoint::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Fläche der Bounding Box
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Prüft ob ein Punkt in der Bounding Box liegt (Rand eingeschlossen)
    pub fn contains_point(&self, point: SpadePoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Erweitert die Bounding Box um einen Punkt
    pub fn expand_to_include_point(&mut self, point: SpadePoint) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Erweitert die Bounding Box um eine andere
    pub fn expand_to_include_bounds(&mut self, other: &Bounds2D) {
        self.expand_to_include_point(other.min);
        self.expand_to_include_point(other.max);
    }

    /// Vergrößert die Bounding Box um einen Rand in alle Richtungen
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: SpadePoint::new(self.min.x - margin, self.min.y - margin),
            max: SpadePoint::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Die vier Ecken in CCW-Reihenfolge, beginnend unten links
    pub fn corners(&self) -> [SpadePoint; 4] {
        [
            self.min,
            SpadePoint::new(self.max.x, self.min.y),
            self.max,
            SpadePoint::new(self.min.x, self.max.y),
        ]
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bounds2D[({:.3}, {:.3}) - ({:.3}, {:.3})]",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points_iter() {
        let bounds = Bounds2D::from_points_iter(vec![
            SpadePoint::new(1.0, 5.0),
            SpadePoint::new(-2.0, 3.0),
            SpadePoint::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, SpadePoint::new(-2.0, -1.0));
        assert_eq!(bounds.max, SpadePoint::new(4.0, 5.0));
        assert_eq!(bounds.area(), 36.0);
        assert!(Bounds2D::from_points_iter(Vec::new()).is_none());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let result = Bounds2D::new(SpadePoint::new(1.0, 0.0), SpadePoint::new(0.0, 1.0));
        assert!(matches!(result, Err(MathError::InvalidArgument { .. })));
    }

    #[test]
    fn test_expand_and_contains() {
        let bounds = Bounds2D::from_points(SpadePoint::new(0.0, 0.0), SpadePoint::new(2.0, 2.0));
        let grown = bounds.expand(1.0);
        assert!(grown.contains_point(SpadePoint::new(-0.5, 2.5)));
        assert!(!bounds.contains_point(SpadePoint::new(-0.5, 2.5)));
        assert_eq!(grown.width(), 4.0);
    }
}
