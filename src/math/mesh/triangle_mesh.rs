// src/math/mesh/triangle_mesh.rs

use crate::math::{
    types::{Coordinate, SpadePoint},
    utils::simple_geometry,
};

/// Triangulierte Struktur, wie sie das Backend liefert: Knotenarena plus Dreiecke (CCW).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Coordinate>,
    pub triangles: Vec<[usize; 3]>,
    /// Die Eingabe war rein zweidimensional; Ausgaben tragen dann keine Höhe.
    pub is_2d: bool,
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Die drei Eckpunkte eines Dreiecks.
    pub fn triangle_coords(&self, triangle: &[usize; 3]) -> [Coordinate; 3] {
        triangle.map(|i| self.vertices[i])
    }

    pub fn triangle_points(&self, triangle: &[usize; 3]) -> [SpadePoint; 3] {
        triangle.map(|i| self.vertices[i].xy())
    }

    /// Summe der (projizierten) Dreiecksflächen.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = self.triangle_points(t);
                simple_geometry::triangle_area(a, b, c)
            })
            .sum()
    }

    /// Kleinster Innenwinkel (Grad) über alle Dreiecke.
    pub fn min_angle_deg(&self) -> Option<f64> {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = self.triangle_points(t);
                simple_geometry::min_angle_deg(a, b, c)
            })
            .min_by(f64::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle_pair() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(4.0, 0.0),
                Coordinate::new(4.0, 4.0),
                Coordinate::new(0.0, 4.0),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            is_2d: true,
        }
    }

    #[test]
    fn test_counts_and_area() {
        let mesh = right_triangle_pair();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.is_empty());
        assert_relative_eq!(mesh.area(), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_min_angle_of_right_isosceles_triangles() {
        assert_relative_eq!(right_triangle_pair().min_angle_deg().unwrap(), 45.0, epsilon = 1e-9);
        assert!(TriangleMesh::default().min_angle_deg().is_none());
    }
}
