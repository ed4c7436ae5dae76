// src/math/mesh/extractor.rs

use super::{config::MeshOutput, segments::Segment, triangle_mesh::TriangleMesh};
use crate::math::{
    types::{Coordinate, Geometry, LineString, Polygon, SpadePoint},
    utils::{comparison, simple_geometry},
};
use nalgebra::Vector3;
use std::collections::HashSet;

/// Baut aus einem `TriangleMesh` die Ausgabegeometrie.
pub struct MeshExtractor;

impl MeshExtractor {
    pub fn extract(mesh: &TriangleMesh, output: MeshOutput) -> Geometry {
        match output {
            MeshOutput::Polygons => Self::triangles(mesh),
            MeshOutput::Lines => Self::edges(mesh),
            MeshOutput::Circumcenters => Self::circumcenters(mesh),
        }
    }

    /// Ein geschlossener Ring `(a, b, c, a)` pro Dreieck.
    pub fn triangles(mesh: &TriangleMesh) -> Geometry {
        Geometry::MultiPolygon(
            mesh.triangles
                .iter()
                .map(|t| {
                    let [a, b, c] = mesh.triangle_coords(t);
                    Polygon::triangle(a, b, c)
                })
                .collect(),
        )
    }

    /// Alle Dreiecksseiten als richtungsunabhängige Segmente, jede genau einmal,
    /// in der Reihenfolge des ersten Auftretens.
    pub fn unique_edges(mesh: &TriangleMesh) -> Vec<Segment> {
        let mut seen = HashSet::with_capacity(mesh.triangles.len() * 2);
        let mut edges = Vec::with_capacity(mesh.triangles.len() * 2);
        for &[a, b, c] in &mesh.triangles {
            for side in [Segment::new(a, b), Segment::new(b, c), Segment::new(c, a)] {
                let normalized = side.normalized();
                if seen.insert(normalized) {
                    edges.push(normalized);
                }
            }
        }
        edges
    }

    pub fn edges(mesh: &TriangleMesh) -> Geometry {
        Geometry::MultiLineString(
            Self::unique_edges(mesh)
                .into_iter()
                .map(|Segment([a, b])| LineString::new(vec![mesh.vertices[a], mesh.vertices[b]]))
                .collect(),
        )
    }

    pub fn circumcenters(mesh: &TriangleMesh) -> Geometry {
        Geometry::MultiPoint(
            mesh.triangles
                .iter()
                .filter_map(|t| Self::circumcenter(mesh.triangle_coords(t), mesh.is_2d))
                .collect(),
        )
    }

    /// Umkreismittelpunkt in der Ebene. Bei 3D-Dreiecken wird die Höhe auf der
    /// Dreiecksebene an dieser Stelle bestimmt.
    pub fn circumcenter(corners: [Coordinate; 3], is_2d: bool) -> Option<Coordinate> {
        let [a, b, c] = corners;
        let center = simple_geometry::circumcenter(a.xy(), b.xy(), c.xy())?;
        if is_2d {
            return Some(Coordinate::from_xy(center));
        }

        let z = Self::plane_z(corners, center);
        Some(Coordinate {
            x: center.x,
            y: center.y,
            z,
        })
    }

    /// Höhe der Dreiecksebene über `at`. `None` ohne Höhen an allen Ecken oder bei
    /// senkrecht stehender Ebene.
    pub fn plane_z(corners: [Coordinate; 3], at: SpadePoint) -> Option<f64> {
        let [a, b, c] = corners;
        let pa = Vector3::new(a.x, a.y, a.z?);
        let pb = Vector3::new(b.x, b.y, b.z?);
        let pc = Vector3::new(c.x, c.y, c.z?);
        let normal = (pb - pa).cross(&(pc - pa));
        if comparison::nearly_zero(normal.z) {
            return None;
        }
        Some(pa.z - (normal.x * (at.x - pa.x) + normal.y * (at.y - pa.y)) / normal.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{
        mesh::{TriangulationAdapter, TriangulationConfig, TriangulationMode},
        types::Dimension,
    };
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn single_triangle() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![
                Coordinate::new_3d(0.0, 0.0, 0.0),
                Coordinate::new_3d(2.0, 0.0, 2.0),
                Coordinate::new_3d(0.0, 2.0, 0.0),
            ],
            triangles: vec![[0, 1, 2]],
            is_2d: false,
        }
    }

    fn random_mesh(seed: u64, count: usize) -> TriangleMesh {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = (0..count)
            .map(|_| Coordinate::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        TriangulationAdapter::new(TriangulationConfig::new(TriangulationMode::Delaunay))
            .unwrap()
            .triangulate(&Geometry::MultiPoint(points))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_single_triangle_outputs() {
        let mesh = single_triangle();
        let Geometry::MultiPolygon(polygons) = MeshExtractor::triangles(&mesh) else {
            panic!("expected polygons");
        };
        assert_eq!(polygons.len(), 1);
        assert!(polygons[0].exterior.is_closed());
        assert_eq!(polygons[0].exterior.coords.len(), 4);

        // Ein isoliertes Dreieck: Gleichheit in |E| <= 3 |T|
        assert_eq!(MeshExtractor::unique_edges(&mesh).len(), 3);
    }

    #[test]
    fn test_circumcenter_lies_on_triangle_plane() {
        let center = MeshExtractor::circumcenter(single_triangle().triangle_coords(&[0, 1, 2]), false)
            .unwrap();
        assert_relative_eq!(center.x, 1.0);
        assert_relative_eq!(center.y, 1.0);
        // Ebene z = x
        assert_relative_eq!(center.z.unwrap(), 1.0);

        let flat = MeshExtractor::circumcenter(single_triangle().triangle_coords(&[0, 1, 2]), true)
            .unwrap();
        assert!(flat.z.is_none());
    }

    #[test]
    fn test_unique_edges_bound_and_coverage() {
        for seed in 0..5 {
            let mesh = random_mesh(seed, 60);
            let edges = MeshExtractor::unique_edges(&mesh);
            assert!(edges.len() < 3 * mesh.triangle_count());

            let set: HashSet<Segment> = edges.iter().copied().collect();
            assert_eq!(set.len(), edges.len());
            for &[a, b, c] in &mesh.triangles {
                for side in [Segment::new(a, b), Segment::new(b, c), Segment::new(c, a)] {
                    assert!(set.contains(&side.normalized()));
                }
            }
        }
    }

    #[test]
    fn test_euler_bound_on_random_point_sets() {
        for seed in 0..10 {
            let count = 10 + (seed as usize) * 17;
            let mesh = random_mesh(seed, count);
            let n = mesh.vertex_count();
            assert!(mesh.triangle_count() <= 2 * n - 2);
        }
    }

    #[test]
    fn test_extract_dispatches_by_output() {
        let mesh = single_triangle();
        assert_eq!(
            MeshExtractor::extract(&mesh, MeshOutput::Lines).dimension(),
            Some(Dimension::Line)
        );
        let Geometry::MultiPoint(points) = MeshExtractor::extract(&mesh, MeshOutput::Circumcenters)
        else {
            panic!("expected points");
        };
        assert_eq!(points.len(), 1);
    }
}
