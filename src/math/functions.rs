// src/math/functions.rs

//! Öffentliche Einstiegspunkte. Jeder Aufruf ist rein: Konfiguration und alle
//! Zwischenstrukturen leben nur für die Dauer des Aufrufs.

use crate::math::{
    error::{MathError, MathResult},
    mesh::{
        MeshExtractor, MeshOutput, TriangleMesh, TriangulationAdapter, TriangulationConfig,
        TriangulationMode,
    },
    types::{Bounds2D, Geometry},
    voronoi::{VoronoiComposer, VoronoiConfig, VoronoiOutput},
};
use tracing::debug;

/// Trianguliert eine Geometrie und liefert die Ausgabe gemäß `config.output`.
///
/// `None`, leere Eingaben und entartete Hüllen ergeben eine leere Collection des
/// angefragten Typs.
pub fn triangulate(geometry: Option<&Geometry>, config: &TriangulationConfig) -> MathResult<Geometry> {
    match mesh(geometry, config)? {
        Some(mesh) => Ok(MeshExtractor::extract(&mesh, config.output)),
        None => Ok(Geometry::empty_of(config.output.dimension())),
    }
}

/// Das rohe Dreiecksnetz, für Aufrufer, die mehrere Sichten darauf benötigen.
pub fn mesh(geometry: Option<&Geometry>, config: &TriangulationConfig) -> MathResult<Option<TriangleMesh>> {
    let adapter = TriangulationAdapter::new(config.clone())?;
    match geometry {
        Some(geometry) => adapter.triangulate(geometry),
        None => Ok(None),
    }
}

/// Delaunay-Triangulation der Punktmenge. Flag 0 liefert Polygone, Flag 1 Linien.
pub fn delaunay(geometry: Option<&Geometry>, flag: i32) -> MathResult<Geometry> {
    let config = TriangulationConfig::new(TriangulationMode::Delaunay)
        .with_output(MeshOutput::try_from(flag)?);
    triangulate(geometry, &config)
}

/// Constrained Delaunay; mit `quality` wird bis zum Mindestwinkel `quality * 30°` verfeinert.
pub fn constrained_delaunay(
    geometry: Option<&Geometry>,
    flag: i32,
    quality: Option<f64>,
) -> MathResult<Geometry> {
    let mut config = TriangulationConfig::new(TriangulationMode::Constrained)
        .with_output(MeshOutput::try_from(flag)?);
    config.quality_threshold = quality;
    triangulate(geometry, &config)
}

/// Zerlegt ein `Polygon` oder jedes Polygon eines `MultiPolygon` in Dreiecke.
pub fn tessellate(geometry: Option<&Geometry>) -> MathResult<Geometry> {
    let config = TriangulationConfig::new(TriangulationMode::Tessellation);
    let Some(geometry) = geometry else {
        return Ok(Geometry::MultiPolygon(Vec::new()));
    };

    match geometry {
        Geometry::Polygon(_) => triangulate(Some(geometry), &config),
        Geometry::MultiPolygon(polygons) => {
            let adapter = TriangulationAdapter::new(config)?;
            let mut triangles = Vec::new();
            for polygon in polygons {
                if let Some(mesh) = adapter.triangulate(&Geometry::Polygon(polygon.clone()))? {
                    if let Geometry::MultiPolygon(parts) = MeshExtractor::triangles(&mesh) {
                        triangles.extend(parts);
                    }
                }
            }
            debug!(
                "tessellate: {} polygons decomposed into {} triangles",
                polygons.len(),
                triangles.len()
            );
            Ok(Geometry::MultiPolygon(triangles))
        }
        Geometry::Point(_)
        | Geometry::LineString(_)
        | Geometry::MultiPoint(_)
        | Geometry::MultiLineString(_)
        | Geometry::GeometryCollection(_) => Err(MathError::invalid_argument(format!(
            "Only Polygon or MultiPolygon are accepted for tessellation, got {}",
            geometry.type_name()
        ))),
    }
}

/// Voronoi-Diagramm aus einer Punktmenge oder aus einer Delaunay-Triangulation.
/// `output_dimension`: 0 Knoten, 1 Kanten, 2 Zellen.
pub fn voronoi(
    geometry: Option<&Geometry>,
    output_dimension: i32,
    envelope: Option<Bounds2D>,
) -> MathResult<Geometry> {
    let mut config = VoronoiConfig::new().with_output(VoronoiOutput::try_from(output_dimension)?);
    config.clip_envelope = envelope;
    VoronoiComposer::new(config)?.compose(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{
        mesh::Segment,
        types::{Coordinate, LineString, Polygon, SpadePoint},
    };
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::collections::{HashMap, HashSet};

    fn sample_sites() -> Geometry {
        Geometry::MultiPoint(
            [(2.0, 2.0), (6.0, 3.0), (4.0, 7.0), (2.0, 8.0), (1.0, 6.0), (3.0, 5.0)]
                .iter()
                .map(|&(x, y)| Coordinate::new_3d(x, y, 0.0))
                .collect(),
        )
    }

    fn rectangle() -> Geometry {
        Geometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0), (0.0, 0.0)]),
            Vec::new(),
        ))
    }

    fn polygon_area(polygon: &Polygon) -> f64 {
        let c = &polygon.exterior.coords;
        0.5 * (0..c.len() - 1)
            .map(|i| c[i].x * c[i + 1].y - c[i + 1].x * c[i].y)
            .sum::<f64>()
            .abs()
    }

    /// Anzahl der Zusammenhangskomponenten über gemeinsame Kanten.
    fn edge_components(mesh: &TriangleMesh) -> usize {
        let mut owner: HashMap<Segment, usize> = HashMap::new();
        let mut parent: Vec<usize> = (0..mesh.triangle_count()).collect();
        fn root(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for (t, &[a, b, c]) in mesh.triangles.iter().enumerate() {
            for side in [Segment::new(a, b), Segment::new(b, c), Segment::new(c, a)] {
                if let Some(&other) = owner.get(&side.normalized()) {
                    let (ra, rb) = (root(&mut parent, t), root(&mut parent, other));
                    parent[ra] = rb;
                } else {
                    owner.insert(side.normalized(), t);
                }
            }
        }
        (0..parent.len())
            .filter(|&i| root(&mut parent, i) == i)
            .count()
    }

    #[test]
    fn test_delaunay_of_sample_sites_is_connected() {
        let config = TriangulationConfig::new(TriangulationMode::Delaunay);
        let mesh = mesh(Some(&sample_sites()), &config).unwrap().unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 5);
        assert_eq!(edge_components(&mesh), 1);

        let used: HashSet<usize> = mesh.triangles.iter().flatten().copied().collect();
        assert_eq!(used.len(), 6);
        assert!(mesh.vertices.iter().all(|c| c.z == Some(0.0)));
    }

    #[test]
    fn test_delaunay_flags() {
        let Geometry::MultiPolygon(triangles) = delaunay(Some(&sample_sites()), 0).unwrap() else {
            panic!("expected polygons");
        };
        assert_eq!(triangles.len(), 5);

        let Geometry::MultiLineString(edges) = delaunay(Some(&sample_sites()), 1).unwrap() else {
            panic!("expected lines");
        };
        // 3N - 3 - H mit N = 6, H = 5
        assert_eq!(edges.len(), 10);

        assert!(matches!(
            delaunay(Some(&sample_sites()), 2),
            Err(MathError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_tessellation_of_rectangle_preserves_area() {
        let Geometry::MultiPolygon(triangles) = tessellate(Some(&rectangle())).unwrap() else {
            panic!("expected polygons");
        };
        assert_eq!(triangles.len(), 2);
        let total: f64 = triangles.iter().map(polygon_area).sum();
        assert!((total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_tessellation_rejects_collections() {
        let collection = Geometry::GeometryCollection(vec![rectangle()]);
        assert!(matches!(
            tessellate(Some(&collection)),
            Err(MathError::InvalidArgument { .. })
        ));
        assert!(matches!(
            tessellate(Some(&Geometry::GeometryCollection(Vec::new()))),
            Err(MathError::InvalidArgument { .. })
        ));
        assert_eq!(tessellate(None).unwrap(), Geometry::MultiPolygon(Vec::new()));
    }

    #[test]
    fn test_tessellation_of_multipolygon_per_member() {
        let Geometry::Polygon(first) = rectangle() else {
            unreachable!()
        };
        let second = Polygon::new(
            LineString::from(vec![(20.0, 0.0), (24.0, 0.0), (22.0, 3.0), (20.0, 0.0)]),
            Vec::new(),
        );
        let Geometry::MultiPolygon(triangles) =
            tessellate(Some(&Geometry::MultiPolygon(vec![first, second]))).unwrap()
        else {
            panic!("expected polygons");
        };
        assert_eq!(triangles.len(), 3);
        let total: f64 = triangles.iter().map(polygon_area).sum();
        assert_relative_eq!(total, 56.0, epsilon = 1e-9);
    }

    #[test]
    fn test_quality_refinement_meets_minimum_angle() {
        let thin = Geometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (20.0, 0.0), (20.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
            Vec::new(),
        ));
        let config = TriangulationConfig::new(TriangulationMode::Constrained).with_quality(0.7);
        let mesh = mesh(Some(&thin), &config).unwrap().unwrap();
        assert!(mesh.min_angle_deg().unwrap() >= 0.7 * 30.0 - 1e-6);
        assert_relative_eq!(mesh.area(), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_quality_fails_before_triangulation() {
        // Auch ohne Eingabe wird die Schwelle geprüft
        assert!(matches!(
            constrained_delaunay(None, 0, Some(1.0)),
            Err(MathError::InvalidArgument { .. })
        ));
        assert!(matches!(
            constrained_delaunay(Some(&rectangle()), 0, Some(1.5)),
            Err(MathError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_empty_inputs_yield_typed_empty_collections() {
        assert_eq!(
            voronoi(None, 2, None).unwrap(),
            Geometry::MultiPolygon(Vec::new())
        );
        assert_eq!(
            delaunay(None, 1).unwrap(),
            Geometry::MultiLineString(Vec::new())
        );
        let collinear = Geometry::MultiPoint(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(2.0, 2.0),
        ]);
        assert_eq!(
            delaunay(Some(&collinear), 0).unwrap(),
            Geometry::MultiPolygon(Vec::new())
        );
    }

    #[test]
    fn test_voronoi_rejects_unknown_dimension() {
        assert!(matches!(
            voronoi(Some(&sample_sites()), 3, None),
            Err(MathError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_voronoi_of_delaunay_output() {
        let triangles = delaunay(Some(&sample_sites()), 0).unwrap();
        let envelope = Bounds2D::new(SpadePoint::new(-7.0, -5.0), SpadePoint::new(13.0, 15.0)).unwrap();
        let Geometry::MultiPolygon(cells) = voronoi(Some(&triangles), 2, Some(envelope)).unwrap()
        else {
            panic!("expected polygons");
        };
        assert_eq!(cells.len(), 6);
        let total: f64 = cells.iter().map(polygon_area).sum();
        assert_relative_eq!(total, envelope.area(), epsilon = 1e-6);
    }

    #[test]
    fn test_euler_bound_for_random_points_and_holes() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..8 {
            let count = rng.random_range(10..200);
            let points: Vec<Coordinate> = (0..count)
                .map(|_| Coordinate::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)))
                .collect();
            let config = TriangulationConfig::new(TriangulationMode::Delaunay);
            let mesh = mesh(Some(&Geometry::MultiPoint(points)), &config).unwrap().unwrap();
            let (n, t) = (mesh.vertex_count(), mesh.triangle_count());
            // Punktmengen haben keine Löcher
            assert!(t <= 2 * n - 2);
            // Schärfer über die Randkanten: 3T = 2E - R
            let boundary = 2 * MeshExtractor::unique_edges(&mesh).len() - 3 * t;
            assert!(boundary >= 3);
            assert!(t <= 2 * n - 2 - boundary);
        }

        let holed = Geometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![LineString::from(vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0), (4.0, 4.0)])],
        ));
        let mesh = mesh(Some(&holed), &TriangulationConfig::new(TriangulationMode::Tessellation))
            .unwrap()
            .unwrap();
        let holes = 1;
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.triangle_count() <= 2 * mesh.vertex_count() - 2 - holes);
        assert_eq!(mesh.triangle_count(), 8);
        assert_relative_eq!(mesh.area(), 96.0, epsilon = 1e-9);
    }
}
