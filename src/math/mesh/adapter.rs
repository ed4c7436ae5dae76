// src/math/mesh/adapter.rs

//! Ansteuerung des Triangulations-Backends (`spade`) für die drei Modi.

use super::{
    config::{TriangulationConfig, TriangulationMode},
    extractor::MeshExtractor,
    normalizer::{GeometryNormalizer, Normalized, NormalizedGeometry},
    point_index::PointTable,
    segments::{Segment, SegmentBuilder, SegmentSet},
    triangle_mesh::TriangleMesh,
};
use crate::math::{
    error::{MathError, MathResult},
    types::{Coordinate, Dimension, Geometry, Polygon, SimpleGeometry, SpadePoint},
};
use geo::{Contains, Validation};
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, DelaunayTriangulation, HasPosition,
    InsertionError, PositionInTriangulation, RefinementParameters, Triangulation,
    handles::FixedVertexHandle,
};
use tracing::{debug, warn};

/// Knotentyp im Backend: Lage plus optionale Höhe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: SpadePoint,
    pub z: Option<f64>,
}

impl MeshVertex {
    pub fn from_coordinate(coordinate: &Coordinate) -> Self {
        Self {
            position: coordinate.xy(),
            z: coordinate.z,
        }
    }

    fn to_coordinate(self, is_2d: bool) -> Coordinate {
        Coordinate {
            x: self.position.x,
            y: self.position.y,
            z: if is_2d { None } else { self.z },
        }
    }
}

impl HasPosition for MeshVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint {
        self.position
    }
}

/// Steiner-Punkte der Verfeinerung; ihre Höhe wird danach auf der unverfeinerten
/// Triangulierung bestimmt.
impl From<SpadePoint> for MeshVertex {
    fn from(position: SpadePoint) -> Self {
        Self { position, z: None }
    }
}

fn require_polygon(geometry: &Geometry) -> MathResult<&Polygon> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(polygon),
        other => Err(MathError::invalid_argument(format!(
            "Only Polygon are accepted for tessellation, got {}",
            other.type_name()
        ))),
    }
}

fn insertion_failure(error: InsertionError) -> MathError {
    MathError::triangulation_failed(format!("Failed to insert point into triangulation: {:?}", error))
}

/// Backend-Eingabe eines Aufrufs: Modus plus vorbereitete Daten.
#[derive(Debug, Clone)]
pub enum MeshInput<'a> {
    Points(PointTable),
    /// Punkte mit Constraint-Segmenten; Löcher sind eigene Ringe der Segmentmenge.
    /// Ohne Segmente eine reine Punktmenge, die aber verfeinert werden kann.
    Constrained(SegmentSet),
    Tessellation(&'a Polygon),
}

impl MeshInput<'_> {
    pub fn mode(&self) -> TriangulationMode {
        match self {
            MeshInput::Points(_) => TriangulationMode::Delaunay,
            MeshInput::Constrained(_) => TriangulationMode::Constrained,
            MeshInput::Tessellation(_) => TriangulationMode::Tessellation,
        }
    }
}

/// Verteilt einen Aufruf auf Delaunay, Constrained oder Tessellation.
pub struct TriangulationAdapter {
    config: TriangulationConfig,
}

impl TriangulationAdapter {
    /// Validiert die Konfiguration, bevor irgendeine Triangulationsarbeit beginnt.
    pub fn new(config: TriangulationConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Trianguliert die Geometrie. `Ok(None)` bedeutet ein legitimes leeres Ergebnis
    /// (leere Eingabe oder entartete Hülle).
    pub fn triangulate(&self, geometry: &Geometry) -> MathResult<Option<TriangleMesh>> {
        match self.prepare(geometry)? {
            Some((input, is_2d)) => self.run(input, is_2d).map(Some),
            None => Ok(None),
        }
    }

    /// Normalisiert die Geometrie und baut die Backend-Eingabe für den Modus.
    pub fn prepare<'a>(&self, geometry: &'a Geometry) -> MathResult<Option<(MeshInput<'a>, bool)>> {
        let mode = self.config.mode;
        // Der Typ wird vor jeder weiteren Arbeit geprüft, auch für leere Eingaben
        if mode == TriangulationMode::Tessellation {
            require_polygon(geometry)?;
        }

        let normalized = match GeometryNormalizer::normalize(geometry, mode)? {
            Normalized::Empty => return Ok(None),
            Normalized::Ready(normalized) => normalized,
        };

        let input = match mode {
            TriangulationMode::Delaunay => {
                MeshInput::Points(PointTable::capture(normalized.geometry.coords_iter()))
            }
            TriangulationMode::Constrained => {
                MeshInput::Constrained(Self::capture_constraints(geometry, &normalized)?)
            }
            TriangulationMode::Tessellation => MeshInput::Tessellation(require_polygon(geometry)?),
        };
        Ok(Some((input, normalized.is_2d)))
    }

    /// Führt die Triangulation im Backend aus.
    pub fn run(&self, input: MeshInput<'_>, is_2d: bool) -> MathResult<TriangleMesh> {
        match input {
            MeshInput::Points(points) => Self::delaunay(&points, is_2d),
            MeshInput::Constrained(set) => self.constrained(&set, is_2d),
            MeshInput::Tessellation(polygon) => Self::tessellate_polygon(polygon, is_2d),
        }
    }

    fn delaunay(points: &PointTable, is_2d: bool) -> MathResult<TriangleMesh> {
        debug!("TriangulationAdapter: Delaunay over {} points", points.len());
        let vertices: Vec<MeshVertex> = points
            .coordinates()
            .iter()
            .map(MeshVertex::from_coordinate)
            .collect();
        let triangulation: DelaunayTriangulation<MeshVertex> =
            DelaunayTriangulation::bulk_load(vertices).map_err(insertion_failure)?;
        Ok(collect_mesh(&triangulation, is_2d))
    }

    fn capture_constraints(
        original: &Geometry,
        normalized: &NormalizedGeometry,
    ) -> MathResult<SegmentSet> {
        if normalized.dimension == Dimension::Point {
            return Ok(SegmentSet {
                points: PointTable::capture(normalized.geometry.coords_iter()),
                segments: Vec::new(),
            });
        }
        // Nur der Segmentpfad prüft die topologische Gültigkeit
        if !original.to_geo().is_valid() {
            return Err(MathError::GeometryInvalid {
                reason: format!("Provided {} is not valid", original.type_name()),
            });
        }
        Ok(SegmentBuilder::capture(&normalized.geometry))
    }

    fn constrained(&self, set: &SegmentSet, is_2d: bool) -> MathResult<TriangleMesh> {
        debug!(
            "TriangulationAdapter: constrained triangulation over {} points and {} segments",
            set.points.len(),
            set.segments.len()
        );

        let mut cdt = build_cdt(set)?;

        let Some(angle) = self.config.refinement_angle_deg() else {
            return Ok(collect_mesh(&cdt, is_2d));
        };
        let max_additional = self
            .config
            .max_refinement_vertices
            .unwrap_or(10 * cdt.num_vertices() + 1000);
        let parameters = RefinementParameters::<f64>::new()
            .with_angle_limit(AngleLimit::from_deg(angle))
            .with_max_additional_vertices(max_additional);

        // Die unverfeinerte Triangulierung liefert die Höhen der Steiner-Punkte
        let reference = (!is_2d).then(|| cdt.clone());
        let before = cdt.num_vertices();
        let result = cdt.refine(parameters);
        debug!(
            "TriangulationAdapter: refinement to {:.2}° added {} Steiner points",
            angle,
            cdt.num_vertices() - before
        );
        if !result.refinement_complete {
            warn!(
                "TriangulationAdapter: refinement stopped after {} additional vertices before reaching {:.2}°",
                max_additional, angle
            );
        }

        let mut mesh = collect_mesh(&cdt, is_2d);
        if let Some(reference) = &reference {
            for vertex in mesh.vertices.iter_mut().filter(|v| v.z.is_none()) {
                vertex.z = elevation_at(reference, vertex.xy());
            }
        }
        Ok(mesh)
    }

    /// Zerlegt ein Polygon mit Löchern exakt in Dreiecke, ohne Steiner-Punkte.
    fn tessellate_polygon(polygon: &Polygon, is_2d: bool) -> MathResult<TriangleMesh> {
        let mut builder = SegmentBuilder::new();
        builder.add_simple(SimpleGeometry::Polygon(polygon));
        let set = builder.build();
        debug!(
            "TriangulationAdapter: tessellating polygon with {} rings, {} points",
            polygon.interiors.len() + 1,
            set.points.len()
        );

        let cdt = build_cdt(&set)?;
        let mut mesh = collect_mesh(&cdt, is_2d);

        // Nur Dreiecke innerhalb des Polygons (nicht in Löchern) bleiben erhalten
        let area: geo::Polygon<f64> = polygon.into();
        let before = mesh.triangles.len();
        let vertices = &mesh.vertices;
        mesh.triangles.retain(|&[a, b, c]| {
            let centroid = geo::Point::new(
                (vertices[a].x + vertices[b].x + vertices[c].x) / 3.0,
                (vertices[a].y + vertices[b].y + vertices[c].y) / 3.0,
            );
            area.contains(&centroid)
        });
        debug!(
            "TriangulationAdapter: kept {} of {} triangles inside the polygon",
            mesh.triangles.len(),
            before
        );
        Ok(mesh)
    }
}

/// Baut eine CDT in Indexreihenfolge auf und erzwingt alle Segmente.
/// Sich schneidende Segmente werden am Schnittpunkt geteilt; der neue Knoten erhält
/// eine entlang des Segments interpolierte Höhe.
fn build_cdt(set: &SegmentSet) -> MathResult<ConstrainedDelaunayTriangulation<MeshVertex>> {
    let mut cdt: ConstrainedDelaunayTriangulation<MeshVertex> =
        ConstrainedDelaunayTriangulation::new();
    let handles = set
        .points
        .coordinates()
        .iter()
        .map(|c| cdt.insert(MeshVertex::from_coordinate(c)))
        .collect::<Result<Vec<FixedVertexHandle>, _>>()
        .map_err(insertion_failure)?;

    for &Segment([start, end]) in &set.segments {
        let (from, to) = (handles[start], handles[end]);
        // Punkte, die nur in der Höhe abweichen, teilen sich einen Knoten
        if from == to {
            continue;
        }
        let a = MeshVertex::from_coordinate(&set.points.coordinates()[start]);
        let b = MeshVertex::from_coordinate(&set.points.coordinates()[end]);
        cdt.add_constraint_and_split(from, to, |position| MeshVertex {
            position,
            z: interpolate_z(&a, &b, position),
        });
    }
    Ok(cdt)
}

fn interpolate_z(a: &MeshVertex, b: &MeshVertex, position: SpadePoint) -> Option<f64> {
    let (za, zb) = (a.z?, b.z?);
    let length = (b.position.x - a.position.x).hypot(b.position.y - a.position.y);
    if length == 0.0 {
        return Some(za);
    }
    let t = (position.x - a.position.x).hypot(position.y - a.position.y) / length;
    Some(za + t * (zb - za))
}

/// Höhe an `position`: auf der Ebene des enthaltenden Dreiecks, entlang einer Kante
/// (auch knapp außerhalb der Hülle) oder direkt vom getroffenen Knoten.
fn elevation_at(
    reference: &ConstrainedDelaunayTriangulation<MeshVertex>,
    position: SpadePoint,
) -> Option<f64> {
    match reference.locate(position) {
        PositionInTriangulation::OnVertex(vertex) => reference.vertex(vertex).data().z,
        PositionInTriangulation::OnEdge(edge) | PositionInTriangulation::OutsideOfConvexHull(edge) => {
            let [a, b] = reference.directed_edge(edge).vertices().map(|v| *v.data());
            interpolate_z(&a, &b, position)
        }
        PositionInTriangulation::OnFace(face) => {
            let corners = reference
                .face(face)
                .vertices()
                .map(|v| v.data().to_coordinate(false));
            MeshExtractor::plane_z(corners, position)
        }
        PositionInTriangulation::NoTriangulation => None,
    }
}

/// Überträgt Knoten und innere Dreiecke des Backends in ein `TriangleMesh`.
fn collect_mesh<T>(triangulation: &T, is_2d: bool) -> TriangleMesh
where
    T: Triangulation<Vertex = MeshVertex>,
{
    let vertices = triangulation
        .vertices()
        .map(|vertex| vertex.data().to_coordinate(is_2d))
        .collect();
    let triangles = triangulation
        .inner_faces()
        .map(|face| face.vertices().map(|vertex| vertex.fix().index()))
        .collect();
    TriangleMesh {
        vertices,
        triangles,
        is_2d,
    }
}
