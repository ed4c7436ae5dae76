// src/math/voronoi/composer.rs

//! Voronoi-Diagramme aus Punktmengen oder aus bereits triangulierter Eingabe.
//!
//! Punktmengen werden mit `spade` trianguliert; jede Zelle entsteht durch Clipping des
//! Diagrammbereichs an den Mittelsenkrechten zu allen Delaunay-Nachbarn. Triangulierte
//! Eingaben (Dreieckspolygone) werden über ihren Dualgraphen ausgewertet.

use super::{
    clipping::{clip_to_bisector, clip_to_bounds, dedup_ring, signed_area},
    config::{VoronoiConfig, VoronoiOutput},
    dual_graph::{DualGraph, Fan},
};
use crate::math::{
    error::{MathError, MathResult},
    mesh::{CanonicalPoint, PointTable},
    types::{Bounds2D, Coordinate, Geometry, LineString, Polygon, SpadePoint},
    utils::{comparison, simple_geometry},
};
use spade::{DelaunayTriangulation, Triangulation};
use std::collections::HashSet;
use tracing::debug;

/// Eine Zelle als offener CCW-Ring in der Ebene, noch vor der Wahl der Ausgabedimension.
pub type VoronoiCell = Vec<SpadePoint>;

pub struct VoronoiComposer {
    config: VoronoiConfig,
}

impl VoronoiComposer {
    pub fn new(config: VoronoiConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn empty(&self) -> Geometry {
        Geometry::empty_of(self.config.output.dimension())
    }

    /// Erzeugt das Diagramm in der konfigurierten Ausgabedimension.
    pub fn compose(&self, geometry: Option<&Geometry>) -> MathResult<Geometry> {
        let Some(geometry) = geometry.filter(|g| !g.is_empty()) else {
            return Ok(self.empty());
        };
        if Self::is_point_set(geometry) {
            self.from_sites(geometry)
        } else {
            self.from_triangles(geometry)
        }
    }

    /// `Point`, `MultiPoint` oder eine Collection, deren erstes Element ein Punkt ist.
    pub fn is_point_set(geometry: &Geometry) -> bool {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => true,
            Geometry::GeometryCollection(members) => {
                matches!(members.first(), Some(Geometry::Point(_)))
            }
            Geometry::LineString(_)
            | Geometry::Polygon(_)
            | Geometry::MultiLineString(_)
            | Geometry::MultiPolygon(_) => false,
        }
    }

    // === Punktmengen ===

    fn from_sites(&self, geometry: &Geometry) -> MathResult<Geometry> {
        let flat: Vec<Coordinate> = geometry.coords_iter().map(|c| c.to_2d()).collect();
        let sites = PointTable::capture(flat.iter());
        let Some(site_envelope) = Bounds2D::from_points_iter(sites.coordinates().iter().map(Coordinate::xy))
        else {
            return Ok(self.empty());
        };

        let mut diagram_envelope =
            site_envelope.expand(site_envelope.width().max(site_envelope.height()));
        if let Some(clip) = &self.config.clip_envelope {
            diagram_envelope.expand_to_include_bounds(clip);
        }
        if diagram_envelope.area() <= 0.0 {
            debug!(
                "VoronoiComposer: degenerate diagram envelope for {} sites, empty result",
                sites.len()
            );
            return Ok(self.empty());
        }

        let positions: Vec<SpadePoint> = sites.coordinates().iter().map(Coordinate::xy).collect();
        let triangulation: DelaunayTriangulation<SpadePoint> =
            DelaunayTriangulation::bulk_load(positions).map_err(|e| {
                MathError::triangulation_failed(format!("Failed to triangulate Voronoi sites: {:?}", e))
            })?;
        debug!(
            "VoronoiComposer: {} sites, {} Delaunay triangles, diagram envelope {}",
            triangulation.num_vertices(),
            triangulation.num_inner_faces(),
            diagram_envelope
        );

        if self.config.output == VoronoiOutput::Points {
            return Ok(Geometry::MultiPoint(
                triangulation
                    .inner_faces()
                    .filter_map(|face| {
                        let [a, b, c] = face.vertices().map(|v| v.position());
                        simple_geometry::circumcenter(a, b, c)
                    })
                    .map(Coordinate::from_xy)
                    .collect(),
            ));
        }

        let corners = diagram_envelope.corners();
        let cells = sites
            .coordinates()
            .iter()
            .filter_map(|site| {
                let position = site.xy();
                let vertex = triangulation.locate_vertex(position)?;
                let cell = bisector_cell(&corners, position, vertex.out_edges().map(|e| e.to().position()));
                (cell.len() >= 3).then_some(cell)
            })
            .collect();

        Ok(self.cells_to_output(cells))
    }

    // === Triangulierte Eingabe ===

    fn from_triangles(&self, geometry: &Geometry) -> MathResult<Geometry> {
        let has_area = geometry.envelope().is_some_and(|e| e.area() > 0.0);
        if !has_area {
            return Ok(self.empty());
        }

        let graph = DualGraph::from_geometry(geometry)?;
        debug!(
            "VoronoiComposer: dual graph with {} triangles over {} sites",
            graph.triangle_count(),
            graph.sites.len()
        );
        let envelope = self.config.clip_envelope;

        match (self.config.output, envelope) {
            (VoronoiOutput::Points, _) => Ok(Geometry::MultiPoint(
                graph
                    .circumcenters
                    .iter()
                    .filter(|c| envelope.is_none_or(|e| e.contains_point(c.xy())))
                    .copied()
                    .collect(),
            )),
            (VoronoiOutput::Lines, None) => Ok(Geometry::MultiLineString(
                graph
                    .interior_edges()
                    .map(|(a, b)| (graph.circumcenters[a], graph.circumcenters[b]))
                    .filter(|(a, b)| {
                        !(comparison::nearly_equal(a.x, b.x) && comparison::nearly_equal(a.y, b.y))
                    })
                    .map(|(a, b)| LineString::new(vec![a, b]))
                    .collect(),
            )),
            (VoronoiOutput::Polygons, None) => Ok(Geometry::MultiPolygon(
                graph
                    .fans()
                    .filter(|fan| fan.closed && fan.triangles.len() >= 3)
                    .map(|fan| {
                        let mut ring: Vec<Coordinate> = fan
                            .triangles
                            .iter()
                            .map(|&t| graph.circumcenters[t])
                            .collect();
                        ring.push(ring[0]);
                        Polygon::new(LineString::new(ring), Vec::new())
                    })
                    .collect(),
            )),
            (VoronoiOutput::Lines | VoronoiOutput::Polygons, Some(envelope)) => {
                let hull_sites: Vec<usize> = graph
                    .fans()
                    .filter(|fan| !fan.closed)
                    .map(|fan| fan.site)
                    .collect();
                let cells = graph
                    .fans()
                    .filter_map(|fan| Self::fan_cell(&graph, &fan, &envelope, &hull_sites))
                    .collect();
                Ok(self.cells_to_output(cells))
            }
        }
    }

    /// Zellpolygon eines Fächers innerhalb des Clip-Bereichs.
    ///
    /// Geschlossene Fächer ergeben den Ring ihrer Umkreismittelpunkte. Randknoten werden
    /// aus dem Clip-Bereich an den Mittelsenkrechten zu ihren Nachbarn und zu allen
    /// übrigen Randknoten geschnitten, damit sich die Zellen auch an einspringenden
    /// Ecken einer nicht konvexen Triangulierung nicht überlappen.
    fn fan_cell(
        graph: &DualGraph,
        fan: &Fan,
        envelope: &Bounds2D,
        hull_sites: &[usize],
    ) -> Option<VoronoiCell> {
        let cell = if fan.closed {
            let mut ring: VoronoiCell = fan
                .triangles
                .iter()
                .map(|&t| graph.circumcenter_xy(t))
                .collect();
            if signed_area(&ring) < 0.0 {
                ring.reverse();
            }
            dedup_ring(clip_to_bounds(&ring, envelope))
        } else {
            let others = graph
                .neighbours(fan.site)
                .into_iter()
                .chain(hull_sites.iter().copied())
                .filter(|&other| other != fan.site)
                .map(|other| graph.site_xy(other));
            bisector_cell(&envelope.corners(), graph.site_xy(fan.site), others)
        };
        (cell.len() >= 3).then_some(cell)
    }

    fn cells_to_output(&self, cells: Vec<VoronoiCell>) -> Geometry {
        match self.config.output {
            VoronoiOutput::Polygons => Geometry::MultiPolygon(
                cells
                    .into_iter()
                    .map(|cell| Polygon::new(closed_ring(&cell), Vec::new()))
                    .collect(),
            ),
            VoronoiOutput::Lines => Geometry::MultiLineString(unique_segments(&cells)),
            VoronoiOutput::Points => Geometry::MultiPoint(
                cells.iter().flatten().copied().map(Coordinate::from_xy).collect(),
            ),
        }
    }
}

/// Schneidet `start` an den Mittelsenkrechten zwischen `site` und jedem Nachbarn.
fn bisector_cell(
    start: &[SpadePoint],
    site: SpadePoint,
    neighbours: impl IntoIterator<Item = SpadePoint>,
) -> VoronoiCell {
    let mut cell = start.to_vec();
    for neighbour in neighbours {
        cell = clip_to_bisector(&cell, site, neighbour);
        if cell.is_empty() {
            break;
        }
    }
    dedup_ring(cell)
}

fn closed_ring(cell: &[SpadePoint]) -> LineString {
    let mut coords: Vec<Coordinate> = cell.iter().copied().map(Coordinate::from_xy).collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}

/// Alle Zellkanten als Segmente, richtungsunabhängig dedupliziert.
fn unique_segments(cells: &[VoronoiCell]) -> Vec<LineString> {
    let mut seen = HashSet::new();
    let mut segments = Vec::new();
    for cell in cells {
        for i in 0..cell.len() {
            let (a, b) = (cell[i], cell[(i + 1) % cell.len()]);
            let (ka, kb) = (CanonicalPoint::from_xy(a.x, a.y), CanonicalPoint::from_xy(b.x, b.y));
            if ka == kb {
                continue;
            }
            let key = if ka < kb { (ka, kb) } else { (kb, ka) };
            if seen.insert(key) {
                segments.push(LineString::new(vec![
                    Coordinate::from_xy(a),
                    Coordinate::from_xy(b),
                ]));
            }
        }
    }
    segments
}
