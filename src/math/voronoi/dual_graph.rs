// src/math/voronoi/dual_graph.rs

//! Nachbarschaftsgraph einer bereits triangulierten Eingabe.
//!
//! Jedes Dreieck wird CCW orientiert. `neighbors[t][i]` ist das Dreieck, das die Kante
//! `triangles[t][i] -> triangles[t][(i + 1) % 3]` mit `t` teilt.

use crate::math::{
    error::{MathError, MathResult},
    mesh::{MeshExtractor, PointTable, Segment},
    types::{Coordinate, Geometry, SimpleGeometry, SpadePoint},
    utils::simple_geometry,
};
use std::collections::HashMap;
use tracing::debug;

/// Dreiecke um einen Knoten, CCW sortiert.
#[derive(Debug, Clone, PartialEq)]
pub struct Fan {
    pub site: usize,
    pub triangles: Vec<usize>,
    /// Der Knoten liegt im Inneren: das letzte Dreieck grenzt wieder an das erste.
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct DualGraph {
    pub sites: PointTable,
    pub triangles: Vec<[usize; 3]>,
    pub neighbors: Vec<[Option<usize>; 3]>,
    /// Umkreismittelpunkt je Dreieck (mit Höhe auf der Dreiecksebene, falls 3D).
    pub circumcenters: Vec<Coordinate>,
    incident: Vec<Vec<usize>>,
}

impl DualGraph {
    /// Liest Dreiecke aus `Polygon`, `MultiPolygon` oder einer Collection davon.
    pub fn from_geometry(geometry: &Geometry) -> MathResult<Self> {
        let is_2d = geometry.is_2d();
        let mut sites = PointTable::new();
        let mut triangles = Vec::new();
        let mut circumcenters = Vec::new();
        let mut skipped = 0;

        for component in geometry.simple_components() {
            let polygon = match component {
                SimpleGeometry::Polygon(polygon) => polygon,
                SimpleGeometry::Point(_) | SimpleGeometry::LineString(_) => {
                    return Err(MathError::invalid_argument(
                        "Voronoi input must be a point set or a set of triangles",
                    ));
                }
            };
            let ring = &polygon.exterior.coords;
            if !polygon.interiors.is_empty() || ring.len() != 4 || !polygon.exterior.is_closed() {
                return Err(MathError::invalid_argument(format!(
                    "Voronoi input polygons must be triangles, got a ring of {} coordinates",
                    ring.len()
                )));
            }

            let corners = [ring[0], ring[1], ring[2]];
            let mut triangle = corners.map(|c| sites.insert(&c));
            let [a, b, c] = triangle.map(|i| sites.coordinates()[i].xy());
            let orientation = simple_geometry::cross_product_2d(a, b, c);
            if orientation == 0.0 || triangle[0] == triangle[1] || triangle[1] == triangle[2] {
                skipped += 1;
                continue;
            }
            if orientation < 0.0 {
                triangle.swap(1, 2);
            }
            let Some(center) = MeshExtractor::circumcenter(
                triangle.map(|i| sites.coordinates()[i]),
                is_2d,
            ) else {
                skipped += 1;
                continue;
            };
            triangles.push(triangle);
            circumcenters.push(center);
        }
        if skipped > 0 {
            debug!("DualGraph: skipped {} degenerate triangles", skipped);
        }

        let mut incident = vec![Vec::new(); sites.len()];
        let mut neighbors = vec![[None; 3]; triangles.len()];
        let mut open_edges: HashMap<Segment, (usize, usize)> = HashMap::new();
        for (t, triangle) in triangles.iter().enumerate() {
            for i in 0..3 {
                incident[triangle[i]].push(t);
                let edge = Segment::new(triangle[i], triangle[(i + 1) % 3]).normalized();
                match open_edges.remove(&edge) {
                    Some((other, side)) => {
                        neighbors[t][i] = Some(other);
                        neighbors[other][side] = Some(t);
                    }
                    None => {
                        open_edges.insert(edge, (t, i));
                    }
                }
            }
        }

        Ok(Self {
            sites,
            triangles,
            neighbors,
            circumcenters,
            incident,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn circumcenter_xy(&self, triangle: usize) -> SpadePoint {
        self.circumcenters[triangle].xy()
    }

    /// Position des Knotens innerhalb des Dreiecks.
    fn corner_of(&self, triangle: usize, site: usize) -> Option<usize> {
        self.triangles[triangle].iter().position(|&v| v == site)
    }

    /// Nächstes Dreieck gegen den Uhrzeigersinn um `site` (über die Kante `c -> site`).
    fn next_ccw(&self, triangle: usize, site: usize) -> Option<usize> {
        let corner = self.corner_of(triangle, site)?;
        self.neighbors[triangle][(corner + 2) % 3]
    }

    /// Nächstes Dreieck im Uhrzeigersinn um `site` (über die Kante `site -> b`).
    fn next_cw(&self, triangle: usize, site: usize) -> Option<usize> {
        let corner = self.corner_of(triangle, site)?;
        self.neighbors[triangle][corner]
    }

    /// Läuft die Dreiecke um `site` CCW ab. Bei Randknoten beginnt der Fächer am
    /// Dreieck, dessen CW-Kante auf dem Rand liegt.
    pub fn fan(&self, site: usize) -> Option<Fan> {
        let incident = self.incident.get(site)?;
        let &start = incident.first()?;
        let limit = incident.len();

        // Zum CW-Ende laufen, sofern der Fächer offen ist
        let mut first = start;
        let mut closed = false;
        for _ in 0..limit {
            match self.next_cw(first, site) {
                Some(t) if t == start => {
                    closed = true;
                    break;
                }
                Some(t) => first = t,
                None => break,
            }
        }

        let mut triangles = vec![first];
        let mut current = first;
        while triangles.len() < limit {
            match self.next_ccw(current, site) {
                Some(t) if t == first => break,
                Some(t) => {
                    triangles.push(t);
                    current = t;
                }
                None => break,
            }
        }

        Some(Fan {
            site,
            triangles,
            closed,
        })
    }

    /// Alle Fächer in Knotenreihenfolge.
    pub fn fans(&self) -> impl Iterator<Item = Fan> + '_ {
        (0..self.sites.len()).filter_map(|site| self.fan(site))
    }

    /// Innere Kanten als Paare benachbarter Dreiecke, jede genau einmal.
    pub fn interior_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(t, sides)| {
            sides
                .iter()
                .filter_map(move |n| n.filter(|&other| other > t).map(|other| (t, other)))
        })
    }

    /// Alle über eine Dreieckskante mit `site` verbundenen Knoten, aufsteigend.
    pub fn neighbours(&self, site: usize) -> Vec<usize> {
        let mut neighbours: Vec<usize> = self
            .incident
            .get(site)
            .into_iter()
            .flatten()
            .flat_map(|&t| self.triangles[t])
            .filter(|&other| other != site)
            .collect();
        neighbours.sort_unstable();
        neighbours.dedup();
        neighbours
    }

    pub fn site_xy(&self, site: usize) -> SpadePoint {
        self.sites.coordinates()[site].xy()
    }
}
