// src/math/mesh/normalizer.rs

//! Klassifikation und Vorbereitung der Eingabegeometrie vor der Triangulation.
//!
//! Für Delaunay und Constrained wird der äußere Ring der konvexen Hülle mit der Eingabe
//! vereinigt. Das Backend erhält so immer eine geschlossene Randkontur, auch wenn die
//! Eingabe nur aus Punkten oder offenen Linien besteht.

use super::{config::TriangulationMode, point_index::CanonicalPoint};
use crate::math::{
    error::{MathError, MathResult},
    types::{Coordinate, Dimension, Geometry, LineString, SimpleGeometry},
};
use geo::{Area, ConvexHull};
use std::collections::HashMap;
use tracing::debug;

/// Arbeitskopie der Eingabe samt Klassifikation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGeometry {
    /// Vereinigung aus Hüllring (falls vorhanden) und vereinheitlichter Eingabe.
    pub geometry: Geometry,
    /// Größte Dimension der Teilgeometrien der ursprünglichen Eingabe.
    pub dimension: Dimension,
    /// Die ursprüngliche Collection enthielt Teilgeometrien unterschiedlicher Dimension.
    pub mixed_dimension: bool,
    /// Keine Eingabekoordinate trug eine Höhe.
    pub is_2d: bool,
}

/// Ergebnis der Normalisierung.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Leere Eingabe oder entartete Hülle: der Aufruf liefert eine leere Ausgabe.
    Empty,
    Ready(NormalizedGeometry),
}

pub struct GeometryNormalizer;

impl GeometryNormalizer {
    /// Bestimmt die Dimension und ob eine Collection gemischte Dimensionen enthält.
    pub fn classify(geometry: &Geometry) -> Option<(Dimension, bool)> {
        let dimension = geometry.dimension()?;
        let mixed = match geometry {
            Geometry::GeometryCollection(members) => members
                .iter()
                .filter_map(Geometry::dimension)
                .any(|d| d != dimension),
            Geometry::Point(_)
            | Geometry::LineString(_)
            | Geometry::Polygon(_)
            | Geometry::MultiPoint(_)
            | Geometry::MultiLineString(_)
            | Geometry::MultiPolygon(_) => false,
        };
        Some((dimension, mixed))
    }

    pub fn normalize(geometry: &Geometry, mode: TriangulationMode) -> MathResult<Normalized> {
        if geometry.is_empty() {
            return Ok(Normalized::Empty);
        }
        let Some((dimension, mixed_dimension)) = Self::classify(geometry) else {
            return Ok(Normalized::Empty);
        };
        let is_2d = geometry.is_2d();

        if mode == TriangulationMode::Tessellation {
            return Ok(Normalized::Ready(NormalizedGeometry {
                geometry: geometry.clone(),
                dimension,
                mixed_dimension,
                is_2d,
            }));
        }

        let Some(hull_ring) = Self::convex_hull_ring(geometry) else {
            debug!(
                "GeometryNormalizer: degenerate convex hull for {} ({} coordinates), empty result",
                geometry.type_name(),
                geometry.num_coords()
            );
            return Ok(Normalized::Empty);
        };

        let working = match geometry {
            Geometry::GeometryCollection(_) => Self::unify_collection(geometry, dimension)?,
            Geometry::Point(_)
            | Geometry::LineString(_)
            | Geometry::Polygon(_)
            | Geometry::MultiPoint(_)
            | Geometry::MultiLineString(_)
            | Geometry::MultiPolygon(_) => geometry.clone(),
        };

        Ok(Normalized::Ready(NormalizedGeometry {
            geometry: Geometry::GeometryCollection(vec![Geometry::LineString(hull_ring), working]),
            dimension,
            mixed_dimension,
            is_2d,
        }))
    }

    /// Äußerer Ring der konvexen Hülle, Höhen aus der Eingabe übernommen.
    /// `None`, wenn die Hülle zu einem Punkt oder einer Linie entartet.
    pub fn convex_hull_ring(geometry: &Geometry) -> Option<LineString> {
        let mut elevations: HashMap<CanonicalPoint, Option<f64>> = HashMap::new();
        for c in geometry.coords_iter() {
            elevations
                .entry(CanonicalPoint::from_xy(c.x, c.y))
                .or_insert(c.z);
        }

        let points: geo::MultiPoint<f64> = geometry
            .coords_iter()
            .map(|c| geo::Point::new(c.x, c.y))
            .collect::<Vec<_>>()
            .into();
        let hull = points.convex_hull();
        if hull.exterior().0.len() < 4 || hull.unsigned_area() <= 0.0 {
            return None;
        }

        let ring = hull
            .exterior()
            .coords()
            .map(|c| {
                let z = elevations
                    .get(&CanonicalPoint::from_xy(c.x, c.y))
                    .copied()
                    .flatten();
                Coordinate { x: c.x, y: c.y, z }
            })
            .collect();
        Some(LineString::new(ring))
    }

    /// Vereinheitlicht eine `GeometryCollection`: ab Dimension 1 werden Linien und
    /// Polygonringe zu einem `MultiLineString` (Punkte entfallen), sonst zu einem
    /// `MultiPoint`.
    fn unify_collection(geometry: &Geometry, dimension: Dimension) -> MathResult<Geometry> {
        let components = geometry.simple_components();
        let unified = match dimension {
            Dimension::Point => Geometry::MultiPoint(
                components
                    .iter()
                    .filter_map(|component| match component {
                        SimpleGeometry::Point(c) => Some(**c),
                        SimpleGeometry::LineString(_) | SimpleGeometry::Polygon(_) => None,
                    })
                    .collect(),
            ),
            Dimension::Line | Dimension::Surface => {
                let mut lines = Vec::new();
                for component in components {
                    match component {
                        SimpleGeometry::Point(_) => {}
                        SimpleGeometry::LineString(line) => lines.push(line.clone()),
                        SimpleGeometry::Polygon(polygon) => {
                            lines.extend(polygon.rings().cloned())
                        }
                    }
                }
                lines.retain(|line| !line.is_empty());
                Geometry::MultiLineString(lines)
            }
        };

        if unified.is_empty() {
            return Err(MathError::invalid_argument(
                "Delaunay does not support mixed geometry type",
            ));
        }
        Ok(unified)
    }
}
