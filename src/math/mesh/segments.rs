// src/math/mesh/segments.rs

use super::point_index::PointTable;
use crate::math::types::{Coordinate, Geometry, SimpleGeometry};
use std::collections::HashSet;

/// Geordnetes Paar von Punktindizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment(pub [usize; 2]);

impl Segment {
    pub fn new(a: usize, b: usize) -> Self {
        Self([a, b])
    }

    pub fn start(&self) -> usize {
        self.0[0]
    }

    pub fn end(&self) -> usize {
        self.0[1]
    }

    /// Richtungsunabhängige Form (kleinerer Index zuerst).
    pub fn normalized(&self) -> Self {
        let [a, b] = self.0;
        if a <= b { Self([a, b]) } else { Self([b, a]) }
    }

    pub fn is_degenerate(&self) -> bool {
        self.0[0] == self.0[1]
    }
}

/// Punkte und Constraint-Segmente einer Geometrie.
#[derive(Debug, Clone, Default)]
pub struct SegmentSet {
    pub points: PointTable,
    pub segments: Vec<Segment>,
}

/// Erfasst Punkte und Segmente je linearer Komponente.
///
/// Der Cursor auf den vorherigen Punkt wird zu Beginn jedes Rings bzw. jeder Linie
/// zurückgesetzt, Segmente verbinden also nie unabhängige Komponenten. Löcher eines
/// Polygons sind eigene Ringe.
#[derive(Debug)]
pub struct SegmentBuilder {
    points: PointTable,
    segments: Vec<Segment>,
    seen: HashSet<Segment>,
    previous: Option<usize>,
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self {
            points: PointTable::new(),
            segments: Vec::new(),
            seen: HashSet::new(),
            previous: None,
        }
    }

    /// Beginnt eine neue lineare Komponente.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Fügt einen isolierten Punkt hinzu.
    pub fn add_point(&mut self, coordinate: &Coordinate) -> usize {
        self.points.insert(coordinate)
    }

    /// Fügt einen Punkt der aktuellen Linie hinzu und verbindet ihn mit dem vorherigen.
    pub fn add_line_point(&mut self, coordinate: &Coordinate) -> usize {
        let index = self.points.insert(coordinate);
        if let Some(previous) = self.previous {
            let segment = Segment::new(previous, index);
            // Zusammengefallene Punkte und doppelte Kanten erreichen das Backend nicht
            if !segment.is_degenerate() && self.seen.insert(segment.normalized()) {
                self.segments.push(segment);
            }
        }
        self.previous = Some(index);
        index
    }

    pub fn add_line(&mut self, coordinates: &[Coordinate]) {
        self.reset();
        for coordinate in coordinates {
            self.add_line_point(coordinate);
        }
        self.reset();
    }

    pub fn add_simple(&mut self, geometry: SimpleGeometry<'_>) {
        match geometry {
            SimpleGeometry::Point(coordinate) => {
                self.add_point(coordinate);
            }
            SimpleGeometry::LineString(line) => self.add_line(&line.coords),
            SimpleGeometry::Polygon(polygon) => {
                for ring in polygon.rings() {
                    self.add_line(&ring.coords);
                }
            }
        }
    }

    pub fn add_geometry(&mut self, geometry: &Geometry) {
        for component in geometry.simple_components() {
            self.add_simple(component);
        }
    }

    pub fn build(self) -> SegmentSet {
        SegmentSet {
            points: self.points,
            segments: self.segments,
        }
    }

    /// Erfasst eine ganze Geometrie.
    pub fn capture(geometry: &Geometry) -> SegmentSet {
        let mut builder = Self::new();
        builder.add_geometry(geometry);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::types::{LineString, Polygon};

    #[test]
    fn test_segments_do_not_bridge_components() {
        let geometry = Geometry::MultiLineString(vec![
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            LineString::from(vec![(5.0, 5.0), (6.0, 5.0)]),
        ]);
        let set = SegmentBuilder::capture(&geometry);
        assert_eq!(set.points.len(), 4);
        assert_eq!(set.segments, vec![Segment::new(0, 1), Segment::new(2, 3)]);
    }

    #[test]
    fn test_polygon_holes_are_independent_rings() {
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
            vec![LineString::from(vec![
                (4.0, 4.0),
                (6.0, 4.0),
                (6.0, 6.0),
                (4.0, 4.0),
            ])],
        );
        let set = SegmentBuilder::capture(&Geometry::Polygon(polygon));
        assert_eq!(set.points.len(), 7);
        assert_eq!(set.segments.len(), 7);
        // Kein Segment verbindet den äußeren Ring (0..4) mit dem Loch (4..7)
        for segment in &set.segments {
            assert_eq!(segment.start() < 4, segment.end() < 4);
        }
    }

    #[test]
    fn test_duplicate_and_degenerate_segments_are_dropped() {
        let geometry = Geometry::MultiLineString(vec![
            LineString::from(vec![(0.0, 0.0), (0.0, 0.0), (1.0, 1.0)]),
            LineString::from(vec![(1.0, 1.0), (0.0, 0.0)]),
        ]);
        let set = SegmentBuilder::capture(&geometry);
        assert_eq!(set.segments, vec![Segment::new(0, 1)]);
    }

    #[test]
    fn test_normalized_segment_ignores_direction() {
        assert_eq!(Segment::new(3, 1).normalized(), Segment::new(1, 3).normalized());
    }
}
