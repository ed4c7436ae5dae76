// src/math/voronoi/clipping.rs

//! Sutherland-Hodgman-Clipping konvexer Zellen gegen Halbebenen und Rechtecke.

use crate::math::{
    types::{Bounds2D, SpadePoint},
    utils::constants::EPSILON_F64,
};

/// Clippt ein Polygon gegen die linke Halbebene der gerichteten Geraden
/// `edge_start -> edge_end`. Punkte auf der Geraden gelten als innen.
pub fn clip_polygon(
    vertices: &[SpadePoint],
    edge_start: SpadePoint,
    edge_end: SpadePoint,
) -> Vec<SpadePoint> {
    let Some(&last) = vertices.last() else {
        return Vec::new();
    };

    let mut clipped = Vec::with_capacity(vertices.len() + 1);
    let mut s = last;
    for &e in vertices {
        if is_inside_edge(e, edge_start, edge_end) {
            if !is_inside_edge(s, edge_start, edge_end) {
                if let Some(intersection) = line_intersection(s, e, edge_start, edge_end) {
                    clipped.push(intersection);
                }
            }
            clipped.push(e);
        } else if is_inside_edge(s, edge_start, edge_end) {
            if let Some(intersection) = line_intersection(s, e, edge_start, edge_end) {
                clipped.push(intersection);
            }
        }
        s = e;
    }
    clipped
}

/// Clippt ein Polygon gegen ein achsenparalleles Rechteck.
pub fn clip_to_bounds(vertices: &[SpadePoint], bounds: &Bounds2D) -> Vec<SpadePoint> {
    let corners = bounds.corners();
    let mut clipped = vertices.to_vec();
    for i in 0..corners.len() {
        if clipped.is_empty() {
            break;
        }
        clipped = clip_polygon(&clipped, corners[i], corners[(i + 1) % corners.len()]);
    }
    clipped
}

/// Behält den Teil des Polygons, der näher an `site` als an `neighbour` liegt.
pub fn clip_to_bisector(
    vertices: &[SpadePoint],
    site: SpadePoint,
    neighbour: SpadePoint,
) -> Vec<SpadePoint> {
    let mid = SpadePoint::new((site.x + neighbour.x) * 0.5, (site.y + neighbour.y) * 0.5);
    // Richtung senkrecht zu (neighbour - site); `site` liegt links davon
    let direction = SpadePoint::new(-(neighbour.y - site.y), neighbour.x - site.x);
    clip_polygon(
        vertices,
        mid,
        SpadePoint::new(mid.x + direction.x, mid.y + direction.y),
    )
}

/// Vorzeichenbehaftete Fläche (positiv für CCW).
pub fn signed_area(vertices: &[SpadePoint]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

/// Entfernt aufeinanderfolgende Duplikate, wie sie beim Clipping an Ecken entstehen.
pub fn dedup_ring(vertices: Vec<SpadePoint>) -> Vec<SpadePoint> {
    let mut ring: Vec<SpadePoint> = Vec::with_capacity(vertices.len());
    for p in vertices {
        if ring.last().is_none_or(|q| !same_point(*q, p)) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && ring.first().zip(ring.last()).is_some_and(|(a, b)| same_point(*a, *b)) {
        ring.pop();
    }
    ring
}

fn same_point(a: SpadePoint, b: SpadePoint) -> bool {
    (a.x - b.x).abs() < EPSILON_F64 && (a.y - b.y).abs() < EPSILON_F64
}

fn is_inside_edge(point: SpadePoint, edge_start: SpadePoint, edge_end: SpadePoint) -> bool {
    let cross = (edge_end.x - edge_start.x) * (point.y - edge_start.y)
        - (edge_end.y - edge_start.y) * (point.x - edge_start.x);
    cross >= 0.0
}

/// Schnittpunkt der Strecke `p1 -> p2` mit der Geraden durch `p3` und `p4`.
fn line_intersection(
    p1: SpadePoint,
    p2: SpadePoint,
    p3: SpadePoint,
    p4: SpadePoint,
) -> Option<SpadePoint> {
    let d1_x = p2.x - p1.x;
    let d1_y = p2.y - p1.y;
    let d2_x = p4.x - p3.x;
    let d2_y = p4.y - p3.y;

    let denominator = d1_x * d2_y - d1_y * d2_x;
    if denominator.abs() < EPSILON_F64 * EPSILON_F64 {
        return None;
    }

    let t = ((p3.x - p1.x) * d2_y - (p3.y - p1.y) * d2_x) / denominator;
    Some(SpadePoint::new(p1.x + t * d1_x, p1.y + t * d1_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<SpadePoint> {
        vec![
            SpadePoint::new(0.0, 0.0),
            SpadePoint::new(size, 0.0),
            SpadePoint::new(size, size),
            SpadePoint::new(0.0, size),
        ]
    }

    #[test]
    fn test_bisector_halves_square() {
        let cell = clip_to_bisector(&square(4.0), SpadePoint::new(1.0, 2.0), SpadePoint::new(3.0, 2.0));
        assert_relative_eq!(signed_area(&cell), 8.0, epsilon = 1e-9);
        assert!(cell.iter().all(|p| p.x <= 2.0 + 1e-9));
    }

    #[test]
    fn test_clip_to_bounds() {
        let bounds = Bounds2D::new(SpadePoint::new(1.0, 1.0), SpadePoint::new(3.0, 2.0)).unwrap();
        let clipped = dedup_ring(clip_to_bounds(&square(4.0), &bounds));
        assert_eq!(clipped.len(), 4);
        assert_relative_eq!(signed_area(&clipped), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polygon_outside_bounds_vanishes() {
        let bounds = Bounds2D::new(SpadePoint::new(10.0, 10.0), SpadePoint::new(12.0, 12.0)).unwrap();
        assert!(clip_to_bounds(&square(4.0), &bounds).is_empty());
    }

    #[test]
    fn test_dedup_ring_drops_repeated_vertices() {
        let ring = vec![
            SpadePoint::new(0.0, 0.0),
            SpadePoint::new(0.0, 0.0),
            SpadePoint::new(1.0, 0.0),
            SpadePoint::new(1.0, 1.0),
            SpadePoint::new(0.0, 0.0),
        ];
        assert_eq!(dedup_ring(ring).len(), 3);
    }
}
