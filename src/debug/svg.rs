// src/debug/svg.rs

//! SVG-Ausgabe beliebiger Geometrien zur Sichtprüfung von Triangulationen und
//! Voronoi-Diagrammen.

use crate::math::types::{Bounds2D, Coordinate, Geometry, LineString, Polygon};
use ::svg::{
    Document,
    node::element::{Circle, Group, Path as SvgPath, Polyline, Rectangle, Style},
};

/// Relative Strichstärken und Punktgrößen, abhängig von der Größe der ViewBox.
struct SvgStyle {
    stroke_normal: f64,
    stroke_thin: f64,
    point_radius: f64,
}

impl SvgStyle {
    fn for_bounds(bounds: &Bounds2D) -> Self {
        let extent = (bounds.width() + bounds.height()) / 2.0;
        Self {
            stroke_normal: extent * 0.005,
            stroke_thin: extent * 0.002,
            point_radius: extent * 0.006,
        }
    }

    fn css(&self) -> String {
        format!(
            ".background {{ fill: #f0f0f0; }}\n\
             .surface {{ fill: rgba(150, 255, 150, 0.5); fill-rule: evenodd; stroke: #00aa00; stroke-width: {thin}; }}\n\
             .line {{ fill: none; stroke: #5500aa; stroke-width: {normal}; }}\n\
             .point {{ fill: #aaccff; stroke: #0000cc; stroke-width: {thin}; }}\n",
            thin = self.stroke_thin,
            normal = self.stroke_normal,
        )
    }
}

/// Sichtbereich der Geometrie mit etwas Rand; entartete Ausdehnungen werden aufgeweitet.
fn display_bounds(geometry: &Geometry) -> Bounds2D {
    let Some(envelope) = geometry.envelope() else {
        return Bounds2D::from_points(Coordinate::new(0.0, 0.0).xy(), Coordinate::new(1.0, 1.0).xy());
    };
    let margin = (envelope.width().max(envelope.height()) * 0.05).max(0.5);
    envelope.expand(margin)
}

fn ring_data(ring: &LineString) -> Option<String> {
    let (first, rest) = ring.coords.split_first()?;
    let mut data = format!("M{:.6},{:.6}", first.x, first.y);
    for c in rest {
        data.push_str(&format!(" L{:.6},{:.6}", c.x, c.y));
    }
    data.push_str(" Z");
    Some(data)
}

fn polygon_node(polygon: &Polygon) -> SvgPath {
    let data = polygon
        .rings()
        .filter_map(ring_data)
        .collect::<Vec<_>>()
        .join(" ");
    SvgPath::new().set("class", "surface").set("d", data)
}

fn line_node(line: &LineString) -> Polyline {
    let points = line
        .coords
        .iter()
        .map(|c| format!("{:.6},{:.6}", c.x, c.y))
        .collect::<Vec<_>>()
        .join(" ");
    Polyline::new().set("class", "line").set("points", points)
}

fn point_node(coordinate: &Coordinate, radius: f64) -> Circle {
    Circle::new()
        .set("class", "point")
        .set("cx", coordinate.x)
        .set("cy", coordinate.y)
        .set("r", radius)
}

fn add_geometry(group: Group, geometry: &Geometry, style: &SvgStyle) -> Group {
    match geometry {
        Geometry::Point(c) => group.add(point_node(c, style.point_radius)),
        Geometry::MultiPoint(points) => points
            .iter()
            .fold(group, |g, c| g.add(point_node(c, style.point_radius))),
        Geometry::LineString(line) => group.add(line_node(line)),
        Geometry::MultiLineString(lines) => lines.iter().fold(group, |g, l| g.add(line_node(l))),
        Geometry::Polygon(polygon) => group.add(polygon_node(polygon)),
        Geometry::MultiPolygon(polygons) => {
            polygons.iter().fold(group, |g, p| g.add(polygon_node(p)))
        }
        Geometry::GeometryCollection(members) => members
            .iter()
            .fold(group, |g, member| add_geometry(g, member, style)),
    }
}

/// Baut ein SVG-Dokument: Flächen gefüllt, Linien als Striche, Punkte als Kreise.
/// Die y-Achse zeigt nach oben.
pub fn render_geometry_svg(geometry: &Geometry, size: f64) -> String {
    let bounds = display_bounds(geometry);
    let style = SvgStyle::for_bounds(&bounds);

    let background = Rectangle::new()
        .set("class", "background")
        .set("x", bounds.min.x)
        .set("y", bounds.min.y)
        .set("width", bounds.width())
        .set("height", bounds.height());
    let flipped = Group::new().set(
        "transform",
        format!("matrix(1 0 0 -1 0 {})", bounds.min.y + bounds.max.y),
    );
    let content = add_geometry(flipped.add(background), geometry, &style);

    Document::new()
        .set("width", size)
        .set("height", size)
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                bounds.min.x,
                bounds.min.y,
                bounds.width(),
                bounds.height()
            ),
        )
        .add(Style::new(style.css()))
        .add(content)
        .to_string()
}

/// Schreibt die Geometrie als SVG-Datei.
#[cfg(debug_assertions)]
pub fn save_geometry_svg(
    path: impl AsRef<std::path::Path>,
    geometry: &Geometry,
    size: f64,
) -> std::io::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, render_geometry_svg(geometry, size))?;
    tracing::info!("Debug SVG '{}' wurde erstellt.", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_one_node_per_member() {
        let geometry = Geometry::GeometryCollection(vec![
            Geometry::Polygon(Polygon::triangle(
                Coordinate::new(0.0, 0.0),
                Coordinate::new(4.0, 0.0),
                Coordinate::new(0.0, 4.0),
            )),
            Geometry::LineString(vec![(0.0, 0.0), (4.0, 4.0)].into()),
            Geometry::MultiPoint(vec![Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 1.0)]),
        ]);
        let svg = render_geometry_svg(&geometry, 512.0);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<path").count(), 1);
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("width=\"512\""));
    }

    #[test]
    fn test_render_empty_geometry() {
        let svg = render_geometry_svg(&Geometry::MultiPolygon(Vec::new()), 100.0);
        assert!(svg.contains("<rect"));
        assert!(!svg.contains("<path"));
    }
}
