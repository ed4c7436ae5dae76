// src/math/types/geometry.rs

//! Das generische Vektor-Geometriemodell, auf dem Triangulation und Voronoi arbeiten.
//!
//! Alle Varianten werden über ein geschlossenes `enum` abgebildet, damit jede Verarbeitung
//! per `match` vollständig sein muss.

use super::{Bounds2D, Coordinate};
use serde::{Deserialize, Serialize};

/// Topologische Dimension einer Geometrie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Point = 0,
    Line = 1,
    Surface = 2,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineString {
    pub coords: Vec<Coordinate>,
}

impl LineString {
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Self { coords }
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => first.x == last.x && first.y == last.y,
            _ => false,
        }
    }
}

impl From<Vec<(f64, f64)>> for LineString {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(Coordinate::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: LineString,
    pub interiors: Vec<LineString>,
}

impl Polygon {
    pub fn new(exterior: LineString, interiors: Vec<LineString>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Alle Ringe, der äußere zuerst.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// Ein Dreieck als geschlossener Ring `(a, b, c, a)`.
    pub fn triangle(a: Coordinate, b: Coordinate, c: Coordinate) -> Self {
        Self::new(LineString::new(vec![a, b, c, a]), Vec::new())
    }
}

/// Eine einfache (nicht zusammengesetzte) Teilgeometrie.
#[derive(Debug, Clone, Copy)]
pub enum SimpleGeometry<'a> {
    Point(&'a Coordinate),
    LineString(&'a LineString),
    Polygon(&'a Polygon),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Coordinate),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Dimension der Geometrie. Eine Collection hat die größte Dimension ihrer Mitglieder,
    /// eine leere Collection hat keine.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Some(Dimension::Point),
            Geometry::LineString(_) | Geometry::MultiLineString(_) => Some(Dimension::Line),
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Some(Dimension::Surface),
            Geometry::GeometryCollection(members) => {
                members.iter().filter_map(Geometry::dimension).max()
            }
        }
    }

    /// Durchläuft alle Koordinaten in Traversierungsreihenfolge.
    pub fn coords_iter(&self) -> Box<dyn Iterator<Item = &Coordinate> + '_> {
        match self {
            Geometry::Point(c) => Box::new(std::iter::once(c)),
            Geometry::LineString(line) => Box::new(line.coords.iter()),
            Geometry::Polygon(polygon) => {
                Box::new(polygon.rings().flat_map(|ring| ring.coords.iter()))
            }
            Geometry::MultiPoint(points) => Box::new(points.iter()),
            Geometry::MultiLineString(lines) => {
                Box::new(lines.iter().flat_map(|line| line.coords.iter()))
            }
            Geometry::MultiPolygon(polygons) => Box::new(
                polygons
                    .iter()
                    .flat_map(|polygon| polygon.rings().flat_map(|ring| ring.coords.iter())),
            ),
            Geometry::GeometryCollection(members) => {
                Box::new(members.iter().flat_map(|member| member.coords_iter()))
            }
        }
    }

    pub fn num_coords(&self) -> usize {
        self.coords_iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.coords_iter().next().is_none()
    }

    /// `true`, wenn keine Koordinate eine Höhe trägt.
    pub fn is_2d(&self) -> bool {
        self.coords_iter().all(|c| !c.has_z())
    }

    /// Zerlegt die Geometrie in ihre einfachen Teilgeometrien (Multi-Varianten und
    /// verschachtelte Collections werden aufgelöst).
    pub fn simple_components(&self) -> Vec<SimpleGeometry<'_>> {
        let mut components = Vec::new();
        self.collect_simple(&mut components);
        components
    }

    fn collect_simple<'a>(&'a self, out: &mut Vec<SimpleGeometry<'a>>) {
        match self {
            Geometry::Point(c) => out.push(SimpleGeometry::Point(c)),
            Geometry::LineString(line) => out.push(SimpleGeometry::LineString(line)),
            Geometry::Polygon(polygon) => out.push(SimpleGeometry::Polygon(polygon)),
            Geometry::MultiPoint(points) => out.extend(points.iter().map(SimpleGeometry::Point)),
            Geometry::MultiLineString(lines) => {
                out.extend(lines.iter().map(SimpleGeometry::LineString))
            }
            Geometry::MultiPolygon(polygons) => {
                out.extend(polygons.iter().map(SimpleGeometry::Polygon))
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    member.collect_simple(out);
                }
            }
        }
    }

    /// Envelope aller Koordinaten, `None` für leere Geometrien.
    pub fn envelope(&self) -> Option<Bounds2D> {
        Bounds2D::from_points_iter(self.coords_iter().map(Coordinate::xy))
    }

    /// Konvertiert in das `geo`-Modell (Höhen gehen dabei verloren).
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            Geometry::Point(c) => geo::Geometry::Point(geo::Point::from(geo::Coord::from(*c))),
            Geometry::LineString(line) => geo::Geometry::LineString(line.into()),
            Geometry::Polygon(polygon) => geo::Geometry::Polygon(polygon.into()),
            Geometry::MultiPoint(points) => geo::Geometry::MultiPoint(geo::MultiPoint::new(
                points
                    .iter()
                    .map(|c| geo::Point::from(geo::Coord::from(*c)))
                    .collect(),
            )),
            Geometry::MultiLineString(lines) => geo::Geometry::MultiLineString(
                geo::MultiLineString::new(lines.iter().map(geo::LineString::from).collect()),
            ),
            Geometry::MultiPolygon(polygons) => geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(polygons.iter().map(geo::Polygon::from).collect()),
            ),
            Geometry::GeometryCollection(members) => geo::Geometry::GeometryCollection(
                geo::GeometryCollection::from(
                    members.iter().map(Geometry::to_geo).collect::<Vec<_>>(),
                ),
            ),
        }
    }

    /// Leere typisierte Collection für die angefragte Ausgabedimension.
    pub fn empty_of(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Surface => Geometry::MultiPolygon(Vec::new()),
            Dimension::Line => Geometry::MultiLineString(Vec::new()),
            Dimension::Point => Geometry::MultiPoint(Vec::new()),
        }
    }
}

impl From<&LineString> for geo::LineString<f64> {
    fn from(line: &LineString) -> Self {
        geo::LineString::new(line.coords.iter().map(|c| geo::Coord::from(*c)).collect())
    }
}

impl From<&Polygon> for geo::Polygon<f64> {
    fn from(polygon: &Polygon) -> Self {
        geo::Polygon::new(
            (&polygon.exterior).into(),
            polygon.interiors.iter().map(geo::LineString::from).collect(),
        )
    }
}
