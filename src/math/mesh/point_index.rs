// src/math/mesh/point_index.rs

//! Kanonisierung von Koordinaten und dichte Punktindizes.
//!
//! Jede Koordinate wird auf 16 signifikante Dezimalstellen gerundet; der gerundete Wert
//! dient ausschließlich als Schlüssel für die Deduplizierung. Ausgegeben wird immer die
//! zuerst gesehene Originalkoordinate.
//!
//! Bekannte Einschränkung: zwei fast identische Koordinaten, die auf verschiedenen Seiten
//! einer Rundungsgrenze liegen, werden nicht zusammengeführt.

use crate::math::{types::Coordinate, utils::rounding::round_canonical};
use std::collections::HashMap;

/// Gerundete Koordinate als hashbarer Schlüssel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPoint {
    x: u64,
    y: u64,
    z: u64,
}

impl CanonicalPoint {
    /// Kanonische Form einer Koordinate; eine fehlende Höhe zählt als `0`.
    pub fn from_coordinate(coordinate: &Coordinate) -> Self {
        Self::from_components(coordinate.x, coordinate.y, coordinate.z_or_zero())
    }

    /// Kanonische Form nur der Lage (Höhe ignoriert).
    pub fn from_xy(x: f64, y: f64) -> Self {
        Self::from_components(x, y, 0.0)
    }

    fn from_components(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: round_canonical(x).to_bits(),
            y: round_canonical(y).to_bits(),
            z: round_canonical(z).to_bits(),
        }
    }

    /// Der gerundete Wert als Gleitkommakoordinate.
    pub fn to_coordinate(&self) -> Coordinate {
        Coordinate::new_3d(
            f64::from_bits(self.x),
            f64::from_bits(self.y),
            f64::from_bits(self.z),
        )
    }
}

/// Bijektive Zuordnung kanonischer Punkte zu dichten Indizes `[0, N)` in Einfügereihenfolge.
///
/// Die Tabelle gehört exklusiv dem Aufruf, der sie aufgebaut hat.
#[derive(Debug, Clone)]
pub struct PointTable {
    index: HashMap<CanonicalPoint, usize>,
    coordinates: Vec<Coordinate>,
    is_2d: bool,
}

impl Default for PointTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PointTable {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            coordinates: Vec::new(),
            is_2d: true,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            coordinates: Vec::with_capacity(capacity),
            is_2d: true,
        }
    }

    /// Sucht den Index einer Koordinate oder vergibt den nächsten freien.
    pub fn insert(&mut self, coordinate: &Coordinate) -> usize {
        if coordinate.has_z() {
            self.is_2d = false;
        }
        let key = CanonicalPoint::from_coordinate(coordinate);
        let next = self.coordinates.len();
        let index = *self.index.entry(key).or_insert(next);
        if index == next {
            self.coordinates.push(*coordinate);
        }
        index
    }

    pub fn get(&self, coordinate: &Coordinate) -> Option<usize> {
        self.index
            .get(&CanonicalPoint::from_coordinate(coordinate))
            .copied()
    }

    pub fn coordinate(&self, index: usize) -> Option<&Coordinate> {
        self.coordinates.get(index)
    }

    /// Originalkoordinaten in Indexreihenfolge.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// `true`, solange keine eingefügte Koordinate eine Höhe trug.
    pub fn is_2d(&self) -> bool {
        self.is_2d
    }

    /// Erfasst alle Koordinaten einer Koordinatenfolge (reine Punktmenge).
    pub fn capture<'a, I>(coordinates: I) -> Self
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let iter = coordinates.into_iter();
        let mut table = Self::with_capacity(iter.size_hint().0);
        for coordinate in iter {
            table.insert(coordinate);
        }
        table
    }
}
