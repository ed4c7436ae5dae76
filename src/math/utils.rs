// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON_F64: f64 = 1e-10;
    /// Signifikante Dezimalstellen der Kanonisierung (entspricht decimal64).
    pub const CANONICAL_DIGITS: usize = 16;
    /// Größter Mindestwinkel (Grad), für den die Verfeinerung garantiert terminiert.
    pub const MAX_REFINEMENT_ANGLE_DEG: f64 = 30.0;
}

/// Vergleichsfunktionen mit Toleranz
pub mod comparison {
    use super::constants::EPSILON_F64;

    /// Prüft ob zwei Floats (nahezu) gleich sind
    pub fn nearly_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON_F64
    }

    /// Prüft ob Float (nahezu) Null ist
    pub fn nearly_zero(a: f64) -> bool {
        a.abs() < EPSILON_F64
    }
}

/// Rundung auf eine feste Anzahl signifikanter Dezimalstellen.
pub mod rounding {
    use super::constants::CANONICAL_DIGITS;

    /// Rundet `value` auf `digits` signifikante Stellen (half-even auf dem exakten Binärwert).
    ///
    /// Nicht-endliche Werte werden unverändert zurückgegeben, `-0.0` wird zu `0.0`.
    pub fn round_significant(value: f64, digits: usize) -> f64 {
        if !value.is_finite() {
            return value;
        }
        if value == 0.0 {
            return 0.0;
        }
        let precision = digits.saturating_sub(1);
        // Die Exponentialdarstellung rundet exakt auf `digits` Stellen
        format!("{:.*e}", precision, value)
            .parse::<f64>()
            .unwrap_or(value)
    }

    /// Rundung mit der Standardpräzision der Kanonisierung.
    pub fn round_canonical(value: f64) -> f64 {
        round_significant(value, CANONICAL_DIGITS)
    }
}

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use crate::math::utils::constants;
    use spade::Point2;

    pub fn cross_product_2d(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    /// Berechnet den Umkreismittelpunkt dreier Punkte.
    /// Gibt `None` zurück, wenn die Punkte kollinear sind.
    pub fn circumcenter(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<Point2<f64>> {
        // Relativ zu `a` rechnen, um Auslöschung bei großen Koordinaten zu vermeiden
        let bx = b.x - a.x;
        let by = b.y - a.y;
        let cx = c.x - a.x;
        let cy = c.y - a.y;

        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < constants::EPSILON_F64 * constants::EPSILON_F64 {
            return None;
        }

        let b_sq = bx * bx + by * by;
        let c_sq = cx * cx + cy * cy;
        let ux = (cy * b_sq - by * c_sq) / d;
        let uy = (bx * c_sq - cx * b_sq) / d;

        Some(Point2::new(a.x + ux, a.y + uy))
    }

    /// Berechnet den Flächeninhalt eines Dreiecks
    pub fn triangle_area(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
        0.5 * cross_product_2d(a, b, c).abs()
    }

    /// Kleinster Innenwinkel eines Dreiecks in Grad.
    pub fn min_angle_deg(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
        let angle_at = |p: Point2<f64>, q: Point2<f64>, r: Point2<f64>| {
            let (ux, uy) = (q.x - p.x, q.y - p.y);
            let (vx, vy) = (r.x - p.x, r.y - p.y);
            (ux * vy - uy * vx).abs().atan2(ux * vx + uy * vy)
        };
        angle_at(a, b, c)
            .min(angle_at(b, c, a))
            .min(angle_at(c, a, b))
            .to_degrees()
    }
}
