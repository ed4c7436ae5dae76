// src/math/mesh/config.rs

use crate::math::{
    error::{MathError, MathResult},
    types::Dimension,
    utils::constants,
};
use serde::{Deserialize, Serialize};

/// Triangulationsmodus, sich gegenseitig ausschließend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriangulationMode {
    /// Nur die Punktmenge; Linien- und Flächenstruktur wird ignoriert.
    #[default]
    Delaunay,
    /// Punktmenge plus Constraint-Segmente aus Linien und Ringen.
    Constrained,
    /// Exakte Zerlegung eines einzelnen Polygons (mit Löchern) in Dreiecke.
    Tessellation,
}

/// Ausgabeform einer Triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeshOutput {
    /// Ein Polygon pro Dreieck (Flag 0).
    #[default]
    Polygons,
    /// Eindeutige Dreieckskanten (Flag 1).
    Lines,
    /// Ein Umkreismittelpunkt pro Dreieck.
    Circumcenters,
}

impl MeshOutput {
    pub fn dimension(self) -> Dimension {
        match self {
            MeshOutput::Polygons => Dimension::Surface,
            MeshOutput::Lines => Dimension::Line,
            MeshOutput::Circumcenters => Dimension::Point,
        }
    }
}

impl TryFrom<i32> for MeshOutput {
    type Error = MathError;

    /// Übersetzt das externe Flag (0 = Polygone, 1 = Linien).
    fn try_from(flag: i32) -> MathResult<Self> {
        match flag {
            0 => Ok(MeshOutput::Polygons),
            1 => Ok(MeshOutput::Lines),
            other => Err(MathError::invalid_argument(format!(
                "Only flag 0 or 1 is supported, got {}",
                other
            ))),
        }
    }
}

/// Parameter eines einzelnen Triangulationsaufrufs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationConfig {
    pub mode: TriangulationMode,
    pub output: MeshOutput,
    /// Qualitätsschwelle in `[0, 1)` für die Verfeinerung (nur `Constrained`).
    /// Der Mindestwinkel der Verfeinerung ist `threshold * 30°`.
    pub quality_threshold: Option<f64>,
    /// Obergrenze für zusätzliche Steiner-Punkte; `None` = `10 * N + 1000`.
    pub max_refinement_vertices: Option<usize>,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            mode: TriangulationMode::Delaunay,
            output: MeshOutput::Polygons,
            quality_threshold: None,
            max_refinement_vertices: None,
        }
    }
}

impl TriangulationConfig {
    pub fn new(mode: TriangulationMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_output(mut self, output: MeshOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_quality(mut self, threshold: f64) -> Self {
        self.quality_threshold = Some(threshold);
        self
    }

    pub fn with_max_refinement_vertices(mut self, count: usize) -> Self {
        self.max_refinement_vertices = Some(count);
        self
    }

    /// Mindestwinkel (Grad) der Verfeinerung, falls eine Schwelle gesetzt ist.
    pub fn refinement_angle_deg(&self) -> Option<f64> {
        self.quality_threshold
            .map(|q| q * constants::MAX_REFINEMENT_ANGLE_DEG)
    }

    pub fn validate(&self) -> MathResult<()> {
        if let Some(threshold) = self.quality_threshold {
            if !(0.0..1.0).contains(&threshold) {
                return Err(MathError::invalid_argument(format!(
                    "The quality value must be comprised between 0 and 1, got {}",
                    threshold
                )));
            }
            if self.mode != TriangulationMode::Constrained {
                return Err(MathError::invalid_argument(
                    "Quality refinement is only available for constrained triangulation",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_conversion() {
        assert_eq!(MeshOutput::try_from(0).unwrap(), MeshOutput::Polygons);
        assert_eq!(MeshOutput::try_from(1).unwrap(), MeshOutput::Lines);
        assert!(matches!(
            MeshOutput::try_from(2),
            Err(MathError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_quality_threshold_range() {
        let base = TriangulationConfig::new(TriangulationMode::Constrained);
        assert!(base.clone().with_quality(0.0).validate().is_ok());
        assert!(base.clone().with_quality(0.7).validate().is_ok());
        assert!(base.clone().with_quality(1.0).validate().is_err());
        assert!(base.clone().with_quality(-0.1).validate().is_err());
        assert!(base.with_quality(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_quality_rejected_outside_constrained_mode() {
        let config = TriangulationConfig::new(TriangulationMode::Delaunay).with_quality(0.5);
        assert!(matches!(
            config.validate(),
            Err(MathError::InvalidArgument { .. })
        ));
    }
}
