// src/math/voronoi/config.rs

use crate::math::{
    error::{MathError, MathResult},
    types::{Bounds2D, Dimension},
};
use serde::{Deserialize, Serialize};

/// Ausgabedimension eines Voronoi-Diagramms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VoronoiOutput {
    /// Umkreismittelpunkte (Voronoi-Knoten).
    Points,
    /// Zellkanten als Segmente.
    Lines,
    /// Eine Zelle pro Site.
    #[default]
    Polygons,
}

impl VoronoiOutput {
    pub fn dimension(self) -> Dimension {
        match self {
            VoronoiOutput::Points => Dimension::Point,
            VoronoiOutput::Lines => Dimension::Line,
            VoronoiOutput::Polygons => Dimension::Surface,
        }
    }
}

impl TryFrom<i32> for VoronoiOutput {
    type Error = MathError;

    fn try_from(dimension: i32) -> MathResult<Self> {
        match dimension {
            0 => Ok(VoronoiOutput::Points),
            1 => Ok(VoronoiOutput::Lines),
            2 => Ok(VoronoiOutput::Polygons),
            other => Err(MathError::invalid_argument(format!(
                "Voronoi output dimension must be 0, 1 or 2, got {}",
                other
            ))),
        }
    }
}

/// Konfiguration für die Voronoi-Erzeugung.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoronoiConfig {
    pub output: VoronoiOutput,
    /// Optionaler Clip-Bereich. Bei Punktmengen vergrößert er den Diagrammbereich,
    /// bei triangulierter Eingabe schließt er die offenen Randzellen.
    pub clip_envelope: Option<Bounds2D>,
}

impl VoronoiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: VoronoiOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_envelope(mut self, envelope: Bounds2D) -> Self {
        self.clip_envelope = Some(envelope);
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if let Some(envelope) = &self.clip_envelope {
            if envelope.area() <= 0.0 {
                return Err(MathError::triangulation_failed(format!(
                    "Clip envelope {} has no area",
                    envelope
                )));
            }
        }
        Ok(())
    }
}
