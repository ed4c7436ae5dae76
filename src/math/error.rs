// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Falscher Geometrietyp, ungültiges Flag oder Parameter außerhalb des Wertebereichs.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Eingabegeometrie ist topologisch ungültig (nur im Constrained-Pfad geprüft).
    #[error("Geometry is not valid: {reason}")]
    GeometryInvalid { reason: String },

    /// Fehler des Backends oder ein Clip-Bereich ohne Fläche.
    #[error("Triangulation failed: {reason}")]
    TriangulationFailed { reason: String },
}

impl MathError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MathError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn triangulation_failed(reason: impl Into<String>) -> Self {
        MathError::TriangulationFailed {
            reason: reason.into(),
        }
    }
}

pub type MathResult<T> = Result<T, MathError>;
