use crate::num::Number;

use thiserror::Error;

/// Terminal failures of a localization run.
///
/// Every stage fails fast; the variant tells which precondition broke.
#[derive(Debug, Error)]
pub enum LocalizeError {
    /// A keyframe, pose, vehicle position or annotation lookup failed.
    #[error("missing reference in {stage}: {what}")]
    MissingReference { stage: &'static str, what: String },

    /// The reference baseline cannot produce a finite, positive scale.
    #[error(
        "degenerate baseline in scale estimation: slam = {slam}, metric = {metric} (minimum slam baseline {minimum})"
    )]
    DegenerateBaseline {
        slam: Number,
        metric: Number,
        minimum: Number,
    },

    /// The chosen keyframe has no valid 3D point on at least one axis.
    #[error("no valid object points for keyframe {image} (ts = {timestamp})")]
    NoObjectPoints { image: String, timestamp: Number },

    /// The camera rotation is not orthonormal within tolerance.
    #[error(
        "non-orthonormal rotation for keyframe ts = {timestamp}: |RᵀR - I| = {deviation}, det = {determinant}"
    )]
    NonOrthonormalRotation {
        timestamp: Number,
        deviation: Number,
        determinant: Number,
    },

    /// The coordinate is outside the domain of the UTM projection.
    #[error("projection out of range: {0}")]
    ProjectionOutOfRange(String),

    /// Structural problem in one of the input files.
    #[error("malformed input in {source_name} at line {line}: {reason}")]
    MalformedInput {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LocalizeError {
    #[inline]
    pub(crate) fn missing(stage: &'static str, what: impl Into<String>) -> Self {
        Self::MissingReference {
            stage,
            what: what.into(),
        }
    }

    #[inline]
    pub(crate) fn malformed(
        source_name: impl Into<String>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedInput {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocalizeError>;
