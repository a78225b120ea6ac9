use crate::error::{LocalizeError, Result};
use crate::num::{Matrix3, Number, PointSlot, Vector3};

use serde::Serialize;

/// Timestamps from the trajectory and the object map are matched within this distance.
pub const TIMESTAMP_TOLERANCE: Number = 1e-6;

/// World-to-camera rigid transform of a keyframe, in SLAM-local units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub rotation: Matrix3,
    pub translation: Vector3,
}

impl CameraPose {
    #[inline]
    pub fn new(rotation: Matrix3, translation: Vector3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Builds a pose from a translation and a row-major flattened rotation.
    #[inline]
    pub fn from_row_major(translation: [Number; 3], rotation: [Number; 9]) -> Self {
        Self {
            rotation: Matrix3::from_row_slice(&rotation),
            translation: Vector3::from(translation),
        }
    }

    /// Largest element of |RᵀR - I| and the determinant of R.
    pub fn orthonormality(&self) -> (Number, Number) {
        let gram = self.rotation.transpose() * self.rotation - Matrix3::identity();
        (gram.amax(), self.rotation.determinant())
    }

    pub fn check_orthonormal(&self, timestamp: Number, tolerance: Number) -> Result<()> {
        let (deviation, determinant) = self.orthonormality();
        if deviation <= tolerance && (determinant - 1.0).abs() <= tolerance {
            Ok(())
        } else {
            Err(LocalizeError::NonOrthonormalRotation {
                timestamp,
                deviation,
                determinant,
            })
        }
    }

    /// R⁻¹, valid only for an orthonormal rotation.
    #[inline]
    pub fn inverse_rotation(&self) -> Matrix3 {
        self.rotation.transpose()
    }
}

/// One row of the keyframe trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRow {
    pub timestamp: Number,
    pub pose: CameraPose,
}

/// One row of the object map: the sign's points seen from a keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectObservation {
    pub timestamp: Number,
    pub image: String,
    pub slots: Vec<PointSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub timestamp: Number,
    /// Image identifier, known only when the object map has a row for this keyframe.
    pub image: Option<String>,
    pub pose: CameraPose,
}

#[inline]
pub fn same_timestamp(a: Number, b: Number) -> bool {
    (a - b).abs() <= TIMESTAMP_TOLERANCE
}
