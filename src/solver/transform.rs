use super::base::Estimator;
use crate::error::Result;
use crate::map::CameraPose;
use crate::num::{Number, Point3, Vector2, Vector3};

use log::info;
use serde::Serialize;

/// Metric position of the sign relative to the camera, in SLAM world axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricOffset(pub Vector3);

impl MetricOffset {
    /// The two components on the ground plane, east first.
    #[inline]
    pub fn planar(&self, (east, north): (usize, usize)) -> Vector2 {
        Vector2::new(self.0[east], self.0[north])
    }
}

/// Moves the aggregated object point into the camera's frame and applies scale:
///
/// `offset = scale * (R⁻¹ · p_obj − t)`
///
/// `R⁻¹` is taken as `Rᵀ`, so the rotation is checked for orthonormality first.
pub struct FrameTransformer<'a> {
    pub point: &'a Point3,
    pub pose: &'a CameraPose,
    pub scale: Number,

    pub timestamp: Number,
    pub rotation_tolerance: Number,
}

impl<'a> Estimator<MetricOffset> for FrameTransformer<'a> {
    fn estimate(self) -> Result<MetricOffset> {
        self.pose
            .check_orthonormal(self.timestamp, self.rotation_tolerance)?;

        let in_camera = self.pose.inverse_rotation() * self.point.coords;
        let offset = self.scale * (in_camera - self.pose.translation);

        info!("camera rotation: {}", self.pose.rotation);
        info!("camera translation: {}", self.pose.translation.transpose());
        info!("metric offset: {}", offset.transpose());

        Ok(MetricOffset(offset))
    }
}
