use super::base::Estimator;
use crate::error::{LocalizeError, Result};
use crate::map::{FrameStore, Keyframe, VehiclePosition, VehicleTrack};
use crate::num::Number;
use crate::settings::{BaselineMode, ReferenceFrames};

use log::info;
use serde::Serialize;

const STAGE: &str = "scale estimation";

/// Ratio of metric to SLAM-local distance, with the baselines it came from.
///
/// A single pair of reference keyframes assumes locally constant scale; long
/// or curved trajectories accumulate drift that this estimate does not model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleEstimate {
    pub first: String,
    pub second: String,
    pub baseline_metric: Number,
    pub baseline_slam: Number,
    pub scale: Number,
}

pub struct ScaleEstimator<'a> {
    pub store: &'a FrameStore,
    pub vehicles: &'a VehicleTrack,

    pub references: &'a ReferenceFrames,
    pub baseline: BaselineMode,
    pub min_baseline: Number,
}

/// `baseline_metric / baseline_slam`, rejecting anything not finite and positive.
pub fn scale_from_baselines(
    baseline_metric: Number,
    baseline_slam: Number,
    min_baseline: Number,
) -> Result<Number> {
    let degenerate = || LocalizeError::DegenerateBaseline {
        slam: baseline_slam,
        metric: baseline_metric,
        minimum: min_baseline,
    };
    if !baseline_slam.is_finite() || baseline_slam <= min_baseline.max(0.0) {
        return Err(degenerate());
    }
    let scale = baseline_metric / baseline_slam;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(degenerate())
    }
}

impl<'a> Estimator<ScaleEstimate> for ScaleEstimator<'a> {
    fn estimate(self) -> Result<ScaleEstimate> {
        let (first, second) = self.reference_keyframes()?;
        let first_image = Self::image_of(first)?;
        let second_image = Self::image_of(second)?;

        let vehicle_first = self.vehicle(first_image)?;
        let vehicle_second = self.vehicle(second_image)?;
        let baseline_metric = (vehicle_first.planar() - vehicle_second.planar()).norm();

        let baseline_slam = match self.baseline {
            BaselineMode::FromOrigin => second.pose.translation.norm(),
            BaselineMode::Displacement => {
                (second.pose.translation - first.pose.translation).norm()
            }
        };

        let scale = scale_from_baselines(baseline_metric, baseline_slam, self.min_baseline)?;

        info!(
            "reference keyframes: {} (ts = {}), {} (ts = {})",
            first_image, first.timestamp, second_image, second.timestamp
        );
        info!("baseline (m): {:.6}", baseline_metric);
        info!("baseline (slam): {:.6}", baseline_slam);
        info!("scale factor: {:.6}", scale);

        Ok(ScaleEstimate {
            first: first_image.to_owned(),
            second: second_image.to_owned(),
            baseline_metric,
            baseline_slam,
            scale,
        })
    }
}

impl<'a> ScaleEstimator<'a> {
    fn reference_keyframes(&self) -> Result<(&'a Keyframe, &'a Keyframe)> {
        match self.references {
            ReferenceFrames::FirstTwo => match self.store.keyframes() {
                [first, second, ..] => Ok((first, second)),
                frames => Err(LocalizeError::missing(
                    STAGE,
                    format!("two reference keyframes needed, trajectory has {}", frames.len()),
                )),
            },
            ReferenceFrames::Images { first, second } => {
                let lookup = |image: &str| {
                    self.store.keyframe_by_image(image).ok_or_else(|| {
                        LocalizeError::missing(
                            STAGE,
                            format!("no keyframe pose for reference image {}", image),
                        )
                    })
                };
                Ok((lookup(first)?, lookup(second)?))
            }
        }
    }

    fn image_of(keyframe: &Keyframe) -> Result<&str> {
        keyframe.image.as_deref().ok_or_else(|| {
            LocalizeError::missing(
                STAGE,
                format!(
                    "reference keyframe ts = {} has no image in the object map",
                    keyframe.timestamp
                ),
            )
        })
    }

    fn vehicle(&self, image: &str) -> Result<&'a VehiclePosition> {
        self.vehicles.get(image).ok_or_else(|| {
            LocalizeError::missing(
                STAGE,
                format!("no vehicle position for reference image {}", image),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{CameraPose, ObjectObservation, TrajectoryRow};
    use crate::num::{Matrix3, Vector3};
    use approx::assert_relative_eq;

    fn store(translations: &[(Number, Vector3)]) -> FrameStore {
        let trajectory = translations
            .iter()
            .map(|&(timestamp, t)| TrajectoryRow {
                timestamp,
                pose: CameraPose::new(Matrix3::identity(), t),
            })
            .collect();
        let observations = translations
            .iter()
            .enumerate()
            .map(|(i, &(timestamp, _))| ObjectObservation {
                timestamp,
                image: format!("kf{}.jpg", i + 1),
                slots: vec![],
            })
            .collect();
        FrameStore::new(trajectory, observations).unwrap()
    }

    fn vehicle(image: &str, x: Number, y: Number) -> VehiclePosition {
        VehiclePosition {
            image: image.to_owned(),
            latitude: 0.0,
            longitude: 0.0,
            x,
            y,
        }
    }

    fn estimator<'a>(
        store: &'a FrameStore,
        vehicles: &'a VehicleTrack,
        references: &'a ReferenceFrames,
        baseline: BaselineMode,
    ) -> ScaleEstimator<'a> {
        ScaleEstimator {
            store,
            vehicles,
            references,
            baseline,
            min_baseline: 1e-9,
        }
    }

    #[test]
    fn first_two_keyframes() {
        let store = store(&[
            (1.0, Vector3::zeros()),
            (1.1, Vector3::new(0.0, 0.0, 2.0)),
            (1.2, Vector3::new(0.0, 0.0, 7.0)),
        ]);
        let vehicles = VehicleTrack::new(vec![
            vehicle("kf1.jpg", 500_000.0, 3_700_000.0),
            vehicle("kf2.jpg", 500_010.0, 3_700_000.0),
        ]);
        let references = ReferenceFrames::FirstTwo;
        let estimate = estimator(&store, &vehicles, &references, BaselineMode::FromOrigin)
            .estimate()
            .unwrap();
        assert_relative_eq!(estimate.baseline_metric, 10.0);
        assert_relative_eq!(estimate.baseline_slam, 2.0);
        assert_relative_eq!(estimate.scale, 5.0);
        assert_eq!(estimate.first, "kf1.jpg");
    }

    #[test]
    fn named_references_with_displacement() {
        let store = store(&[
            (1.0, Vector3::zeros()),
            (1.1, Vector3::new(0.0, 0.0, 2.0)),
            (1.2, Vector3::new(0.0, 3.0, 6.0)),
        ]);
        let vehicles = VehicleTrack::new(vec![
            vehicle("kf2.jpg", 0.0, 0.0),
            vehicle("kf3.jpg", 30.0, 40.0),
        ]);
        let references = ReferenceFrames::Images {
            first: "kf2.jpg".to_owned(),
            second: "kf3.jpg".to_owned(),
        };
        let estimate = estimator(&store, &vehicles, &references, BaselineMode::Displacement)
            .estimate()
            .unwrap();
        assert_relative_eq!(estimate.baseline_slam, 5.0);
        assert_relative_eq!(estimate.scale, 10.0);
    }

    #[test]
    fn coincident_keyframes_are_degenerate() {
        let store = store(&[(1.0, Vector3::zeros()), (1.1, Vector3::zeros())]);
        let vehicles = VehicleTrack::new(vec![
            vehicle("kf1.jpg", 0.0, 0.0),
            vehicle("kf2.jpg", 10.0, 0.0),
        ]);
        let references = ReferenceFrames::FirstTwo;
        let result = estimator(&store, &vehicles, &references, BaselineMode::FromOrigin).estimate();
        assert!(matches!(
            result,
            Err(LocalizeError::DegenerateBaseline { slam, .. }) if slam == 0.0
        ));
    }

    #[test]
    fn missing_vehicle_position() {
        let store = store(&[(1.0, Vector3::zeros()), (1.1, Vector3::new(1.0, 0.0, 0.0))]);
        let vehicles = VehicleTrack::new(vec![vehicle("kf1.jpg", 0.0, 0.0)]);
        let references = ReferenceFrames::FirstTwo;
        let result = estimator(&store, &vehicles, &references, BaselineMode::FromOrigin).estimate();
        assert!(matches!(
            result,
            Err(LocalizeError::MissingReference { .. })
        ));
    }

    #[test]
    fn single_keyframe_is_missing_reference() {
        let store = store(&[(1.0, Vector3::zeros())]);
        let vehicles = VehicleTrack::default();
        let references = ReferenceFrames::FirstTwo;
        let result = estimator(&store, &vehicles, &references, BaselineMode::FromOrigin).estimate();
        assert!(matches!(
            result,
            Err(LocalizeError::MissingReference { .. })
        ));
    }

    #[test]
    fn scale_is_invariant_to_uniform_rescaling() {
        let base = scale_from_baselines(10.0, 2.0, 1e-9).unwrap();
        for &k in [1e-3, 0.5, 3.0, 1e4].iter() {
            let rescaled = scale_from_baselines(10.0 * k, 2.0 * k, 1e-9).unwrap();
            assert_relative_eq!(rescaled, base, max_relative = 1e-12);
        }
    }

    #[test]
    fn zero_slam_baseline_never_divides() {
        assert!(matches!(
            scale_from_baselines(10.0, 0.0, 0.0),
            Err(LocalizeError::DegenerateBaseline { .. })
        ));
        assert!(matches!(
            scale_from_baselines(0.0, 2.0, 1e-9),
            Err(LocalizeError::DegenerateBaseline { .. })
        ));
        assert!(matches!(
            scale_from_baselines(10.0, f64::NAN, 1e-9),
            Err(LocalizeError::DegenerateBaseline { .. })
        ));
    }
}
