use crate::error::{LocalizeError, Result};
use crate::map::{Annotations, BoundingBox, FrameStore, VehiclePosition, VehicleTrack};
use crate::num::Point3;
use crate::settings::LocalizeSettings;
use crate::solver::{
    Estimator, FrameTransformer, Geolocator, KeyframeSelector, MetricOffset,
    ObjectPointAggregator, ScaleEstimate, ScaleEstimator,
};
use crate::utm::{LatLon, UtmCoordinate};

use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

/// Everything one run reads, loaded up front and never mutated.
#[derive(Debug, Clone)]
pub struct SequenceData {
    pub store: FrameStore,
    pub annotations: Annotations,
    pub vehicles: VehicleTrack,
}

/// The localized sign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignFix {
    pub image: String,
    pub bounding_box: Option<BoundingBox>,
    pub vehicle: VehiclePosition,
    pub scale: ScaleEstimate,
    pub object_point: Point3,
    pub offset: MetricOffset,
    pub utm: UtmCoordinate,
    pub position: LatLon,
}

/// Runs the localization chain: scale, keyframe, object point, offset, position.
///
/// Each stage fails fast; no partial fix is produced.
pub struct SignLocalizer {
    settings: LocalizeSettings,
}

impl SignLocalizer {
    pub fn new(settings: LocalizeSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    #[inline]
    pub fn settings(&self) -> &LocalizeSettings {
        &self.settings
    }

    pub fn localize(&self, data: &SequenceData) -> Result<SignFix> {
        let settings = &self.settings;

        let scale = ScaleEstimator {
            store: &data.store,
            vehicles: &data.vehicles,
            references: &settings.reference_frames,
            baseline: settings.baseline,
            min_baseline: settings.min_baseline,
        }
        .estimate()?;

        let selected = KeyframeSelector {
            store: &data.store,
            annotations: &data.annotations,
            policy: &settings.keyframe_policy,
        }
        .estimate()?;

        let bounding_box = data.annotations.get(&selected.image).cloned();
        match &bounding_box {
            Some(bb) => info!(
                "bounding box: ({}, {}) {}x{}, centre {:?}",
                bb.x,
                bb.y,
                bb.width,
                bb.height,
                bb.center()
            ),
            None if settings.require_annotation => {
                return Err(LocalizeError::missing(
                    "annotation lookup",
                    format!("no bounding box for {}", selected.image),
                ))
            }
            None => warn!("image {} is not in the annotations", selected.image),
        }

        let object_point = ObjectPointAggregator {
            slots: data.store.slots_at(selected.timestamp).collect_vec(),
            aggregation: settings.aggregation,
            image: &selected.image,
            timestamp: selected.timestamp,
        }
        .estimate()?;

        let offset = FrameTransformer {
            point: &object_point,
            pose: &selected.keyframe.pose,
            scale: scale.scale,
            timestamp: selected.timestamp,
            rotation_tolerance: settings.rotation_tolerance,
        }
        .estimate()?;

        let vehicle = data.vehicles.get(&selected.image).ok_or_else(|| {
            LocalizeError::missing(
                "geolocation",
                format!("no vehicle position for {}", selected.image),
            )
        })?;

        let (utm, position) = Geolocator {
            vehicle,
            offset: &offset,
            planar_axes: settings.planar_axes(),
            zone_number: settings.utm_zone_number,
            zone_letter: settings.utm_zone_letter,
        }
        .estimate()?;

        Ok(SignFix {
            image: selected.image,
            bounding_box,
            vehicle: vehicle.clone(),
            scale,
            object_point,
            offset,
            utm,
            position,
        })
    }
}
