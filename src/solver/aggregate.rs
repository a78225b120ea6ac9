use super::base::Estimator;
use super::common::{finite_mean, finite_median};
use crate::error::{LocalizeError, Result};
use crate::num::{Number, Point3, PointSlot};
use crate::settings::Aggregation;

use itertools::Itertools;
use log::{debug, info};

/// Reduces the map points of one keyframe to a representative point.
///
/// Each axis is reduced independently over the slots where that component is
/// present, so a slot missing `z` still contributes its `x` and `y`.
pub struct ObjectPointAggregator<'a> {
    pub slots: Vec<&'a PointSlot>,
    pub aggregation: Aggregation,

    /// Reported on failure.
    pub image: &'a str,
    pub timestamp: Number,
}

impl<'a> Estimator<Point3> for ObjectPointAggregator<'a> {
    fn estimate(self) -> Result<Point3> {
        let reduce = |axis: usize| {
            let values = self.slots.iter().filter_map(|slot| slot[axis]).collect_vec();
            debug!("axis {}: {} valid of {} slots", axis, values.len(), self.slots.len());
            match self.aggregation {
                Aggregation::Mean => finite_mean(values),
                Aggregation::Median => finite_median(values),
            }
        };

        match (reduce(0), reduce(1), reduce(2)) {
            (Some(x), Some(y), Some(z)) => {
                let point = Point3::new(x, y, z);
                info!(
                    "object point ({:?} of {} slots): {}",
                    self.aggregation,
                    self.slots.len(),
                    point
                );
                Ok(point)
            }
            _ => Err(LocalizeError::NoObjectPoints {
                image: self.image.to_owned(),
                timestamp: self.timestamp,
            }),
        }
    }
}
