use super::keyframe::{same_timestamp, Keyframe, ObjectObservation, TrajectoryRow};
use crate::error::{LocalizeError, Result};
use crate::num::{Number, PointSlot};

use itertools::Itertools;
use log::debug;
use std::collections::HashMap;

/// Read-only join of the keyframe trajectory and the object map.
///
/// Keyframes keep trajectory order, observations keep object map order.
#[derive(Debug, Clone)]
pub struct FrameStore {
    keyframes: Vec<Keyframe>,
    observations: Vec<ObjectObservation>,
    image_index: HashMap<String, Number>,
}

impl FrameStore {
    pub fn new(trajectory: Vec<TrajectoryRow>, observations: Vec<ObjectObservation>) -> Result<Self> {
        if let Some((i, (a, b))) = trajectory
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| {
                b.timestamp < a.timestamp || same_timestamp(a.timestamp, b.timestamp)
            })
        {
            let reason = if same_timestamp(a.timestamp, b.timestamp) {
                format!("timestamp {} repeats {}", b.timestamp, a.timestamp)
            } else {
                format!("timestamp {} follows {}", b.timestamp, a.timestamp)
            };
            return Err(LocalizeError::malformed("keyframe trajectory", i + 2, reason));
        }

        let mut image_index: HashMap<String, Number> = HashMap::new();
        for (i, observation) in observations.iter().enumerate() {
            match image_index.get(&observation.image).copied() {
                Some(timestamp) if !same_timestamp(timestamp, observation.timestamp) => {
                    return Err(LocalizeError::malformed(
                        "object map",
                        i + 1,
                        format!(
                            "image {} seen at both ts = {} and ts = {}",
                            observation.image, timestamp, observation.timestamp
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    if let Some((other, _)) = image_index
                        .iter()
                        .find(|(_, ts)| same_timestamp(**ts, observation.timestamp))
                    {
                        return Err(LocalizeError::malformed(
                            "object map",
                            i + 1,
                            format!(
                                "ts = {} carries both image {} and image {}",
                                observation.timestamp, other, observation.image
                            ),
                        ));
                    }
                    image_index.insert(observation.image.clone(), observation.timestamp);
                }
            }
        }

        let keyframes = trajectory
            .into_iter()
            .map(|row| {
                let image = observations
                    .iter()
                    .find(|o| same_timestamp(o.timestamp, row.timestamp))
                    .map(|o| o.image.clone());
                Keyframe {
                    timestamp: row.timestamp,
                    image,
                    pose: row.pose,
                }
            })
            .collect_vec();

        debug!(
            "frame store: {} keyframes, {} object map rows, {} images",
            keyframes.len(),
            observations.len(),
            image_index.len()
        );

        Ok(Self {
            keyframes,
            observations,
            image_index,
        })
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn observations(&self) -> &[ObjectObservation] {
        &self.observations
    }

    pub fn keyframe_at(&self, timestamp: Number) -> Option<&Keyframe> {
        self.keyframes
            .iter()
            .find(|k| same_timestamp(k.timestamp, timestamp))
    }

    /// Timestamp of the keyframe that captured `image`.
    #[inline]
    pub fn timestamp_of(&self, image: &str) -> Option<Number> {
        self.image_index.get(image).copied()
    }

    pub fn keyframe_by_image(&self, image: &str) -> Option<&Keyframe> {
        self.timestamp_of(image)
            .and_then(|timestamp| self.keyframe_at(timestamp))
    }

    /// Every point slot recorded at `timestamp`, across all object map rows.
    pub fn slots_at(&self, timestamp: Number) -> impl Iterator<Item = &PointSlot> + '_ {
        self.observations
            .iter()
            .filter(move |o| same_timestamp(o.timestamp, timestamp))
            .flat_map(|o| o.slots.iter())
    }
}
