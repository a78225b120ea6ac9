use super::base::Estimator;
use crate::error::{LocalizeError, Result};
use crate::map::{Annotations, FrameStore, Keyframe};
use crate::num::Number;
use crate::settings::KeyframePolicy;

use log::info;

const STAGE: &str = "keyframe selection";

/// The keyframe chosen as the sign observation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedKeyframe<'a> {
    pub image: String,
    pub timestamp: Number,
    pub keyframe: &'a Keyframe,
}

pub struct KeyframeSelector<'a> {
    pub store: &'a FrameStore,
    pub annotations: &'a Annotations,
    pub policy: &'a KeyframePolicy,
}

impl<'a> Estimator<SelectedKeyframe<'a>> for KeyframeSelector<'a> {
    fn estimate(self) -> Result<SelectedKeyframe<'a>> {
        let observations = self.store.observations();

        let (image, timestamp) = match self.policy {
            KeyframePolicy::LastObserved => observations
                .last()
                .map(|o| (o.image.clone(), o.timestamp))
                .ok_or_else(|| LocalizeError::missing(STAGE, "object map has no rows"))?,
            KeyframePolicy::MostPoints => observations
                .iter()
                .map(|o| {
                    let points = self
                        .store
                        .slots_at(o.timestamp)
                        .filter(|slot| slot.iter().all(Option::is_some))
                        .count();
                    (o, points)
                })
                // later keyframes win ties, like the last observed one
                .max_by_key(|(_, points)| *points)
                .map(|(o, _)| (o.image.clone(), o.timestamp))
                .ok_or_else(|| LocalizeError::missing(STAGE, "object map has no rows"))?,
            KeyframePolicy::Annotated => observations
                .iter()
                .rev()
                .find(|o| self.annotations.get(&o.image).is_some())
                .map(|o| (o.image.clone(), o.timestamp))
                .ok_or_else(|| {
                    LocalizeError::missing(STAGE, "no observed keyframe has an annotation")
                })?,
            KeyframePolicy::Image(image) => {
                let timestamp = self.store.timestamp_of(image).ok_or_else(|| {
                    LocalizeError::missing(
                        STAGE,
                        format!("image {} is not in the object map", image),
                    )
                })?;
                (image.clone(), timestamp)
            }
        };

        let keyframe = self.store.keyframe_at(timestamp).ok_or_else(|| {
            LocalizeError::missing(
                STAGE,
                format!("no camera pose for keyframe {} (ts = {})", image, timestamp),
            )
        })?;

        info!(
            "selected keyframe {} (ts = {}) by {:?}",
            image, timestamp, self.policy
        );

        Ok(SelectedKeyframe {
            image,
            timestamp,
            keyframe,
        })
    }
}
