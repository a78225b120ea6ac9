use crate::error::{LocalizeError, Result};
use crate::num::Number;

use serde::{Deserialize, Serialize};

/// Which two keyframes anchor the metric scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceFrames {
    /// The first two keyframes in trajectory order.
    FirstTwo,
    /// Two keyframes named by image identifier.
    Images { first: String, second: String },
}

/// How the SLAM-local baseline is measured between the reference keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    /// Norm of the second translation; the first pose is the trajectory origin.
    FromOrigin,
    /// Norm of the difference between both translations.
    Displacement,
}

/// Which keyframe is taken as the sign observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframePolicy {
    /// The keyframe of the last object map row.
    LastObserved,
    /// The keyframe with the largest number of valid map points.
    MostPoints,
    /// The last observed keyframe that has a bounding box annotation.
    Annotated,
    /// A keyframe named by image identifier.
    Image(String),
}

/// Reduction of a keyframe's map points to a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Mean,
    Median,
}

/// The settings for a localization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizeSettings {
    /// UTM zone number of the surveyed vehicle coordinates.
    #[serde(default = "default_utm_zone_number")]
    pub utm_zone_number: u8,
    /// UTM latitude band letter; `N` and above are northern.
    #[serde(default = "default_utm_zone_letter")]
    pub utm_zone_letter: char,
    /// Index of the SLAM world axis that points up; the other two are planar.
    #[serde(default = "default_vertical_axis")]
    pub vertical_axis: usize,
    #[serde(default = "default_reference_frames")]
    pub reference_frames: ReferenceFrames,
    #[serde(default = "default_baseline")]
    pub baseline: BaselineMode,
    #[serde(default = "default_keyframe_policy")]
    pub keyframe_policy: KeyframePolicy,
    #[serde(default = "default_aggregation")]
    pub aggregation: Aggregation,
    /// SLAM baselines at or below this length are degenerate.
    #[serde(default = "default_min_baseline")]
    pub min_baseline: Number,
    /// Maximum element of |RᵀR - I| and |det R - 1| accepted for a rotation.
    #[serde(default = "default_rotation_tolerance")]
    pub rotation_tolerance: Number,
    /// Fail instead of warning when the chosen keyframe has no annotation.
    #[serde(default)]
    pub require_annotation: bool,
}

fn default_utm_zone_number() -> u8 {
    16
}

fn default_utm_zone_letter() -> char {
    'S'
}

fn default_vertical_axis() -> usize {
    1
}

fn default_reference_frames() -> ReferenceFrames {
    ReferenceFrames::FirstTwo
}

fn default_baseline() -> BaselineMode {
    BaselineMode::FromOrigin
}

fn default_keyframe_policy() -> KeyframePolicy {
    KeyframePolicy::LastObserved
}

fn default_aggregation() -> Aggregation {
    Aggregation::Mean
}

fn default_min_baseline() -> Number {
    1e-9
}

fn default_rotation_tolerance() -> Number {
    1e-4
}

impl Default for LocalizeSettings {
    fn default() -> Self {
        Self {
            utm_zone_number: default_utm_zone_number(),
            utm_zone_letter: default_utm_zone_letter(),
            vertical_axis: default_vertical_axis(),
            reference_frames: default_reference_frames(),
            baseline: default_baseline(),
            keyframe_policy: default_keyframe_policy(),
            aggregation: default_aggregation(),
            min_baseline: default_min_baseline(),
            rotation_tolerance: default_rotation_tolerance(),
            require_annotation: false,
        }
    }
}

impl LocalizeSettings {
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)
            .map_err(|e| LocalizeError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=60).contains(&self.utm_zone_number) {
            return Err(LocalizeError::InvalidSettings(format!(
                "utm zone number {} is not in 1..=60",
                self.utm_zone_number
            )));
        }
        if crate::utm::is_northern(self.utm_zone_letter).is_none() {
            return Err(LocalizeError::InvalidSettings(format!(
                "utm zone letter {:?} is not a latitude band",
                self.utm_zone_letter
            )));
        }
        if self.vertical_axis > 2 {
            return Err(LocalizeError::InvalidSettings(format!(
                "vertical axis {} is not one of 0, 1, 2",
                self.vertical_axis
            )));
        }
        if !(self.min_baseline >= 0.0) || !(self.rotation_tolerance > 0.0) {
            return Err(LocalizeError::InvalidSettings(
                "min_baseline must be at least 0 and rotation_tolerance above 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// The two planar axes (east, north) left after removing the vertical one.
    #[inline]
    pub fn planar_axes(&self) -> (usize, usize) {
        match self.vertical_axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        }
    }
}
