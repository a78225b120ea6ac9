//! Recovers the absolute position of a roadside sign from a monocular SLAM run.
//!
//! The SLAM map is unscaled, so two keyframes with surveyed vehicle positions
//! fix the metric scale. The sign's map points at one keyframe are reduced to
//! a single point, moved into the camera frame, scaled, added to the vehicle's
//! UTM position and projected to latitude/longitude.

pub mod error;
pub mod io;
pub mod map;
pub mod num;
pub mod pipeline;
pub mod settings;
pub mod solver;
pub mod utm;

pub use error::{LocalizeError, Result};
pub use pipeline::{SequenceData, SignFix, SignLocalizer};
pub use settings::LocalizeSettings;
