mod aggregate;
mod base;
mod common;
mod geolocate;
mod scale;
mod select;
mod transform;

pub use aggregate::ObjectPointAggregator;
pub use base::Estimator;
pub use common::{finite_mean, finite_median};
pub use geolocate::Geolocator;
pub use scale::{scale_from_baselines, ScaleEstimate, ScaleEstimator};
pub use select::{KeyframeSelector, SelectedKeyframe};
pub use transform::{FrameTransformer, MetricOffset};
