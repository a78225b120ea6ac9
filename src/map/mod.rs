mod annotation;
mod keyframe;
mod store;
mod vehicle;

pub use annotation::{Annotations, BoundingBox};
pub use keyframe::{
    same_timestamp, CameraPose, Keyframe, ObjectObservation, TrajectoryRow, TIMESTAMP_TOLERANCE,
};
pub use store::FrameStore;
pub use vehicle::{VehiclePosition, VehicleTrack};
