// Pose estimation boundary
// Provides the landmark source trait and a recorded-landmark backend

pub mod landmark_source;

pub use landmark_source::{frame_timestamp_ms, PoseSource, RecordedPoseSource};
