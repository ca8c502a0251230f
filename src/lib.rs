//! Pull-up repetition counting from per-frame body pose landmarks.
//!
//! A [`SessionAccumulator`] is fed one [`LandmarkSet`] (or `None`) per video
//! frame, classifies the exercise [`Phase`] and counts a repetition on every
//! qualifying rising edge into `Up`. [`VideoProcessor`] drives a whole video
//! from any [`PoseSource`].

pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::config::Config;
pub use crate::core::geometry::{angle_at, average_height};
pub use crate::core::phase_classifier::{Classification, PhaseClassifier};
pub use crate::core::rep_counter::{LatchState, RepCounter};
pub use crate::core::session::{FrameOutcome, SessionAccumulator};
pub use crate::core::video_processor::{ProcessingEvent, VideoProcessor};
pub use crate::models::exercise::{
    AngleExtent, ClassifierStrategy, ExerciseError, ExerciseResult, Phase, ProcessingResult,
    RepetitionRecord, SessionSnapshot, ThresholdConfig,
};
pub use crate::models::pose::{
    BodyLandmark, Landmark, LandmarkSet, PoseError, PoseFrame, PoseResult, Side, VideoInfo,
};
pub use crate::platform::pose::{PoseSource, RecordedPoseSource};
