// Pose source boundary
// Abstracts whatever produces per-frame body landmarks (a live pose model,
// or a recording of one) from the counting core

use crate::models::pose::{LandmarkSet, PoseError, PoseFrame, PoseResult, VideoInfo};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;

/// Producer of per-frame pose landmarks for one video, in frame order
pub trait PoseSource {
    /// Properties of the underlying video
    fn video_info(&self) -> &VideoInfo;

    /// Next frame, or `None` once the video is exhausted
    fn next_frame(&mut self) -> PoseResult<Option<PoseFrame>>;
}

// ==============================================================================
// Recorded landmarks (JSON replay)
// ==============================================================================

#[derive(Debug, Deserialize)]
struct Recording {
    video: VideoInfo,
    frames: Vec<RecordedFrame>,
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    timestamp_ms: Option<i64>,
    landmarks: Option<LandmarkSet>,
}

/// Replays landmarks previously exported from a pose model.
///
/// Expected layout:
/// `{"video": {...}, "frames": [{"timestamp_ms": 0, "landmarks": [...] | null}]}`.
/// Frames without a timestamp are stamped from the frame rate.
#[derive(Debug, Clone)]
pub struct RecordedPoseSource {
    info: VideoInfo,
    frames: VecDeque<PoseFrame>,
}

impl RecordedPoseSource {
    pub fn new(info: VideoInfo, frames: Vec<PoseFrame>) -> Self {
        Self {
            info,
            frames: frames.into(),
        }
    }

    pub fn from_json_str(json: &str) -> PoseResult<Self> {
        let recording: Recording = serde_json::from_str(json)?;
        let fps = recording.video.fps;

        let frames = recording
            .frames
            .into_iter()
            .enumerate()
            .map(|(index, frame)| PoseFrame {
                timestamp_ms: frame
                    .timestamp_ms
                    .unwrap_or_else(|| frame_timestamp_ms(index as u64, fps)),
                landmarks: frame.landmarks,
            })
            .collect();

        Ok(Self::new(recording.video, frames))
    }

    pub fn from_path(path: impl AsRef<Path>) -> PoseResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PoseError::SourceUnavailable(format!(
                "Recording does not exist: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PoseSource for RecordedPoseSource {
    fn video_info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> PoseResult<Option<PoseFrame>> {
        Ok(self.frames.pop_front())
    }
}

/// Millisecond timestamp of frame `index` at `fps`
pub fn frame_timestamp_ms(index: u64, fps: f64) -> i64 {
    if fps > 0.0 {
        (index as f64 * 1000.0 / fps).round() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r#"{
        "video": {"identifier": "clip.mp4", "fps": 25.0, "width": 1280, "height": 720, "total_frames": 3},
        "frames": [
            {"timestamp_ms": 0, "landmarks": null},
            {"landmarks": [{"x": 0.5, "y": 0.4, "visibility": 0.9}]},
            {"timestamp_ms": 80, "landmarks": []}
        ]
    }"#;

    #[test]
    fn test_replays_frames_in_order() {
        let mut source = RecordedPoseSource::from_json_str(RECORDING).unwrap();
        assert_eq!(source.video_info().identifier, "clip.mp4");
        assert_eq!(source.remaining(), 3);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.timestamp_ms, 0);
        assert!(first.landmarks.is_none());

        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.timestamp_ms, 40);
        assert_eq!(second.landmarks.unwrap().len(), 1);

        let third = source.next_frame().unwrap().unwrap();
        assert_eq!(third.timestamp_ms, 80);
        assert!(third.landmarks.unwrap().is_empty());

        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_rejects_malformed_recording() {
        let result = RecordedPoseSource::from_json_str(r#"{"video": {}, "frames": []}"#);
        assert!(matches!(result, Err(PoseError::Serialization(_))));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("pullup_vision_missing_recording.json");
        let result = RecordedPoseSource::from_path(&path);
        assert!(matches!(result, Err(PoseError::SourceUnavailable(_))));
    }

    #[test]
    fn test_frame_timestamp() {
        assert_eq!(frame_timestamp_ms(30, 30.0), 1000);
        assert_eq!(frame_timestamp_ms(1, 29.97), 33);
        assert_eq!(frame_timestamp_ms(10, 0.0), 0);
    }
}
