// Data models for body pose landmarks as produced by the pose-estimation model

use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// Landmark
// ==============================================================================

/// A body keypoint with a visibility score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32, // Normalized [0, 1], left to right
    pub y: f32, // Normalized [0, 1], 0 = top of the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>, // Depth relative to the hip midpoint, when the model provides it
    pub visibility: f32, // Detection confidence [0, 1]
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility,
        }
    }

    pub fn with_depth(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            visibility,
        }
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.visibility.is_finite()
            && self.z.map_or(true, f32::is_finite)
    }
}

// ==============================================================================
// Body landmark numbering (33 keypoints)
// ==============================================================================

/// MediaPipe Pose Landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Full landmark count of the body model
pub const BODY_LANDMARK_COUNT: usize = 33;

/// Landmarks needed to see both arms (everything up to the right wrist)
pub const MIN_ARM_LANDMARKS: usize = BodyLandmark::RightWrist as usize + 1;

/// Body side used for single-arm measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn shoulder(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftShoulder,
            Side::Right => BodyLandmark::RightShoulder,
        }
    }

    pub fn elbow(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftElbow,
            Side::Right => BodyLandmark::RightElbow,
        }
    }

    pub fn wrist(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftWrist,
            Side::Right => BodyLandmark::RightWrist,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shoulder, elbow and wrist of one side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arm {
    pub side: Side,
    pub shoulder: Landmark,
    pub elbow: Landmark,
    pub wrist: Landmark,
}

impl Arm {
    /// Mean visibility of the three joints
    pub fn visibility(&self) -> f32 {
        (self.shoulder.visibility + self.elbow.visibility + self.wrist.visibility) / 3.0
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.shoulder.is_visible(threshold)
            && self.elbow.is_visible(threshold)
            && self.wrist.is_visible(threshold)
    }
}

// ==============================================================================
// Landmark Set (one per frame)
// ==============================================================================

/// Landmarks detected for one person in one frame, indexed by `BodyLandmark`.
///
/// May hold fewer than 33 entries when the model only returned a partial
/// detection. Coordinates are checked once on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> PoseResult<Self> {
        if let Some(index) = landmarks.iter().position(|l| !l.is_finite()) {
            return Err(PoseError::MalformedFrame {
                index,
                reason: "non-finite landmark value".to_string(),
            });
        }

        Ok(Self { landmarks })
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, landmark: BodyLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index())
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Shoulder, elbow and wrist of `side`, if all three were detected
    pub fn arm(&self, side: Side) -> Option<Arm> {
        Some(Arm {
            side,
            shoulder: *self.get(side.shoulder())?,
            elbow: *self.get(side.elbow())?,
            wrist: *self.get(side.wrist())?,
        })
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let landmarks = Vec::<Landmark>::deserialize(deserializer)?;
        LandmarkSet::new(landmarks).map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// Pose Frame / Video metadata
// ==============================================================================

/// Pose estimation output for a single video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub timestamp_ms: i64,
    pub landmarks: Option<LandmarkSet>, // None = no person detected
}

/// Properties of the video a pose source reads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub identifier: String,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub total_frames: u64,
}

impl VideoInfo {
    pub fn duration_seconds(&self) -> f64 {
        if self.fps > 0.0 {
            self.total_frames as f64 / self.fps
        } else {
            0.0
        }
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Pose source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Malformed landmark at index {index}: {reason}")]
    MalformedFrame { index: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PoseResult<T> = Result<T, PoseError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn full_body(visibility: f32) -> Vec<Landmark> {
        (0..BODY_LANDMARK_COUNT)
            .map(|i| Landmark::new(i as f32 / 100.0, 0.5, visibility))
            .collect()
    }

    #[test]
    fn test_landmark_visibility() {
        let landmark = Landmark::new(0.5, 0.5, 0.8);
        assert!(landmark.is_visible(0.5));
        assert!(landmark.is_visible(0.8));
        assert!(!landmark.is_visible(0.9));
    }

    #[test]
    fn test_arm_indices_match_body_model() {
        assert_eq!(Side::Left.shoulder().index(), 11);
        assert_eq!(Side::Right.shoulder().index(), 12);
        assert_eq!(Side::Left.elbow().index(), 13);
        assert_eq!(Side::Right.wrist().index(), 16);
        assert_eq!(MIN_ARM_LANDMARKS, 17);
        assert_eq!(Side::Right.as_str(), "right");
        assert_eq!(Side::Left.to_string(), "left");
    }

    #[test]
    fn test_depth_is_serialized_only_when_present() {
        let flat = serde_json::to_value(Landmark::new(0.1, 0.2, 0.9)).unwrap();
        assert!(flat.get("z").is_none());

        let deep = Landmark::with_depth(0.1, 0.2, -0.3, 0.9);
        let value = serde_json::to_value(deep).unwrap();
        assert!((value["z"].as_f64().unwrap() + 0.3).abs() < 1e-6);
        assert_eq!(serde_json::from_value::<Landmark>(value).unwrap(), deep);
    }

    #[test]
    fn test_landmark_set_rejects_non_finite() {
        let mut landmarks = full_body(0.9);
        landmarks[12].y = f32::NAN;

        match LandmarkSet::new(landmarks) {
            Err(PoseError::MalformedFrame { index, .. }) => assert_eq!(index, 12),
            other => panic!("expected malformed frame, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_set_has_no_arm() {
        let set = LandmarkSet::new(full_body(0.9)[..14].to_vec()).unwrap();
        assert_eq!(set.len(), 14);
        assert!(set.arm(Side::Left).is_none());
        assert!(set.arm(Side::Right).is_none());
    }

    #[test]
    fn test_arm_visibility_is_mean() {
        let mut landmarks = full_body(0.9);
        landmarks[BodyLandmark::LeftWrist.index()].visibility = 0.3;
        let set = LandmarkSet::new(landmarks).unwrap();

        let arm = set.arm(Side::Left).unwrap();
        assert!((arm.visibility() - 0.7).abs() < 1e-6);
        assert!(!arm.is_visible(0.5));
        assert!(set.arm(Side::Right).unwrap().is_visible(0.5));
    }

    #[test]
    fn test_landmark_set_deserialization_validates() {
        let json = r#"[{"x": 0.1, "y": 0.2, "visibility": 0.9}, {"x": 0.3, "y": 0.4, "z": -0.1, "visibility": 0.8}]"#;
        let set: LandmarkSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[1].z, Some(-0.1));

        let bad = r#"[{"x": 0.1, "y": 1e999, "visibility": 0.9}]"#;
        assert!(serde_json::from_str::<LandmarkSet>(bad).is_err());
    }

    #[test]
    fn test_video_duration() {
        let info = VideoInfo {
            identifier: "clip.mp4".to_string(),
            fps: 30.0,
            width: 1280,
            height: 720,
            total_frames: 900,
        };
        assert_eq!(info.duration_seconds(), 30.0);

        let still = VideoInfo { fps: 0.0, ..info };
        assert_eq!(still.duration_seconds(), 0.0);
    }
}
