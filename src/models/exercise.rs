// Data models for pull-up phase classification and repetition tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// Phase
// ==============================================================================

/// Exercise position classified from a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NoDetection,
    Up,
    Down,
    Transition,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NoDetection => "no_detection",
            Phase::Up => "up",
            Phase::Down => "down",
            Phase::Transition => "transition",
        }
    }

    pub fn is_detected(&self) -> bool {
        !matches!(self, Phase::NoDetection)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Repetitions
// ==============================================================================

/// Largest and smallest elbow angle seen in one repetition window.
///
/// An empty extent keeps the `max = 0`, `min = 180` sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleExtent {
    pub max: f32,
    pub min: f32,
}

impl AngleExtent {
    pub const EMPTY: AngleExtent = AngleExtent { max: 0.0, min: 180.0 };

    pub fn include(&mut self, angle: f32) {
        self.max = self.max.max(angle);
        self.min = self.min.min(angle);
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }
}

impl Default for AngleExtent {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One counted repetition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepetitionRecord {
    pub repetition: u32,  // 1-based
    pub max_angle: f32,   // Most extended elbow angle in the window
    pub min_angle: f32,   // Most flexed elbow angle in the window
    pub frame_index: u64, // Frame on which the rep was counted
    pub timestamp_ms: i64,
}

// ==============================================================================
// Thresholds
// ==============================================================================

/// Signal used to decide the phase of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierStrategy {
    HeightThreshold, // Shoulder height against normalized thresholds
    ElbowAngle,      // Elbow angle against degree thresholds
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub strategy: ClassifierStrategy,
    pub upper_threshold: f32, // Shoulder y at or above which the athlete is "up" (default: 0.20)
    pub lower_threshold: f32, // Shoulder y at or below which the athlete is "down" (default: 0.30)
    pub min_confidence: f32,  // Minimum landmark visibility to trust (default: 0.5)
    pub up_angle: f32,        // Elbow angle at or above which the frame is "up" (default: 160)
    pub down_angle: f32,      // Elbow angle at or below which the frame is "down" (default: 90)
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            strategy: ClassifierStrategy::HeightThreshold,
            upper_threshold: 0.20,
            lower_threshold: 0.30,
            min_confidence: 0.5,
            up_angle: 160.0,
            down_angle: 90.0,
        }
    }
}

impl ThresholdConfig {
    pub fn height(upper_threshold: f32, lower_threshold: f32) -> Self {
        Self {
            strategy: ClassifierStrategy::HeightThreshold,
            upper_threshold,
            lower_threshold,
            ..Self::default()
        }
    }

    pub fn elbow_angle(up_angle: f32, down_angle: f32) -> Self {
        Self {
            strategy: ClassifierStrategy::ElbowAngle,
            up_angle,
            down_angle,
            ..Self::default()
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Validate threshold values and their ordering
    pub fn validate(&self) -> ExerciseResult<()> {
        let values = [
            ("upper threshold", self.upper_threshold),
            ("lower threshold", self.lower_threshold),
            ("minimum confidence", self.min_confidence),
            ("up angle", self.up_angle),
            ("down angle", self.down_angle),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(ExerciseError::InvalidConfig(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in &values[..3] {
            if !(0.0..=1.0).contains(value) {
                return Err(ExerciseError::InvalidConfig(format!(
                    "Invalid {}: {}. Must be between 0.0 and 1.0",
                    name, value
                )));
            }
        }

        for (name, value) in &values[3..] {
            if !(0.0..=180.0).contains(value) {
                return Err(ExerciseError::InvalidConfig(format!(
                    "Invalid {}: {}. Must be between 0 and 180 degrees",
                    name, value
                )));
            }
        }

        // Smaller y is higher on screen
        if self.upper_threshold >= self.lower_threshold {
            return Err(ExerciseError::InvalidConfig(format!(
                "Upper threshold ({}) must be below lower threshold ({})",
                self.upper_threshold, self.lower_threshold
            )));
        }

        if self.down_angle >= self.up_angle {
            return Err(ExerciseError::InvalidConfig(format!(
                "Down angle ({}) must be below up angle ({})",
                self.down_angle, self.up_angle
            )));
        }

        Ok(())
    }
}

// ==============================================================================
// Statistics
// ==============================================================================

/// Point-in-time copy of a session's statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub count: u32,
    pub current_phase: Phase,
    pub current_angle: f32,
    pub current_height: f32,
    pub frames_processed: u64,
    pub history: Vec<RepetitionRecord>,
}

/// Outcome of processing one whole video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub success: bool,
    pub input_id: String,
    pub output_id: Option<String>,
    pub repetitions: u32,
    pub duration_seconds: f64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub processing_time_seconds: f64,
    pub history: Vec<RepetitionRecord>,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProcessingResult {
    pub fn failed(input_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            input_id: input_id.into(),
            output_id: None,
            repetitions: 0,
            duration_seconds: 0.0,
            fps: 0.0,
            width: 0,
            height: 0,
            processing_time_seconds: 0.0,
            history: Vec::new(),
            error_message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }

    /// Duration as "m:ss"
    pub fn duration_label(&self) -> String {
        let total = self.duration_seconds.max(0.0) as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }

    /// Resolution with a quality tag, e.g. "1920x1080 (Full HD)"
    pub fn quality_label(&self) -> String {
        let tag = if self.height >= 1080 {
            "Full HD"
        } else if self.height >= 720 {
            "HD"
        } else {
            "SD"
        };
        format!("{}x{} ({})", self.width, self.height, tag)
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExerciseError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ExerciseResult<T> = Result<T, ExerciseError>;
