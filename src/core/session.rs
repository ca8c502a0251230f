// Session accumulator - per-video owner of classification and counting state

use crate::core::phase_classifier::PhaseClassifier;
use crate::core::rep_counter::{RepCounter, INITIAL_PHASE};
use crate::models::exercise::{ExerciseResult, Phase, SessionSnapshot, ThresholdConfig};
use crate::models::pose::LandmarkSet;
use uuid::Uuid;

/// Per-frame outcome reported back to the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    pub repetition_counted: bool,
    pub phase: Phase,
}

/// Counting state for one video run.
///
/// Each in-flight video owns its own accumulator; nothing is shared between
/// runs. Frames must be fed in increasing order from a single caller.
#[derive(Debug, Clone)]
pub struct SessionAccumulator {
    session_id: String,
    classifier: PhaseClassifier,
    counter: RepCounter,
    current_phase: Phase,
    current_angle: f32,
    current_height: f32,
}

impl SessionAccumulator {
    pub fn new(thresholds: ThresholdConfig) -> ExerciseResult<Self> {
        let classifier = PhaseClassifier::new(thresholds)?;

        tracing::info!(
            strategy = ?thresholds.strategy,
            upper_threshold = thresholds.upper_threshold,
            lower_threshold = thresholds.lower_threshold,
            min_confidence = thresholds.min_confidence,
            "Session accumulator initialized"
        );

        Ok(Self {
            session_id: Uuid::new_v4().to_string(),
            classifier,
            counter: RepCounter::new(),
            current_phase: INITIAL_PHASE,
            current_angle: 0.0,
            current_height: 0.0,
        })
    }

    /// Reinitialize all counting state. Thresholds are kept; a fresh session
    /// id is assigned.
    pub fn reset(&mut self) {
        self.session_id = Uuid::new_v4().to_string();
        self.counter.reset();
        self.current_phase = INITIAL_PHASE;
        self.current_angle = 0.0;
        self.current_height = 0.0;
    }

    /// Feed the next frame. `None` means no person was detected.
    pub fn process_frame(
        &mut self,
        landmarks: Option<&LandmarkSet>,
        timestamp_ms: i64,
    ) -> FrameOutcome {
        let classification = self.classifier.classify(landmarks);

        if let Some(angle) = classification.angle {
            self.current_angle = angle;
        }
        if let Some(height) = classification.height {
            self.current_height = height;
        }
        self.current_phase = classification.phase;

        let counted = self
            .counter
            .step(classification.phase, classification.angle, timestamp_ms)
            .is_some();

        tracing::trace!(
            session = %self.session_id,
            frame = self.counter.frames_processed() - 1,
            phase = classification.phase.as_str(),
            side = classification.side.map(|side| side.as_str()),
            counted,
            "Frame processed"
        );

        FrameOutcome {
            repetition_counted: counted,
            phase: classification.phase,
        }
    }

    /// Consistent copy of the current statistics
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            count: self.counter.count(),
            current_phase: self.current_phase,
            current_angle: self.current_angle,
            current_height: self.current_height,
            frames_processed: self.counter.frames_processed(),
            history: self.counter.history().to_vec(),
        }
    }

    /// Replace the thresholds; only frames processed afterwards are affected
    pub fn set_thresholds(&mut self, thresholds: ThresholdConfig) -> ExerciseResult<()> {
        self.classifier.set_config(thresholds)?;
        tracing::info!(
            session = %self.session_id,
            strategy = ?thresholds.strategy,
            upper_threshold = thresholds.upper_threshold,
            lower_threshold = thresholds.lower_threshold,
            "Thresholds updated"
        );
        Ok(())
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        self.classifier.config()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn count(&self) -> u32 {
        self.counter.count()
    }

    pub fn phase(&self) -> Phase {
        self.current_phase
    }

    pub fn frames_processed(&self) -> u64 {
        self.counter.frames_processed()
    }
}
