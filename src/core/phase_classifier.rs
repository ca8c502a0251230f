// Phase classification - maps one frame's landmarks to an exercise phase

use crate::core::geometry::{angle_at, average_height};
use crate::models::exercise::{ClassifierStrategy, ExerciseResult, Phase, ThresholdConfig};
use crate::models::pose::{Arm, LandmarkSet, Side, MIN_ARM_LANDMARKS};

/// Result of classifying a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub phase: Phase,
    pub side: Option<Side>,   // Arm the measurements were taken from
    pub angle: Option<f32>,   // Elbow angle, when the arm was confidently detected
    pub height: Option<f32>,  // Shoulder height, when a shoulder was confidently detected
}

impl Classification {
    pub const NO_DETECTION: Classification = Classification {
        phase: Phase::NoDetection,
        side: None,
        angle: None,
        height: None,
    };
}

/// Stateless per-frame classifier
#[derive(Debug, Clone)]
pub struct PhaseClassifier {
    config: ThresholdConfig,
}

impl PhaseClassifier {
    /// Create a classifier, rejecting thresholds that cannot classify
    pub fn new(config: ThresholdConfig) -> ExerciseResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Replace the thresholds used for subsequent frames
    pub fn set_config(&mut self, config: ThresholdConfig) -> ExerciseResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn phase_of(&self, landmarks: Option<&LandmarkSet>) -> Phase {
        self.classify(landmarks).phase
    }

    /// Classify a frame. Absent, partial or low-confidence detections
    /// resolve to `Phase::NoDetection`.
    pub fn classify(&self, landmarks: Option<&LandmarkSet>) -> Classification {
        let landmarks = match landmarks {
            Some(set) if set.len() >= MIN_ARM_LANDMARKS => set,
            _ => return Classification::NO_DETECTION,
        };

        let threshold = self.config.min_confidence;
        let angle_arm = select_arm(landmarks, |arm| arm.is_visible(threshold));
        let height_arm = select_arm(landmarks, |arm| arm.shoulder.is_visible(threshold));

        let angle = angle_arm.map(|arm| {
            angle_at(
                arm.shoulder.position(),
                arm.elbow.position(),
                arm.wrist.position(),
            )
        });
        let height = height_arm.map(|arm| self.shoulder_height(landmarks, &arm));

        let measured = match self.config.strategy {
            ClassifierStrategy::HeightThreshold => height_arm
                .zip(height)
                .map(|(arm, h)| (arm.side, self.phase_from_height(h))),
            ClassifierStrategy::ElbowAngle => angle_arm
                .zip(angle)
                .map(|(arm, a)| (arm.side, self.phase_from_angle(a))),
        };

        match measured {
            Some((side, phase)) => Classification {
                phase,
                side: Some(side),
                angle,
                height,
            },
            None => Classification::NO_DETECTION,
        }
    }

    fn phase_from_height(&self, height: f32) -> Phase {
        if height <= self.config.upper_threshold {
            Phase::Up
        } else if height >= self.config.lower_threshold {
            Phase::Down
        } else {
            Phase::Transition
        }
    }

    fn phase_from_angle(&self, angle: f32) -> Phase {
        if angle >= self.config.up_angle {
            Phase::Up
        } else if angle <= self.config.down_angle {
            Phase::Down
        } else {
            Phase::Transition
        }
    }

    /// Both shoulders averaged when both are trusted, otherwise the shoulder
    /// of `arm`, which has already passed the confidence gate
    fn shoulder_height(&self, landmarks: &LandmarkSet, arm: &Arm) -> f32 {
        let threshold = self.config.min_confidence;
        let left = landmarks.get(Side::Left.shoulder()).filter(|l| l.is_visible(threshold));
        let right = landmarks.get(Side::Right.shoulder()).filter(|l| l.is_visible(threshold));

        match (left, right) {
            (Some(l), Some(r)) => average_height(l.position(), r.position()),
            _ => arm.shoulder.y,
        }
    }
}

/// Among the arms that pass `usable`, pick the one with the higher mean
/// visibility; ties go to the left
fn select_arm<F>(landmarks: &LandmarkSet, usable: F) -> Option<Arm>
where
    F: Fn(&Arm) -> bool,
{
    let left = landmarks.arm(Side::Left).filter(|arm| usable(arm));
    let right = landmarks.arm(Side::Right).filter(|arm| usable(arm));

    match (left, right) {
        (Some(left), Some(right)) => {
            if right.visibility() > left.visibility() {
                Some(right)
            } else {
                Some(left)
            }
        }
        (left, right) => left.or(right),
    }
}
