// Repetition counting - debounced rising-edge detection over per-frame phases

use crate::models::exercise::{AngleExtent, Phase, RepetitionRecord};
use serde::{Deserialize, Serialize};

/// Whether the athlete is currently latched at the top of a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatchState {
    AwaitingTop,
    AtTop,
}

/// Phase assumed before the first frame. `Down` is a qualifying
/// predecessor, so a video that opens in the `Up` phase counts its first
/// frame as repetition 1.
pub const INITIAL_PHASE: Phase = Phase::Down;

/// Counts repetitions from a stream of phases.
///
/// A repetition is counted on a rising edge: an `Up` frame whose previous
/// frame was `Down` or `Transition` while the latch is `AwaitingTop`.
/// Only a `Down` frame re-arms the latch, so flicker between `Up` and
/// `Transition` at the top of a pull cannot count twice.
#[derive(Debug, Clone, PartialEq)]
pub struct RepCounter {
    latch: LatchState,
    previous_phase: Phase,
    count: u32,
    frames_processed: u64,
    extent: AngleExtent,
    history: Vec<RepetitionRecord>,
}

impl RepCounter {
    pub fn new() -> Self {
        Self {
            latch: LatchState::AwaitingTop,
            previous_phase: INITIAL_PHASE,
            count: 0,
            frames_processed: 0,
            extent: AngleExtent::EMPTY,
            history: Vec::new(),
        }
    }

    /// Return to the initial state, dropping all history
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one frame. Returns the new record when this frame completed a
    /// repetition.
    pub fn step(
        &mut self,
        phase: Phase,
        angle: Option<f32>,
        timestamp_ms: i64,
    ) -> Option<RepetitionRecord> {
        if let Some(angle) = angle {
            self.extent.include(angle);
        }

        let mut counted = None;

        let rising_edge = phase == Phase::Up
            && matches!(self.previous_phase, Phase::Down | Phase::Transition)
            && self.latch == LatchState::AwaitingTop;

        if rising_edge {
            self.latch = LatchState::AtTop;
            self.count += 1;

            let record = RepetitionRecord {
                repetition: self.count,
                max_angle: self.extent.max,
                min_angle: self.extent.min,
                frame_index: self.frames_processed,
                timestamp_ms,
            };
            self.history.push(record);
            self.extent = AngleExtent::EMPTY;

            tracing::info!(
                repetition = record.repetition,
                frame = record.frame_index,
                max_angle = record.max_angle,
                min_angle = record.min_angle,
                "Repetition detected"
            );
            counted = Some(record);
        }

        if phase == Phase::Down {
            self.latch = LatchState::AwaitingTop;
        }

        self.previous_phase = phase;
        self.frames_processed += 1;

        counted
    }

    pub fn latch(&self) -> LatchState {
        self.latch
    }

    pub fn previous_phase(&self) -> Phase {
        self.previous_phase
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Angle extent of the repetition in progress
    pub fn current_extent(&self) -> AngleExtent {
        self.extent
    }

    pub fn history(&self) -> &[RepetitionRecord] {
        &self.history
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercise::Phase::{Down, NoDetection, Transition, Up};

    fn run(counter: &mut RepCounter, phases: &[Phase]) -> Vec<u64> {
        phases
            .iter()
            .filter_map(|&phase| counter.step(phase, None, 0))
            .map(|record| record.frame_index)
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let counter = RepCounter::new();
        assert_eq!(counter.latch(), LatchState::AwaitingTop);
        assert_eq!(counter.previous_phase(), Down);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.frames_processed(), 0);
        assert!(counter.history().is_empty());
        assert!(counter.current_extent().is_empty());
    }

    #[test]
    fn test_counts_rising_edges() {
        let mut counter = RepCounter::new();
        let frames = run(&mut counter, &[Down, Down, Up, Up, Down, Up]);

        assert_eq!(frames, vec![2, 5]);
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.frames_processed(), 6);
        let numbers: Vec<u32> = counter.history().iter().map(|r| r.repetition).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_up_on_first_frame_counts() {
        let mut counter = RepCounter::new();
        assert_eq!(run(&mut counter, &[Up]), vec![0]);
        assert_eq!(counter.latch(), LatchState::AtTop);
    }

    #[test]
    fn test_flicker_at_top_counts_once() {
        let mut counter = RepCounter::new();
        let frames = run(&mut counter, &[Up, Transition, Up, Transition, Up]);
        assert_eq!(frames, vec![0]);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_transition_rearms_only_after_down() {
        let mut counter = RepCounter::new();
        let frames = run(
            &mut counter,
            &[Down, Transition, Up, Transition, Down, Transition, Up],
        );
        assert_eq!(frames, vec![2, 6]);
    }

    #[test]
    fn test_no_detection_leaves_count_and_latch() {
        let mut counter = RepCounter::new();
        run(&mut counter, &[Down, Up]);
        assert_eq!(counter.latch(), LatchState::AtTop);

        run(&mut counter, &[NoDetection, NoDetection, NoDetection]);
        assert_eq!(counter.count(), 1);
        assert_eq!(counter.latch(), LatchState::AtTop);
        assert_eq!(counter.frames_processed(), 5);
        assert_eq!(counter.previous_phase(), NoDetection);
    }

    #[test]
    fn test_up_after_no_detection_does_not_count() {
        let mut counter = RepCounter::new();
        assert!(run(&mut counter, &[Down, NoDetection, Up]).is_empty());

        // A later qualifying edge still counts
        assert_eq!(run(&mut counter, &[Down, Up]), vec![4]);
    }

    #[test]
    fn test_down_is_idempotent() {
        let mut counter = RepCounter::new();
        run(&mut counter, &[Down, Down, Down]);
        assert_eq!(counter.latch(), LatchState::AwaitingTop);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_count_is_monotonic() {
        let mut counter = RepCounter::new();
        let phases = [
            Down, Up, NoDetection, Transition, Up, Down, Down, Transition, Up, Up, NoDetection,
            Down, Up,
        ];
        let mut last = 0;
        for phase in phases {
            let before = counter.count();
            let counted = counter.step(phase, None, 0).is_some();
            assert!(counter.count() >= last);
            assert_eq!(counter.count() - before, counted as u32);
            last = counter.count();
        }
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn test_angle_extent_per_repetition() {
        let mut counter = RepCounter::new();
        counter.step(Down, Some(170.0), 0);
        counter.step(Transition, Some(120.0), 33);
        let first = counter.step(Up, Some(60.0), 66).unwrap();

        assert_eq!(first.max_angle, 170.0);
        assert_eq!(first.min_angle, 60.0);
        assert_eq!(first.timestamp_ms, 66);
        assert!(counter.current_extent().is_empty());

        counter.step(Up, Some(55.0), 100);
        counter.step(NoDetection, None, 133);
        counter.step(Down, Some(165.0), 166);
        let second = counter.step(Up, Some(70.0), 200).unwrap();

        assert_eq!(second.max_angle, 165.0);
        assert_eq!(second.min_angle, 55.0);
        assert_eq!(second.frame_index, 6);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut counter = RepCounter::new();
        counter.step(Down, Some(150.0), 0);
        counter.step(Up, Some(80.0), 33);

        counter.reset();
        let once = counter.clone();
        counter.reset();

        assert_eq!(counter, once);
        assert_eq!(counter, RepCounter::new());
    }
}
