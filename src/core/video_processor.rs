// Video processing - drives a session over every frame of one video

use crate::core::session::{FrameOutcome, SessionAccumulator};
use crate::models::exercise::{Phase, ProcessingResult};
use crate::platform::pose::PoseSource;
use chrono::Utc;
use std::time::Instant;

/// Progress notifications emitted while a video is processed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingEvent {
    /// One frame was classified; drives overlays such as the rep counter
    Frame {
        frame_index: u64,
        timestamp_ms: i64,
        phase: Phase,
        repetition_counted: bool,
        repetitions: u32,
    },
    /// Percentage of the video processed so far (0-100)
    Progress(f32),
}

/// Runs one sequential pass over a pose source
pub struct VideoProcessor {
    progress_interval_frames: u32,
}

impl VideoProcessor {
    /// Create a processor
    ///
    /// # Arguments
    /// * `progress_interval_frames` - Emit a progress event every N frames
    ///   (0 disables progress events)
    pub fn new(progress_interval_frames: u32) -> Self {
        Self {
            progress_interval_frames,
        }
    }

    /// Process a whole video.
    ///
    /// The session is reset first. A source error ends the run early and
    /// produces an unsuccessful result; frame-level data problems never do.
    pub fn process<S, F>(
        &self,
        session: &mut SessionAccumulator,
        source: &mut S,
        mut on_event: F,
    ) -> ProcessingResult
    where
        S: PoseSource + ?Sized,
        F: FnMut(ProcessingEvent),
    {
        let started = Instant::now();
        let info = source.video_info().clone();

        session.reset();
        tracing::info!(
            session = %session.session_id(),
            video = %info.identifier,
            fps = info.fps,
            total_frames = info.total_frames,
            "Starting video processing"
        );

        let mut frame_index: u64 = 0;
        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(
                        session = %session.session_id(),
                        frame = frame_index,
                        error = %e,
                        "Error during processing"
                    );
                    return ProcessingResult::failed(
                        info.identifier,
                        format!("Error during processing: {}", e),
                    );
                }
            };

            let FrameOutcome {
                repetition_counted,
                phase,
            } = session.process_frame(frame.landmarks.as_ref(), frame.timestamp_ms);

            on_event(ProcessingEvent::Frame {
                frame_index,
                timestamp_ms: frame.timestamp_ms,
                phase,
                repetition_counted,
                repetitions: session.count(),
            });

            frame_index += 1;
            if self.progress_interval_frames > 0
                && frame_index % self.progress_interval_frames as u64 == 0
            {
                on_event(ProcessingEvent::Progress(progress_percent(
                    frame_index,
                    info.total_frames,
                )));
            }
        }

        let snapshot = session.snapshot();
        let duration_seconds = info.duration_seconds();

        tracing::info!(
            session = %session.session_id(),
            repetitions = snapshot.count,
            frames = snapshot.frames_processed,
            duration = duration_seconds,
            "Processing completed"
        );

        ProcessingResult {
            success: true,
            input_id: info.identifier,
            output_id: None,
            repetitions: snapshot.count,
            duration_seconds,
            fps: info.fps,
            width: info.width,
            height: info.height,
            processing_time_seconds: started.elapsed().as_secs_f64(),
            history: snapshot.history,
            error_message: None,
            timestamp: Utc::now(),
        }
    }
}

impl Default for VideoProcessor {
    fn default() -> Self {
        Self::new(30)
    }
}

fn progress_percent(processed: u64, total: u64) -> f32 {
    if total == 0 {
        return 100.0;
    }
    ((processed as f64 / total as f64) * 100.0).min(100.0) as f32
}
