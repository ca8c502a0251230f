pub mod config;
pub mod logging;

// Pull-up detection
pub mod geometry;
pub mod phase_classifier;
pub mod rep_counter;
pub mod session;

// Per-video driver
pub mod video_processor;
