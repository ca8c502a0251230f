use crate::models::exercise::{ExerciseError, ExerciseResult, ThresholdConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Phase classification thresholds
    pub thresholds: ThresholdConfig,
    /// Log level: "trace", "debug", "info", "warn" or "error"
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
    /// Report processing progress every N frames
    pub progress_interval_frames: u32,
    /// Largest accepted upload in MB
    pub max_video_size_mb: u32,
    /// Accepted video file extensions (e.g., ["mp4", "mov"])
    pub allowed_video_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            log_level: "info".to_string(),
            json_logs: false,
            progress_interval_frames: 30,
            max_video_size_mb: 50,
            allowed_video_types: vec!["mp4".to_string(), "mov".to_string(), "avi".to_string()],
        }
    }
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from `path`, creating it with defaults if it doesn't exist
    pub fn load_from(path: impl AsRef<Path>) -> ExerciseResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from the default location
    pub fn load() -> ExerciseResult<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: impl AsRef<Path>) -> ExerciseResult<()> {
        self.validate()?;
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ExerciseResult<()> {
        self.thresholds.validate()?;

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ExerciseError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if self.progress_interval_frames == 0 || self.progress_interval_frames > 10_000 {
            return Err(ExerciseError::InvalidConfig(format!(
                "Invalid progress interval: {}. Must be between 1 and 10000 frames",
                self.progress_interval_frames
            )));
        }

        if self.max_video_size_mb == 0 || self.max_video_size_mb > 4096 {
            return Err(ExerciseError::InvalidConfig(format!(
                "Invalid max video size: {} MB. Must be between 1 and 4096",
                self.max_video_size_mb
            )));
        }

        if self.allowed_video_types.is_empty() {
            return Err(ExerciseError::InvalidConfig(
                "Allowed video types cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Reset the file at `path` to the default configuration
    pub fn reset_at(path: impl AsRef<Path>) -> ExerciseResult<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    /// Override values from `PULLUP_*` environment variables
    pub fn apply_env_overrides(&mut self) -> ExerciseResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> ExerciseResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let float = |key: &str| -> ExerciseResult<Option<f32>> {
            match lookup(key) {
                Some(raw) => raw.trim().parse::<f32>().map(Some).map_err(|_| {
                    ExerciseError::InvalidConfig(format!("{} is not a number: {}", key, raw))
                }),
                None => Ok(None),
            }
        };

        if let Some(value) = float("PULLUP_UPPER_THRESHOLD")? {
            self.thresholds.upper_threshold = value;
        }
        if let Some(value) = float("PULLUP_LOWER_THRESHOLD")? {
            self.thresholds.lower_threshold = value;
        }
        if let Some(value) = float("PULLUP_MIN_CONFIDENCE")? {
            self.thresholds.min_confidence = value;
        }
        if let Some(level) = lookup("PULLUP_LOG_LEVEL") {
            self.log_level = level.trim().to_lowercase();
        }

        self.validate()
    }

    pub fn max_video_size_bytes(&self) -> u64 {
        self.max_video_size_mb as u64 * 1024 * 1024
    }

    /// Whether a file extension (with or without the dot) is accepted
    pub fn is_allowed_video_type(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.').to_lowercase();
        self.allowed_video_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    }

    /// Get the default configuration file path
    pub fn default_path() -> ExerciseResult<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| {
                ExerciseError::InvalidConfig("Could not determine home directory".to_string())
            })?;

        let mut path = PathBuf::from(home);
        path.push(".pullup_vision");
        path.push("settings.json");

        Ok(path)
    }
}
