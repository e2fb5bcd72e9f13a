//! Recorder configuration
//!
//! Centralized configuration for the recording widget.

use serde::{Deserialize, Serialize};

/// Configuration for a recording session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Maximum recording length in seconds
    pub time_limit_secs: u32,

    /// Lead-in countdown shown before capture actually starts
    pub lead_in_secs: u32,

    /// The timer label switches to the alert color when the remaining
    /// time drops below this many seconds
    pub alert_below_secs: i64,

    /// Delay between the timer reaching zero and the actual stop call
    pub grace_stop_ms: u64,

    /// Target camera frame rate for recorded video chunks
    pub camera_fps: u32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 60,
            lead_in_secs: 3,
            alert_below_secs: 11,
            grace_stop_ms: 100,
            camera_fps: 15,
        }
    }
}

impl RecorderConfig {
    /// Create a configuration with the given time limit
    pub fn with_time_limit(time_limit_secs: u32) -> Self {
        Self {
            time_limit_secs,
            ..Self::default()
        }
    }

    /// Set the lead-in countdown length
    pub fn with_lead_in(mut self, lead_in_secs: u32) -> Self {
        self.lead_in_secs = lead_in_secs;
        self
    }

    /// Set the alert threshold for the timer label
    pub fn with_alert_below(mut self, alert_below_secs: i64) -> Self {
        self.alert_below_secs = alert_below_secs;
        self
    }

    /// Build a configuration from the environment.
    ///
    /// `RETAKE_TIME_LIMIT` overrides the default time limit.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("RETAKE_TIME_LIMIT") {
            if let Ok(limit) = value.parse::<u32>() {
                config.time_limit_secs = limit;
            }
        }
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_secs == 0 {
            return Err("time limit must be a positive number of seconds".to_string());
        }
        if self.camera_fps == 0 {
            return Err("camera frame rate must be positive".to_string());
        }
        Ok(())
    }
}
