pub mod capture;
pub mod config;
pub mod host;
pub mod session;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RetakeError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture device lost while recording: {0}")]
    DeviceLost(String),

    #[error("Failed to start capture: {0}")]
    CaptureStart(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RetakeError {
    /// Check if this error is recoverable without restarting the application
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Device errors require the user to fix access and reload
            RetakeError::DeviceUnavailable(_) => false,
            RetakeError::DeviceLost(_) => false,
            RetakeError::CaptureStart(_) => true,
            RetakeError::ChannelError(_) => false,
            RetakeError::ConfigError(_) => false,
        }
    }

    /// Get the user-facing alert text
    pub fn user_message(&self) -> String {
        match self {
            RetakeError::DeviceUnavailable(_) => {
                "Your webcam and microphone must be accessible to continue.\n\
                 Reload the application once they are both accessible and ensure \
                 they remain accessible while recording."
                    .to_string()
            }
            RetakeError::DeviceLost(_) => {
                "Recording failed.\n\
                 Please ensure both the microphone and camera are working and \
                 reload the application."
                    .to_string()
            }
            RetakeError::CaptureStart(_) => {
                "Failed to start recording.\n\
                 Could not access either the microphone, webcam or both.\n\
                 Please ensure both are working and accessible, then reload the application."
                    .to_string()
            }
            RetakeError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            RetakeError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RetakeError>;
