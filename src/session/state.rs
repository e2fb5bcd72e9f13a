use crate::capture::MediaChunk;
use crate::config::RecorderConfig;
use crate::session::playback::PlaybackArtifact;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Session state for one recording widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing recorded yet, waiting for the user
    Idle,
    /// Lead-in countdown is running; no capture yet
    Countdown,
    /// Capture is active and the time limit is counting down
    Recording,
    /// A take has been finalized
    Stopped,
    /// Replaying the finalized take
    Replaying,
}

/// Why a stop was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The user pressed the stop control
    Manual,
    /// The time limit ran out
    TimeExpired,
}

/// Everything that can drive a transition. User actions, timer expiries
/// and chunk arrivals all funnel through here.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Device acquisition succeeded at mount
    DevicesReady,
    /// Device acquisition failed at mount
    DevicesDenied,
    /// A per-tick probe found a device gone mid-recording
    DeviceLost,
    StartPressed,
    LeadInElapsed,
    /// Capture actually started after the lead-in
    CaptureStarted,
    /// Capture could not be started
    CaptureFailed(String),
    /// One-per-second recording tick
    Tick,
    /// A chunk arrived from the capture subsystem
    Chunk(MediaChunk),
    StopRequested(StopReason),
    ReplayPressed,
    NextPressed,
}

/// Side effects the dispatcher asks its driver to perform
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Schedule the lead-in countdown
    BeginLeadIn,
    /// Start the recorder against the live devices
    BeginCapture,
    /// Schedule the 1 Hz recording ticks
    BeginTicking,
    /// Schedule the grace-delayed automatic stop
    ArmGraceStop,
    /// Stop the recorder and cancel all timers
    EndCapture,
    /// Re-validate device availability
    ProbeDevices,
    /// Replace the host's copy of the chunk sequence
    PublishChunks,
    /// Advance the host application to its summary step
    GoToSummary,
    /// Surface a blocking alert to the user
    Alert(String),
}

/// Metadata about the most recent take
#[derive(Debug, Clone)]
pub struct TakeInfo {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub recorded: Option<Duration>,
    pub bytes: usize,
}

impl TakeInfo {
    fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            recorded: None,
            bytes: 0,
        }
    }

    fn end(&mut self, recorded: Duration, bytes: usize) {
        self.recorded = Some(recorded);
        self.bytes = bytes;
    }
}

/// Bounded log of session transitions, shown in the debug panel
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    entries: VecDeque<String>,
}

impl SessionLog {
    const MAX_ENTRIES: usize = 100;

    pub fn add(&mut self, message: impl Into<String>) {
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries
            .push_back(format!("{} {}", Utc::now().format("%H:%M:%S"), message.into()));
    }

    pub fn entries(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The recording session state machine.
///
/// Pure with respect to the outside world: `handle` mutates the session
/// and returns the commands the driver must execute, so every transition
/// is serialized and testable without devices or a UI.
pub struct Session {
    config: RecorderConfig,
    state: SessionState,
    remaining: i64,
    chunks: Vec<MediaChunk>,
    devices_available: bool,
    artifact: Option<PlaybackArtifact>,
    auto_stop_armed: bool,
    take: Option<TakeInfo>,
    log: SessionLog,
}

impl Session {
    pub fn new(config: RecorderConfig) -> Self {
        let remaining = i64::from(config.time_limit_secs);
        Self {
            config,
            state: SessionState::Idle,
            remaining,
            chunks: Vec::new(),
            devices_available: false,
            artifact: None,
            auto_stop_armed: false,
            take: None,
            log: SessionLog::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn chunks(&self) -> &[MediaChunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn devices_available(&self) -> bool {
        self.devices_available
    }

    pub fn artifact(&self) -> Option<&PlaybackArtifact> {
        self.artifact.as_ref()
    }

    pub fn take(&self) -> Option<&TakeInfo> {
        self.take.as_ref()
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Timer label text: the remaining seconds, or "Time's Up" at zero
    pub fn timer_text(&self) -> String {
        if self.remaining > 0 {
            self.remaining.to_string()
        } else {
            "Time's Up".to_string()
        }
    }

    /// Whether the timer label uses the alert color
    pub fn timer_alert(&self) -> bool {
        self.remaining < self.config.alert_below_secs
    }

    /// Whether the start control is shown
    pub fn can_start(&self) -> bool {
        self.devices_available
            && matches!(
                self.state,
                SessionState::Idle | SessionState::Stopped | SessionState::Replaying
            )
    }

    /// Whether the stop control is shown
    pub fn can_stop(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Whether the replay and next controls are shown
    pub fn can_replay(&self) -> bool {
        self.state == SessionState::Stopped && !self.chunks.is_empty()
    }

    /// Apply one event and return the commands to execute.
    ///
    /// Events that do not apply in the current state are ignored, which
    /// is what makes the stop path idempotent.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionCommand> {
        match event {
            SessionEvent::DevicesReady => {
                self.devices_available = true;
                self.log.add("Camera and microphone ready");
                Vec::new()
            }

            SessionEvent::DevicesDenied => {
                self.devices_available = false;
                self.log.add("Camera or microphone unavailable");
                vec![SessionCommand::Alert(
                    crate::RetakeError::DeviceUnavailable(String::new()).user_message(),
                )]
            }

            SessionEvent::StartPressed => {
                if !self.can_start() {
                    return Vec::new();
                }
                self.state = SessionState::Countdown;
                self.remaining = i64::from(self.config.time_limit_secs);
                self.auto_stop_armed = false;
                // Release the previous take's artifact before the new one
                self.artifact = None;
                info!("Lead-in countdown started");
                self.log.add("Lead-in countdown started");
                vec![SessionCommand::BeginLeadIn]
            }

            SessionEvent::LeadInElapsed => {
                if self.state != SessionState::Countdown {
                    return Vec::new();
                }
                self.chunks.clear();
                self.log.add("Chunk buffer cleared, starting capture");
                vec![SessionCommand::PublishChunks, SessionCommand::BeginCapture]
            }

            SessionEvent::CaptureStarted => {
                if self.state != SessionState::Countdown {
                    return Vec::new();
                }
                self.state = SessionState::Recording;
                self.take = Some(TakeInfo::begin());
                info!("Recording started");
                self.log.add("Recording started");
                vec![SessionCommand::BeginTicking]
            }

            SessionEvent::CaptureFailed(reason) => {
                if self.state != SessionState::Countdown {
                    return Vec::new();
                }
                self.state = SessionState::Idle;
                warn!("Capture failed to start: {}", reason);
                self.log.add(format!("Capture failed: {}", reason));
                vec![SessionCommand::Alert(
                    crate::RetakeError::CaptureStart(reason).user_message(),
                )]
            }

            SessionEvent::Tick => {
                if self.state != SessionState::Recording {
                    return Vec::new();
                }
                self.remaining -= 1;
                let mut commands = vec![SessionCommand::ProbeDevices];
                if self.remaining <= 0 && !self.auto_stop_armed {
                    self.auto_stop_armed = true;
                    self.log.add("Time limit reached");
                    commands.push(SessionCommand::ArmGraceStop);
                }
                commands
            }

            SessionEvent::Chunk(chunk) => {
                // Finalization chunks may still drain after the stop, so
                // Stopped accepts them too
                if chunk.is_empty()
                    || !matches!(self.state, SessionState::Recording | SessionState::Stopped)
                {
                    return Vec::new();
                }
                self.chunks.push(chunk);
                Vec::new()
            }

            SessionEvent::StopRequested(reason) => {
                if self.state != SessionState::Recording {
                    // Second stop of a manual/auto race lands here
                    return Vec::new();
                }
                self.finalize_take();
                info!("Recording stopped ({:?})", reason);
                self.log.add(format!("Recording stopped ({:?})", reason));
                vec![SessionCommand::EndCapture, SessionCommand::PublishChunks]
            }

            SessionEvent::DeviceLost => {
                if self.state != SessionState::Recording {
                    self.devices_available = false;
                    return Vec::new();
                }
                self.finalize_take();
                self.devices_available = false;
                warn!("Device lost mid-recording, forcing stop");
                self.log.add("Device lost mid-recording");
                vec![
                    SessionCommand::EndCapture,
                    SessionCommand::PublishChunks,
                    SessionCommand::Alert(
                        crate::RetakeError::DeviceLost(String::new()).user_message(),
                    ),
                ]
            }

            SessionEvent::ReplayPressed => {
                if self.state != SessionState::Stopped {
                    return Vec::new();
                }
                // Unreachable with zero chunks
                match PlaybackArtifact::assemble(&self.chunks) {
                    Some(artifact) => {
                        self.log.add(format!("Replaying take {}", artifact.id()));
                        self.artifact = Some(artifact);
                        self.state = SessionState::Replaying;
                    }
                    None => warn!("Replay requested with no recorded chunks"),
                }
                Vec::new()
            }

            SessionEvent::NextPressed => {
                if !self.can_replay() {
                    return Vec::new();
                }
                self.log.add("Proceeding to summary");
                vec![SessionCommand::PublishChunks, SessionCommand::GoToSummary]
            }
        }
    }

    fn finalize_take(&mut self) {
        self.state = SessionState::Stopped;
        let elapsed = i64::from(self.config.time_limit_secs) - self.remaining.max(0);
        let bytes = self.chunks.iter().map(|c| c.len()).sum();
        if let Some(take) = self.take.as_mut() {
            take.end(Duration::from_secs(elapsed.max(0) as u64), bytes);
        }
    }
}
