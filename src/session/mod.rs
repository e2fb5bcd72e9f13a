//! Recording session state machine
//!
//! All transitions flow through one dispatcher so the three event sources
//! (user actions, timer ticks, chunk arrivals) are serialized and can
//! never race each other.

pub mod playback;
pub mod state;
pub mod timer;

pub use playback::{PlaybackArtifact, ReplayFrame};
pub use state::{Session, SessionCommand, SessionEvent, SessionState, StopReason, TakeInfo};
pub use timer::TickDriver;
