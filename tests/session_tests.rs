//! Recording session state machine tests
//!
//! These tests drive the dispatcher directly, verifying every transition,
//! the countdown/time-limit behavior and the chunk bookkeeping without
//! touching real capture devices.

use retake::capture::MediaChunk;
use retake::config::RecorderConfig;
use retake::session::{Session, SessionCommand, SessionEvent, SessionState, StopReason};
use std::time::Duration;

fn ready_session(time_limit_secs: u32) -> Session {
    let mut session = Session::new(RecorderConfig::with_time_limit(time_limit_secs));
    session.handle(SessionEvent::DevicesReady);
    session
}

/// Drive the start → countdown → recording sequence
fn start_recording(session: &mut Session) {
    session.handle(SessionEvent::StartPressed);
    session.handle(SessionEvent::LeadInElapsed);
    session.handle(SessionEvent::CaptureStarted);
    assert_eq!(session.state(), SessionState::Recording);
}

fn chunk(millis: u64) -> MediaChunk {
    MediaChunk::audio(Duration::from_millis(millis), &[0.1, 0.2, 0.3])
}

#[test]
fn test_initial_state_is_idle() {
    let session = Session::new(RecorderConfig::with_time_limit(30));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.remaining(), 30);
    assert!(!session.devices_available());
    assert_eq!(session.chunk_count(), 0);
    assert!(session.artifact().is_none());
}

#[test]
fn test_denied_devices_disable_start() {
    let mut session = Session::new(RecorderConfig::with_time_limit(30));
    let commands = session.handle(SessionEvent::DevicesDenied);

    assert!(!session.devices_available());
    assert!(!session.can_start());
    assert!(matches!(commands.as_slice(), [SessionCommand::Alert(_)]));

    // Start is ignored while devices are unavailable
    let commands = session.handle(SessionEvent::StartPressed);
    assert!(commands.is_empty());
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_start_sequence_commands() {
    let mut session = ready_session(30);

    let commands = session.handle(SessionEvent::StartPressed);
    assert_eq!(commands, vec![SessionCommand::BeginLeadIn]);
    assert_eq!(session.state(), SessionState::Countdown);

    let commands = session.handle(SessionEvent::LeadInElapsed);
    assert_eq!(
        commands,
        vec![SessionCommand::PublishChunks, SessionCommand::BeginCapture]
    );
    // No recording yet
    assert_eq!(session.state(), SessionState::Countdown);

    let commands = session.handle(SessionEvent::CaptureStarted);
    assert_eq!(commands, vec![SessionCommand::BeginTicking]);
    assert_eq!(session.state(), SessionState::Recording);
    assert!(session.take().is_some());
}

#[test]
fn test_capture_failure_never_enters_recording() {
    let mut session = ready_session(30);
    session.handle(SessionEvent::StartPressed);
    session.handle(SessionEvent::LeadInElapsed);

    let commands = session.handle(SessionEvent::CaptureFailed("stream gone".into()));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(matches!(commands.as_slice(), [SessionCommand::Alert(_)]));
    // Devices themselves were not reported lost
    assert!(session.devices_available());
}

#[test]
fn test_ticks_decrement_and_probe() {
    let mut session = ready_session(30);
    start_recording(&mut session);

    let commands = session.handle(SessionEvent::Tick);
    assert_eq!(session.remaining(), 29);
    assert_eq!(commands, vec![SessionCommand::ProbeDevices]);
}

#[test]
fn test_alert_color_boundary() {
    let mut session = ready_session(15);
    start_recording(&mut session);

    for _ in 0..4 {
        session.handle(SessionEvent::Tick);
    }
    assert_eq!(session.remaining(), 11);
    assert!(!session.timer_alert(), "11 seconds left is not yet alert");
    assert_eq!(session.timer_text(), "11");

    session.handle(SessionEvent::Tick);
    assert_eq!(session.remaining(), 10);
    assert!(session.timer_alert(), "10 seconds left is alert");
}

#[test]
fn test_time_expiry_arms_grace_stop_exactly_once() {
    let mut session = ready_session(3);
    start_recording(&mut session);

    session.handle(SessionEvent::Tick);
    session.handle(SessionEvent::Tick);
    let commands = session.handle(SessionEvent::Tick);
    assert_eq!(session.remaining(), 0);
    assert_eq!(session.timer_text(), "Time's Up");
    assert!(commands.contains(&SessionCommand::ArmGraceStop));

    // A straggler tick during the grace window must not re-arm the stop
    let commands = session.handle(SessionEvent::Tick);
    assert!(!commands.contains(&SessionCommand::ArmGraceStop));
    assert!(session.remaining() <= 0);
}

#[test]
fn test_stop_is_idempotent_under_manual_auto_race() {
    let mut session = ready_session(3);
    start_recording(&mut session);
    session.handle(SessionEvent::Chunk(chunk(10)));

    for _ in 0..3 {
        session.handle(SessionEvent::Tick);
    }

    // Manual stop lands first...
    let commands = session.handle(SessionEvent::StopRequested(StopReason::Manual));
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(
        commands,
        vec![SessionCommand::EndCapture, SessionCommand::PublishChunks]
    );

    // ...then the grace-delayed auto stop arrives and must do nothing
    let commands = session.handle(SessionEvent::StopRequested(StopReason::TimeExpired));
    assert!(commands.is_empty());
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.chunk_count(), 1);
}

#[test]
fn test_chunks_append_in_arrival_order() {
    let mut session = ready_session(30);
    start_recording(&mut session);

    for i in 0..5 {
        session.handle(SessionEvent::Chunk(chunk(i * 100)));
    }

    assert_eq!(session.chunk_count(), 5);
    let offsets: Vec<_> = session
        .chunks()
        .iter()
        .map(|c| c.offset.as_millis() as u64)
        .collect();
    assert_eq!(offsets, vec![0, 100, 200, 300, 400]);
}

#[test]
fn test_empty_chunks_are_dropped() {
    let mut session = ready_session(30);
    start_recording(&mut session);

    session.handle(SessionEvent::Chunk(MediaChunk::audio(Duration::ZERO, &[])));
    assert_eq!(session.chunk_count(), 0);
}

#[test]
fn test_chunks_ignored_outside_recording() {
    let mut session = ready_session(30);
    session.handle(SessionEvent::Chunk(chunk(0)));
    assert_eq!(session.chunk_count(), 0);

    // Late finalization chunks after the stop are still accepted
    start_recording(&mut session);
    session.handle(SessionEvent::StopRequested(StopReason::Manual));
    session.handle(SessionEvent::Chunk(chunk(50)));
    assert_eq!(session.chunk_count(), 1);
}

#[test]
fn test_new_take_clears_previous_chunks() {
    let mut session = ready_session(30);
    start_recording(&mut session);
    session.handle(SessionEvent::Chunk(chunk(0)));
    session.handle(SessionEvent::Chunk(chunk(100)));
    session.handle(SessionEvent::StopRequested(StopReason::Manual));
    assert_eq!(session.chunk_count(), 2);

    session.handle(SessionEvent::StartPressed);
    assert_eq!(session.state(), SessionState::Countdown);
    // The buffer is cleared before the new take's first chunk
    session.handle(SessionEvent::LeadInElapsed);
    assert_eq!(session.chunk_count(), 0);

    session.handle(SessionEvent::CaptureStarted);
    session.handle(SessionEvent::Chunk(chunk(0)));
    assert_eq!(session.chunk_count(), 1);
}

#[test]
fn test_replay_unreachable_with_zero_chunks() {
    let mut session = ready_session(30);
    start_recording(&mut session);
    session.handle(SessionEvent::StopRequested(StopReason::Manual));
    assert_eq!(session.chunk_count(), 0);
    assert!(!session.can_replay());

    session.handle(SessionEvent::ReplayPressed);
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(session.artifact().is_none());
}

#[test]
fn test_replay_builds_artifact() {
    let mut session = ready_session(30);
    start_recording(&mut session);
    session.handle(SessionEvent::Chunk(chunk(0)));
    session.handle(SessionEvent::StopRequested(StopReason::Manual));
    assert!(session.artifact().is_none(), "no artifact while Stopped");

    session.handle(SessionEvent::ReplayPressed);
    assert_eq!(session.state(), SessionState::Replaying);
    assert!(session.artifact().is_some());

    // Starting a new take discards the artifact
    session.handle(SessionEvent::StartPressed);
    assert_eq!(session.state(), SessionState::Countdown);
    assert!(session.artifact().is_none());
}

#[test]
fn test_next_publishes_and_advances_host() {
    let mut session = ready_session(30);
    start_recording(&mut session);
    session.handle(SessionEvent::Chunk(chunk(0)));
    session.handle(SessionEvent::StopRequested(StopReason::Manual));

    let commands = session.handle(SessionEvent::NextPressed);
    assert_eq!(
        commands,
        vec![SessionCommand::PublishChunks, SessionCommand::GoToSummary]
    );

    // Next with no recorded chunks is ignored
    let mut empty = ready_session(30);
    start_recording(&mut empty);
    empty.handle(SessionEvent::StopRequested(StopReason::Manual));
    assert!(empty.handle(SessionEvent::NextPressed).is_empty());
}

#[test]
fn test_device_loss_forces_stop() {
    let mut session = ready_session(30);
    start_recording(&mut session);
    session.handle(SessionEvent::Chunk(chunk(0)));

    let commands = session.handle(SessionEvent::DeviceLost);
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(!session.devices_available());
    assert!(commands.contains(&SessionCommand::EndCapture));
    assert!(commands.iter().any(|c| matches!(c, SessionCommand::Alert(_))));

    // Recording controls stay disabled until devices come back
    assert!(!session.can_start());
}

#[test]
fn test_full_run_scenario() {
    // L=15, the user starts and never interacts again
    let mut session = ready_session(15);
    start_recording(&mut session);

    let mut grace_stops = 0;
    for i in 0..15 {
        session.handle(SessionEvent::Chunk(chunk(i * 1000)));
        let commands = session.handle(SessionEvent::Tick);
        if commands.contains(&SessionCommand::ArmGraceStop) {
            grace_stops += 1;
        }
    }
    assert_eq!(grace_stops, 1, "auto-stop armed exactly once");
    assert!(session.remaining() <= 0);
    assert_eq!(session.timer_text(), "Time's Up");

    session.handle(SessionEvent::StopRequested(StopReason::TimeExpired));
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(session.chunk_count() > 0);

    let take = session.take().expect("take metadata recorded");
    assert_eq!(take.recorded, Some(Duration::from_secs(15)));
    assert!(take.bytes > 0);
}

#[test]
fn test_control_visibility_follows_state() {
    let mut session = ready_session(30);
    assert!(session.can_start());
    assert!(!session.can_stop());
    assert!(!session.can_replay());

    session.handle(SessionEvent::StartPressed);
    assert!(!session.can_start(), "no start during countdown");
    assert!(!session.can_stop(), "no stop during countdown");

    session.handle(SessionEvent::LeadInElapsed);
    session.handle(SessionEvent::CaptureStarted);
    assert!(!session.can_start());
    assert!(session.can_stop());

    session.handle(SessionEvent::Chunk(chunk(0)));
    session.handle(SessionEvent::StopRequested(StopReason::Manual));
    assert!(session.can_start());
    assert!(!session.can_stop());
    assert!(session.can_replay());

    session.handle(SessionEvent::ReplayPressed);
    assert!(session.can_start(), "a new take can start from replay");
    assert!(!session.can_replay(), "replay controls hidden while replaying");
}
