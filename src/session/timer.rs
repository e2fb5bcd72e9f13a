use crate::session::state::{SessionEvent, StopReason};
use std::time::{Duration, Instant};

/// Wall-clock driver for the session.
///
/// Turns `Instant` comparisons into discrete events: the lead-in expiry,
/// strictly sequential 1 Hz recording ticks, and the grace deadline that
/// follows the timer reaching zero. Polled once per UI frame; missed ticks
/// are caught up in order.
#[derive(Debug, Default)]
pub struct TickDriver {
    lead_in_deadline: Option<Instant>,
    next_tick: Option<Instant>,
    grace_deadline: Option<Instant>,
}

impl TickDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the fixed lead-in countdown; cancels any previous schedule
    pub fn begin_lead_in(&mut self, now: Instant, secs: u32) {
        self.lead_in_deadline = Some(now + Duration::from_secs(u64::from(secs)));
        self.next_tick = None;
        self.grace_deadline = None;
    }

    /// Whole seconds left of the lead-in, rounded up; None when inactive
    pub fn lead_in_remaining(&self, now: Instant) -> Option<u64> {
        let deadline = self.lead_in_deadline?;
        if now >= deadline {
            return Some(0);
        }
        let left = deadline - now;
        Some((left.as_millis() as u64).div_ceil(1000))
    }

    /// Start the once-per-second recording ticks
    pub fn begin_ticking(&mut self, now: Instant) {
        self.next_tick = Some(now + Duration::from_secs(1));
    }

    /// Arm the short delay between the timer hitting zero and the stop call
    pub fn arm_grace_stop(&mut self, now: Instant, grace_ms: u64) {
        self.grace_deadline = Some(now + Duration::from_millis(grace_ms));
    }

    /// Cancel everything; called when capture ends or the widget unmounts
    pub fn clear(&mut self) {
        self.lead_in_deadline = None;
        self.next_tick = None;
        self.grace_deadline = None;
    }

    pub fn is_idle(&self) -> bool {
        self.lead_in_deadline.is_none() && self.next_tick.is_none() && self.grace_deadline.is_none()
    }

    /// Collect every event due at `now`, in order
    pub fn poll(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if let Some(deadline) = self.lead_in_deadline {
            if now >= deadline {
                self.lead_in_deadline = None;
                events.push(SessionEvent::LeadInElapsed);
            }
        }

        while let Some(tick) = self.next_tick {
            if now < tick {
                break;
            }
            self.next_tick = Some(tick + Duration::from_secs(1));
            events.push(SessionEvent::Tick);
        }

        if let Some(deadline) = self.grace_deadline {
            if now >= deadline {
                self.grace_deadline = None;
                events.push(SessionEvent::StopRequested(StopReason::TimeExpired));
            }
        }

        events
    }
}
