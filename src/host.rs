//! Host application contract
//!
//! The widget communicates upward only through these events: replacing
//! the host's copy of the recorded chunk sequence, and advancing the
//! host to its summary step.

use crate::capture::MediaChunk;
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::debug;

/// Events delivered to the embedding application
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Replace the accumulated chunk sequence
    ChunksReplaced(Vec<MediaChunk>),
    /// The user confirmed the take; advance to the summary step
    GoToSummary,
}

/// The widget's half of the host channel
#[derive(Clone)]
pub struct HostLink {
    tx: Sender<HostEvent>,
}

impl HostLink {
    pub fn new(tx: Sender<HostEvent>) -> Self {
        Self { tx }
    }

    /// Create a link plus the receiver the host listens on
    pub fn channel(capacity: usize) -> (Self, Receiver<HostEvent>) {
        let (tx, rx) = bounded(capacity);
        (Self::new(tx), rx)
    }

    /// Hand the host a fresh snapshot of the chunk sequence
    pub fn replace_chunks(&self, chunks: &[MediaChunk]) {
        if let Err(e) = self.tx.try_send(HostEvent::ChunksReplaced(chunks.to_vec())) {
            debug!("Host not consuming chunk updates: {}", e);
        }
    }

    /// Advance the host to its summary step
    pub fn go_to_summary(&self) {
        if let Err(e) = self.tx.try_send(HostEvent::GoToSummary) {
            debug!("Host not consuming summary event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MediaChunk;
    use std::time::Duration;

    #[test]
    fn test_chunk_snapshot_delivered() {
        let (link, rx) = HostLink::channel(4);
        let chunks = vec![MediaChunk::audio(Duration::ZERO, &[0.1, 0.2])];

        link.replace_chunks(&chunks);
        assert_eq!(rx.try_recv(), Ok(HostEvent::ChunksReplaced(chunks)));

        link.go_to_summary();
        assert_eq!(rx.try_recv(), Ok(HostEvent::GoToSummary));
    }

    #[test]
    fn test_full_channel_does_not_block() {
        let (link, _rx) = HostLink::channel(1);
        link.go_to_summary();
        // Second send is dropped, not blocked on
        link.go_to_summary();
    }
}
