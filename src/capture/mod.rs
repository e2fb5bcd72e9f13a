//! Camera and microphone capture
//!
//! Owns the platform capture devices (cpal microphone, nokhwa camera) and
//! delivers recorded media as ordered chunks over a bounded channel.

pub mod camera;
pub mod devices;
pub mod meter;
pub mod microphone;
pub mod recorder;

pub use camera::{CameraFeed, PreviewFrame};
pub use devices::CaptureDevices;
pub use meter::LevelMeter;
pub use microphone::Microphone;
pub use recorder::TakeRecorder;

use crossbeam_channel::Sender;
use std::time::{Duration, Instant};

/// Which capture track a chunk belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Microphone samples (mono f32, little-endian bytes)
    Audio,
    /// One camera frame (RGB24 bytes)
    Video { width: u32, height: u32 },
}

/// One discrete unit of captured media, delivered in arrival order
/// while a recording is active.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaChunk {
    pub track: Track,
    /// Offset from the start of the recording
    pub offset: Duration,
    pub data: Vec<u8>,
}

impl MediaChunk {
    pub fn audio(offset: Duration, samples: &[f32]) -> Self {
        let mut data = Vec::with_capacity(samples.len() * 4);
        for sample in samples {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        Self {
            track: Track::Audio,
            offset,
            data,
        }
    }

    pub fn video(offset: Duration, width: u32, height: u32, rgb: Vec<u8>) -> Self {
        Self {
            track: Track::Video { width, height },
            offset,
            data: rgb,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_video(&self) -> bool {
        matches!(self.track, Track::Video { .. })
    }
}

/// Destination for recorded chunks, shared with the capture workers
/// while a recording is armed.
#[derive(Clone)]
pub struct ChunkSink {
    pub tx: Sender<MediaChunk>,
    /// Instant the recording started; chunk offsets are relative to it
    pub epoch: Instant,
}

impl ChunkSink {
    pub fn new(tx: Sender<MediaChunk>, epoch: Instant) -> Self {
        Self { tx, epoch }
    }

    /// Send a chunk, dropping it (with a debug log) if the channel is full.
    /// Empty chunks are never delivered.
    pub fn deliver(&self, chunk: MediaChunk) {
        if chunk.is_empty() {
            return;
        }
        if let Err(e) = self.tx.try_send(chunk) {
            tracing::debug!("Dropping chunk, channel unavailable: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_audio_chunk_packs_samples() {
        let chunk = MediaChunk::audio(Duration::from_millis(40), &[0.0, 0.5, -0.5]);
        assert_eq!(chunk.track, Track::Audio);
        assert_eq!(chunk.len(), 12);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_empty_chunk_not_delivered() {
        let (tx, rx) = bounded(4);
        let sink = ChunkSink::new(tx, Instant::now());
        sink.deliver(MediaChunk::audio(Duration::ZERO, &[]));
        assert!(rx.try_recv().is_err());

        sink.deliver(MediaChunk::audio(Duration::ZERO, &[0.1]));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_chunks_arrive_in_order() {
        let (tx, rx) = bounded(16);
        let sink = ChunkSink::new(tx, Instant::now());
        for i in 0..8 {
            sink.deliver(MediaChunk::audio(Duration::from_millis(i), &[i as f32]));
        }
        let offsets: Vec<_> = rx.try_iter().map(|c| c.offset.as_millis()).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }
}
