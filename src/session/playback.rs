use crate::capture::{MediaChunk, Track};
use std::time::Duration;
use uuid::Uuid;

/// One replayable video frame
#[derive(Debug, Clone)]
pub struct ReplayFrame {
    pub offset: Duration,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Disposable in-memory object assembled from the recorded chunks for
/// replay. Built on demand when the user requests a replay and dropped
/// when a new take starts; never persisted.
#[derive(Debug, Clone)]
pub struct PlaybackArtifact {
    id: Uuid,
    frames: Vec<ReplayFrame>,
    audio_bytes: usize,
    total_bytes: usize,
    duration: Duration,
}

impl PlaybackArtifact {
    /// Assemble an artifact from the chunk sequence.
    ///
    /// Returns None for an empty sequence; replay is unreachable without
    /// at least one recorded chunk.
    pub fn assemble(chunks: &[MediaChunk]) -> Option<Self> {
        if chunks.is_empty() {
            return None;
        }

        let mut frames = Vec::new();
        let mut audio_bytes = 0;
        let mut total_bytes = 0;
        let mut duration = Duration::ZERO;

        for chunk in chunks {
            total_bytes += chunk.len();
            duration = duration.max(chunk.offset);
            match chunk.track {
                Track::Audio => audio_bytes += chunk.len(),
                Track::Video { width, height } => frames.push(ReplayFrame {
                    offset: chunk.offset,
                    width,
                    height,
                    rgb: chunk.data.clone(),
                }),
            }
        }

        Some(Self {
            id: Uuid::new_v4(),
            frames,
            audio_bytes,
            total_bytes,
            duration,
        })
    }

    /// Addressable identity of this artifact
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn audio_bytes(&self) -> usize {
        self.audio_bytes
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// The frame visible at `position`: the last frame captured at or
    /// before it, or the first frame while playback is still ahead of it.
    pub fn frame_at(&self, position: Duration) -> Option<&ReplayFrame> {
        if self.frames.is_empty() {
            return None;
        }
        let idx = self.frames.partition_point(|f| f.offset <= position);
        if idx == 0 {
            self.frames.first()
        } else {
            self.frames.get(idx - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(ms: u64) -> MediaChunk {
        MediaChunk::video(Duration::from_millis(ms), 2, 2, vec![0u8; 12])
    }

    #[test]
    fn test_empty_chunks_give_no_artifact() {
        assert!(PlaybackArtifact::assemble(&[]).is_none());
    }

    #[test]
    fn test_assemble_counts_tracks() {
        let chunks = vec![
            MediaChunk::audio(Duration::from_millis(10), &[0.1, 0.2]),
            video(33),
            video(66),
        ];
        let artifact = PlaybackArtifact::assemble(&chunks).unwrap();
        assert_eq!(artifact.frame_count(), 2);
        assert_eq!(artifact.audio_bytes(), 8);
        assert_eq!(artifact.total_bytes(), 8 + 24);
        assert_eq!(artifact.duration(), Duration::from_millis(66));
    }

    #[test]
    fn test_frame_lookup() {
        let chunks = vec![video(0), video(100), video(200)];
        let artifact = PlaybackArtifact::assemble(&chunks).unwrap();

        assert_eq!(
            artifact.frame_at(Duration::from_millis(150)).unwrap().offset,
            Duration::from_millis(100)
        );
        assert_eq!(
            artifact.frame_at(Duration::from_millis(500)).unwrap().offset,
            Duration::from_millis(200)
        );
        assert_eq!(
            artifact.frame_at(Duration::ZERO).unwrap().offset,
            Duration::ZERO
        );
    }

    #[test]
    fn test_audio_only_artifact_has_no_frames() {
        let chunks = vec![MediaChunk::audio(Duration::from_millis(5), &[0.5])];
        let artifact = PlaybackArtifact::assemble(&chunks).unwrap();
        assert_eq!(artifact.frame_count(), 0);
        assert!(artifact.frame_at(Duration::ZERO).is_none());
    }
}
