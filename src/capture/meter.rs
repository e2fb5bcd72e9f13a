use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;

/// Thread-safe ring buffer feeding the live microphone level meter.
///
/// The capture callback writes samples, the UI drains them once per frame
/// and computes an RMS level.
pub struct LevelMeter {
    buffer: Arc<Mutex<HeapRb<f32>>>,
}

impl LevelMeter {
    /// Create a new meter with the specified sample capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(HeapRb::new(capacity))),
        }
    }

    /// Write samples to the buffer, dropping the oldest when full
    pub fn write(&self, samples: &[f32]) {
        let mut buffer = self.buffer.lock();
        for &sample in samples {
            if buffer.try_push(sample).is_err() {
                let _ = buffer.try_pop();
                let _ = buffer.try_push(sample);
            }
        }
    }

    /// Drain up to `count` samples from the buffer
    pub fn drain(&self, count: usize) -> Vec<f32> {
        let mut buffer = self.buffer.lock();
        let mut samples = Vec::with_capacity(count.min(buffer.occupied_len()));
        for _ in 0..count {
            match buffer.try_pop() {
                Some(sample) => samples.push(sample),
                None => break,
            }
        }
        samples
    }

    /// RMS level of a drained batch, in [0, 1] for normalized input
    pub fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = samples.iter().map(|s| s * s).sum();
        (sum / samples.len() as f32).sqrt()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.buffer.lock().capacity().get()
    }
}

impl Clone for LevelMeter {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_drain() {
        let meter = LevelMeter::new(1024);
        let data: Vec<f32> = (0..100).map(|i| i as f32).collect();

        meter.write(&data);
        assert_eq!(meter.len(), 100);

        let drained = meter.drain(100);
        assert_eq!(drained, data);
        assert!(meter.is_empty());
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let meter = LevelMeter::new(10);
        let data: Vec<f32> = (0..20).map(|i| i as f32).collect();

        meter.write(&data);
        let drained = meter.drain(20);
        assert_eq!(drained.len(), 10);
        assert_eq!(drained[9], 19.0);
    }

    #[test]
    fn test_rms() {
        assert_eq!(LevelMeter::rms(&[]), 0.0);
        assert!((LevelMeter::rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
    }
}
