use crate::capture::{ChunkSink, MediaChunk};
use crate::{RetakeError, Result};
use crossbeam_channel::bounded;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// One decoded camera frame, published for the live preview
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    /// RGB24 pixel data
    pub rgb: Vec<u8>,
}

/// Camera capture built on nokhwa.
///
/// A dedicated worker thread owns the camera for the whole component
/// lifetime. It continuously publishes the latest frame for the preview
/// pane, and while a recording is armed it also emits each frame as a
/// video chunk.
pub struct CameraFeed {
    latest: Arc<Mutex<Option<PreviewFrame>>>,
    sink: Arc<Mutex<Option<ChunkSink>>>,
    healthy: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl CameraFeed {
    /// Open the default camera and start the frame pump.
    ///
    /// Blocks until the worker has either opened the stream or failed, so
    /// permission problems surface here rather than on the first frame.
    pub fn open(fps: u32) -> Result<Self> {
        let latest: Arc<Mutex<Option<PreviewFrame>>> = Arc::new(Mutex::new(None));
        let sink: Arc<Mutex<Option<ChunkSink>>> = Arc::new(Mutex::new(None));
        let healthy = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(AtomicBool::new(false));

        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let frame_interval = Duration::from_millis(1000 / fps.max(1) as u64);
        let worker_latest = Arc::clone(&latest);
        let worker_sink = Arc::clone(&sink);
        let worker_healthy = Arc::clone(&healthy);
        let worker_shutdown = Arc::clone(&shutdown);

        let worker = std::thread::Builder::new()
            .name("camera-pump".to_string())
            .spawn(move || {
                // The camera must be created on the thread that drives it
                let requested =
                    RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
                let mut camera = match Camera::new(CameraIndex::Index(0), requested) {
                    Ok(camera) => camera,
                    Err(e) => {
                        let _ = ready_tx.send(Err(RetakeError::DeviceUnavailable(format!(
                            "Failed to open camera: {}",
                            e
                        ))));
                        return;
                    }
                };

                if let Err(e) = camera.open_stream() {
                    let _ = ready_tx.send(Err(RetakeError::DeviceUnavailable(format!(
                        "Failed to start camera stream: {}",
                        e
                    ))));
                    return;
                }

                info!("Camera stream opened: {}", camera.info().human_name());
                let _ = ready_tx.send(Ok(()));

                let mut consecutive_failures = 0u32;
                while !worker_shutdown.load(Ordering::Relaxed) {
                    match camera.frame().and_then(|buf| buf.decode_image::<RgbFormat>()) {
                        Ok(image) => {
                            consecutive_failures = 0;
                            worker_healthy.store(true, Ordering::Relaxed);

                            let (width, height) = (image.width(), image.height());
                            let rgb = image.into_raw();

                            if let Some(sink) = worker_sink.lock().as_ref() {
                                sink.deliver(MediaChunk::video(
                                    sink.epoch.elapsed(),
                                    width,
                                    height,
                                    rgb.clone(),
                                ));
                            }

                            *worker_latest.lock() = Some(PreviewFrame { width, height, rgb });
                        }
                        Err(e) => {
                            consecutive_failures += 1;
                            debug!("Camera frame failed: {}", e);
                            // A few dropped frames are normal; a run of them
                            // means the device is gone
                            if consecutive_failures >= 5 {
                                error!("Camera became unavailable: {}", e);
                                worker_healthy.store(false, Ordering::Relaxed);
                            }
                        }
                    }

                    std::thread::sleep(frame_interval);
                }

                if let Err(e) = camera.stop_stream() {
                    warn!("Failed to stop camera stream: {}", e);
                }
                info!("Camera stream closed");
            })
            .map_err(|e| RetakeError::DeviceUnavailable(format!("Failed to spawn camera worker: {}", e)))?;

        ready_rx
            .recv()
            .map_err(|e| RetakeError::ChannelError(e.to_string()))??;

        Ok(Self {
            latest,
            sink,
            healthy,
            shutdown,
            worker: Some(worker),
        })
    }

    /// Latest decoded frame, for the live preview
    pub fn latest_frame(&self) -> Option<PreviewFrame> {
        self.latest.lock().clone()
    }

    /// Start routing captured frames into the given sink
    pub fn arm(&self, sink: ChunkSink) {
        *self.sink.lock() = Some(sink);
    }

    /// Stop routing frames. Safe to call when not armed.
    pub fn disarm(&self) {
        *self.sink.lock() = None;
    }

    pub fn is_armed(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Re-validate that the camera is still delivering frames
    pub fn probe(&self) -> Result<()> {
        if !self.healthy.load(Ordering::Relaxed) {
            return Err(RetakeError::DeviceLost("camera stopped delivering frames".into()));
        }
        Ok(())
    }

    /// Stop the worker and release the camera
    pub fn close(&mut self) {
        self.disarm();
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Camera worker panicked during shutdown");
            }
        }
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_open_release() {
        // This test might fail in CI environments without a camera
        if let Ok(mut camera) = CameraFeed::open(15) {
            assert!(!camera.is_armed());
            assert!(camera.probe().is_ok());
            camera.close();
        }
    }
}
