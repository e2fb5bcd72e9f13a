use crate::capture::{CameraFeed, ChunkSink, LevelMeter, Microphone, PreviewFrame};
use crate::config::RecorderConfig;
use crate::Result;
use tracing::info;

/// The camera and microphone pair owned exclusively by the widget.
///
/// Acquired once at startup, probed while recording, and released
/// unconditionally on every exit path.
pub struct CaptureDevices {
    microphone: Microphone,
    camera: CameraFeed,
    released: bool,
}

impl CaptureDevices {
    /// Request access to the default camera and microphone.
    ///
    /// Fails if either device is missing, busy, or denied; nothing is
    /// left half-open because the partially acquired device drops here.
    pub fn acquire(config: &RecorderConfig) -> Result<Self> {
        let mut microphone = Microphone::new()?;
        microphone.open()?;
        let camera = CameraFeed::open(config.camera_fps)?;

        info!("Camera and microphone acquired");
        Ok(Self {
            microphone,
            camera,
            released: false,
        })
    }

    /// Re-validate both devices; an error means a device was lost
    pub fn probe(&self) -> Result<()> {
        self.microphone.probe()?;
        self.camera.probe()?;
        Ok(())
    }

    /// Latest camera frame for the live preview
    pub fn latest_frame(&self) -> Option<PreviewFrame> {
        self.camera.latest_frame()
    }

    /// Level meter fed by the microphone stream
    pub fn meter(&self) -> LevelMeter {
        self.microphone.meter()
    }

    /// Route captured media from both devices into the sink
    pub fn arm(&self, sink: ChunkSink) {
        self.microphone.arm(sink.clone());
        self.camera.arm(sink);
    }

    /// Stop routing captured media. Safe to call when not armed.
    pub fn disarm(&self) {
        self.microphone.disarm();
        self.camera.disarm();
    }

    pub fn is_armed(&self) -> bool {
        self.microphone.is_armed() || self.camera.is_armed()
    }

    /// Stop all tracks and release both devices
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.disarm();
        self.microphone.close();
        self.camera.close();
        self.released = true;
        info!("Camera and microphone released");
    }
}

impl Drop for CaptureDevices {
    fn drop(&mut self) {
        self.release();
    }
}
