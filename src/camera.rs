//! Camera backend: frame acquisition, JPEG encoding, preview downscaling
//!
//! The capture screen owns exactly one camera for its lifetime. The nokhwa
//! device sits behind the `FrameSource` trait so the release accounting can
//! be tested with a counting double.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use thiserror::Error;

pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera access denied. Re-enable camera permissions and restart.")]
    PermissionDenied,

    #[error("No camera found. Ensure your device has a camera connected.")]
    NotFound,

    #[error("Failed to access camera: {0}")]
    Unavailable(String),
}

/// A single RGB8 frame
#[derive(Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Downscaled luminance snapshot the capture view renders as text
#[derive(Clone, Default)]
pub struct PreviewFrame {
    pub cols: usize,
    pub rows: usize,
    pub luma: Vec<u8>,
}

impl Frame {
    /// Encode as a compressed JPEG wrapped in a base64 data URL, the format
    /// the detection endpoint expects
    pub fn to_jpeg_data_url(&self, quality: u8) -> Result<String, CameraError> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality)
            .encode(
                &self.rgb,
                self.width,
                self.height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| CameraError::Unavailable(format!("JPEG encoding failed: {e}")))?;

        Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg)))
    }

    /// Nearest-neighbour downscale to a terminal-sized luminance grid
    pub fn to_preview(&self, cols: usize, rows: usize) -> PreviewFrame {
        if self.width == 0 || self.height == 0 || cols == 0 || rows == 0 {
            return PreviewFrame::default();
        }

        let mut luma = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            let y = (row as u32 * self.height) / rows as u32;
            for col in 0..cols {
                let x = (col as u32 * self.width) / cols as u32;
                let idx = ((y * self.width + x) * 3) as usize;
                let (r, g, b) = match self.rgb.get(idx..idx + 3) {
                    Some(px) => (px[0] as u32, px[1] as u32, px[2] as u32),
                    None => (0, 0, 0),
                };
                // integer Rec.601 luma
                luma.push(((r * 299 + g * 587 + b * 114) / 1000) as u8);
            }
        }

        PreviewFrame { cols, rows, luma }
    }
}

/// Seam between the capture session and the physical device
pub trait FrameSource: Send {
    fn grab(&mut self) -> Result<Frame, CameraError>;
    fn stop(&mut self);
}

struct NokhwaSource {
    camera: nokhwa::Camera,
}

impl NokhwaSource {
    fn open(index: u32) -> Result<Self, CameraError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(CAPTURE_WIDTH, CAPTURE_HEIGHT),
                FrameFormat::MJPEG,
                30,
            ),
        ));

        let mut camera = nokhwa::Camera::new(CameraIndex::Index(index), requested)
            .map_err(classify_nokhwa_error)?;
        camera.open_stream().map_err(classify_nokhwa_error)?;

        tracing::info!(
            index,
            format = %camera.camera_format(),
            "camera stream opened"
        );
        Ok(Self { camera })
    }
}

impl FrameSource for NokhwaSource {
    fn grab(&mut self) -> Result<Frame, CameraError> {
        let buffer = self.camera.frame().map_err(classify_nokhwa_error)?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(classify_nokhwa_error)?;

        Ok(Frame {
            width: decoded.width(),
            height: decoded.height(),
            rgb: decoded.into_raw(),
        })
    }

    fn stop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!(error = %e, "camera stream did not stop cleanly");
        }
    }
}

fn classify_nokhwa_error(error: nokhwa::NokhwaError) -> CameraError {
    classify_camera_failure(&error.to_string())
}

/// Sort a device-layer failure into the three user-facing buckets
pub fn classify_camera_failure(message: &str) -> CameraError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("access") {
        CameraError::PermissionDenied
    } else if lower.contains("not found")
        || lower.contains("no such")
        || lower.contains("no device")
        || lower.contains("enoent")
    {
        CameraError::NotFound
    } else {
        CameraError::Unavailable(message.to_string())
    }
}

/// Owns the frame source for one mount of the capture screen.
///
/// `release` is idempotent and Drop is a backstop, so the underlying stream
/// is stopped exactly once no matter which exit path runs first.
pub struct CameraSession {
    source: Box<dyn FrameSource>,
    released: bool,
}

impl CameraSession {
    /// Open the device camera. Blocking; call from `spawn_blocking`.
    pub fn open(index: u32) -> Result<Self, CameraError> {
        Ok(Self::from_source(Box::new(NokhwaSource::open(index)?)))
    }

    pub fn from_source(source: Box<dyn FrameSource>) -> Self {
        Self { source, released: false }
    }

    pub fn grab(&mut self) -> Result<Frame, CameraError> {
        if self.released {
            return Err(CameraError::Unavailable("camera already released".to_string()));
        }
        self.source.grab()
    }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.source.stop();
            tracing::debug!("camera released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        stops: Arc<AtomicUsize>,
    }

    impl FrameSource for CountingSource {
        fn grab(&mut self) -> Result<Frame, CameraError> {
            Ok(Frame { width: 2, height: 2, rgb: vec![128; 12] })
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn stream_stopped_exactly_once_per_session() {
        let stops = Arc::new(AtomicUsize::new(0));
        {
            let mut session =
                CameraSession::from_source(Box::new(CountingSource { stops: stops.clone() }));
            session.release();
            session.release();
            // drop runs here as well
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_alone_stops_the_stream() {
        let stops = Arc::new(AtomicUsize::new(0));
        drop(CameraSession::from_source(Box::new(CountingSource { stops: stops.clone() })));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn grab_after_release_fails() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut session = CameraSession::from_source(Box::new(CountingSource { stops }));
        session.release();
        assert!(session.grab().is_err());
    }

    #[test]
    fn permission_failures_are_classified() {
        assert!(matches!(
            classify_camera_failure("Could not open device: Permission denied (os error 13)"),
            CameraError::PermissionDenied
        ));
        assert!(matches!(
            classify_camera_failure("No such device: /dev/video0 not found"),
            CameraError::NotFound
        ));
        assert!(matches!(
            classify_camera_failure("ioctl failed"),
            CameraError::Unavailable(_)
        ));
    }

    #[test]
    fn data_url_has_jpeg_prefix() {
        let frame = Frame { width: 4, height: 4, rgb: vec![200; 48] };
        let url = frame.to_jpeg_data_url(80).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert!(url.len() > "data:image/jpeg;base64,".len());
    }

    #[test]
    fn preview_downscales_to_requested_grid() {
        let frame = Frame { width: 8, height: 8, rgb: vec![255; 8 * 8 * 3] };
        let preview = frame.to_preview(4, 2);
        assert_eq!(preview.cols, 4);
        assert_eq!(preview.rows, 2);
        assert_eq!(preview.luma.len(), 8);
        assert!(preview.luma.iter().all(|&l| l == 255));
    }
}
