//! Frame-source plumbing: owned frames, a bounded frame channel and a
//! driver that feeds a detector and forwards detections to a sink.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use marker_elements_core::{rgba_len, FrameError, RgbaFrame};
use marker_elements_detect::{DetectError, MarkerDetection, MarkerDetector};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Consumer of recognized markers.
pub trait DetectionSink {
    fn on_detection(&mut self, detection: &MarkerDetection);
}

impl<F: FnMut(&MarkerDetection)> DetectionSink for F {
    fn on_detection(&mut self, detection: &MarkerDetection) {
        self(detection)
    }
}

/// RGBA frame that owns its pixels, as delivered by a frame source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl OwnedFrame {
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Validated borrowed view.
    pub fn view(&self) -> Result<RgbaFrame<'_>, FrameError> {
        RgbaFrame::new(self.width, self.height, &self.pixels)
    }

    /// Flip rows top-to-bottom in place.
    pub fn mirror_vertically(&mut self) -> Result<(), FrameError> {
        mirror_vertically(&mut self.pixels, self.width, self.height)
    }
}

/// Swap row `y` with row `height - 1 - y` of a packed RGBA buffer.
pub fn mirror_vertically(pixels: &mut [u8], width: usize, height: usize) -> Result<(), FrameError> {
    let expected = rgba_len(width, height)?;
    if pixels.len() < expected {
        return Err(FrameError::BufferTooShort {
            expected,
            got: pixels.len(),
        });
    }
    let stride = width * 4;
    let (mut top, mut bottom) = (0usize, height.saturating_sub(1));
    while top < bottom {
        let (head, tail) = pixels.split_at_mut(bottom * stride);
        head[top * stride..(top + 1) * stride].swap_with_slice(&mut tail[..stride]);
        top += 1;
        bottom -= 1;
    }
    Ok(())
}

/// Bounded channel for handing frames from a source thread to a driver.
///
/// The sender blocks once `capacity` frames are queued.
pub fn frame_channel(capacity: usize) -> (SyncSender<OwnedFrame>, Receiver<OwnedFrame>) {
    sync_channel(capacity)
}

/// Counters from [`FrameDriver::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames that went through the pipeline.
    pub frames: usize,
    /// Frames rejected as malformed.
    pub rejected: usize,
    pub detections: usize,
}

/// Owns a detector and forwards every detection to a sink.
pub struct FrameDriver<S> {
    detector: MarkerDetector,
    sink: S,
    mirror_y: bool,
}

impl<S: DetectionSink> FrameDriver<S> {
    pub fn new(detector: MarkerDetector, sink: S) -> Self {
        Self {
            detector,
            sink,
            mirror_y: false,
        }
    }

    /// Mirror owned frames vertically before detection.
    pub fn with_mirror_y(mut self, mirror_y: bool) -> Self {
        self.mirror_y = mirror_y;
        self
    }

    pub fn detector(&self) -> &MarkerDetector {
        &self.detector
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Process one borrowed frame as-is.
    pub fn on_frame(&mut self, frame: &RgbaFrame<'_>) -> Option<MarkerDetection> {
        let detection = self.detector.process_frame(frame)?;
        self.sink.on_detection(&detection);
        Some(detection)
    }

    /// Validate, optionally mirror, and process an owned frame.
    pub fn on_owned_frame(
        &mut self,
        mut frame: OwnedFrame,
    ) -> Result<Option<MarkerDetection>, DetectError> {
        if self.mirror_y {
            frame.mirror_vertically()?;
        }
        let view = frame.view()?;
        Ok(self.on_frame(&view))
    }

    /// Drain `frames` until every sender is dropped.
    ///
    /// Malformed frames are logged and skipped.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn run(mut self, frames: Receiver<OwnedFrame>) -> (S, RunSummary) {
        let mut summary = RunSummary::default();
        for frame in frames {
            match self.on_owned_frame(frame) {
                Ok(found) => {
                    summary.frames += 1;
                    if found.is_some() {
                        summary.detections += 1;
                    }
                }
                Err(err) => {
                    log::warn!("skipping frame: {err}");
                    summary.rejected += 1;
                }
            }
        }
        log::debug!(
            "frame source closed after {} frames ({} rejected, {} detections)",
            summary.frames,
            summary.rejected,
            summary.detections
        );
        (self.sink, summary)
    }
}
