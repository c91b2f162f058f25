use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// An open video stream that yields raw frames in decode order.
///
/// Each value is the exclusive owner of its underlying decoder resources;
/// moving the box moves ownership. Dropping it releases the resources, and
/// `close` releases them early.
pub trait FrameStream: Send {
    /// Decodes the next raw frame.
    ///
    /// Returns `Ok(None)` at a clean end of stream and `Err` on a decode
    /// failure. Implementations read at most one frame per call.
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the decoder. Must be idempotent.
    fn close(&mut self);

    /// Properties of the opened stream, when the codec reports them.
    fn metadata(&self) -> Option<&VideoMetadata> {
        None
    }
}

/// Opens video files into [`FrameStream`]s.
pub trait FrameCodec: Send {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameStream>, Box<dyn std::error::Error>>;
}
