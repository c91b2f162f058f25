use std::path::Path;

use crate::shared::frame_output::FrameOutput;

/// Writes one image to a file.
pub trait ImageWriter: Send {
    /// Raw frames are encoded according to the path's extension; encoded
    /// bytes are written as-is.
    fn write(&self, path: &Path, image: &FrameOutput) -> Result<(), Box<dyn std::error::Error>>;
}
