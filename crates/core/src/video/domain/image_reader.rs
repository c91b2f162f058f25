use std::path::Path;

use crate::shared::frame::Frame;

/// Loads a single still image as a raw frame.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;
}
