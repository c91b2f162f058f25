use std::path::Path;

use crate::shared::frame_output::FrameOutput;
use crate::video::domain::image_writer::ImageWriter;

/// Writes images with the `image` crate.
///
/// Raw frames are encoded in the format implied by the file extension;
/// already-encoded bytes are written verbatim.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, image: &FrameOutput) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        match image {
            FrameOutput::Raw(frame) => {
                let img = frame
                    .to_rgb_image()
                    .ok_or("Failed to create image from frame data")?;
                img.save(path)?;
            }
            FrameOutput::Encoded(bytes) => std::fs::write(path, bytes)?,
        }
        Ok(())
    }
}
