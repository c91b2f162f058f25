use std::path::PathBuf;

use crate::conversion::domain::image_output::ImageOutput;
use crate::conversion::infrastructure::frame_encoder;
use crate::flow::transformer::{Availability, PullTransformer};
use crate::nodes::error::ReaderError;
use crate::shared::frame_output::FrameOutput;
use crate::video::domain::image_reader::ImageReader;
use crate::video::infrastructure::image_file_reader::ImageFileReader;

/// Loads one still image per submitted path and forwards it in the
/// configured representation.
pub struct ImageFileLoader {
    reader: Box<dyn ImageReader>,
    image_output: ImageOutput,
    pending: Option<FrameOutput>,
}

impl ImageFileLoader {
    pub fn new(reader: Box<dyn ImageReader>, image_output: ImageOutput) -> Self {
        Self {
            reader,
            image_output,
            pending: None,
        }
    }

    pub fn with_image_file_reader(image_output: ImageOutput) -> Self {
        Self::new(Box::new(ImageFileReader::new()), image_output)
    }

    pub fn set_image_output(&mut self, image_output: ImageOutput) {
        self.image_output = image_output;
    }
}

impl PullTransformer for ImageFileLoader {
    type Input = PathBuf;
    type Output = FrameOutput;
    type Error = ReaderError;

    fn submit(&mut self, path: PathBuf) -> Result<(), ReaderError> {
        self.pending = None;
        let frame = self.reader.read(&path).map_err(|source| ReaderError::Open {
            location: path.display().to_string(),
            source,
        })?;
        log::debug!(
            "Loaded {}x{} image from {}",
            frame.width(),
            frame.height(),
            path.display()
        );
        self.pending = Some(frame_encoder::encode(frame, self.image_output)?);
        Ok(())
    }

    fn poll(&mut self) -> Result<Availability, ReaderError> {
        Ok(if self.pending.is_some() {
            Availability::Ready
        } else {
            Availability::Exhausted
        })
    }

    fn collect(&mut self) -> Result<FrameOutput, ReaderError> {
        self.pending.take().ok_or(ReaderError::Protocol)
    }

    fn close(&mut self) {
        self.pending = None;
    }
}
