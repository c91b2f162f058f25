use std::path::{Path, PathBuf};

use crate::flow::sink::Sink;
use crate::nodes::error::SinkError;
use crate::shared::frame_output::FrameOutput;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::infrastructure::image_file_writer::ImageFileWriter;

/// Writes each received image to `output_file`, one synchronous write per
/// item.
///
/// The target is usually changed between items (e.g. a numbered name per
/// frame), so a later item overwrites an earlier one only when the target
/// was left unchanged.
pub struct ImageFileSink {
    writer: Box<dyn ImageWriter>,
    output_file: PathBuf,
    written: usize,
}

impl ImageFileSink {
    pub fn new(writer: Box<dyn ImageWriter>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            output_file: output_file.into(),
            written: 0,
        }
    }

    pub fn with_image_file_writer(output_file: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(ImageFileWriter::new()), output_file)
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn set_output_file(&mut self, output_file: impl Into<PathBuf>) {
        self.output_file = output_file.into();
    }

    /// Items written successfully so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl Sink for ImageFileSink {
    type Input = FrameOutput;
    type Error = SinkError;

    fn accept(&mut self, image: &FrameOutput) -> Result<(), SinkError> {
        self.writer
            .write(&self.output_file, image)
            .map_err(|source| SinkError::Write {
                path: self.output_file.clone(),
                source,
            })?;
        self.written += 1;
        log::debug!("Saved {}", self.output_file.display());
        Ok(())
    }

    fn wrap_up(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
