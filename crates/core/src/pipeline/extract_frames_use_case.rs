use std::path::PathBuf;
use std::time::Instant;

use crate::conversion::domain::image_output::ImageOutput;
use crate::flow::sink::Sink;
use crate::flow::transformer::{pull, PullTransformer};
use crate::nodes::error::{ConfigError, SinkError};
use crate::nodes::image_file_sink::ImageFileSink;
use crate::nodes::video_file_reader::VideoFileReader;
use crate::nodes::video_file_sink::VideoFileSink;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame_output::FrameOutput;
use crate::video::domain::source_reference::SourceReference;

/// Names extracted frames `<directory>/<stem>-<n>.<extension>`, where
/// `stem` is the source's file stem and `n` counts frames across the whole
/// run, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNaming {
    directory: PathBuf,
    extension: String,
}

impl FrameNaming {
    pub fn new(directory: impl Into<PathBuf>, extension: &str) -> Result<Self, ConfigError> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ConfigError::UnsupportedExtension(extension));
        }
        Ok(Self {
            directory: directory.into(),
            extension,
        })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn path_for(&self, stem: &str, number: usize) -> PathBuf {
        self.directory
            .join(format!("{stem}-{number}.{}", self.extension))
    }

    /// Encoded items must keep the extension of the bytes they carry.
    fn for_output(mut self, output: ImageOutput) -> Self {
        if let Some(ext) = output.extension() {
            self.extension = ext.to_string();
        }
        self
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractionReport {
    /// Sources attempted, including failed ones.
    pub sources: usize,
    /// Sources that failed to open or broke off mid-stream.
    pub failed_sources: Vec<String>,
    pub frames: usize,
    pub images: Vec<PathBuf>,
    pub video_frames: usize,
}

/// Extracts every Nth frame of a list of videos into numbered image files
/// and/or one combined video.
///
/// Sources are read one after another through a single reader. A source
/// that cannot be opened or read is logged and skipped; a sink failure
/// ends the run. The reader is closed and the video finalized on every
/// exit path.
pub struct ExtractFramesUseCase {
    reader: VideoFileReader,
    images: Option<(ImageFileSink, FrameNaming)>,
    video: Option<VideoFileSink>,
    logger: Box<dyn PipelineLogger>,
}

impl ExtractFramesUseCase {
    pub fn new(reader: VideoFileReader, logger: Box<dyn PipelineLogger>) -> Self {
        Self {
            reader,
            images: None,
            video: None,
            logger,
        }
    }

    pub fn with_images(mut self, sink: ImageFileSink, naming: FrameNaming) -> Self {
        let naming = naming.for_output(self.reader.config().image_output);
        self.images = Some((sink, naming));
        self
    }

    pub fn with_video(mut self, sink: VideoFileSink) -> Result<Self, ConfigError> {
        let output = self.reader.config().image_output;
        if output.is_encoded() {
            return Err(ConfigError::VideoNeedsRawFrames(output));
        }
        self.video = Some(sink);
        Ok(self)
    }

    pub fn execute(
        &mut self,
        sources: Vec<SourceReference>,
    ) -> Result<ExtractionReport, SinkError> {
        let mut report = ExtractionReport::default();
        let result = self.run(sources, &mut report);

        self.reader.close();
        let wrapped = match self.video.as_mut() {
            Some(video) => video.wrap_up(),
            None => Ok(()),
        };
        self.logger.summary();

        result.and(wrapped)?;
        Ok(report)
    }

    fn run(
        &mut self,
        sources: Vec<SourceReference>,
        report: &mut ExtractionReport,
    ) -> Result<(), SinkError> {
        let total = sources.len();
        for (i, source) in sources.into_iter().enumerate() {
            let name = source.describe();
            let stem = source_stem(&source);
            report.sources += 1;
            self.logger.source_started(&name, i + 1, total);

            if let Err(e) = self.reader.submit(source) {
                self.logger.warn(&format!("Skipping {name}: {e}"));
                report.failed_sources.push(name);
                continue;
            }
            let expected = match self.reader.metadata() {
                Some(meta) => {
                    self.logger.info(&format!(
                        "{name}: {}x{} {} at {:.2} fps, {} frames",
                        meta.width, meta.height, meta.codec, meta.fps, meta.total_frames
                    ));
                    self.reader.config().expected_outputs(meta.total_frames)
                }
                None => 0,
            };

            let mut emitted = 0;
            loop {
                let started = Instant::now();
                let item = match pull(&mut self.reader) {
                    Ok(Some(item)) => item,
                    Ok(None) => {
                        self.logger
                            .info(&format!("Extracted {emitted} frames from {name}"));
                        break;
                    }
                    Err(e) => {
                        self.logger.warn(&format!("Stopped reading {name}: {e}"));
                        report.failed_sources.push(name.clone());
                        break;
                    }
                };
                self.logger.timing("read", elapsed_ms(started));

                emitted += 1;
                self.write(item, &stem, report)?;
                self.logger.progress(emitted, expected);
            }
        }
        Ok(())
    }

    fn write(
        &mut self,
        item: FrameOutput,
        stem: &str,
        report: &mut ExtractionReport,
    ) -> Result<(), SinkError> {
        report.frames += 1;

        if let (Some(video), Some(frame)) = (self.video.as_mut(), item.as_frame()) {
            let started = Instant::now();
            video.accept(frame)?;
            self.logger.timing("video", elapsed_ms(started));
            report.video_frames += 1;
        }

        if let Some((sink, naming)) = self.images.as_mut() {
            let path = naming.path_for(stem, report.frames);
            sink.set_output_file(&path);
            let started = Instant::now();
            sink.accept(&item)?;
            self.logger.timing("image", elapsed_ms(started));
            report.images.push(path);
        }
        Ok(())
    }
}

fn source_stem(source: &SourceReference) -> String {
    let path = match source {
        SourceReference::Path(path) => Some(path.as_path()),
        SourceReference::Stream(stream) => stream
            .metadata()
            .and_then(|meta| meta.source_path.as_deref()),
    };
    path.and_then(|p| p.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stream".to_string())
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
