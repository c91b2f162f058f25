use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::flow::reconfigurable::{self, Reconfigurable};
use crate::flow::sink::Sink;
use crate::nodes::error::{ConfigError, SinkError};
use crate::shared::constants::{DEFAULT_FPS, VIDEO_SINK_CODEC};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;
use crate::video::infrastructure::ffmpeg_writer::FfmpegWriter;

/// Creates a fresh, unopened writer for each output video.
pub type WriterFactory = Box<dyn Fn() -> Box<dyn VideoWriter> + Send>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSinkConfig {
    /// Target file; use `.avi` or `.mkv` for MJPEG.
    pub output_file: PathBuf,
    pub fps: f64,
}

impl Default for VideoSinkConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("output.avi"),
            fps: DEFAULT_FPS,
        }
    }
}

impl VideoSinkConfig {
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            ..Self::default()
        }
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        Ok(())
    }
}

/// A writer that has been opened, with the size it was opened at.
pub struct OpenVideo {
    writer: Box<dyn VideoWriter>,
    path: PathBuf,
    dimensions: (u32, u32),
    frames: usize,
}

impl OpenVideo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

/// Appends raw frames to an MJPEG video.
///
/// The output is opened on the first frame, sized to that frame, and
/// released by [`Sink::wrap_up`]. Frames of any other size are rejected.
pub struct VideoFileSink {
    factory: WriterFactory,
    config: VideoSinkConfig,
    active: Option<OpenVideo>,
}

impl VideoFileSink {
    pub fn new(factory: WriterFactory, config: VideoSinkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            factory,
            config,
            active: None,
        })
    }

    pub fn with_ffmpeg(config: VideoSinkConfig) -> Result<Self, ConfigError> {
        Self::new(
            Box::new(|| Box::new(FfmpegWriter::new()) as Box<dyn VideoWriter>),
            config,
        )
    }

    pub fn config(&self) -> &VideoSinkConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Frames written to the currently open video.
    pub fn frames_written(&self) -> usize {
        self.active.as_ref().map_or(0, OpenVideo::frames)
    }

    /// Replaces the options. A video that is already open keeps its file
    /// and frame rate until `wrap_up`; the new values apply to the next one.
    pub fn reconfigure(&mut self, config: VideoSinkConfig) -> Result<(), ConfigError> {
        config.validate()?;
        reconfigurable::reconfigure(self, |sink| -> Result<(), ConfigError> {
            sink.config = config;
            Ok(())
        })
    }

    fn open(&self, frame: &Frame) -> Result<OpenVideo, SinkError> {
        let path = self.config.output_file.clone();
        let (width, height) = frame.dimensions();
        let metadata = VideoMetadata::for_output(width, height, self.config.fps, VIDEO_SINK_CODEC);

        let mut writer = (self.factory)();
        if let Err(source) = writer.open(&path, &metadata) {
            return Err(SinkError::Open { path, source });
        }
        log::debug!(
            "Opened {} at {width}x{height}, {} fps",
            path.display(),
            self.config.fps
        );
        Ok(OpenVideo {
            writer,
            path,
            dimensions: (width, height),
            frames: 0,
        })
    }
}

impl Sink for VideoFileSink {
    type Input = Frame;
    type Error = SinkError;

    fn accept(&mut self, frame: &Frame) -> Result<(), SinkError> {
        let video = match self.active.take() {
            Some(video) => video,
            None => self.open(frame)?,
        };
        let video = self.active.insert(video);

        if frame.dimensions() != video.dimensions {
            return Err(SinkError::DimensionMismatch {
                path: video.path.clone(),
                expected: video.dimensions,
                actual: frame.dimensions(),
            });
        }
        video
            .writer
            .write(frame)
            .map_err(|source| SinkError::Write {
                path: video.path.clone(),
                source,
            })?;
        video.frames += 1;
        Ok(())
    }

    fn wrap_up(&mut self) -> Result<(), SinkError> {
        let Some(mut video) = self.active.take() else {
            return Ok(());
        };
        video.writer.close().map_err(|source| SinkError::Close {
            path: video.path.clone(),
            source,
        })?;
        log::debug!("Closed {} after {} frames", video.path.display(), video.frames);
        Ok(())
    }
}

impl Reconfigurable for VideoFileSink {
    type Snapshot = Option<OpenVideo>;

    fn capture_state(&mut self) -> Option<OpenVideo> {
        self.active.take()
    }

    fn restore_state(&mut self, snapshot: Option<OpenVideo>) {
        if let Some(video) = snapshot {
            self.active = Some(video);
        }
    }
}

impl Drop for VideoFileSink {
    fn drop(&mut self) {
        if let Err(e) = self.wrap_up() {
            log::warn!("{e}");
        }
    }
}
