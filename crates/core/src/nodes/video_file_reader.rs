use crate::conversion::infrastructure::frame_encoder;
use crate::flow::reconfigurable::{self, Reconfigurable};
use crate::flow::transformer::{Availability, PullTransformer};
use crate::nodes::error::{ConfigError, ReaderError};
use crate::nodes::reader_config::ReaderConfig;
use crate::nodes::reader_snapshot::{FrameCounters, ReaderSnapshot};
use crate::shared::frame_output::FrameOutput;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_codec::{FrameCodec, FrameStream};
use crate::video::domain::source_reference::SourceReference;
use crate::video::infrastructure::ffmpeg_reader::FfmpegCodec;

/// Streams every Nth frame of a video, at most `max_frames` per source.
///
/// Each [`poll`](PullTransformer::poll) reads at most one raw frame, so a
/// long run of decimated frames is spread over several scheduler time
/// slices instead of blocking one of them. The decoder is released as soon
/// as the source is exhausted, the cap is reached, or a read fails.
pub struct VideoFileReader {
    codec: Box<dyn FrameCodec>,
    config: ReaderConfig,
    stream: Option<Box<dyn FrameStream>>,
    counters: FrameCounters,
    pending: Option<FrameOutput>,
}

impl VideoFileReader {
    pub fn new(codec: Box<dyn FrameCodec>, config: ReaderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            codec,
            config,
            stream: None,
            counters: FrameCounters::default(),
            pending: None,
        })
    }

    pub fn with_ffmpeg(config: ReaderConfig) -> Result<Self, ConfigError> {
        Self::new(Box::new(FfmpegCodec::new()), config)
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn counters(&self) -> FrameCounters {
        self.counters
    }

    /// Whether a decoder is currently open.
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Properties of the open source, when the codec reports them.
    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.stream.as_ref().and_then(|stream| stream.metadata())
    }

    /// Replaces the options between pulls. An open source keeps streaming
    /// from where it was, under the new options.
    ///
    /// An item already pending keeps the form it was converted to; only
    /// frames read after the call use the new `image_output`.
    pub fn reconfigure(&mut self, config: ReaderConfig) -> Result<(), ConfigError> {
        config.validate()?;
        reconfigurable::reconfigure(self, |reader| -> Result<(), ConfigError> {
            reader.config = config;
            Ok(())
        })
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.close();
            log::debug!(
                "Released video stream after {} frames read, {} emitted",
                self.counters.frames_read,
                self.counters.frames_emitted
            );
        }
    }
}

impl PullTransformer for VideoFileReader {
    type Input = SourceReference;
    type Output = FrameOutput;
    type Error = ReaderError;

    fn submit(&mut self, source: SourceReference) -> Result<(), ReaderError> {
        if self.stream.is_some() {
            log::warn!(
                "New source {} submitted before the previous one was drained",
                source.describe()
            );
        }
        self.release_stream();
        self.pending = None;
        self.counters = FrameCounters::default();

        let stream = match source {
            SourceReference::Path(path) => {
                self.codec
                    .open(&path)
                    .map_err(|source| ReaderError::Open {
                        location: path.display().to_string(),
                        source,
                    })?
            }
            SourceReference::Stream(stream) => stream,
        };

        if let Some(meta) = stream.metadata() {
            log::debug!(
                "Opened {}x{} {} stream ({} frames declared)",
                meta.width,
                meta.height,
                meta.codec,
                meta.total_frames
            );
        }
        self.stream = Some(stream);
        Ok(())
    }

    fn poll(&mut self) -> Result<Availability, ReaderError> {
        if self.pending.is_some() {
            return Ok(Availability::Ready);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Ok(Availability::Exhausted);
        };

        let frame = match stream.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.release_stream();
                return Ok(Availability::Exhausted);
            }
            Err(source) => {
                let frames_read = self.counters.frames_read;
                self.release_stream();
                return Err(ReaderError::Read {
                    frames_read,
                    source,
                });
            }
        };

        self.counters.frames_read += 1;
        if self.counters.frames_read % self.config.nth_frame != 0 {
            return Ok(Availability::NotReady);
        }

        let output = match frame_encoder::encode(frame, self.config.image_output) {
            Ok(output) => output,
            Err(e) => {
                self.release_stream();
                return Err(e.into());
            }
        };

        self.counters.frames_emitted += 1;
        self.pending = Some(output);
        if self
            .config
            .frame_cap()
            .is_some_and(|cap| self.counters.frames_emitted >= cap)
        {
            log::debug!("Reached max_frames={}", self.config.max_frames);
            self.release_stream();
        }
        Ok(Availability::Ready)
    }

    fn collect(&mut self) -> Result<FrameOutput, ReaderError> {
        self.pending.take().ok_or(ReaderError::Protocol)
    }

    fn close(&mut self) {
        self.release_stream();
        self.pending = None;
    }
}

impl Reconfigurable for VideoFileReader {
    type Snapshot = ReaderSnapshot;

    fn capture_state(&mut self) -> ReaderSnapshot {
        let counters = std::mem::take(&mut self.counters);
        let pending = self.pending.take();
        match self.stream.take() {
            Some(stream) => ReaderSnapshot::Streaming {
                counters,
                pending,
                stream,
            },
            None => ReaderSnapshot::Idle { counters, pending },
        }
    }

    fn restore_state(&mut self, snapshot: ReaderSnapshot) {
        self.release_stream();
        match snapshot {
            ReaderSnapshot::Idle { counters, pending } => {
                self.counters = counters;
                self.pending = pending;
            }
            ReaderSnapshot::Streaming {
                counters,
                pending,
                stream,
            } => {
                self.counters = counters;
                self.pending = pending;
                self.stream = Some(stream);
            }
        }
    }
}

impl Drop for VideoFileReader {
    fn drop(&mut self) {
        self.release_stream();
    }
}
