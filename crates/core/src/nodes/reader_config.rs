use serde::{Deserialize, Serialize};

use crate::conversion::domain::image_output::ImageOutput;
use crate::nodes::error::ConfigError;

/// Options recognized by the video and image reader nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Keep every Nth raw frame, counted from 1. `1` keeps every frame.
    pub nth_frame: usize,
    /// Cap on emitted frames per source; zero or negative means unlimited.
    pub max_frames: i64,
    pub image_output: ImageOutput,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            nth_frame: 1,
            max_frames: -1,
            image_output: ImageOutput::Raw,
        }
    }
}

impl ReaderConfig {
    /// Parses a JSON option object and validates it. Missing keys take
    /// their defaults; unknown `image_output` values are rejected here.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nth_frame < 1 {
            return Err(ConfigError::InvalidNthFrame(self.nth_frame));
        }
        Ok(())
    }

    pub fn with_nth_frame(mut self, nth_frame: usize) -> Self {
        self.nth_frame = nth_frame;
        self
    }

    pub fn with_max_frames(mut self, max_frames: i64) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_image_output(mut self, image_output: ImageOutput) -> Self {
        self.image_output = image_output;
        self
    }

    /// The emitted-frame cap, if one applies.
    pub fn frame_cap(&self) -> Option<usize> {
        usize::try_from(self.max_frames).ok().filter(|&cap| cap > 0)
    }

    /// Number of frames a source of `raw_frames` frames will emit.
    pub fn expected_outputs(&self, raw_frames: usize) -> usize {
        let kept = raw_frames / self.nth_frame.max(1);
        match self.frame_cap() {
            Some(cap) => kept.min(cap),
            None => kept,
        }
    }
}
