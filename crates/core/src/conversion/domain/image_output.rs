use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Representation a reader hands downstream for every emitted frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOutput {
    /// The decoded frame, unchanged.
    #[default]
    Raw,
    /// JPEG-encoded bytes.
    Jpg,
    /// PNG-encoded bytes.
    Png,
}

impl ImageOutput {
    pub const ALL: &[ImageOutput] = &[ImageOutput::Raw, ImageOutput::Jpg, ImageOutput::Png];

    pub fn is_encoded(self) -> bool {
        !matches!(self, ImageOutput::Raw)
    }

    /// File extension matching the encoded bytes, `None` for raw frames.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ImageOutput::Raw => None,
            ImageOutput::Jpg => Some("jpg"),
            ImageOutput::Png => Some("png"),
        }
    }
}

impl fmt::Display for ImageOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageOutput::Raw => write!(f, "raw"),
            ImageOutput::Jpg => write!(f, "jpg"),
            ImageOutput::Png => write!(f, "png"),
        }
    }
}

impl FromStr for ImageOutput {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(ImageOutput::Raw),
            "jpg" | "jpeg" => Ok(ImageOutput::Jpg),
            "png" => Ok(ImageOutput::Png),
            _ => Err(EncodeError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("unknown image output format: {0:?}")]
    UnknownFormat(String),
    #[error("{0} is not a byte-encoded format")]
    NotAByteFormat(ImageOutput),
    #[error("cannot encode a frame with {channels} channels")]
    UnsupportedFrame { channels: u8 },
    #[error("failed to encode frame as {format}: {source}")]
    Image {
        format: ImageOutput,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to decode image bytes: {0}")]
    Decode(#[source] image::ImageError),
}
