use std::path::PathBuf;

use thiserror::Error;

use crate::conversion::domain::image_output::{EncodeError, ImageOutput};

#[derive(Error, Debug)]
pub enum ReaderError {
    /// The source is missing, unreadable or not a decodable video/image.
    #[error("failed to open {location}: {source}")]
    Open {
        location: String,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    /// Decoding failed mid-stream; the source is treated as finished.
    #[error("read failed after {frames_read} frames: {source}")]
    Read {
        frames_read: usize,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("collect called with no output pending")]
    Protocol,
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("nth_frame must be at least 1, got {0}")]
    InvalidNthFrame(usize),
    #[error("fps must be a positive number, got {0}")]
    InvalidFps(f64),
    #[error("video output needs raw frames, but the reader produces {0}")]
    VideoNeedsRawFrames(ImageOutput),
    #[error("unsupported image extension: {0:?}")]
    UnsupportedExtension(String),
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("failed to finalize {}: {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error(
        "frame is {}x{} but {} was opened at {}x{}",
        .actual.0, .actual.1, .path.display(), .expected.0, .expected.1
    )]
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_names_location() {
        let err = ReaderError::Open {
            location: "/videos/missing.avi".to_string(),
            source: "No such file".into(),
        };
        let message = err.to_string();
        assert!(message.contains("/videos/missing.avi"));
        assert!(message.contains("No such file"));
    }

    #[test]
    fn test_read_error_exposes_source() {
        use std::error::Error as _;
        let err = ReaderError::Read {
            frames_read: 4,
            source: "corrupt packet".into(),
        };
        assert_eq!(err.to_string(), "read failed after 4 frames: corrupt packet");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_encode_error_is_transparent() {
        let err = ReaderError::from(EncodeError::UnknownFormat("gif".to_string()));
        assert_eq!(
            err.to_string(),
            EncodeError::UnknownFormat("gif".to_string()).to_string()
        );
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = SinkError::DimensionMismatch {
            path: PathBuf::from("out.avi"),
            expected: (160, 120),
            actual: (80, 60),
        };
        assert_eq!(err.to_string(), "frame is 80x60 but out.avi was opened at 160x120");
    }
}
