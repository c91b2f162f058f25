use std::fmt;
use std::path::{Path, PathBuf};

use crate::video::domain::frame_codec::FrameStream;

/// Identifies the video a reader should stream from.
pub enum SourceReference {
    /// A file to open through the reader's codec.
    Path(PathBuf),
    /// A stream the caller already opened; the reader takes ownership.
    Stream(Box<dyn FrameStream>),
}

impl SourceReference {
    /// Human-readable name for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            SourceReference::Path(path) => path.display().to_string(),
            SourceReference::Stream(stream) => match stream.metadata() {
                Some(meta) => match &meta.source_path {
                    Some(path) => path.display().to_string(),
                    None => format!("<open stream {}x{}>", meta.width, meta.height),
                },
                None => "<open stream>".to_string(),
            },
        }
    }
}

impl fmt::Debug for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceReference::Path(path) => f.debug_tuple("Path").field(path).finish(),
            SourceReference::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<PathBuf> for SourceReference {
    fn from(path: PathBuf) -> Self {
        SourceReference::Path(path)
    }
}

impl From<&Path> for SourceReference {
    fn from(path: &Path) -> Self {
        SourceReference::Path(path.to_path_buf())
    }
}

impl From<Box<dyn FrameStream>> for SourceReference {
    fn from(stream: Box<dyn FrameStream>) -> Self {
        SourceReference::Stream(stream)
    }
}
