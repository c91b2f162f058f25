use std::path::PathBuf;

/// Stream properties reported when a video source is opened, or used to
/// size an output video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count declared by the container; 0 when unknown.
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Metadata for an output stream sized to a frame's dimensions.
    pub fn for_output(width: u32, height: u32, fps: f64, codec: &str) -> Self {
        Self {
            width,
            height,
            fps,
            total_frames: 0,
            codec: codec.to_string(),
            source_path: None,
        }
    }
}
