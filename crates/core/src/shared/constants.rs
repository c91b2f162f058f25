pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Frame rate used by video sinks when none is configured.
pub const DEFAULT_FPS: f64 = 30.0;

/// Codec name reported for videos written by the video sink.
pub const VIDEO_SINK_CODEC: &str = "mjpeg";
