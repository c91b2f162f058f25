//! Media nodes driven by the pull scheduler: readers that turn sources into
//! frames, and sinks that persist them.

pub mod error;
pub mod image_file_loader;
pub mod image_file_sink;
pub mod reader_config;
pub mod reader_snapshot;
pub mod video_file_reader;
pub mod video_file_sink;
