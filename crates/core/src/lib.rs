//! Media nodes for pull-based dataflows.
//!
//! The centerpiece is [`nodes::video_file_reader::VideoFileReader`], which
//! streams every Nth frame of a video one scheduler pull at a time and can
//! hand its open decoder across a reconfiguration. Around it sit still
//! image readers and writers, an MJPEG video sink and frame/byte
//! conversions.

pub mod conversion;
pub mod flow;
pub mod nodes;
pub mod pipeline;
pub mod shared;
pub mod video;

#[cfg(test)]
pub(crate) mod test_support;
