pub mod constants;
pub mod frame;
pub mod frame_output;
pub mod video_metadata;
