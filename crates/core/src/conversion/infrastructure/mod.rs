pub mod frame_encoder;
pub mod jpg_conversions;
