pub mod conversion;
pub mod image_output;
