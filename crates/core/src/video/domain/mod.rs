pub mod frame_codec;
pub mod image_reader;
pub mod image_writer;
pub mod source_reference;
pub mod video_writer;
