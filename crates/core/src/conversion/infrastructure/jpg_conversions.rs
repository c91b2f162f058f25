use crate::conversion::domain::conversion::Conversion;
use crate::conversion::domain::image_output::{EncodeError, ImageOutput};
use crate::conversion::infrastructure::frame_encoder::{decode_bytes, encode_bytes};
use crate::shared::frame::Frame;

/// Converts a raw frame to JPEG bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameToJpgBytes;

impl Conversion for FrameToJpgBytes {
    type Input = Frame;
    type Output = Vec<u8>;

    fn convert(&self, input: Frame) -> Result<Vec<u8>, EncodeError> {
        encode_bytes(&input, ImageOutput::Jpg)
    }
}

/// Converts JPEG bytes back to a raw frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct JpgBytesToFrame;

impl Conversion for JpgBytesToFrame {
    type Input = Vec<u8>;
    type Output = Frame;

    fn convert(&self, input: Vec<u8>) -> Result<Frame, EncodeError> {
        decode_bytes(&input, 0)
    }
}
