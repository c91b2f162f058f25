//! Stateless frame encoding on top of the `image` crate.

use std::io::Cursor;

use image::ImageFormat;

use crate::conversion::domain::image_output::{EncodeError, ImageOutput};
use crate::shared::frame::Frame;
use crate::shared::frame_output::FrameOutput;

fn image_format(output: ImageOutput) -> Option<ImageFormat> {
    match output {
        ImageOutput::Raw => None,
        ImageOutput::Jpg => Some(ImageFormat::Jpeg),
        ImageOutput::Png => Some(ImageFormat::Png),
    }
}

/// Converts a decoded frame into the representation selected by `output`.
///
/// `Raw` passes the frame through untouched.
pub fn encode(frame: Frame, output: ImageOutput) -> Result<FrameOutput, EncodeError> {
    if output.is_encoded() {
        encode_bytes(&frame, output).map(FrameOutput::Encoded)
    } else {
        Ok(FrameOutput::Raw(frame))
    }
}

/// Encodes a frame as a self-contained still image.
pub fn encode_bytes(frame: &Frame, output: ImageOutput) -> Result<Vec<u8>, EncodeError> {
    let format = image_format(output).ok_or(EncodeError::NotAByteFormat(output))?;
    let img = frame.to_rgb_image().ok_or(EncodeError::UnsupportedFrame {
        channels: frame.channels(),
    })?;

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .map_err(|source| EncodeError::Image { format: output, source })?;
    Ok(buf.into_inner())
}

/// Decodes an encoded still image (format sniffed from the bytes) into a
/// raw frame carrying `index`.
pub fn decode_bytes(bytes: &[u8], index: usize) -> Result<Frame, EncodeError> {
    let img = image::load_from_memory(bytes)
        .map_err(EncodeError::Decode)?
        .to_rgb8();
    Ok(Frame::from_rgb_image(img, index))
}
