use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Encodes RGB frames as Motion-JPEG via ffmpeg-next.
///
/// The container is picked from the output extension; `.avi` and `.mkv`
/// both carry MJPEG.
pub struct FfmpegWriter {
    output_path: Option<PathBuf>,
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            output_path: None,
            octx: None,
            encoder: None,
            scaler: None,
            width: 0,
            height: 0,
            fps: 0,
            frame_count: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// ffmpeg needs an integral time base; non-positive rates fall back to 30.
fn integral_fps(fps: f64) -> i32 {
    let fps_i = fps.round() as i32;
    if fps_i <= 0 {
        30
    } else {
        fps_i
    }
}

fn write_pending_packets(
    encoder: &mut ffmpeg_next::codec::encoder::video::Encoder,
    octx: &mut ffmpeg_next::format::context::Output,
    fps: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    let ost_time_base = octx.stream(0).ok_or("output stream missing")?.time_base();
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(0);
        encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
        encoded.write_interleaved(octx)?;
    }
    Ok(())
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let fps = integral_fps(metadata.fps);
        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MJPEG)
            .ok_or("MJPEG encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        // MJPEG wants full-range chroma-subsampled input.
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUVJ420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUVJ420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.output_path = Some(path.to_path_buf());
        self.width = metadata.width;
        self.height = metadata.height;
        self.fps = fps;
        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = Some(scaler);
        self.frame_count = 0;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(scaler), Some(octx)) = (
            self.encoder.as_mut(),
            self.scaler.as_mut(),
            self.octx.as_mut(),
        ) else {
            return Err("FfmpegWriter: not opened".into());
        };

        if frame.dimensions() != (self.width, self.height) || frame.channels() != 3 {
            return Err(format!(
                "FfmpegWriter: expected {}x{} RGB frame, got {}x{} with {} channels",
                self.width,
                self.height,
                frame.width(),
                frame.height(),
                frame.channels()
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            self.width,
            self.height,
        );

        let stride = rgb_frame.stride(0);
        let row_len = self.width as usize * 3;
        let data = rgb_frame.data_mut(0);
        let src = frame.data();

        // Copy pixel data, respecting stride
        for row in 0..self.height as usize {
            let src_start = row * row_len;
            let dst_start = row * stride;
            data[dst_start..dst_start + row_len]
                .copy_from_slice(&src[src_start..src_start + row_len]);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(self.frame_count as i64));

        encoder.send_frame(&yuv_frame)?;
        write_pending_packets(encoder, octx, self.fps)?;

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let encoder = self.encoder.take();
        let octx = self.octx.take();
        self.scaler = None;

        if let (Some(mut encoder), Some(mut octx)) = (encoder, octx) {
            encoder.send_eof()?;
            write_pending_packets(&mut encoder, &mut octx, self.fps)?;
            octx.write_trailer()?;
            if let Some(path) = self.output_path.take() {
                log::debug!("Wrote {} frames to {}", self.frame_count, path.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::frame_codec::FrameCodec;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegCodec;

    fn metadata(w: u32, h: u32, fps: f64) -> VideoMetadata {
        VideoMetadata::for_output(w, h, fps, "mjpeg")
    }

    fn solid_frame(index: usize, w: u32, h: u32, value: u8) -> Frame {
        let data = vec![value; (w * h * 3) as usize];
        Frame::new(data, w, h, 3, index)
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.avi");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        for i in 0..3 {
            writer.write(&solid_frame(i, 160, 120, 128)).unwrap();
        }
        assert_eq!(writer.frame_count(), 3);
        writer.close().unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_write_without_open_returns_error() {
        let mut writer = FfmpegWriter::new();
        assert!(writer.write(&solid_frame(0, 160, 120, 128)).is_err());
    }

    #[test]
    fn test_write_rejects_mismatched_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.avi");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        assert!(writer.write(&solid_frame(0, 80, 60, 128)).is_err());
        writer.close().unwrap();
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.avi");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        writer.write(&solid_frame(0, 160, 120, 128)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut writer = FfmpegWriter::new();
        writer.close().unwrap();
    }

    #[test]
    fn test_integral_fps_falls_back_for_invalid_rates() {
        assert_eq!(integral_fps(25.0), 25);
        assert_eq!(integral_fps(29.97), 30);
        assert_eq!(integral_fps(0.0), 30);
        assert_eq!(integral_fps(-5.0), 30);
    }

    #[test]
    fn test_roundtrip_preserves_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.avi");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        for i in 0..3 {
            writer.write(&solid_frame(i, 160, 120, 128)).unwrap();
        }
        writer.close().unwrap();

        let mut stream = FfmpegCodec::new().open(&path).unwrap();
        let meta = stream.metadata().unwrap().clone();
        assert_eq!((meta.width, meta.height), (160, 120));

        let mut frames = Vec::new();
        while let Some(frame) = stream.next_frame().unwrap() {
            frames.push(frame);
        }
        assert_eq!(frames.len(), 3);

        // MJPEG is lossy, but the overall brightness should be close
        let first = &frames[0];
        let avg: f64 =
            first.data().iter().map(|&b| b as f64).sum::<f64>() / first.data().len() as f64;
        assert!(
            (avg - 128.0).abs() < 20.0,
            "Average pixel value {avg} should be close to 128"
        );
    }
}
