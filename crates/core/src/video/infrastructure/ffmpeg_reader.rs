use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_codec::{FrameCodec, FrameStream};

/// Opens video files with ffmpeg-next (libavformat + libavcodec).
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegCodec;

impl FfmpegCodec {
    pub fn new() -> Self {
        Self
    }
}

impl FrameCodec for FfmpegCodec {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameStream>, Box<dyn std::error::Error>> {
        Ok(Box::new(FfmpegFrameStream::open(path)?))
    }
}

/// Demuxer, decoder and RGB scaler for one open video.
struct DecodeSession {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
    width: u32,
    height: u32,
}

impl DecodeSession {
    fn try_receive(&mut self, index: usize) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if !frame_received(self.decoder.receive_frame(&mut decoded))? {
            return Ok(None);
        }
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;
        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        Ok(Some(Frame::new(pixels, self.width, self.height, 3, index)))
    }
}

/// `Ok(false)` when the decoder needs more input or is fully drained;
/// any other decoder error is a decode failure and passes through.
fn frame_received(result: Result<(), ffmpeg_next::Error>) -> Result<bool, ffmpeg_next::Error> {
    match result {
        Ok(()) => Ok(true),
        Err(ffmpeg_next::Error::Eof) => Ok(false),
        Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::util::error::EAGAIN => {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Decodes one video lazily, one RGB24 frame per [`FrameStream::next_frame`]
/// call, so nothing beyond the decoder's own buffers is held in memory.
pub struct FfmpegFrameStream {
    session: Option<DecodeSession>,
    metadata: VideoMetadata,
    frame_index: usize,
    skipped_packets: usize,
    flushing: bool,
    done: bool,
}

// Safety: FfmpegFrameStream is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegFrameStream {}

impl FfmpegFrameStream {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;

        let (video_stream_index, decoder, fps, declared_frames) = {
            let stream = ictx
                .streams()
                .best(ffmpeg_next::media::Type::Video)
                .ok_or("No video stream found")?;
            let codec_ctx =
                ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
            let decoder = codec_ctx.decoder().video()?;
            let rate = stream.rate();
            let fps = if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            };
            (stream.index(), decoder, fps, stream.frames().max(0) as usize)
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames: declared_frames,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };

        Ok(Self {
            session: Some(DecodeSession {
                ictx,
                decoder,
                scaler,
                video_stream_index,
                width,
                height,
            }),
            metadata,
            frame_index: 0,
            skipped_packets: 0,
            flushing: false,
            done: false,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    /// Packets the decoder rejected and that were skipped.
    pub fn skipped_packets(&self) -> usize {
        self.skipped_packets
    }
}

impl FrameStream for FfmpegFrameStream {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.done {
            return Ok(None);
        }
        let Some(session) = self.session.as_mut() else {
            return Err("FfmpegFrameStream: read after close".into());
        };

        if let Some(frame) = session.try_receive(self.frame_index)? {
            self.frame_index += 1;
            return Ok(Some(frame));
        }

        if self.flushing {
            self.done = true;
            return Ok(None);
        }

        loop {
            let Some((stream, packet)) = session.ictx.packets().next() else {
                let _ = session.decoder.send_eof();
                self.flushing = true;
                if let Some(frame) = session.try_receive(self.frame_index)? {
                    self.frame_index += 1;
                    return Ok(Some(frame));
                }
                self.done = true;
                return Ok(None);
            };

            if stream.index() != session.video_stream_index {
                continue;
            }

            // A packet the decoder rejects is skipped; frames decoded from
            // later packets are still delivered.
            if let Err(e) = session.decoder.send_packet(&packet) {
                self.skipped_packets += 1;
                log::warn!(
                    "Skipping undecodable packet near frame {} ({} skipped so far): {e}",
                    self.frame_index,
                    self.skipped_packets
                );
                continue;
            }

            if let Some(frame) = session.try_receive(self.frame_index)? {
                self.frame_index += 1;
                return Ok(Some(frame));
            }
        }
    }

    fn close(&mut self) {
        self.session = None;
    }

    fn metadata(&self) -> Option<&VideoMetadata> {
        Some(&self.metadata)
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row (stride > width*3).
/// This function strips that padding to produce a tightly-packed pixel buffer.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
