//! In-memory codec and writer doubles shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_codec::{FrameCodec, FrameStream};
use crate::video::domain::video_writer::VideoWriter;

/// A 2x2 RGB frame whose pixels all equal `index % 256`.
pub fn test_frame(index: usize) -> Frame {
    Frame::new(vec![(index % 256) as u8; 12], 2, 2, 3, index)
}

/// Counters shared between a test and the streams it hands out.
#[derive(Clone, Default)]
pub struct StreamTally {
    opens: Arc<AtomicUsize>,
    reads: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl StreamTally {
    /// Successful opens through a [`StubCodec`].
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Calls to `next_frame`, including the one that observes end of stream.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Calls to `close`.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Plays back a fixed script of frames and read failures.
pub struct ScriptedStream {
    script: VecDeque<Result<Frame, String>>,
    tally: StreamTally,
    closed: bool,
}

impl ScriptedStream {
    pub fn with_frames(count: usize) -> (Self, StreamTally) {
        let tally = StreamTally::default();
        (Self::with_tally(count, tally.clone()), tally)
    }

    pub fn with_tally(count: usize, tally: StreamTally) -> Self {
        Self {
            script: (0..count).map(|i| Ok(test_frame(i))).collect(),
            tally,
            closed: false,
        }
    }

    /// `good` frames, then a decode failure, then two more frames that
    /// must never be reached.
    pub fn corrupt_after(good: usize, tally: StreamTally) -> Self {
        let mut script: VecDeque<_> = (0..good).map(|i| Ok(test_frame(i))).collect();
        script.push_back(Err(format!("corrupt packet after frame {good}")));
        script.push_back(Ok(test_frame(good + 1)));
        script.push_back(Ok(test_frame(good + 2)));
        Self {
            script,
            tally,
            closed: false,
        }
    }
}

impl FrameStream for ScriptedStream {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        self.tally.reads.fetch_add(1, Ordering::SeqCst);
        if self.closed {
            return Err("read from a closed stream".into());
        }
        match self.script.pop_front() {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(message)) => Err(message.into()),
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.tally.closes.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
    }
}

enum Script {
    Frames(usize),
    CorruptAfter(usize),
}

/// Opens registered paths into [`ScriptedStream`]s; every other path fails.
#[derive(Default)]
pub struct StubCodec {
    videos: HashMap<PathBuf, Script>,
    tally: StreamTally,
}

impl StubCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, path: &str, frames: usize) -> Self {
        self.videos.insert(PathBuf::from(path), Script::Frames(frames));
        self
    }

    pub fn with_corrupt_video(mut self, path: &str, good_frames: usize) -> Self {
        self.videos
            .insert(PathBuf::from(path), Script::CorruptAfter(good_frames));
        self
    }

    pub fn tally(&self) -> StreamTally {
        self.tally.clone()
    }
}

impl FrameCodec for StubCodec {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameStream>, Box<dyn std::error::Error>> {
        let script = self
            .videos
            .get(path)
            .ok_or_else(|| format!("No such file: {}", path.display()))?;
        self.tally.opens.fetch_add(1, Ordering::SeqCst);
        let stream = match script {
            Script::Frames(count) => ScriptedStream::with_tally(*count, self.tally.clone()),
            Script::CorruptAfter(good) => ScriptedStream::corrupt_after(*good, self.tally.clone()),
        };
        Ok(Box::new(stream))
    }
}

/// What a [`RecordingVideoWriter`] saw.
#[derive(Default, Debug)]
pub struct WriterLog {
    pub opened: Vec<(PathBuf, VideoMetadata)>,
    pub written: Vec<usize>,
    pub closes: usize,
}

/// Records calls instead of encoding.
pub struct RecordingVideoWriter {
    log: Arc<Mutex<WriterLog>>,
    is_open: bool,
}

impl RecordingVideoWriter {
    pub fn new() -> (Self, Arc<Mutex<WriterLog>>) {
        let log = Arc::new(Mutex::new(WriterLog::default()));
        (
            Self {
                log: log.clone(),
                is_open: false,
            },
            log,
        )
    }

    pub fn sharing(log: Arc<Mutex<WriterLog>>) -> Self {
        Self {
            log,
            is_open: false,
        }
    }
}

impl VideoWriter for RecordingVideoWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.log
            .lock()
            .unwrap()
            .opened
            .push((path.to_path_buf(), metadata.clone()));
        self.is_open = true;
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_open {
            return Err("RecordingVideoWriter: not opened".into());
        }
        self.log.lock().unwrap().written.push(frame.index());
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.log.lock().unwrap().closes += 1;
        self.is_open = false;
        Ok(())
    }
}

/// Encodes `num_frames` uniformly grey MPEG-4 frames to `path`; frame `i`
/// has pixel value `(i * 40) % 256`.
pub fn write_test_video(path: &Path, num_frames: usize, width: u32, height: u32, fps: i32) {
    ffmpeg_next::init().unwrap();

    let mut octx = ffmpeg_next::format::output(path).unwrap();
    let global_header = octx
        .format()
        .flags()
        .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

    let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
    let mut ost = octx.add_stream(Some(codec)).unwrap();

    let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()
        .unwrap();
    encoder_ctx.set_width(width);
    encoder_ctx.set_height(height);
    encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
    encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
    encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
    if global_header {
        encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
    }

    let mut encoder = encoder_ctx
        .open_with(ffmpeg_next::Dictionary::new())
        .unwrap();
    ost.set_parameters(&encoder);
    octx.write_header().unwrap();
    let ost_time_base = octx.stream(0).unwrap().time_base();

    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        ffmpeg_next::format::Pixel::RGB24,
        width,
        height,
        ffmpeg_next::format::Pixel::YUV420P,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .unwrap();

    for i in 0..num_frames {
        let mut rgb_frame =
            ffmpeg_next::util::frame::video::Video::new(ffmpeg_next::format::Pixel::RGB24, width, height);
        let stride = rgb_frame.stride(0);
        let value = ((i * 40) % 256) as u8;
        let data = rgb_frame.data_mut(0);
        for row in 0..height as usize {
            let start = row * stride;
            data[start..start + width as usize * 3].fill(value);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&rgb_frame, &mut yuv_frame).unwrap();
        yuv_frame.set_pts(Some(i as i64));
        encoder.send_frame(&yuv_frame).unwrap();
        drain_packets(&mut encoder, &mut octx, fps, ost_time_base);
    }

    encoder.send_eof().unwrap();
    drain_packets(&mut encoder, &mut octx, fps, ost_time_base);
    octx.write_trailer().unwrap();
}

fn drain_packets(
    encoder: &mut ffmpeg_next::codec::encoder::video::Encoder,
    octx: &mut ffmpeg_next::format::context::Output,
    fps: i32,
    ost_time_base: ffmpeg_next::Rational,
) {
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(0);
        encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
        encoded.write_interleaved(octx).unwrap();
    }
}
