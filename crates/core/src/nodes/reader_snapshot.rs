use std::fmt;

use crate::shared::frame_output::FrameOutput;
use crate::video::domain::frame_codec::FrameStream;

/// Per-source progress of a video reader. Both counts restart at zero
/// whenever a new source is submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    /// Raw frames taken from the decoder.
    pub frames_read: usize,
    /// Frames that survived decimation and were converted for output.
    pub frames_emitted: usize,
}

/// State a video reader hands out while its options are being changed.
///
/// The open decoder, if any, moves into the snapshot and back out of it;
/// it is never reopened or duplicated.
pub enum ReaderSnapshot {
    /// No decoder was open.
    Idle {
        counters: FrameCounters,
        pending: Option<FrameOutput>,
    },
    /// A source was mid-stream.
    Streaming {
        counters: FrameCounters,
        pending: Option<FrameOutput>,
        stream: Box<dyn FrameStream>,
    },
}

impl ReaderSnapshot {
    pub fn counters(&self) -> FrameCounters {
        match self {
            ReaderSnapshot::Idle { counters, .. } | ReaderSnapshot::Streaming { counters, .. } => {
                *counters
            }
        }
    }

    pub fn holds_stream(&self) -> bool {
        matches!(self, ReaderSnapshot::Streaming { .. })
    }
}

impl fmt::Debug for ReaderSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderSnapshot::Idle { counters, pending } => f
                .debug_struct("Idle")
                .field("counters", counters)
                .field("pending", &pending.is_some())
                .finish(),
            ReaderSnapshot::Streaming {
                counters, pending, ..
            } => f
                .debug_struct("Streaming")
                .field("counters", counters)
                .field("pending", &pending.is_some())
                .finish_non_exhaustive(),
        }
    }
}
