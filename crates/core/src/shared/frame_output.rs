use crate::shared::frame::Frame;

/// One item handed downstream by a reader node.
///
/// Which variant is produced is fixed by the node's `ImageOutput` setting.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutput {
    Raw(Frame),
    /// A self-contained encoded still image (JPEG, PNG, ...).
    Encoded(Vec<u8>),
}

impl FrameOutput {
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            FrameOutput::Raw(frame) => Some(frame),
            FrameOutput::Encoded(_) => None,
        }
    }

    pub fn into_frame(self) -> Option<Frame> {
        match self {
            FrameOutput::Raw(frame) => Some(frame),
            FrameOutput::Encoded(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FrameOutput::Raw(_) => None,
            FrameOutput::Encoded(bytes) => Some(bytes),
        }
    }
}

impl From<Frame> for FrameOutput {
    fn from(frame: Frame) -> Self {
        FrameOutput::Raw(frame)
    }
}
