use core::fmt;

use crate::{frame::FrameBuffer, sensor::SensorKind};

/// Identifies the horizontal band of the image a frame contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentId(u8);

impl SegmentId {
    /// The single implicit segment of non-segmented sensors.
    pub const FIRST: SegmentId = SegmentId(1);

    pub fn new(n: u8) -> Option<SegmentId> {
        (1..=4).contains(&n).then_some(SegmentId(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub(crate) fn all() -> impl Iterator<Item = SegmentId> {
        (1..=4).map(SegmentId)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Retains the most recent fully validated frame per segment.
///
/// Partial captures never get here: the synchronizer only hands out
/// frames whose 60 sequence numbers checked out.
pub struct SegmentStore {
    slots: [Option<FrameBuffer>; 4],
    required: usize,
}

impl SegmentStore {
    pub fn new(sensor: SensorKind) -> SegmentStore {
        SegmentStore {
            slots: [None, None, None, None],
            required: sensor.segments(),
        }
    }

    /// Files a frame under its segment id, replacing any earlier capture.
    /// Returns whether the slot was previously empty.
    pub fn store(&mut self, id: SegmentId, frame: FrameBuffer) -> bool {
        self.slots[id.index()].replace(frame).is_none()
    }

    pub fn segment(&self, id: SegmentId) -> Option<&FrameBuffer> {
        self.slots[id.index()].as_ref()
    }

    /// True once every required segment holds a frame.
    pub fn is_complete(&self) -> bool {
        self.slots[..self.required].iter().all(Option::is_some)
    }

    pub fn required(&self) -> usize {
        self.required
    }
}
