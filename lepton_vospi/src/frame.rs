use crate::packet::{Packet, PACKETS_PER_FRAME};

/// One complete scan pass: 60 packets whose sequence numbers match their
/// positions. Built only by the synchronizer, which enforces that
/// invariant before the buffer ever leaves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    packets: [Packet; PACKETS_PER_FRAME],
}

impl FrameBuffer {
    pub(crate) fn new() -> FrameBuffer {
        FrameBuffer {
            packets: [Packet::zeroed(); PACKETS_PER_FRAME],
        }
    }

    pub(crate) fn set(&mut self, slot: usize, packet: Packet) {
        self.packets[slot] = packet;
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }
}
