use std::{thread, time::Duration};

use log::{debug, trace};

use crate::{
    error::{Error, Result},
    frame::FrameBuffer,
    packet::{Packet, PACKETS_PER_FRAME, PACKET_SIZE, SEGMENT_SLOT},
    sensor::SensorKind,
    store::SegmentId,
    transport::Transport,
};

/// Bad reads tolerated within one frame attempt before giving up.
const MAX_RESETS: u32 = 750;
/// Pause before re-acquiring after a bad or misordered packet.
const RESYNC_PAUSE: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    /// Waiting for the packet that belongs in this slot.
    Acquiring(usize),
    /// All 60 slots filled with matching sequence numbers.
    Complete,
    /// Bad-read budget for this attempt exhausted.
    Aborted,
}

/// One fully validated frame, with the segment number seen at slot 20
/// when the sensor labels its frames.
pub struct CapturedFrame {
    pub buffer: FrameBuffer,
    pub segment: Option<SegmentId>,
}

/// Reads packets one slot at a time and recovers from stream slips by
/// restarting the frame from slot 0.
///
/// Two retry tracks: short reads and discard packets count toward a
/// per-attempt abort threshold (a dead sensor must surface as an
/// error), while sequence mismatches retry unbounded (a boundary slip
/// realigns on its own once reads land on a packet edge).
pub struct PacketSynchronizer<'a, T: Transport> {
    transport: &'a mut T,
    sensor: SensorKind,
}

impl<'a, T: Transport> PacketSynchronizer<'a, T> {
    pub fn new(transport: &'a mut T, sensor: SensorKind) -> Self {
        PacketSynchronizer { transport, sensor }
    }

    pub fn capture_frame(&mut self) -> Result<CapturedFrame> {
        let mut state = SyncState::Acquiring(0);
        let mut resets: u32 = 0;
        let mut segment: Option<SegmentId> = None;
        let mut buffer = FrameBuffer::new();
        let mut raw = [0u8; PACKET_SIZE];

        loop {
            let slot = match state {
                SyncState::Acquiring(slot) => slot,
                SyncState::Complete => return Ok(CapturedFrame { buffer, segment }),
                SyncState::Aborted => {
                    debug!("giving up on this frame after {resets} bad reads");
                    return Err(Error::Desynchronized { resets });
                }
            };

            let whole = matches!(self.transport.read(&mut raw), Ok(n) if n == PACKET_SIZE);
            if !whole {
                state = count_and_realign(&mut resets, &mut segment, slot, "short read");
                continue;
            }

            let packet = Packet::parse(&raw)?;
            if packet.is_discard() {
                state = count_and_realign(&mut resets, &mut segment, slot, "discard packet");
                continue;
            }
            // A whole, non-discard packet proves the sensor is alive
            resets = 0;

            if usize::from(packet.number()) != slot {
                trace!("packet {} arrived at slot {slot}, re-acquiring", packet.number());
                state = realign(&mut segment);
                continue;
            }

            if self.sensor.is_segmented() && slot == SEGMENT_SLOT {
                match SegmentId::new(packet.segment()) {
                    Some(id) => segment = Some(id),
                    None => {
                        // An out-of-range nibble means the stream is not
                        // where we think it is; handle like a mismatch
                        trace!("invalid segment number {}, re-acquiring", packet.segment());
                        state = realign(&mut segment);
                        continue;
                    }
                }
            }

            buffer.set(slot, packet);
            state = if slot + 1 == PACKETS_PER_FRAME {
                SyncState::Complete
            } else {
                SyncState::Acquiring(slot + 1)
            };
        }
    }
}

/// Restart the frame from slot 0, dropping everything captured so far.
/// Not counted toward the abort threshold.
fn realign(segment: &mut Option<SegmentId>) -> SyncState {
    *segment = None;
    thread::sleep(RESYNC_PAUSE);
    SyncState::Acquiring(0)
}

/// Restart as [`realign`], but draw on the per-attempt bad-read budget.
fn count_and_realign(
    resets: &mut u32,
    segment: &mut Option<SegmentId>,
    slot: usize,
    what: &str,
) -> SyncState {
    *resets += 1;
    if *resets > MAX_RESETS {
        return SyncState::Aborted;
    }
    trace!("{what} at slot {slot}, re-acquiring (reset {resets})");
    realign(segment)
}
