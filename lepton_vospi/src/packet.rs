use nom::{multi::fill, number::complete::be_u16, IResult};

use crate::error::{Error, Result};

/// Size of one VoSPI packet on the wire.
pub const PACKET_SIZE: usize = 164;
/// Packets in one frame (one segment on segmented sensors).
pub const PACKETS_PER_FRAME: usize = 60;
/// Video payload words per packet, after the ID and CRC words.
pub const PAYLOAD_WORDS: usize = PACKET_SIZE / 2 - 2;
/// Slot whose ID word carries the segment number on Lepton 3.x.
pub const SEGMENT_SLOT: usize = 20;

/// One parsed VoSPI packet.
///
/// The leading ID and CRC words are kept apart from the 80 payload words
/// so the reconstructor never has to skip metadata itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    id: u16,
    crc: u16,
    payload: [u16; PAYLOAD_WORDS],
}

fn packet_body(input: &[u8]) -> IResult<&[u8], Packet> {
    let (input, id) = be_u16(input)?;
    let (input, crc) = be_u16(input)?;
    let mut payload = [0u16; PAYLOAD_WORDS];
    let (input, ()) = fill(be_u16, &mut payload)(input)?;
    Ok((input, Packet { id, crc, payload }))
}

impl Packet {
    /// Parses a raw 164-byte read into a packet.
    pub fn parse(raw: &[u8]) -> Result<Packet> {
        let (_, packet) = packet_body(raw).map_err(|_| Error::TruncatedPacket(raw.len()))?;
        Ok(packet)
    }

    pub(crate) const fn zeroed() -> Packet {
        Packet {
            id: 0,
            crc: 0,
            payload: [0; PAYLOAD_WORDS],
        }
    }

    /// The sensor marks packets carrying no video data with an all-ones
    /// low nibble in the first header byte.
    pub fn is_discard(&self) -> bool {
        (self.id >> 8) & 0x0F == 0x0F
    }

    /// Position this packet claims within its frame (0..59).
    pub fn number(&self) -> u8 {
        (self.id & 0xFF) as u8
    }

    /// Segment nibble from the ID word. Only meaningful on the packet
    /// accepted at [`SEGMENT_SLOT`] of a segmented capture.
    pub fn segment(&self) -> u8 {
        (self.id >> 12) as u8
    }

    pub fn payload(&self) -> &[u16; PAYLOAD_WORDS] {
        &self.payload
    }
}
