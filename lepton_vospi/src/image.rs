use crate::{
    error::{Error, Result},
    packet::PAYLOAD_WORDS,
    sensor::SensorKind,
    store::SegmentStore,
};

/// Image rows contributed by one segment on segmented sensors.
pub const SEGMENT_ROWS: usize = 30;

/// Dense row-major grid of raw pixel values. Cells no payload word ever
/// mapped to stay 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<u16>,
}

impl Image {
    fn blank(sensor: SensorKind) -> Image {
        Image {
            width: sensor.width(),
            height: sensor.height(),
            pixels: vec![0; sensor.width() * sensor.height()],
        }
    }

    /// Builds an image from row-major pixel data.
    ///
    /// # Panics
    /// Panics if `pixels` does not hold exactly `width * height` values.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u16>) -> Image {
        assert_eq!(pixels.len(), width * height);
        Image {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> u16 {
        self.pixels[row * self.width + col]
    }

    fn set(&mut self, row: usize, col: usize, value: u16) {
        self.pixels[row * self.width + col] = value;
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u16]> {
        self.pixels.chunks(self.width)
    }

    pub fn min_max(&self) -> (u16, u16) {
        self.pixels
            .iter()
            .fold((u16::MAX, 0), |(min, max), &v| (min.min(v), max.max(v)))
    }
}

/// Maps every payload word of every completed segment onto the pixel grid.
///
/// Segmented sensors interleave two horizontal sub-lines per packet pair:
/// even packets fill columns 0..79 of their line, odd packets columns
/// 80..159, and each segment lands 30 rows further down. Non-segmented
/// sensors map one packet to one row directly. Zero-valued words mean
/// "no data" and never overwrite a pixel that already has a value.
pub fn reconstruct(store: &SegmentStore, sensor: SensorKind) -> Result<Image> {
    let mut image = Image::blank(sensor);
    for id in crate::store::SegmentId::all().take(sensor.segments()) {
        let frame = store
            .segment(id)
            .ok_or(Error::IncompleteCapture(id.get()))?;
        for (p, packet) in frame.packets().iter().enumerate() {
            for (w, &value) in packet.payload().iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let (row, col) = if sensor.is_segmented() {
                    (p / 2 + SEGMENT_ROWS * id.index(), w + PAYLOAD_WORDS * (p % 2))
                } else {
                    (p, w)
                };
                image.set(row, col, value);
            }
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        frame::FrameBuffer,
        packet::{Packet, PACKETS_PER_FRAME, PACKET_SIZE},
        store::SegmentId,
    };
    use claims::assert_ok;

    fn packet_with(number: u8, words: &[(usize, u16)]) -> Packet {
        let mut raw = [0u8; PACKET_SIZE];
        raw[1] = number;
        for &(slot, value) in words {
            let [hi, lo] = value.to_be_bytes();
            raw[4 + 2 * slot] = hi;
            raw[4 + 2 * slot + 1] = lo;
        }
        Packet::parse(&raw).unwrap()
    }

    fn frame_with(words: &[(usize, usize, u16)]) -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        for p in 0..PACKETS_PER_FRAME {
            let packet_words: Vec<(usize, u16)> = words
                .iter()
                .filter(|&&(packet, _, _)| packet == p)
                .map(|&(_, slot, value)| (slot, value))
                .collect();
            frame.set(p, packet_with(p as u8, &packet_words));
        }
        frame
    }

    #[test]
    fn segmented_geometry_deinterleaves_packet_pairs() {
        let mut store = SegmentStore::new(SensorKind::Lepton3);
        // Distinct values in each segment: first payload word of packet 20
        // and last payload word of packet 21
        for n in 1..=4u8 {
            let id = SegmentId::new(n).unwrap();
            store.store(
                id,
                frame_with(&[(20, 0, 100 + u16::from(n)), (21, 79, 200 + u16::from(n))]),
            );
        }

        let image = assert_ok!(reconstruct(&store, SensorKind::Lepton3));
        assert_eq!(image.width(), 160);
        assert_eq!(image.height(), 120);
        for n in 1..=4u8 {
            let base_row = 30 * usize::from(n - 1);
            // Packet 20 is the even half of its pair: line 10, columns 0..79
            assert_eq!(image.get(base_row + 10, 0), 100 + u16::from(n));
            // Packet 21 is the odd half: same line, columns 80..159
            assert_eq!(image.get(base_row + 10, 159), 200 + u16::from(n));
        }
    }

    #[test]
    fn flat_geometry_maps_packet_to_row() {
        let mut store = SegmentStore::new(SensorKind::Lepton2);
        store.store(
            SegmentId::FIRST,
            frame_with(&[(0, 0, 41), (59, 79, 42), (13, 7, 43)]),
        );

        let image = assert_ok!(reconstruct(&store, SensorKind::Lepton2));
        assert_eq!(image.width(), 80);
        assert_eq!(image.height(), 60);
        assert_eq!(image.get(0, 0), 41);
        assert_eq!(image.get(59, 79), 42);
        assert_eq!(image.get(13, 7), 43);
    }

    #[test]
    fn zero_words_never_erase_written_pixels() {
        let mut store = SegmentStore::new(SensorKind::Lepton2);
        store.store(SegmentId::FIRST, frame_with(&[(5, 5, 1234)]));
        let with_value = assert_ok!(reconstruct(&store, SensorKind::Lepton2));
        assert_eq!(with_value.get(5, 5), 1234);

        // Re-storing a frame that is zero there must not matter for any
        // pixel another word already populated; unwritten cells stay 0
        assert_eq!(with_value.get(5, 6), 0);
        let (min, _) = with_value.min_max();
        assert_eq!(min, 0);
    }

    #[test]
    fn incomplete_store_is_an_error() {
        let mut store = SegmentStore::new(SensorKind::Lepton3);
        store.store(SegmentId::FIRST, FrameBuffer::new());
        assert!(matches!(
            reconstruct(&store, SensorKind::Lepton3),
            Err(Error::IncompleteCapture(2))
        ));
    }
}
