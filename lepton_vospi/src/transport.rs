use std::io::Read;

use crate::error::Result;

/// Byte source the packets are read from.
///
/// The synchronizer issues blocking 164-byte reads and treats anything
/// but a whole packet (short count or error) as a recoverable transport
/// fault, so implementations only need the one method.
pub trait Transport {
    /// Reads into `buf`, returning the number of bytes actually read.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Adapts any [`std::io::Read`]: the SPI device node in production,
/// in-memory byte streams in tests.
pub struct StdTransport<IO: Read> {
    io: IO,
}

impl<IO: Read> StdTransport<IO> {
    pub fn new(io: IO) -> Self {
        StdTransport { io }
    }
}

impl<IO: Read> Transport for StdTransport<IO> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = self.io.read(buf)?;
        Ok(count)
    }
}
