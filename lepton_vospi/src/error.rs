use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("lost VoSPI synchronization after {resets} consecutive bad reads")]
    Desynchronized { resets: u32 },
    #[error("segmented frame completed without a segment number")]
    MissingSegmentId,
    #[error("capture is missing segment {0}")]
    IncompleteCapture(u8),
    #[error("truncated packet: got {0} of 164 bytes")]
    TruncatedPacket(usize),
    #[error("capture cancelled")]
    Cancelled,
    #[error("unknown sensor type {0:?}, expected 2 or 3")]
    UnknownSensorKind(String),
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}
