//! Still-image capture for FLIR Lepton thermal sensors over VoSPI.
//!
//! The sensor streams fixed 164-byte packets; 60 packets make one frame,
//! and on Lepton 3.x four labeled frames (segments) make one image. This
//! crate covers the packet synchronization state machine, per-segment
//! frame retention and the segment-to-pixel remapping. Opening and
//! configuring the SPI device, the vendor control interface and file
//! export live with the caller, behind the [`Transport`] seam.

pub mod camera;
pub mod error;
pub mod frame;
pub mod image;
pub mod packet;
pub mod sensor;
pub mod store;
pub mod sync;
pub mod transport;

pub use camera::Camera;
pub use error::{Error, Result};
pub use frame::FrameBuffer;
pub use image::{reconstruct, Image};
pub use packet::{Packet, PACKETS_PER_FRAME, PACKET_SIZE, PAYLOAD_WORDS};
pub use sensor::SensorKind;
pub use store::{SegmentId, SegmentStore};
pub use sync::{CapturedFrame, PacketSynchronizer};
pub use transport::{StdTransport, Transport};
