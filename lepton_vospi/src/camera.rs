use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use log::{debug, info, warn};

use crate::{
    error::{Error, Result},
    image::{reconstruct, Image},
    sensor::SensorKind,
    store::{SegmentId, SegmentStore},
    sync::{CapturedFrame, PacketSynchronizer},
    transport::Transport,
};

/// Pause between failed capture attempts.
const ATTEMPT_PAUSE: Duration = Duration::from_millis(10);

/// Owns the transport and drives capture attempts until a whole image
/// is assembled.
pub struct Camera<T: Transport> {
    transport: T,
    sensor: SensorKind,
}

/// Files a completed frame under its segment id.
///
/// A segmented frame that somehow finished without a segment number is
/// discarded here rather than stored under a guessed id; the caller
/// retries the whole capture.
pub(crate) fn assemble(
    store: &mut SegmentStore,
    frame: CapturedFrame,
    sensor: SensorKind,
) -> Result<SegmentId> {
    let id = if sensor.is_segmented() {
        frame.segment.ok_or(Error::MissingSegmentId)?
    } else {
        SegmentId::FIRST
    };
    if store.store(id, frame.buffer) {
        info!("captured segment {id}");
    } else {
        debug!("segment {id} captured again, keeping the newer frame");
    }
    Ok(id)
}

impl<T: Transport> Camera<T> {
    pub fn new(transport: T, sensor: SensorKind) -> Self {
        Camera { transport, sensor }
    }

    pub fn sensor(&self) -> SensorKind {
        self.sensor
    }

    fn capture_segment(&mut self, store: &mut SegmentStore) -> Result<SegmentId> {
        let frame = PacketSynchronizer::new(&mut self.transport, self.sensor).capture_frame()?;
        assemble(store, frame, self.sensor)
    }

    /// Captures frames until every required segment is present, then
    /// remaps them into one image.
    ///
    /// Attempt failures are retried without bound: the sensor free-runs
    /// and the next pass picks up wherever the stream realigns. This
    /// blocks until the image is complete.
    pub fn capture_image(&mut self) -> Result<Image> {
        self.capture_image_inner(None)
    }

    /// As [`Camera::capture_image`], but gives up with
    /// [`Error::Cancelled`] once `cancel` is set. The flag is checked
    /// between capture attempts, never mid-frame.
    pub fn capture_image_cancellable(&mut self, cancel: &AtomicBool) -> Result<Image> {
        self.capture_image_inner(Some(cancel))
    }

    fn capture_image_inner(&mut self, cancel: Option<&AtomicBool>) -> Result<Image> {
        let mut store = SegmentStore::new(self.sensor);
        while !store.is_complete() {
            if let Some(cancel) = cancel {
                if cancel.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled);
                }
            }
            match self.capture_segment(&mut store) {
                Ok(_) => {}
                Err(err @ (Error::Desynchronized { .. } | Error::MissingSegmentId)) => {
                    warn!("capture attempt failed: {err}, retrying");
                    thread::sleep(ATTEMPT_PAUSE);
                }
                Err(err) => return Err(err),
            }
        }
        reconstruct(&store, self.sensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuffer;

    #[test]
    fn assemble_files_labeled_frames() {
        let mut store = SegmentStore::new(SensorKind::Lepton3);
        let frame = CapturedFrame {
            buffer: FrameBuffer::new(),
            segment: SegmentId::new(3),
        };
        let id = assemble(&mut store, frame, SensorKind::Lepton3).unwrap();
        assert_eq!(id.get(), 3);
        assert!(store.segment(id).is_some());
    }

    #[test]
    fn assemble_rejects_unlabeled_segmented_frames() {
        let mut store = SegmentStore::new(SensorKind::Lepton3);
        let frame = CapturedFrame {
            buffer: FrameBuffer::new(),
            segment: None,
        };
        assert!(matches!(
            assemble(&mut store, frame, SensorKind::Lepton3),
            Err(Error::MissingSegmentId)
        ));
        assert!(!store.is_complete());
        assert!(store.segment(SegmentId::FIRST).is_none());
    }

    #[test]
    fn assemble_ignores_labels_on_flat_sensors() {
        let mut store = SegmentStore::new(SensorKind::Lepton2);
        let frame = CapturedFrame {
            buffer: FrameBuffer::new(),
            segment: None,
        };
        let id = assemble(&mut store, frame, SensorKind::Lepton2).unwrap();
        assert_eq!(id, SegmentId::FIRST);
        assert!(store.is_complete());
    }

    #[test]
    fn cancellation_is_checked_between_attempts() {
        struct NeverReady;
        impl Transport for NeverReady {
            fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
                Ok(0)
            }
        }

        let cancel = AtomicBool::new(true);
        let mut camera = Camera::new(NeverReady, SensorKind::Lepton2);
        assert!(matches!(
            camera.capture_image_cancellable(&cancel),
            Err(Error::Cancelled)
        ));
    }
}
