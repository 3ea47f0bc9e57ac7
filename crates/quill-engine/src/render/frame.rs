use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counter identifying the frame currently being recorded.
///
/// Meshes stamp their buffers with the serial of the last frame that drew them;
/// a buffer stamped with the current serial is still referenced by unsubmitted
/// commands and must not be overwritten in place.
#[derive(Debug, Clone, Default)]
pub struct FrameSerial(Arc<AtomicU64>);

impl FrameSerial {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Moves to the next frame and returns its serial.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Last frame a GPU buffer was referenced by a draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BufferUse(Option<u64>);

impl BufferUse {
    #[inline]
    pub(crate) fn mark(&mut self, serial: &FrameSerial) {
        self.0 = Some(serial.current());
    }

    /// True when unsubmitted commands of the current frame read the buffer.
    #[inline]
    pub(crate) fn in_flight(self, serial: &FrameSerial) -> bool {
        self.0 == Some(serial.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_counter() {
        let a = FrameSerial::new();
        let b = a.clone();
        assert_eq!(a.advance(), 1);
        assert_eq!(b.current(), 1);
    }

    #[test]
    fn buffer_use_expires_with_the_frame() {
        let serial = FrameSerial::new();
        let mut usage = BufferUse::default();
        assert!(!usage.in_flight(&serial));

        usage.mark(&serial);
        assert!(usage.in_flight(&serial));

        serial.advance();
        assert!(!usage.in_flight(&serial));
    }
}
