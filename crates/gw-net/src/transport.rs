//! The secure-channel seam endpoints flush frames through.

use gw_core::PeerId;

/// Delivers one already-encoded frame to one peer.
///
/// Implementations own reliability policy entirely: the in-memory test
/// transport delivers verbatim, the simulation harness drops, duplicates and
/// delays.  Endpoints never learn whether a send arrived; the protocol above
/// is built to tolerate silence.
pub trait FrameTransport {
    fn send(&mut self, to: PeerId, frame: Vec<u8>);
}

/// Transport that just records what was sent, for tests and loop wiring.
#[derive(Default)]
pub struct CollectTransport {
    sent: Vec<(PeerId, Vec<u8>)>,
}

impl CollectTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every frame sent since the last call, in send order.
    pub fn take(&mut self) -> Vec<(PeerId, Vec<u8>)> {
        std::mem::take(&mut self.sent)
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

impl FrameTransport for CollectTransport {
    fn send(&mut self, to: PeerId, frame: Vec<u8>) {
        self.sent.push((to, frame));
    }
}
