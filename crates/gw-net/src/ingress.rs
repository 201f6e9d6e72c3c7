//! Cross-thread frame delivery.
//!
//! Host network callbacks can fire on any thread; endpoint state is owned
//! by the tick thread alone.  Frames therefore marshal through an mpsc
//! channel: delivery threads hold cloned [`IngressSender`]s, the endpoint
//! drains the receiving end at the top of its tick.  This keeps the
//! single-writer rule without a lock around endpoint state.

use std::sync::mpsc::{self, Receiver, Sender};

use gw_core::PeerId;

/// One raw frame as handed over by the host channel, before decoding.
#[derive(Debug)]
pub struct RawFrame {
    pub from:  PeerId,
    pub bytes: Vec<u8>,
}

/// Cloneable handle delivery threads use to hand frames to an endpoint.
#[derive(Clone)]
pub struct IngressSender(Sender<RawFrame>);

impl IngressSender {
    pub fn deliver(&self, from: PeerId, bytes: Vec<u8>) {
        // A closed receiver means the endpoint is gone; the frame is moot.
        let _ = self.0.send(RawFrame { from, bytes });
    }
}

/// Receiving side, owned by the endpoint.
pub struct Ingress {
    tx: Sender<RawFrame>,
    rx: Receiver<RawFrame>,
}

impl Ingress {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> IngressSender {
        IngressSender(self.tx.clone())
    }

    /// Everything delivered since the last drain, in delivery order.
    pub fn drain(&mut self) -> Vec<RawFrame> {
        self.rx.try_iter().collect()
    }
}

impl Default for Ingress {
    fn default() -> Self {
        Self::new()
    }
}
