//! Per-destination outbound batching.

use gw_wire::Envelope;

/// Messages waiting for the next flush to one destination.
///
/// Pushes within one tick deduplicate by value, so re-sending the same
/// settings snapshot twice costs one wire message.  The scan is linear;
/// batches are at most a few dozen envelopes between flushes.
#[derive(Default)]
pub struct OutboundQueue {
    batch: Vec<Envelope>,
}

impl OutboundQueue {
    /// Add `envelope` unless an identical one is already waiting.
    pub fn push(&mut self, envelope: Envelope) {
        if self.batch.contains(&envelope) {
            return;
        }
        self.batch.push(envelope);
    }

    /// Take the whole batch, leaving the queue empty.  Order is push order.
    pub fn take_batch(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.batch)
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}
