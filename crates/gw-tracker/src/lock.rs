//! Lock state and transition events.

use gw_core::EntityId;

/// One sensor's live lock.  An entry exists only while the sensor has a
/// target or is coasting on its decay budget; it is removed the moment the
/// budget runs out with no replacement found.
#[derive(Debug, Clone, PartialEq)]
pub struct LockState {
    /// The detection the sensor is (or was last) illuminating.
    pub target: EntityId,
    /// Seconds of grace left before the lock is abandoned.  Reset to the
    /// configured hold time every tick the target is confirmed.
    pub decay_left_secs: f64,
}

/// A lock transition worth reporting: acquired, retargeted, or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub sensor: EntityId,
    pub previous: Option<EntityId>,
    pub current: Option<EntityId>,
}

impl LockEvent {
    /// `true` when the sensor went from something to nothing.
    #[inline]
    pub fn is_release(&self) -> bool {
        self.current.is_none()
    }
}
