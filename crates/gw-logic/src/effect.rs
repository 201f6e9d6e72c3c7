//! Logic effects — the actions a logic can request during its tick.

use gw_core::EntityId;
use gw_tracker::LockEvent;
use gw_world::AimCommand;

/// An action a logic wants performed after the tick's logic phase.
///
/// Effects are produced by [`BlockLogic::tick`][crate::BlockLogic::tick] and
/// consumed by the owning endpoint: aim effects step the named mount, lock
/// events are recorded and rebroadcast to nearby peers.  Logic code never
/// mutates the world or touches the network directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Step `sensor`'s mount with `command` this tick.
    Aim {
        sensor: EntityId,
        command: AimCommand,
    },

    /// A tracker lock was acquired, moved, or released.
    LockChanged(LockEvent),
}
