//! `gw-world` — world object table, sensor mounts, and physics seams.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`object`] | `ObjectHandle`, `WorldModel` — live objects keyed by `EntityId` |
//! | [`mount`]  | `MountDef`, `MountState`, `SensorMount` — directional mounts    |
//! | [`slew`]   | `AimCommand` + rate-limited per-tick mount stepping             |
//! | [`aim`]    | `AimOracle` trait, `OpenField`, `SphereOccluder`                |
//! | [`error`]  | `WorldError`, `WorldResult<T>`                                  |
//!
//! # Removal model
//!
//! `WorldModel::despawn` queues a removal event instead of invoking a
//! callback; the owning endpoint drains the queue once per tick and closes
//! whatever logic was attached to the departed object.  This keeps world
//! mutation and logic teardown in one place and in a fixed phase order.

pub mod aim;
pub mod error;
pub mod mount;
pub mod object;
pub mod slew;


pub use aim::{AimOracle, OpenField, Sphere, SphereOccluder};
pub use error::{WorldError, WorldResult};
pub use mount::{MountDef, MountState, SensorMount};
pub use object::{ObjectHandle, WorldModel};
pub use slew::AimCommand;
