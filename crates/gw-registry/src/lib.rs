//! Logic registry — binds behavior instances to entity identities that may
//! not have spawned yet.
//!
//! | Module     | Provides                                                  |
//! |------------|-----------------------------------------------------------|
//! | `registry` | [`LogicRegistry`], [`Registered`], [`UpdateOutcome`]      |
//!
//! The registry is the single owner of attached
//! [`BlockLogic`](gw_logic::BlockLogic) instances on an endpoint.  Endpoints
//! drive it in a
//! fixed per-tick order: drain pending attachments, route received updates,
//! tick every logic, then flush whatever the effects produced.

pub mod registry;

pub use registry::{LogicRegistry, Registered, UpdateOutcome};
