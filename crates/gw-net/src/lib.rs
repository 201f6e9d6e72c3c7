//! Network endpoints for the gridwatch runtime.
//!
//! | Module      | Provides                                                  |
//! |-------------|-----------------------------------------------------------|
//! | `transport` | [`FrameTransport`] seam + in-memory [`CollectTransport`]  |
//! | `queue`     | [`OutboundQueue`] — per-destination dedup batching        |
//! | `ingress`   | [`Ingress`]/[`IngressSender`] cross-thread frame marshal  |
//! | `server`    | [`ServerEndpoint`] — authority, fan-out, lock broadcast   |
//! | `client`    | [`ClientEndpoint`] — mirrors, attach requests, loopback   |
//!
//! # Design
//!
//! Endpoints are plain owned state machines driven by a host tick loop:
//! receive is a queue drain, send is a queue fill, and one `flush` per tick
//! turns each non-empty batch into a single versioned frame.  Everything
//! here follows the never-fail contract — decode failures, unknown peers,
//! and stale messages degrade to log lines, not errors, because the tick
//! callback driving this code has nowhere to put a failure.

pub mod client;
pub mod ingress;
pub mod queue;
pub mod server;
pub mod transport;

pub use client::ClientEndpoint;
pub use ingress::{Ingress, IngressSender, RawFrame};
pub use queue::OutboundQueue;
pub use server::{ServerConfig, ServerEndpoint, TickReport};
pub use transport::{CollectTransport, FrameTransport};
