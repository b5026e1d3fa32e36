//! Host synchronization for the grouped navigation.
//!
//! The host admin panel owns the page. This crate keeps an injected
//! navigation tree mounted inside it anyway:
//!
//! - [`dom`] — the narrow tree interface ([`HostDom`]) plus the
//!   in-memory implementation used by tests and the simulator
//! - [`discover`] — ordered discovery strategies over unversioned markup
//! - [`controller`] — the idempotent reconciler (mount, visibility,
//!   header suppression, active highlighting) and the renderer seam
//! - [`search`] — filter-input detection and the coordinated visibility
//!   toggles
//! - [`clean`] — ordering-hint stripping in host-rendered text
//! - [`route`] — client-side history and location tracking
//! - [`driver`] — the tokio loop wiring mutation events, route changes,
//!   and interval backstops into reconcile passes, with revocable
//!   teardown
//! - [`sim`] — a scripted host shell for end-to-end runs without a
//!   browser

pub mod clean;
pub mod controller;
pub mod discover;
pub mod dom;
pub mod driver;
pub mod route;
pub mod search;
pub mod sim;

pub use controller::{NavRenderer, ReconcileOutcome, RenderContext, SyncController};
pub use dom::{DomMutation, HostDom, MemoryDom, MutationReceiver, NodeId};
pub use driver::{DriverConfig, SyncHandle, spawn_sync};
pub use route::RouteTracker;
