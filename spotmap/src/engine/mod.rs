//! Discovery sync engine.
//!
//! The engine keeps the visual map state (markers, popups, camera) in
//! lockstep with the data state: the fetched spot set, the user's
//! selection, and the map/list view mode. It exclusively owns the map
//! surface and the marker registry; every mutation of either flows
//! through the engine's entry points, each of which runs synchronously to
//! completion.
//!
//! # Reconciliation order
//!
//! On every applied fetch:
//!
//! 1. selection is reconciled against the new set (a vanished selection
//!    reverts to none),
//! 2. the marker registry is diffed against the new set,
//! 3. the camera moves: `focus` on the selection when one is active,
//!    `fit_all` otherwise. A live selection is never overridden by a
//!    racing refresh.
//!
//! Overlapping fetches follow last-request-wins: results are applied only
//! if they carry the most recently issued [`FetchTicket`].

mod sync;
mod types;

pub use sync::SyncEngine;
pub use types::{EngineConfig, EngineError, FetchOutcome, FetchTicket, ViewMode};
