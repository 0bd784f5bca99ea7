//! Async discovery service facade.
//!
//! Wraps the synchronous [`SyncEngine`](crate::engine::SyncEngine) in a
//! background daemon task. Callers hold a [`DiscoveryHandle`]: commands
//! go in over a channel, state comes back as [`DiscoverySnapshot`]s on a
//! watch channel, and notable transitions are broadcast as
//! [`DiscoveryEvent`]s. Fetches run as spawned tasks so a slow backend
//! never blocks the command loop.

mod discovery;
mod types;

pub use discovery::{DiscoveryHandle, DiscoveryService};
pub use types::{DiscoveryEvent, DiscoverySnapshot, ServiceConfig, ServiceError};
