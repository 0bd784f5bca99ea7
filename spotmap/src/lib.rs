//! spotmap - Data synchronization engine for location discovery
//!
//! This library keeps a visual map view of community food spots in
//! lockstep with an asynchronously fetched data set: markers mirror the
//! latest fetch, the camera frames the data or the selection, and
//! overlapping requests resolve last-request-wins.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides an async facade:
//!
//! ```ignore
//! use spotmap::repository::{RepositoryConfig, RepositoryFactory};
//! use spotmap::service::{DiscoveryService, ServiceConfig};
//! use spotmap::surface::RecordingSurfaceFactory;
//! use std::sync::Arc;
//!
//! let repository = RepositoryFactory::create(&RepositoryConfig::fixture())?;
//! let service = DiscoveryService::start(
//!     ServiceConfig::default(),
//!     Arc::new(repository),
//!     Arc::new(RecordingSurfaceFactory::new()),
//! );
//!
//! service.handle().set_filters(Default::default()).await?;
//! ```
//!
//! The synchronous core lives in [`engine`]; the [`repository`] module
//! supplies the data, and [`surface`] abstracts the map widget.

pub mod engine;
pub mod geo;
pub mod logging;
pub mod markers;
pub mod repository;
pub mod selection;
pub mod service;
pub mod session;
pub mod spot;
pub mod surface;
pub mod viewport;

/// Version of the spotmap library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
