//! Surface traits and handle types.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::geo::{GeoBounds, GeoPoint};

/// Errors that can occur during surface operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The surface could not be created (missing provider credentials,
    /// no display, provider outage).
    CreationFailed(String),
    /// Operation referenced a marker handle this surface does not own.
    UnknownMarker(MarkerHandle),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::CreationFailed(msg) => {
                write!(f, "Surface creation failed: {}", msg)
            }
            SurfaceError::UnknownMarker(handle) => {
                write!(f, "Unknown marker handle: {}", handle)
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Opaque handle to a marker owned by a surface.
///
/// Handles are arena-style: the surface allocates them, the registry is
/// the sole holder, and no component retains one past its destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Visual style for a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    /// CSS color of the marker pin.
    pub color: String,
}

/// Detail popup attached to a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupSpec {
    pub html: String,
    /// Pixel offset from the marker anchor.
    pub offset: u32,
}

/// Initial camera framing for a new surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceInit {
    pub center: GeoPoint,
    pub zoom: f64,
}

/// The map provider capability set.
///
/// Mutating calls take `&mut self`: the surface is exclusively owned by
/// the sync engine and never shared.
pub trait MapSurface: Send {
    /// Place a marker, returning its handle.
    fn add_marker(
        &mut self,
        position: GeoPoint,
        style: MarkerStyle,
    ) -> Result<MarkerHandle, SurfaceError>;

    /// Remove a marker. The handle is dead afterwards.
    fn remove_marker(&mut self, marker: MarkerHandle) -> Result<(), SurfaceError>;

    /// Attach a detail popup to a marker (closed until opened).
    fn attach_popup(&mut self, marker: MarkerHandle, popup: PopupSpec)
        -> Result<(), SurfaceError>;

    /// Open a marker's popup.
    fn open_popup(&mut self, marker: MarkerHandle) -> Result<(), SurfaceError>;

    /// Register a click listener: the surface sends the marker's handle on
    /// every click.
    fn on_marker_click(
        &mut self,
        marker: MarkerHandle,
        notify: mpsc::UnboundedSender<MarkerHandle>,
    ) -> Result<(), SurfaceError>;

    /// Animate the camera to frame `bounds` with the given padding.
    fn fit_bounds(&mut self, bounds: GeoBounds, padding: u32, duration: Duration);

    /// Animate the camera to center on `position` at `zoom`.
    fn fly_to(&mut self, position: GeoPoint, zoom: f64);
}

/// Creates map surfaces.
///
/// The engine asks for a fresh surface every time Map mode is entered;
/// surfaces are never reused across a mode round-trip.
pub trait SurfaceFactory: Send + Sync {
    fn create(&self, init: &SurfaceInit) -> Result<Box<dyn MapSurface>, SurfaceError>;
}
