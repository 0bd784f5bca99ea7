//! Map surface capability set.
//!
//! The engine treats the map widget as an external capability: create a
//! surface, place markers on it, move the camera. Any provider that can
//! implement [`MapSurface`] is substitutable; the crate ships a
//! [`RecordingSurface`] that implements the set in memory for headless
//! use and tests.

mod recording;
mod types;

pub use recording::{
    CameraCommand, RecordingHandle, RecordingSurface, RecordingSurfaceFactory,
    UnavailableSurfaceFactory,
};
pub use types::{
    MapSurface, MarkerHandle, MarkerStyle, PopupSpec, SurfaceError, SurfaceFactory, SurfaceInit,
};
