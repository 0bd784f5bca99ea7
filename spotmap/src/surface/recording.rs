//! In-memory surface implementation.
//!
//! [`RecordingSurface`] implements the full capability set against plain
//! data structures: markers live in a map keyed by handle, camera commands
//! append to a log. The factory keeps a [`RecordingHandle`] for every
//! surface it creates so callers can inspect marker and camera state from
//! outside the engine, including after the surface itself is torn down.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::trace;

use super::types::{
    MapSurface, MarkerHandle, MarkerStyle, PopupSpec, SurfaceError, SurfaceFactory, SurfaceInit,
};
use crate::geo::{GeoBounds, GeoPoint};

/// One camera movement commanded on a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCommand {
    FitBounds {
        bounds: GeoBounds,
        padding: u32,
        duration: Duration,
    },
    FlyTo {
        position: GeoPoint,
        zoom: f64,
    },
}

#[derive(Debug)]
struct RecordedMarker {
    position: GeoPoint,
    style: MarkerStyle,
    popup: Option<PopupSpec>,
    popup_open: bool,
    click_tx: Option<mpsc::UnboundedSender<MarkerHandle>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    markers: HashMap<MarkerHandle, RecordedMarker>,
    camera: Vec<CameraCommand>,
    next_handle: u64,
    destroyed: bool,
}

/// Shared view into a recording surface's state.
///
/// Stays valid after the surface is dropped; `is_destroyed` reports the
/// teardown.
#[derive(Clone)]
pub struct RecordingHandle {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingHandle {
    pub fn marker_count(&self) -> usize {
        self.state.lock().unwrap().markers.len()
    }

    pub fn marker_handles(&self) -> Vec<MarkerHandle> {
        self.state.lock().unwrap().markers.keys().copied().collect()
    }

    pub fn marker_position(&self, marker: MarkerHandle) -> Option<GeoPoint> {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .map(|m| m.position)
    }

    pub fn marker_color(&self, marker: MarkerHandle) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .map(|m| m.style.color.clone())
    }

    pub fn popup_html(&self, marker: MarkerHandle) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .and_then(|m| m.popup.as_ref())
            .map(|p| p.html.clone())
    }

    pub fn is_popup_open(&self, marker: MarkerHandle) -> bool {
        self.state
            .lock()
            .unwrap()
            .markers
            .get(&marker)
            .is_some_and(|m| m.popup_open)
    }

    pub fn camera_log(&self) -> Vec<CameraCommand> {
        self.state.lock().unwrap().camera.clone()
    }

    pub fn last_camera(&self) -> Option<CameraCommand> {
        self.state.lock().unwrap().camera.last().cloned()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.lock().unwrap().destroyed
    }

    /// Simulate a user click on a marker, firing its registered listener.
    pub fn click(&self, marker: MarkerHandle) {
        let state = self.state.lock().unwrap();
        if let Some(tx) = state.markers.get(&marker).and_then(|m| m.click_tx.as_ref()) {
            // Receiver may be gone during teardown; clicks on a dying
            // surface are dropped.
            let _ = tx.send(marker);
        }
    }
}

/// In-memory [`MapSurface`] implementation.
pub struct RecordingSurface {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingSurface {
    pub fn new(init: &SurfaceInit) -> (Self, RecordingHandle) {
        let state = Arc::new(Mutex::new(RecordingState::default()));
        let surface = Self {
            state: Arc::clone(&state),
        };
        // Initial framing enters the camera log like any other command.
        surface.state.lock().unwrap().camera.push(CameraCommand::FlyTo {
            position: init.center,
            zoom: init.zoom,
        });
        (surface, RecordingHandle { state })
    }
}

impl Drop for RecordingSurface {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.markers.clear();
        state.destroyed = true;
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(
        &mut self,
        position: GeoPoint,
        style: MarkerStyle,
    ) -> Result<MarkerHandle, SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state.next_handle += 1;
        let handle = MarkerHandle::new(state.next_handle);
        trace!(%handle, %position, "Marker added");
        state.markers.insert(
            handle,
            RecordedMarker {
                position,
                style,
                popup: None,
                popup_open: false,
                click_tx: None,
            },
        );
        Ok(handle)
    }

    fn remove_marker(&mut self, marker: MarkerHandle) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state
            .markers
            .remove(&marker)
            .map(|_| trace!(%marker, "Marker removed"))
            .ok_or(SurfaceError::UnknownMarker(marker))
    }

    fn attach_popup(
        &mut self,
        marker: MarkerHandle,
        popup: PopupSpec,
    ) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        let recorded = state
            .markers
            .get_mut(&marker)
            .ok_or(SurfaceError::UnknownMarker(marker))?;
        recorded.popup = Some(popup);
        Ok(())
    }

    fn open_popup(&mut self, marker: MarkerHandle) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        let recorded = state
            .markers
            .get_mut(&marker)
            .ok_or(SurfaceError::UnknownMarker(marker))?;
        recorded.popup_open = true;
        Ok(())
    }

    fn on_marker_click(
        &mut self,
        marker: MarkerHandle,
        notify: mpsc::UnboundedSender<MarkerHandle>,
    ) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        let recorded = state
            .markers
            .get_mut(&marker)
            .ok_or(SurfaceError::UnknownMarker(marker))?;
        recorded.click_tx = Some(notify);
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding: u32, duration: Duration) {
        self.state.lock().unwrap().camera.push(CameraCommand::FitBounds {
            bounds,
            padding,
            duration,
        });
    }

    fn fly_to(&mut self, position: GeoPoint, zoom: f64) {
        self.state
            .lock()
            .unwrap()
            .camera
            .push(CameraCommand::FlyTo { position, zoom });
    }
}

/// Factory producing [`RecordingSurface`]s and retaining a handle to each.
#[derive(Default)]
pub struct RecordingSurfaceFactory {
    created: Mutex<Vec<RecordingHandle>>,
}

impl RecordingSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles to every surface created so far, in creation order.
    pub fn surfaces(&self) -> Vec<RecordingHandle> {
        self.created.lock().unwrap().clone()
    }

    /// Handle to the most recently created surface.
    pub fn last_surface(&self) -> Option<RecordingHandle> {
        self.created.lock().unwrap().last().cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    fn create(&self, init: &SurfaceInit) -> Result<Box<dyn MapSurface>, SurfaceError> {
        let (surface, handle) = RecordingSurface::new(init);
        self.created.lock().unwrap().push(handle);
        Ok(Box::new(surface))
    }
}

/// Factory that always fails, standing in for a provider with missing
/// credentials. Drives the degraded-mode path.
pub struct UnavailableSurfaceFactory {
    reason: String,
}

impl UnavailableSurfaceFactory {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SurfaceFactory for UnavailableSurfaceFactory {
    fn create(&self, _init: &SurfaceInit) -> Result<Box<dyn MapSurface>, SurfaceError> {
        Err(SurfaceError::CreationFailed(self.reason.clone()))
    }
}
