//! The sync engine implementation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::types::{EngineConfig, EngineError, FetchOutcome, FetchTicket, ViewMode};
use crate::markers::MarkerRegistry;
use crate::repository::RepositoryError;
use crate::selection::SelectionState;
use crate::spot::{Spot, SpotId, SpotSet};
use crate::surface::{MapSurface, MarkerHandle, SurfaceError, SurfaceFactory, SurfaceInit};
use crate::viewport::ViewportController;

/// Orchestrates markers, viewport, and selection against the data state.
///
/// See the [module docs](super) for the reconciliation contract. The
/// engine is single-threaded: entry points take `&mut self` and run to
/// completion before returning.
pub struct SyncEngine {
    config: EngineConfig,
    factory: Arc<dyn SurfaceFactory>,

    /// The externally-owned canvas; `Some` exactly while in Map mode and
    /// not degraded. Dropping it destroys every marker with it.
    surface: Option<Box<dyn MapSurface>>,

    registry: MarkerRegistry,
    viewport: ViewportController,
    selection: SelectionState,
    spots: SpotSet,
    view_mode: ViewMode,

    /// Why Map mode is permanently unavailable, if it is.
    degraded: Option<SurfaceError>,

    /// Highest fetch ticket issued so far.
    last_issued: u64,

    /// Marker clicks reported by the surface.
    click_rx: mpsc::UnboundedReceiver<MarkerHandle>,
}

impl SyncEngine {
    /// Create an engine starting in Map mode.
    ///
    /// If the surface cannot be created the engine comes up degraded in
    /// List mode and keeps working; [`SyncEngine::map_unavailable_reason`]
    /// carries the signal for presentation.
    pub fn new(factory: Arc<dyn SurfaceFactory>, config: EngineConfig) -> Self {
        let (click_tx, click_rx) = mpsc::unbounded_channel();
        let mut engine = Self {
            viewport: ViewportController::new(config.viewport.clone()),
            config,
            factory,
            surface: None,
            registry: MarkerRegistry::new(click_tx),
            selection: SelectionState::new(),
            spots: SpotSet::default(),
            view_mode: ViewMode::Map,
            degraded: None,
            last_issued: 0,
            click_rx,
        };

        match engine.create_surface() {
            Ok(surface) => {
                info!("Map surface created");
                engine.surface = Some(surface);
            }
            Err(e) => {
                warn!(error = %e, "Map surface unavailable, falling back to list mode");
                engine.view_mode = ViewMode::List;
                engine.degraded = Some(e);
            }
        }
        engine
    }

    fn create_surface(&self) -> Result<Box<dyn MapSurface>, SurfaceError> {
        self.factory.create(&SurfaceInit {
            center: self.config.initial_center,
            zoom: self.config.initial_zoom,
        })
    }

    /// Issue a ticket for a fetch about to start.
    ///
    /// Supersedes every previously issued ticket: their results will be
    /// discarded on arrival.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.last_issued += 1;
        FetchTicket(self.last_issued)
    }

    /// Hand a completed fetch to the engine.
    ///
    /// Applies the result only if `ticket` is still the latest; a failed
    /// fetch leaves the previous spot set and visuals untouched.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<SpotSet, RepositoryError>,
    ) -> Result<FetchOutcome, EngineError> {
        if ticket.0 != self.last_issued {
            debug!(
                ticket = ticket.0,
                latest = self.last_issued,
                "Discarding superseded fetch result"
            );
            return Ok(FetchOutcome::Stale);
        }

        let set = match result {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "Fetch failed, keeping previous spot set");
                return Ok(FetchOutcome::Failed(e));
            }
        };

        info!(count = set.len(), "Applying fetched spot set");
        self.spots = set;
        self.selection.reconcile_against(&self.spots);
        match self.surface.as_mut() {
            Some(surface) => self.registry.reconcile(&self.spots, Some(&mut **surface))?,
            None => self.registry.reconcile(&self.spots, None)?,
        };
        self.frame_camera()?;
        Ok(FetchOutcome::Applied)
    }

    /// Select a spot (marker click or list-card click) and focus it.
    pub fn select(&mut self, id: SpotId) -> Result<(), EngineError> {
        if !self.spots.contains(&id) {
            return Err(EngineError::UnknownSpot(id));
        }
        self.selection.select(id.clone());

        if let Some(surface) = self.surface.as_mut() {
            let spot = self
                .spots
                .get(&id)
                .ok_or(EngineError::UnknownSpot(id.clone()))?;
            let marker = self.registry.handle_for(&id);
            self.viewport.focus(&mut **surface, spot, marker)?;
        }
        Ok(())
    }

    /// Clear the selection (explicit user action). The camera stays put.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Switch between Map and List mode.
    ///
    /// Leaving Map empties the registry and then destroys the surface;
    /// re-entering Map builds a fresh surface and reproduces the visual
    /// state (markers for the current set, camera on the selection if one
    /// is active, else fit-all) from scratch.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<(), EngineError> {
        if mode == self.view_mode {
            return Ok(());
        }

        match mode {
            ViewMode::List => {
                debug!("Leaving map mode, tearing down surface");
                // Registry first: no handle may outlive the surface.
                self.registry.reconcile(&self.spots, None)?;
                self.surface = None;
                self.view_mode = ViewMode::List;
            }
            ViewMode::Map => {
                if self.degraded.is_some() {
                    return Err(EngineError::MapUnavailable);
                }
                let surface = match self.create_surface() {
                    Ok(surface) => surface,
                    Err(e) => {
                        warn!(error = %e, "Surface creation failed, map mode degraded");
                        self.degraded = Some(e.clone());
                        return Err(EngineError::SurfaceCreation(e));
                    }
                };
                debug!("Entering map mode with fresh surface");
                self.surface = Some(surface);
                self.view_mode = ViewMode::Map;
                match self.surface.as_mut() {
                    Some(surface) => {
                        self.registry.reconcile(&self.spots, Some(&mut **surface))?
                    }
                    None => self.registry.reconcile(&self.spots, None)?,
                };
                self.frame_camera()?;
            }
        }
        Ok(())
    }

    /// Drain pending marker clicks, turning each into a selection.
    ///
    /// Returns the number of clicks processed.
    pub fn pump_clicks(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(handle) = self.click_rx.try_recv() {
            if self.apply_click(handle).is_some() {
                processed += 1;
            }
        }
        processed
    }

    /// Turn one reported marker click into a selection.
    ///
    /// Returns the selected identity, or `None` if the click raced a
    /// reconcile that removed the marker.
    pub fn apply_click(&mut self, handle: MarkerHandle) -> Option<SpotId> {
        let Some(id) = self.registry.spot_for(handle).cloned() else {
            debug!(%handle, "Dropping click on dead marker");
            return None;
        };
        if let Err(e) = self.select(id.clone()) {
            warn!(error = %e, "Click selection failed");
            return None;
        }
        Some(id)
    }

    /// Receiver end of the marker click channel, for async drivers that
    /// await clicks instead of polling [`SyncEngine::pump_clicks`].
    pub(crate) fn click_receiver(&mut self) -> &mut mpsc::UnboundedReceiver<MarkerHandle> {
        &mut self.click_rx
    }

    /// Camera policy after a data or mode change: selection-driven focus
    /// wins over fit-all; an empty set moves nothing.
    fn frame_camera(&mut self) -> Result<(), EngineError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        match self.selection.current() {
            Some(id) => {
                // Selection survived reconcile_against, so it is present.
                if let Some(spot) = self.spots.get(id) {
                    let marker = self.registry.handle_for(id);
                    self.viewport.focus(&mut **surface, spot, marker)?;
                }
            }
            None => self.viewport.fit_all(&mut **surface, &self.spots),
        }
        Ok(())
    }

    // === Read accessors ===

    /// The current spot set.
    pub fn spots(&self) -> &SpotSet {
        &self.spots
    }

    /// The currently selected identity, if any.
    pub fn selection(&self) -> Option<&SpotId> {
        self.selection.current()
    }

    /// The currently selected spot record, if any.
    pub fn selected_spot(&self) -> Option<&Spot> {
        self.selection.current().and_then(|id| self.spots.get(id))
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Whether a surface is currently live.
    pub fn surface_live(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether Map mode can be entered at all.
    pub fn is_map_available(&self) -> bool {
        self.degraded.is_none()
    }

    /// Why Map mode is degraded, if it is.
    pub fn map_unavailable_reason(&self) -> Option<&SurfaceError> {
        self.degraded.as_ref()
    }

    /// Identities with a live marker (empty when no surface).
    pub fn live_marker_ids(&self) -> std::collections::HashSet<SpotId> {
        self.registry.live_ids()
    }
}
