//! Viewport controller: the two camera framing strategies.
//!
//! `fit_all` frames the whole spot set; `focus` centers one spot at a
//! closer zoom and opens its popup. They are mutually exclusive; the
//! sync engine decides which to invoke, never this module.

use std::time::Duration;

use tracing::debug;

use crate::spot::{Spot, SpotSet};
use crate::surface::{MapSurface, MarkerHandle, SurfaceError};

/// Camera framing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    /// Pixel padding around fitted bounds.
    pub fit_padding: u32,
    /// Animation length for a bounds fit.
    pub fit_duration: Duration,
    /// Zoom level when focusing a single spot.
    pub focus_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fit_padding: 50,
            fit_duration: Duration::from_millis(1000),
            focus_zoom: 14.0,
        }
    }
}

/// Computes and applies camera framing.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    config: ViewportConfig,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        Self { config }
    }

    /// Frame every spot in `spots`.
    ///
    /// An empty set is a no-op: the camera stays where it is rather than
    /// framing an undefined region.
    pub fn fit_all(&self, surface: &mut dyn MapSurface, spots: &SpotSet) {
        let Some(bounds) = spots.bounds() else {
            debug!("Fit-all skipped: empty spot set");
            return;
        };
        surface.fit_bounds(bounds, self.config.fit_padding, self.config.fit_duration);
    }

    /// Center the camera on one spot and open its popup if a marker is
    /// live for it.
    pub fn focus(
        &self,
        surface: &mut dyn MapSurface,
        spot: &Spot,
        marker: Option<MarkerHandle>,
    ) -> Result<(), SurfaceError> {
        debug!(spot = %spot.id, "Focusing viewport");
        surface.fly_to(spot.position, self.config.focus_zoom);
        if let Some(marker) = marker {
            surface.open_popup(marker)?;
        }
        Ok(())
    }
}
