//! Engine types and configuration.

use std::fmt;

use crate::geo::GeoPoint;
use crate::repository::RepositoryError;
use crate::spot::SpotId;
use crate::surface::SurfaceError;
use crate::viewport::ViewportConfig;

/// Default camera center: Lagos, Nigeria.
pub const DEFAULT_CENTER_LAT: f64 = 6.5244;
pub const DEFAULT_CENTER_LON: f64 = 3.3792;

/// Default zoom for a fresh surface.
pub const DEFAULT_ZOOM: f64 = 10.0;

/// Which visual mode the discovery view is in.
///
/// Controls whether the map surface (and with it every marker) exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Map,
    List,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Map => write!(f, "map"),
            ViewMode::List => write!(f, "list"),
        }
    }
}

/// Token identifying one issued fetch.
///
/// Monotonically increasing; only the latest ticket's result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(pub(crate) u64);

/// What happened to a completed fetch when handed to the engine.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The result replaced the current spot set.
    Applied,
    /// A newer fetch was issued meanwhile; the result was discarded.
    Stale,
    /// The fetch failed; previous data and visuals were kept.
    Failed(RepositoryError),
}

/// Errors reported by engine entry points.
#[derive(Debug)]
pub enum EngineError {
    /// The surface could not be created; Map mode is degraded.
    SurfaceCreation(SurfaceError),
    /// A marker or camera operation failed on a live surface.
    Surface(SurfaceError),
    /// Selection requested for an identity not in the current set.
    UnknownSpot(SpotId),
    /// Map mode was requested but is permanently unavailable.
    MapUnavailable,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SurfaceCreation(e) => {
                write!(f, "Failed to create map surface: {}", e)
            }
            EngineError::Surface(e) => write!(f, "Surface operation failed: {}", e),
            EngineError::UnknownSpot(id) => {
                write!(f, "Spot '{}' is not in the current result set", id)
            }
            EngineError::MapUnavailable => {
                write!(f, "Map mode is unavailable; continuing in list mode")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::SurfaceCreation(e) | EngineError::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SurfaceError> for EngineError {
    fn from(e: SurfaceError) -> Self {
        Self::Surface(e)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Camera center for a fresh surface.
    pub initial_center: GeoPoint,
    /// Camera zoom for a fresh surface.
    pub initial_zoom: f64,
    /// Camera framing parameters.
    pub viewport: ViewportConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_center: GeoPoint::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON)
                .expect("default center coordinates are valid"),
            initial_zoom: DEFAULT_ZOOM,
            viewport: ViewportConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_initial_center(mut self, center: GeoPoint) -> Self {
        self.initial_center = center;
        self
    }

    pub fn with_initial_zoom(mut self, zoom: f64) -> Self {
        self.initial_zoom = zoom;
        self
    }

    pub fn with_viewport(mut self, viewport: ViewportConfig) -> Self {
        self.viewport = viewport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_centers_on_lagos() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_center.lat(), 6.5244);
        assert_eq!(config.initial_center.lon(), 3.3792);
        assert_eq!(config.initial_zoom, 10.0);
    }

    #[test]
    fn test_ticket_ordering() {
        assert!(FetchTicket(2) > FetchTicket(1));
    }

    #[test]
    fn test_view_mode_display() {
        assert_eq!(ViewMode::Map.to_string(), "map");
        assert_eq!(ViewMode::List.to_string(), "list");
    }
}
