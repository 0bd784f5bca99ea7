//! Service configuration, snapshots, events, and errors.

use std::fmt;

use crate::engine::{EngineConfig, EngineError, ViewMode};
use crate::spot::{SpotId, SpotSet};

/// Configuration for the discovery service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Configuration handed to the sync engine.
    pub engine: EngineConfig,
    /// Capacity of the command channel.
    pub command_capacity: usize,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
    /// Issue an unfiltered fetch as soon as the daemon starts.
    pub fetch_on_start: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            command_capacity: 64,
            event_capacity: 64,
            fetch_on_start: true,
        }
    }
}

impl ServiceConfig {
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_fetch_on_start(mut self, fetch_on_start: bool) -> Self {
        self.fetch_on_start = fetch_on_start;
        self
    }
}

/// A point-in-time view of the discovery state.
///
/// Published on the watch channel after every state transition; readers
/// always see a complete, consistent frame.
#[derive(Debug, Clone)]
pub struct DiscoverySnapshot {
    pub spots: SpotSet,
    pub selection: Option<SpotId>,
    pub view_mode: ViewMode,
    pub map_available: bool,
}

/// A notable state transition, broadcast to subscribers.
#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    /// A fetch was applied and the spot set replaced.
    SpotsUpdated { count: usize },
    /// The selection changed, by user action or by reconciliation.
    SelectionChanged { selection: Option<SpotId> },
    /// A fetch failed; the previous spot set was kept.
    FetchFailed { error: String },
    /// The view switched between map and list.
    ViewModeChanged { mode: ViewMode },
    /// Map mode is permanently unavailable; the view stays in list mode.
    /// Also reflected durably as `map_available: false` in snapshots.
    MapUnavailable { reason: String },
}

/// Errors reported by the service handle.
#[derive(Debug)]
pub enum ServiceError {
    /// The engine rejected the command.
    Engine(EngineError),
    /// The daemon has shut down.
    Stopped,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Engine(e) => write!(f, "{}", e),
            ServiceError::Stopped => write!(f, "Discovery service is not running"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Engine(e) => Some(e),
            ServiceError::Stopped => None,
        }
    }
}

impl From<EngineError> for ServiceError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.command_capacity, 64);
        assert!(config.fetch_on_start);
    }

    #[test]
    fn test_stopped_error_display() {
        assert_eq!(
            ServiceError::Stopped.to_string(),
            "Discovery service is not running"
        );
    }
}
