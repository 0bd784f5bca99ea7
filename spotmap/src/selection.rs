//! Selection state: the user's current focus, at most one spot.
//!
//! Selection is independent of fetch freshness. It is set and cleared
//! only by explicit user action, with one exception: if a refresh drops
//! the selected identity from the data set, the selection reverts to
//! none (`reconcile_against`).

use tracing::debug;

use crate::spot::{SpotId, SpotSet};

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Option<SpotId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current selection.
    pub fn select(&mut self, id: SpotId) {
        debug!(spot = %id, "Spot selected");
        self.current = Some(id);
    }

    /// Clear the selection (explicit user action).
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The currently selected identity, if any.
    pub fn current(&self) -> Option<&SpotId> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, id: &SpotId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Drop the selection if its identity is absent from `spots`.
    ///
    /// Returns `true` if the selection was cleared. Called after every
    /// successful fetch, before any viewport action.
    pub fn reconcile_against(&mut self, spots: &SpotSet) -> bool {
        match &self.current {
            Some(id) if !spots.contains(id) => {
                debug!(spot = %id, "Selected spot no longer present, clearing selection");
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
