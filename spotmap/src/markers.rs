//! Marker registry: spot identity → live marker handle.
//!
//! The registry is the sole owner of marker handles. `reconcile` diffs the
//! registry against the current spot set and issues the minimal set of
//! create/destroy calls, leaving surviving markers untouched so per-marker
//! UI state (an open popup) is never discarded.

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc;
use tracing::debug;

use crate::spot::{Spot, SpotId, SpotSet};
use crate::surface::{MapSurface, MarkerHandle, MarkerStyle, PopupSpec, SurfaceError};

/// Marker pin color for community-verified spots.
pub const VERIFIED_MARKER_COLOR: &str = "#e67e22";
/// Marker pin color for unverified spots.
pub const UNVERIFIED_MARKER_COLOR: &str = "#f39c12";
/// Pixel offset between a marker and its popup.
pub const POPUP_OFFSET: u32 = 25;

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub created: usize,
    pub removed: usize,
    pub retained: usize,
}

/// Owns the mapping from spot identity to live marker handles.
pub struct MarkerRegistry {
    markers: HashMap<SpotId, MarkerHandle>,
    click_tx: mpsc::UnboundedSender<MarkerHandle>,
}

impl MarkerRegistry {
    /// Create a registry; marker clicks are reported through `click_tx`.
    pub fn new(click_tx: mpsc::UnboundedSender<MarkerHandle>) -> Self {
        Self {
            markers: HashMap::new(),
            click_tx,
        }
    }

    /// Bring the live marker set in line with `spots`.
    ///
    /// With no live surface every handle is forgotten (the markers died
    /// with the surface); creation is refused rather than attempted.
    /// Idempotent: a second call with the same set changes nothing.
    pub fn reconcile(
        &mut self,
        spots: &SpotSet,
        surface: Option<&mut dyn MapSurface>,
    ) -> Result<ReconcileStats, SurfaceError> {
        let Some(surface) = surface else {
            let removed = self.markers.len();
            self.markers.clear();
            return Ok(ReconcileStats {
                removed,
                ..Default::default()
            });
        };

        let current: HashSet<SpotId> = spots.ids();
        let mut stats = ReconcileStats::default();

        let stale: Vec<SpotId> = self
            .markers
            .keys()
            .filter(|id| !current.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(handle) = self.markers.remove(&id) {
                surface.remove_marker(handle)?;
                stats.removed += 1;
            }
        }

        for spot in spots.iter() {
            if self.markers.contains_key(&spot.id) {
                stats.retained += 1;
                continue;
            }
            let handle = self.create_marker(spot, surface)?;
            self.markers.insert(spot.id.clone(), handle);
            stats.created += 1;
        }

        debug!(
            created = stats.created,
            removed = stats.removed,
            retained = stats.retained,
            "Markers reconciled"
        );
        Ok(stats)
    }

    fn create_marker(
        &self,
        spot: &Spot,
        surface: &mut dyn MapSurface,
    ) -> Result<MarkerHandle, SurfaceError> {
        let color = if spot.verified {
            VERIFIED_MARKER_COLOR
        } else {
            UNVERIFIED_MARKER_COLOR
        };
        let handle = surface.add_marker(
            spot.position,
            MarkerStyle {
                color: color.to_string(),
            },
        )?;
        surface.attach_popup(
            handle,
            PopupSpec {
                html: popup_html(spot),
                offset: POPUP_OFFSET,
            },
        )?;
        surface.on_marker_click(handle, self.click_tx.clone())?;
        Ok(handle)
    }

    /// The marker handle for a spot, if one is live.
    pub fn handle_for(&self, id: &SpotId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    /// Reverse lookup: which spot a clicked handle belongs to.
    pub fn spot_for(&self, handle: MarkerHandle) -> Option<&SpotId> {
        self.markers
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(id, _)| id)
    }

    /// Identities with a live marker.
    pub fn live_ids(&self) -> HashSet<SpotId> {
        self.markers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Render the detail popup for a spot.
pub fn popup_html(spot: &Spot) -> String {
    let mut html = format!(
        "<div class=\"p-2\"><h3>{}</h3><p>{}</p>",
        escape(&spot.name),
        escape(&spot.description)
    );
    if spot.verified {
        html.push_str("<span class=\"badge\">Verified</span>");
    }
    if let Some(rating) = spot.rating {
        html.push_str(&format!("<p>\u{2b50} {:.1}/5</p>", rating));
    }
    html.push_str("</div>");
    html
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
