//! Integration tests for the discovery service.
//!
//! These tests verify the complete discovery flows:
//! - Initial fetch → markers → camera framing
//! - Filter change → refetch → selection reconciliation
//! - Overlapping fetches resolving last-request-wins
//! - Map/list mode round trips on a live service
//!
//! Run with: `cargo test --test discovery_integration`

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use spotmap::engine::ViewMode;
use spotmap::geo::GeoPoint;
use spotmap::repository::{
    ChatReply, FixtureRepository, RepositoryError, SpotRepository, SpotSubmission,
    VerificationVote,
};
use spotmap::service::{DiscoveryEvent, DiscoveryHandle, DiscoveryService, ServiceConfig};
use spotmap::spot::{Spot, SpotFilters, SpotId, SpotSet};
use spotmap::surface::RecordingSurfaceFactory;

// ============================================================================
// Test Helpers
// ============================================================================

fn spot(id: &str, name: &str, lat: f64, lon: f64) -> Spot {
    Spot {
        id: SpotId::from(id),
        name: name.to_string(),
        description: format!("{} description", name),
        position: GeoPoint::new(lat, lon).unwrap(),
        photo_url: String::new(),
        verified: true,
        submitted_by: "tester".to_string(),
        data_source: "community".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        verification_count: None,
        rating: None,
    }
}

/// Repository whose fetch latency depends on the search term, for
/// forcing out-of-order fetch completion.
struct StaggeredRepository;

impl SpotRepository for StaggeredRepository {
    async fn fetch_spots(&self, filters: &SpotFilters) -> Result<SpotSet, RepositoryError> {
        match filters.search.as_deref() {
            Some("slow") => {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(SpotSet::new(
                    filters.clone(),
                    vec![spot("slow", "Slow Result", 6.5244, 3.3792)],
                ))
            }
            _ => Ok(SpotSet::new(
                filters.clone(),
                vec![spot("fast", "Fast Result", 6.5355, 3.3516)],
            )),
        }
    }

    async fn fetch_spot(&self, id: &SpotId) -> Result<Spot, RepositoryError> {
        Err(RepositoryError::NotFound(id.clone()))
    }

    async fn submit_spot(&self, _submission: &SpotSubmission) -> Result<Spot, RepositoryError> {
        Err(RepositoryError::InvalidSubmission("unsupported".into()))
    }

    async fn verify_spot(&self, _vote: &VerificationVote) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn chat(&self, _message: &str) -> Result<ChatReply, RepositoryError> {
        Err(RepositoryError::Http("unsupported".into()))
    }

    async fn fetch_trending(&self) -> Result<Vec<Spot>, RepositoryError> {
        Ok(Vec::new())
    }
}

async fn wait_for_spots(
    handle: &DiscoveryHandle,
    predicate: impl FnMut(&spotmap::service::DiscoverySnapshot) -> bool,
) -> spotmap::service::DiscoverySnapshot {
    let mut rx = handle.watch();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("snapshot should settle within 5 seconds")
        .expect("daemon should stay alive")
        .clone()
}

// ============================================================================
// Full Discovery Flow
// ============================================================================

#[tokio::test]
async fn test_full_discovery_flow() {
    let factory = Arc::new(RecordingSurfaceFactory::new());
    let service = DiscoveryService::start(
        ServiceConfig::default(),
        Arc::new(FixtureRepository::new()),
        factory.clone(),
    );
    let handle = service.handle();

    // Initial fetch lands the fixture set, one marker per spot.
    let snapshot = wait_for_spots(&handle, |s| !s.spots.is_empty()).await;
    assert_eq!(snapshot.spots.len(), 3);
    assert_eq!(factory.last_surface().unwrap().marker_count(), 3);

    // Selecting a spot survives a plain refresh.
    handle.select(SpotId::from("2")).await.unwrap();
    handle.refresh().await.unwrap();
    let snapshot = wait_for_spots(&handle, |s| s.selection.is_some()).await;
    assert_eq!(snapshot.selection, Some(SpotId::from("2")));

    // A filter that still contains the selection keeps it.
    let mut events = handle.subscribe();
    handle
        .set_filters(SpotFilters {
            search: Some("mushin".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let snapshot = wait_for_spots(&handle, |s| s.spots.len() == 1).await;
    assert_eq!(snapshot.selection, Some(SpotId::from("2")));

    // A filter that drops the selection clears it.
    handle
        .set_filters(SpotFilters {
            search: Some("abula".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let snapshot = wait_for_spots(&handle, |s| s.selection.is_none()).await;
    assert_eq!(snapshot.spots.len(), 1);
    assert!(snapshot.spots.contains(&SpotId::from("3")));
    assert_eq!(factory.last_surface().unwrap().marker_count(), 1);

    // The clear was broadcast.
    let mut saw_clear = false;
    while let Ok(event) =
        tokio::time::timeout(Duration::from_millis(500), events.recv()).await
    {
        if let Ok(DiscoveryEvent::SelectionChanged { selection: None }) = event {
            saw_clear = true;
            break;
        }
    }
    assert!(saw_clear, "expected a SelectionChanged(None) event");

    service.shutdown().await;
}

// ============================================================================
// Last Request Wins
// ============================================================================

#[tokio::test]
async fn test_overlapping_fetches_resolve_last_request_wins() {
    let factory = Arc::new(RecordingSurfaceFactory::new());
    let service = DiscoveryService::start(
        ServiceConfig::default().with_fetch_on_start(false),
        Arc::new(StaggeredRepository),
        factory.clone(),
    );
    let handle = service.handle();

    // The slow fetch is issued first, the fast one supersedes it.
    handle
        .set_filters(SpotFilters {
            search: Some("slow".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    handle
        .set_filters(SpotFilters {
            search: Some("fast".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let snapshot = wait_for_spots(&handle, |s| !s.spots.is_empty()).await;
    assert!(snapshot.spots.contains(&SpotId::from("fast")));

    // The slow result arrives afterwards and must be discarded.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.spots.len(), 1);
    assert!(snapshot.spots.contains(&SpotId::from("fast")));
    assert!(!snapshot.spots.contains(&SpotId::from("slow")));
    assert_eq!(factory.last_surface().unwrap().marker_count(), 1);

    service.shutdown().await;
}

// ============================================================================
// Mode Round Trip Under Load
// ============================================================================

#[tokio::test]
async fn test_mode_round_trip_preserves_discovery_state() {
    let factory = Arc::new(RecordingSurfaceFactory::new());
    let service = DiscoveryService::start(
        ServiceConfig::default(),
        Arc::new(FixtureRepository::new()),
        factory.clone(),
    );
    let handle = service.handle();
    wait_for_spots(&handle, |s| !s.spots.is_empty()).await;
    handle.select(SpotId::from("1")).await.unwrap();

    handle.set_view_mode(ViewMode::List).await.unwrap();
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.view_mode, ViewMode::List);
    // Data and selection survive the surface teardown.
    assert_eq!(snapshot.spots.len(), 3);
    assert_eq!(snapshot.selection, Some(SpotId::from("1")));
    assert!(factory.surfaces()[0].is_destroyed());

    handle.set_view_mode(ViewMode::Map).await.unwrap();
    assert_eq!(factory.created_count(), 2);
    let surface = factory.last_surface().unwrap();
    assert_eq!(surface.marker_count(), 3);

    service.shutdown().await;
}
