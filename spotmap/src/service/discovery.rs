//! The discovery service daemon and its handle.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     DiscoveryService                       │
//! │                                                            │
//! │  ┌──────────────────┐   commands    ┌───────────────────┐  │
//! │  │ DiscoveryHandle  │ ────────────► │  DiscoveryDaemon  │  │
//! │  │ (cloneable)      │ ◄──────────── │  owns SyncEngine  │  │
//! │  └──────────────────┘  snapshots /  └───────┬───────────┘  │
//! │                        events               │ spawns       │
//! │                                     ┌───────▼───────────┐  │
//! │                                     │ fetch task        │  │
//! │                                     │ (one per request) │  │
//! │                                     └───────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each fetch runs as its own spawned task carrying the ticket it was
//! issued; completions funnel back into the daemon, which applies or
//! discards them under the engine's last-request-wins rule.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{DiscoveryEvent, DiscoverySnapshot, ServiceConfig, ServiceError};
use crate::engine::{EngineError, FetchOutcome, FetchTicket, SyncEngine, ViewMode};
use crate::repository::{RepositoryError, SpotRepository};
use crate::spot::{SpotFilters, SpotId, SpotSet};
use crate::surface::SurfaceFactory;

enum DiscoveryCommand {
    SetFilters(SpotFilters),
    Refresh,
    Select {
        id: SpotId,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    ClearSelection,
    SetViewMode {
        mode: ViewMode,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
}

struct FetchDone {
    ticket: FetchTicket,
    result: Result<SpotSet, RepositoryError>,
}

/// Cloneable handle for driving the discovery daemon.
#[derive(Clone)]
pub struct DiscoveryHandle {
    command_tx: mpsc::Sender<DiscoveryCommand>,
    snapshot_rx: watch::Receiver<DiscoverySnapshot>,
    event_tx: broadcast::Sender<DiscoveryEvent>,
}

impl DiscoveryHandle {
    /// Replace the filter criteria and start a fresh fetch.
    pub async fn set_filters(&self, filters: SpotFilters) -> Result<(), ServiceError> {
        self.send(DiscoveryCommand::SetFilters(filters)).await
    }

    /// Re-run the current filters against the repository.
    pub async fn refresh(&self) -> Result<(), ServiceError> {
        self.send(DiscoveryCommand::Refresh).await
    }

    /// Select a spot by identity.
    pub async fn select(&self, id: SpotId) -> Result<(), ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(DiscoveryCommand::Select { id, reply }).await?;
        rx.await
            .map_err(|_| ServiceError::Stopped)?
            .map_err(ServiceError::Engine)
    }

    /// Clear the selection.
    pub async fn clear_selection(&self) -> Result<(), ServiceError> {
        self.send(DiscoveryCommand::ClearSelection).await
    }

    /// Switch between map and list mode.
    pub async fn set_view_mode(&self, mode: ViewMode) -> Result<(), ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(DiscoveryCommand::SetViewMode { mode, reply })
            .await?;
        rx.await
            .map_err(|_| ServiceError::Stopped)?
            .map_err(ServiceError::Engine)
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> DiscoverySnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// A watch receiver for awaiting state changes.
    pub fn watch(&self) -> watch::Receiver<DiscoverySnapshot> {
        self.snapshot_rx.clone()
    }

    /// Subscribe to the event broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<DiscoveryEvent> {
        self.event_tx.subscribe()
    }

    async fn send(&self, command: DiscoveryCommand) -> Result<(), ServiceError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| ServiceError::Stopped)
    }
}

struct DiscoveryDaemon<R> {
    engine: SyncEngine,
    repository: Arc<R>,
    filters: SpotFilters,
    command_rx: mpsc::Receiver<DiscoveryCommand>,
    fetch_tx: mpsc::UnboundedSender<FetchDone>,
    fetch_rx: mpsc::UnboundedReceiver<FetchDone>,
    snapshot_tx: watch::Sender<DiscoverySnapshot>,
    event_tx: broadcast::Sender<DiscoveryEvent>,
}

impl<R: SpotRepository + 'static> DiscoveryDaemon<R> {
    async fn run(mut self, fetch_on_start: bool, shutdown: CancellationToken) {
        if let Some(reason) = self.engine.map_unavailable_reason() {
            self.emit(DiscoveryEvent::MapUnavailable {
                reason: reason.to_string(),
            });
        }
        if fetch_on_start {
            self.spawn_fetch();
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Discovery daemon received shutdown signal");
                    break;
                }
                command = self.command_rx.recv() => {
                    let Some(command) = command else {
                        debug!("All handles dropped, stopping discovery daemon");
                        break;
                    };
                    self.handle_command(command);
                }
                Some(done) = self.fetch_rx.recv() => {
                    self.handle_fetch_done(done);
                }
                Some(marker) = self.engine.click_receiver().recv() => {
                    let before = self.engine.selection().cloned();
                    self.engine.apply_click(marker);
                    self.publish_selection_if_changed(before);
                }
            }
        }
    }

    fn handle_command(&mut self, command: DiscoveryCommand) {
        match command {
            DiscoveryCommand::SetFilters(filters) => {
                debug!(?filters, "Filters replaced");
                self.filters = filters;
                self.spawn_fetch();
            }
            DiscoveryCommand::Refresh => {
                self.spawn_fetch();
            }
            DiscoveryCommand::Select { id, reply } => {
                let before = self.engine.selection().cloned();
                let result = self.engine.select(id);
                if result.is_ok() {
                    self.publish_selection_if_changed(before);
                }
                let _ = reply.send(result);
            }
            DiscoveryCommand::ClearSelection => {
                let before = self.engine.selection().cloned();
                self.engine.clear_selection();
                self.publish_selection_if_changed(before);
            }
            DiscoveryCommand::SetViewMode { mode, reply } => {
                let result = self.engine.set_view_mode(mode);
                match &result {
                    Ok(()) => {
                        self.publish_snapshot();
                        self.emit(DiscoveryEvent::ViewModeChanged { mode });
                    }
                    Err(EngineError::SurfaceCreation(e)) => {
                        // Degradation just happened; republish so readers
                        // see map_available flip.
                        self.publish_snapshot();
                        self.emit(DiscoveryEvent::MapUnavailable {
                            reason: e.to_string(),
                        });
                    }
                    Err(_) => {}
                }
                let _ = reply.send(result);
            }
        }
    }

    /// Issue a ticket and run the fetch off the command loop.
    fn spawn_fetch(&mut self) {
        let ticket = self.engine.begin_fetch();
        let repository = Arc::clone(&self.repository);
        let filters = self.filters.clone();
        let fetch_tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = repository.fetch_spots(&filters).await;
            let _ = fetch_tx.send(FetchDone { ticket, result });
        });
    }

    fn handle_fetch_done(&mut self, done: FetchDone) {
        let before = self.engine.selection().cloned();
        match self.engine.apply_fetch(done.ticket, done.result) {
            Ok(FetchOutcome::Applied) => {
                self.publish_snapshot();
                self.emit(DiscoveryEvent::SpotsUpdated {
                    count: self.engine.spots().len(),
                });
                if self.engine.selection().cloned() != before {
                    self.emit(DiscoveryEvent::SelectionChanged {
                        selection: self.engine.selection().cloned(),
                    });
                }
            }
            Ok(FetchOutcome::Stale) => {}
            Ok(FetchOutcome::Failed(e)) => {
                self.emit(DiscoveryEvent::FetchFailed {
                    error: e.to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Applying fetch result failed");
            }
        }
    }

    fn publish_selection_if_changed(&mut self, before: Option<SpotId>) {
        let after = self.engine.selection().cloned();
        if after != before {
            self.publish_snapshot();
            self.emit(DiscoveryEvent::SelectionChanged { selection: after });
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(DiscoverySnapshot {
            spots: self.engine.spots().clone(),
            selection: self.engine.selection().cloned(),
            view_mode: self.engine.view_mode(),
            map_available: self.engine.is_map_available(),
        });
    }

    fn emit(&self, event: DiscoveryEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}

/// The discovery service.
///
/// Owns the daemon task. Must be started from within a Tokio runtime.
///
/// # Lifecycle
///
/// 1. **Creation**: `start()` builds the engine and spawns the daemon
/// 2. **Operation**: callers drive it through cloned [`DiscoveryHandle`]s
/// 3. **Shutdown**: `shutdown()` cancels the daemon and waits for it
pub struct DiscoveryService {
    handle: DiscoveryHandle,
    daemon_handle: Option<JoinHandle<()>>,
    shutdown_token: CancellationToken,
}

impl DiscoveryService {
    /// Start the service with the given repository and surface factory.
    ///
    /// The engine comes up immediately (possibly degraded to list mode if
    /// the surface cannot be created); the first fetch is issued at once
    /// unless [`ServiceConfig::fetch_on_start`] is off.
    pub fn start<R>(
        config: ServiceConfig,
        repository: Arc<R>,
        surface_factory: Arc<dyn SurfaceFactory>,
    ) -> Self
    where
        R: SpotRepository + 'static,
    {
        info!("Starting discovery service");

        let engine = SyncEngine::new(surface_factory, config.engine.clone());

        let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(config.event_capacity);
        let (snapshot_tx, snapshot_rx) = watch::channel(DiscoverySnapshot {
            spots: engine.spots().clone(),
            selection: None,
            view_mode: engine.view_mode(),
            map_available: engine.is_map_available(),
        });

        let daemon = DiscoveryDaemon {
            engine,
            repository,
            filters: SpotFilters::default(),
            command_rx,
            fetch_tx,
            fetch_rx,
            snapshot_tx,
            event_tx: event_tx.clone(),
        };

        let shutdown_token = CancellationToken::new();
        let daemon_shutdown = shutdown_token.clone();
        let fetch_on_start = config.fetch_on_start;
        let daemon_handle = Some(tokio::spawn(async move {
            daemon.run(fetch_on_start, daemon_shutdown).await;
        }));

        Self {
            handle: DiscoveryHandle {
                command_tx,
                snapshot_rx,
                event_tx,
            },
            daemon_handle,
            shutdown_token,
        }
    }

    /// A handle for driving the service. Cheap to clone.
    pub fn handle(&self) -> DiscoveryHandle {
        self.handle.clone()
    }

    /// Whether the daemon is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.handle.command_tx.is_closed()
    }

    /// Shut the service down and wait for the daemon to finish.
    pub async fn shutdown(mut self) {
        info!("Shutting down discovery service");
        self.shutdown_token.cancel();
        if let Some(handle) = self.daemon_handle.take() {
            match handle.await {
                Ok(()) => info!("Discovery daemon shut down cleanly"),
                Err(e) => tracing::error!("Discovery daemon task panicked: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FixtureRepository;
    use crate::surface::{RecordingSurfaceFactory, UnavailableSurfaceFactory};
    use std::time::Duration;

    async fn settled(handle: &DiscoveryHandle) -> DiscoverySnapshot {
        let mut rx = handle.watch();
        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| !s.spots.is_empty()),
        )
        .await
        .expect("initial fetch should settle")
        .expect("daemon should stay alive")
        .clone()
    }

    fn fixture_service() -> (DiscoveryService, Arc<RecordingSurfaceFactory>) {
        let factory = Arc::new(RecordingSurfaceFactory::new());
        let service = DiscoveryService::start(
            ServiceConfig::default(),
            Arc::new(FixtureRepository::new()),
            factory.clone(),
        );
        (service, factory)
    }

    #[tokio::test]
    async fn test_initial_fetch_populates_snapshot_and_markers() {
        let (service, factory) = fixture_service();
        let handle = service.handle();

        let snapshot = settled(&handle).await;
        assert_eq!(snapshot.spots.len(), 3);
        assert_eq!(snapshot.view_mode, ViewMode::Map);
        assert!(snapshot.map_available);
        assert_eq!(factory.last_surface().unwrap().marker_count(), 3);

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_set_filters_refetches() {
        let (service, _factory) = fixture_service();
        let handle = service.handle();
        settled(&handle).await;

        handle
            .set_filters(SpotFilters {
                verified_only: true,
                ..Default::default()
            })
            .await
            .unwrap();

        let mut rx = handle.watch();
        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.spots.len() == 2),
        )
        .await
        .expect("filtered fetch should settle")
        .unwrap()
        .clone();
        assert!(snapshot.spots.iter().all(|s| s.verified));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_select_publishes_event_and_snapshot() {
        let (service, _factory) = fixture_service();
        let handle = service.handle();
        settled(&handle).await;

        let mut events = handle.subscribe();
        handle.select(SpotId::from("2")).await.unwrap();

        assert_eq!(handle.snapshot().selection, Some(SpotId::from("2")));
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            event,
            DiscoveryEvent::SelectionChanged {
                selection: Some(_)
            }
        ));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_select_unknown_spot_is_rejected() {
        let (service, _factory) = fixture_service();
        let handle = service.handle();
        settled(&handle).await;

        let result = handle.select(SpotId::from("nope")).await;
        assert!(matches!(
            result,
            Err(ServiceError::Engine(EngineError::UnknownSpot(_)))
        ));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_view_mode_round_trip() {
        let (service, factory) = fixture_service();
        let handle = service.handle();
        settled(&handle).await;

        handle.set_view_mode(ViewMode::List).await.unwrap();
        assert_eq!(handle.snapshot().view_mode, ViewMode::List);
        assert!(factory.surfaces()[0].is_destroyed());

        handle.set_view_mode(ViewMode::Map).await.unwrap();
        assert_eq!(handle.snapshot().view_mode, ViewMode::Map);
        assert_eq!(factory.created_count(), 2);
        assert_eq!(factory.last_surface().unwrap().marker_count(), 3);

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_degraded_surface_still_serves_list() {
        let service = DiscoveryService::start(
            ServiceConfig::default(),
            Arc::new(FixtureRepository::new()),
            Arc::new(UnavailableSurfaceFactory::new("no widget")),
        );
        let handle = service.handle();

        let snapshot = settled(&handle).await;
        assert_eq!(snapshot.view_mode, ViewMode::List);
        assert!(!snapshot.map_available);
        assert_eq!(snapshot.spots.len(), 3);

        assert!(matches!(
            handle.set_view_mode(ViewMode::Map).await,
            Err(ServiceError::Engine(EngineError::MapUnavailable))
        ));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_completes() {
        let (service, _factory) = fixture_service();
        assert!(service.is_running());

        tokio::time::timeout(Duration::from_secs(5), service.shutdown())
            .await
            .expect("Shutdown should complete within 5 seconds");
    }
}
