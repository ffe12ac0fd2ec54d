use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{info, warn};

use crate::config::{ViewerConfig, CHANGE_CHANNEL_SIZE};
use crate::detail::{DetailLoader, DetailState};
use crate::error::ReportError;
use crate::loader;
use crate::selection::SelectionState;
use crate::source::SharedSource;
use crate::store::TestPreviewStore;

pub type SharedState = Arc<ViewerState>;

/// Published after every state mutation so open views can re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateEvent {
    PreviewsLoaded,
    PreviewsFailed,
    SelectionChanged,
    DetailChanged,
}

/// Session state of one viewer. Built once and handed to the router and
/// the exporter; nothing here is global.
pub struct ViewerState {
    pub config: ViewerConfig,
    pub source: SharedSource,
    pub previews: RwLock<TestPreviewStore>,
    pub selection: RwLock<SelectionState>,
    pub detail: DetailLoader,
    pub events_tx: broadcast::Sender<StateEvent>,
    // Serialises list fetches; at most one is in flight.
    load_lock: Mutex<()>,
}

impl ViewerState {
    pub fn new(config: ViewerConfig, source: SharedSource) -> Self {
        let (events_tx, _) = broadcast::channel(CHANGE_CHANNEL_SIZE);
        Self {
            config,
            detail: DetailLoader::new(source.clone(), events_tx.clone()),
            source,
            previews: RwLock::new(TestPreviewStore::new()),
            selection: RwLock::new(SelectionState::new()),
            events_tx,
            load_lock: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events_tx.subscribe()
    }

    fn notify(&self, event: StateEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Fetch the preview collection and replace the current one.
    /// Returns the number of previews loaded.
    pub async fn load(&self) -> Result<usize, ReportError> {
        let _guard = self.load_lock.lock().await;
        self.load_locked().await
    }

    /// First load only. A failed attempt stays failed until an explicit
    /// [`ViewerState::load`]; views render the recorded error meanwhile.
    pub async fn ensure_loaded(&self) {
        let _guard = self.load_lock.lock().await;
        {
            let previews = self.previews.read().await;
            if previews.is_loaded() || previews.last_error().is_some() {
                return;
            }
        }
        let _ = self.load_locked().await;
    }

    async fn load_locked(&self) -> Result<usize, ReportError> {
        match loader::load_report(self.source.as_ref(), None).await {
            Ok(report) => {
                let count = report.results.len();
                info!("Loaded {} test previews from {}", count, self.source.describe());
                self.previews.write().await.replace(report);
                self.notify(StateEvent::PreviewsLoaded);
                self.auto_select().await;
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to load report: {}", e);
                self.previews.write().await.record_error(e.to_string());
                self.notify(StateEvent::PreviewsFailed);
                Err(e)
            }
        }
    }

    async fn auto_select(&self) {
        let previews = self.previews.read().await;
        let mut selection = self.selection.write().await;
        if let Some(id) = selection.on_previews_loaded(previews.previews()) {
            info!("Auto-selected first test {}", id);
            self.notify(StateEvent::SelectionChanged);
            self.detail.select(&id);
        }
    }

    /// Explicit pick of a test present in the loaded collection.
    pub async fn select(&self, id: &str) -> Result<(), ReportError> {
        let previews = self.previews.read().await;
        let mut selection = self.selection.write().await;
        let changed = selection.selected_id() != Some(id);
        selection.select(id, previews.previews())?;
        drop(previews);

        if changed {
            self.notify(StateEvent::SelectionChanged);
        }
        // Still under the selection guard: the detail slot follows picks in
        // the order they were made.
        self.detail.select(id);
        Ok(())
    }

    /// Detail of one test for a read-only view. Reuses the session slot
    /// when it already holds `id`; otherwise fetches without touching the
    /// selection or publishing events.
    pub async fn detail_for(&self, id: &str) -> Result<DetailState, ReportError> {
        if !self.previews.read().await.contains(id) {
            return Err(ReportError::NotFound(id.to_string()));
        }
        let current = self.detail.current();
        if let DetailState::Loaded { id: loaded, .. } = &current.state {
            if loaded == id {
                return Ok(current.state);
            }
        }
        let result = loader::load_test(self.source.as_ref(), id, None).await;
        Ok(DetailState::from_result(id, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReportLocation, DEFAULT_BIND_ADDR, DEFAULT_VIEWER_PORT};
    use crate::source::FsSource;
    use std::path::PathBuf;

    fn make_test_config() -> ViewerConfig {
        ViewerConfig {
            location: ReportLocation::Dir(PathBuf::from("/tmp/does-not-exist")),
            port: DEFAULT_VIEWER_PORT,
            bind: DEFAULT_BIND_ADDR.to_string(),
            export_dir: None,
            log_file: None,
        }
    }

    fn make_state() -> ViewerState {
        ViewerState::new(
            make_test_config(),
            Arc::new(FsSource::new("/tmp/does-not-exist")),
        )
    }

    #[test]
    fn test_viewer_state_construction() {
        let state = make_state();
        assert_eq!(state.config.port, DEFAULT_VIEWER_PORT);
        assert!(state.previews.try_read().unwrap().previews().is_empty());
        assert!(state.selection.try_read().unwrap().selected_id().is_none());
    }

    #[tokio::test]
    async fn test_failed_load_is_recorded() {
        let state = make_state();
        let mut rx = state.subscribe();
        assert!(state.load().await.is_err());
        assert!(state.previews.read().await.last_error().is_some());
        assert_eq!(rx.try_recv().unwrap(), StateEvent::PreviewsFailed);
    }

    #[tokio::test]
    async fn test_ensure_loaded_does_not_retry_after_failure() {
        let state = make_state();
        state.ensure_loaded().await;
        let mut rx = state.subscribe();
        state.ensure_loaded().await;
        assert!(rx.try_recv().is_err());
        assert!(state.previews.read().await.last_error().is_some());
    }

    #[tokio::test]
    async fn test_select_before_load_is_not_found() {
        let state = make_state();
        let err = state.select("a").await.unwrap_err();
        assert!(matches!(err, ReportError::NotFound(_)));
    }
}
