//! Loader for the details pane.
//!
//! Only one detail fetch is meaningful at a time. Every selection bumps a
//! generation counter and cancels the previous fetch; a result is written
//! to the slot only if its generation is still current, so a slow response
//! for an old selection can never overwrite a newer one.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ReportError;
use crate::loader;
use crate::model::Test;
use crate::source::SharedSource;
use crate::state::StateEvent;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DetailState {
    Idle,
    Loading { id: String },
    Loaded { id: String, test: Arc<Test> },
    Failed { id: String, error: String },
}

impl DetailState {
    pub fn id(&self) -> Option<&str> {
        match self {
            DetailState::Idle => None,
            DetailState::Loading { id }
            | DetailState::Loaded { id, .. }
            | DetailState::Failed { id, .. } => Some(id.as_str()),
        }
    }

    /// Settled state for a fetch of `id`, keyed by the requested id even when
    /// the record carries another one.
    pub fn from_result(id: &str, result: Result<Test, ReportError>) -> Self {
        match result {
            Ok(test) => DetailState::Loaded {
                id: id.to_string(),
                test: Arc::new(test),
            },
            Err(e) => DetailState::Failed {
                id: id.to_string(),
                error: e.to_string(),
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailSlot {
    pub generation: u64,
    #[serde(flatten)]
    pub state: DetailState,
}

pub struct DetailLoader {
    source: SharedSource,
    slot: Arc<watch::Sender<DetailSlot>>,
    inflight: Mutex<Option<CancellationToken>>,
    events: broadcast::Sender<StateEvent>,
}

impl DetailLoader {
    pub fn new(source: SharedSource, events: broadcast::Sender<StateEvent>) -> Self {
        let (slot, _) = watch::channel(DetailSlot {
            generation: 0,
            state: DetailState::Idle,
        });
        Self {
            source,
            slot: Arc::new(slot),
            inflight: Mutex::new(None),
            events,
        }
    }

    pub fn current(&self) -> DetailSlot {
        self.slot.borrow().clone()
    }

    /// Start loading `id`, superseding whatever was in flight.
    /// Returns the generation assigned to this request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select(&self, id: &str) -> u64 {
        let mut inflight = self
            .inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let current = self.slot.borrow().clone();
        let already_there = match &current.state {
            DetailState::Loading { id: current_id } | DetailState::Loaded { id: current_id, .. } => {
                current_id == id
            }
            _ => false,
        };
        if already_there {
            return current.generation;
        }

        if let Some(previous) = inflight.take() {
            debug!("Cancelling superseded detail fetch");
            previous.cancel();
        }

        let generation = current.generation + 1;
        self.slot.send_replace(DetailSlot {
            generation,
            state: DetailState::Loading { id: id.to_string() },
        });
        let _ = self.events.send(StateEvent::DetailChanged);

        let token = CancellationToken::new();
        *inflight = Some(token.clone());
        drop(inflight);

        let source = self.source.clone();
        let slot = self.slot.clone();
        let events = self.events.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let result = loader::load_test(source.as_ref(), &id, Some(&token)).await;
            if matches!(result, Err(ReportError::Cancelled)) {
                return;
            }
            write_if_current(&slot, &events, generation, &id, result);
        });

        generation
    }

    /// Wait until the current generation leaves `Loading`.
    pub async fn wait_settled(&self) -> DetailSlot {
        let mut rx = self.slot.subscribe();
        let settled = match rx.wait_for(|slot| !slot.state.is_loading()).await {
            Ok(slot) => slot.clone(),
            Err(_) => self.current(),
        };
        settled
    }
}

/// `DetailChanged` is published before slot watchers wake.
fn write_if_current(
    slot: &watch::Sender<DetailSlot>,
    events: &broadcast::Sender<StateEvent>,
    generation: u64,
    id: &str,
    result: Result<Test, ReportError>,
) -> bool {
    slot.send_if_modified(|current| {
        if current.generation != generation {
            debug!(
                "Discarding stale detail for {} (generation {} < {})",
                id, generation, current.generation
            );
            return false;
        }
        match &result {
            Ok(test) => info!("Loaded test {} ({} steps)", id, test.step_count()),
            Err(e) => warn!("Failed to load test {}: {}", id, e),
        }
        current.state = DetailState::from_result(id, result);
        let _ = events.send(StateEvent::DetailChanged);
        true
    })
}
