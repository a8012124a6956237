// Search Controller Service
// Owns the query text, the debounce window, the sequence-tagged lookup
// dispatch, and the panel's presentation state. The state machine is
// synchronous and takes explicit timestamps, so every timing-dependent
// behavior reduces to a deterministic comparison; `SearchRuntime` wires
// it to the real clock and a `SearchIndex`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;

use crate::models::{SearchPhase, SearchResult};
use crate::services::events::{emit_event, EventSink};
use crate::services::search_index::{IndexError, SearchIndex};
use crate::services::viewport::{panel_visibility, DisplayClass, PanelVisibility};

/// Quiet window between the last keystroke and the lookup dispatch.
pub const DEBOUNCE_QUIET_WINDOW: Duration = Duration::from_millis(200);

/// Queries shorter than this are treated as empty, matching the index's
/// own behavior of ignoring one-character terms.
pub const MIN_QUERY_CHARS: usize = 2;

/// A lookup the controller wants dispatched. The tag comes back with the
/// response; responses for anything but the latest tag are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub seq: u64,
    pub query: String,
}

/// Render-ready view of the controller, emitted to hosts and handed out
/// by `SearchRuntime`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub query: String,
    pub phase: SearchPhase,
    pub visibility: PanelVisibility,
    pub results: Vec<SearchResult>,
}

pub struct SearchController {
    query: String,
    phase: SearchPhase,
    results: Vec<SearchResult>,
    display: DisplayClass,
    panel_toggled_open: bool,
    debounce_deadline: Option<Instant>,
    // Monotone lookup tag; `awaiting` names the only tag whose response
    // may still be applied. Anything else is stale on arrival.
    next_seq: u64,
    awaiting: Option<u64>,
    events: Arc<dyn EventSink>,
}

impl SearchController {
    pub fn new(display: DisplayClass, events: Arc<dyn EventSink>) -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::Idle,
            results: Vec::new(),
            display,
            panel_toggled_open: false,
            debounce_deadline: None,
            next_seq: 0,
            awaiting: None,
            events,
        }
    }

    /// Every input event lands here. A sub-minimum query resets to idle
    /// immediately; anything else re-arms the single-slot debounce timer
    /// and invalidates whatever lookup may still be in flight.
    pub fn set_query(&mut self, text: &str, now: Instant) {
        self.query = text.to_string();
        self.awaiting = None;

        if self.normalized_query().is_empty() {
            self.debounce_deadline = None;
            self.reset_results();
        } else {
            self.debounce_deadline = Some(now + DEBOUNCE_QUIET_WINDOW);
        }
    }

    /// Fires the debounce timer if its deadline has passed. At most one
    /// lookup per quiet window: the first caller past the deadline takes
    /// it, later callers see `None` until the next keystroke re-arms.
    pub fn take_due_lookup(&mut self, now: Instant) -> Option<PendingLookup> {
        let deadline = self.debounce_deadline?;
        if now < deadline {
            return None;
        }

        self.debounce_deadline = None;
        let query = self.normalized_query();
        if query.is_empty() {
            return None;
        }

        self.next_seq += 1;
        self.awaiting = Some(self.next_seq);
        self.phase = SearchPhase::Querying;
        self.emit_state();

        Some(PendingLookup {
            seq: self.next_seq,
            query,
        })
    }

    /// Applies a lookup response, last-write-wins by query recency. A
    /// failed lookup degrades to the empty state; it is retried only by
    /// the next user-initiated query.
    pub fn apply_result(&mut self, seq: u64, outcome: Result<Vec<SearchResult>, IndexError>) {
        if self.awaiting != Some(seq) {
            log::debug!("Dropping stale lookup response (seq {seq})");
            return;
        }
        self.awaiting = None;

        match outcome {
            Ok(results) if results.is_empty() => {
                self.results.clear();
                self.phase = SearchPhase::ShowingEmpty;
            }
            Ok(results) => {
                self.results = results;
                self.phase = SearchPhase::ShowingResults;
            }
            Err(e) => {
                log::warn!("Search lookup failed, showing empty results: {e}");
                self.results.clear();
                self.phase = SearchPhase::ShowingEmpty;
            }
        }

        self.emit_state();
    }

    /// Explicit clear: query and results emptied. On compact viewports
    /// the panel stays until the user closes it; on desktop the inline
    /// area collapses because there is no active query left.
    pub fn clear(&mut self) {
        self.query.clear();
        self.debounce_deadline = None;
        self.awaiting = None;
        self.reset_results();
    }

    /// The compact-viewport search button.
    pub fn open_panel(&mut self) {
        self.panel_toggled_open = true;
        self.emit_state();
    }

    /// Closing the panel also discards the query, so reopening starts
    /// from a blank slate.
    pub fn close_panel(&mut self) {
        self.panel_toggled_open = false;
        self.clear();
    }

    /// Presentation policy is re-derived on every size change; query and
    /// results are untouched, so crossing the breakpoint mid-search only
    /// swaps overlay for inline.
    pub fn viewport_resized(&mut self, width_px: u32) {
        let class = DisplayClass::from_width(width_px);
        if class != self.display {
            log::debug!("Display class changed to {class:?} at {width_px}px");
            self.display = class;
            self.emit_state();
        }
    }

    pub fn visibility(&self) -> PanelVisibility {
        panel_visibility(
            self.display,
            self.panel_toggled_open,
            !self.normalized_query().is_empty(),
        )
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn display(&self) -> DisplayClass {
        self.display
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            phase: self.phase,
            visibility: self.visibility(),
            results: self.results.clone(),
        }
    }

    /// Trimmed query, or empty when under the minimum length.
    fn normalized_query(&self) -> String {
        let trimmed = self.query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            String::new()
        } else {
            trimmed.to_string()
        }
    }

    fn reset_results(&mut self) {
        self.results.clear();
        self.phase = SearchPhase::Idle;
        self.emit_state();
    }

    fn emit_state(&self) {
        emit_event(self.events.as_ref(), "search_state", &self.snapshot());
    }
}

/// Async shell around the controller: spawns the debounce sleep per
/// input and runs due lookups against the index. Superseded sleeps wake
/// to find the deadline moved and do nothing; superseded lookups are
/// dropped by the sequence check in `apply_result`.
pub struct SearchRuntime {
    controller: Arc<AsyncMutex<SearchController>>,
    index: Arc<dyn SearchIndex>,
}

impl SearchRuntime {
    pub fn new(controller: SearchController, index: Arc<dyn SearchIndex>) -> Self {
        Self {
            controller: Arc::new(AsyncMutex::new(controller)),
            index,
        }
    }

    pub async fn input(&self, text: &str) {
        {
            let mut controller = self.controller.lock().await;
            controller.set_query(text, Instant::now());
            if controller.debounce_deadline.is_none() {
                return;
            }
        }

        let controller = Arc::clone(&self.controller);
        let index = Arc::clone(&self.index);
        tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE_QUIET_WINDOW).await;

            let pending = {
                let mut controller = controller.lock().await;
                controller.take_due_lookup(Instant::now())
            };

            if let Some(pending) = pending {
                let outcome = index.query(&pending.query).await;
                let mut controller = controller.lock().await;
                controller.apply_result(pending.seq, outcome);
            }
        });
    }

    pub async fn clear(&self) {
        self.controller.lock().await.clear();
    }

    pub async fn open_panel(&self) {
        self.controller.lock().await.open_panel();
    }

    pub async fn close_panel(&self) {
        self.controller.lock().await.close_panel();
    }

    pub async fn viewport_resized(&self, width_px: u32) {
        self.controller.lock().await.viewport_resized(width_px);
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        self.controller.lock().await.snapshot()
    }
}
