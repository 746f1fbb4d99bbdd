//! Authoritative client-side copy of the element list.
//!
//! State lives in a `watch` channel so every mutation notifies subscribers;
//! discrete happenings (loads, merges, applied searches, failure
//! notifications) go out on a `broadcast` channel. The filtered view is never
//! stored: it is recomputed from `(elements, search_term)` on every read.
//!
//! Requests are not sequenced against each other. Two overlapping loads apply
//! in the order their responses arrive, and an update response merges even if
//! a newer load has replaced the list in the meantime.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{ElementId, PeriodicElement},
    error::ProviderError,
};
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::{
    config::Settings, debounce::Debouncer, error::StoreError, notification::Notification,
    provider::{ensure_unique_ids, DatasetProvider},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub elements: Vec<PeriodicElement>,
    pub search_term: String,
    /// True while at least one load or update request is outstanding.
    pub loading: bool,
    /// Message of the most recent failed request; cleared on the next success.
    pub error: Option<String>,
    pub selected: Option<ElementId>,
    in_flight: usize,
}

impl StoreState {
    pub fn filtered_elements(&self) -> Vec<PeriodicElement> {
        filter_elements(&self.elements, &self.search_term)
    }

    pub fn element(&self, id: ElementId) -> Option<&PeriodicElement> {
        self.elements.iter().find(|element| element.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Loaded { count: usize },
    ElementUpdated(PeriodicElement),
    SearchApplied(String),
    Notification(Notification),
}

/// Elements with at least one field whose lowercased text contains the
/// lowercased `term`, in their original order.
pub fn filter_elements(elements: &[PeriodicElement], term: &str) -> Vec<PeriodicElement> {
    let needle = term.to_lowercase();
    elements
        .iter()
        .filter(|element| element.matches_search(&needle))
        .cloned()
        .collect()
}

pub struct ElementStore {
    provider: Arc<dyn DatasetProvider>,
    state: Arc<watch::Sender<StoreState>>,
    events: broadcast::Sender<StoreEvent>,
    search: Debouncer<String>,
    notification_duration: Duration,
}

impl ElementStore {
    pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(2000);
    pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(5000);

    /// Must be called from within a Tokio runtime; the search debouncer runs
    /// as a task on it.
    pub fn new(provider: Arc<dyn DatasetProvider>) -> Self {
        Self::with_timings(
            provider,
            Self::DEFAULT_SEARCH_DEBOUNCE,
            Self::DEFAULT_NOTIFICATION_DURATION,
        )
    }

    pub fn from_settings(provider: Arc<dyn DatasetProvider>, settings: &Settings) -> Self {
        Self::with_timings(
            provider,
            settings.search_debounce(),
            settings.notification_duration(),
        )
    }

    pub fn with_timings(
        provider: Arc<dyn DatasetProvider>,
        search_debounce: Duration,
        notification_duration: Duration,
    ) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        let state = Arc::new(state);
        let (events, _) = broadcast::channel(256);

        let search = {
            let state = Arc::clone(&state);
            let events = events.clone();
            Debouncer::spawn(search_debounce, move |term: String| {
                apply_search_term(&state, &events, term);
            })
        };

        Self {
            provider,
            state,
            events,
            search,
            notification_duration,
        }
    }

    pub async fn load(&self) -> Result<(), StoreError> {
        let request = InFlight::begin(&self.state);
        match self
            .provider
            .fetch_all()
            .await
            .and_then(|elements| ensure_unique_ids(&elements).map(|()| elements))
        {
            Ok(elements) => {
                let count = elements.len();
                request.finish(|state| {
                    state.elements = elements;
                    state.error = None;
                    if let Some(id) = state.selected {
                        if state.element(id).is_none() {
                            state.selected = None;
                        }
                    }
                });
                info!(count, "elements loaded");
                let _ = self.events.send(StoreEvent::Loaded { count });
                Ok(())
            }
            Err(err) => Err(self.fail(request, "load", err)),
        }
    }

    /// Queues `term` behind the search debounce. Only the value still pending
    /// after the quiet period is applied, and only if it differs from the
    /// current term.
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.search.push(term.into());
    }

    /// Applies `term` immediately, with the same deduplication as the
    /// debounced path.
    pub fn apply_search_term_now(&self, term: impl Into<String>) {
        self.search.cancel();
        apply_search_term(&self.state, &self.events, term.into());
    }

    pub fn cancel_pending_search(&self) {
        self.search.cancel();
    }

    /// Sends `element` to the provider and merges the confirmed result by id.
    /// The list is untouched until the provider answers.
    pub async fn update_element(
        &self,
        element: PeriodicElement,
    ) -> Result<PeriodicElement, StoreError> {
        let request = InFlight::begin(&self.state);
        match self.provider.update(element.id, element).await {
            Ok(updated) => {
                let mut merged = false;
                request.finish(|state| {
                    if let Some(slot) = state.elements.iter_mut().find(|e| e.id == updated.id) {
                        *slot = updated.clone();
                        merged = true;
                    }
                    state.error = None;
                });
                if merged {
                    info!(element_id = %updated.id, "element merged");
                    let _ = self
                        .events
                        .send(StoreEvent::ElementUpdated(updated.clone()));
                } else {
                    warn!(element_id = %updated.id, "updated element is not in the list; nothing merged");
                }
                Ok(updated)
            }
            Err(err) => Err(self.fail(request, "update", err)),
        }
    }

    /// Selects `id` if it is in the list; otherwise clears the selection.
    pub fn select_element(&self, id: ElementId) -> Option<PeriodicElement> {
        let mut selected = None;
        self.state.send_modify(|state| {
            selected = state.element(id).cloned();
            state.selected = selected.as_ref().map(|element| element.id);
        });
        selected
    }

    pub fn clear_selection(&self) {
        self.state.send_if_modified(|state| state.selected.take().is_some());
    }

    pub fn selected_element(&self) -> Option<PeriodicElement> {
        let state = self.state.borrow();
        state.selected.and_then(|id| state.element(id).cloned())
    }

    pub fn filtered_elements(&self) -> Vec<PeriodicElement> {
        self.state.borrow().filtered_elements()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn elements(&self) -> Vec<PeriodicElement> {
        self.state.borrow().elements.clone()
    }

    pub fn element(&self, id: ElementId) -> Option<PeriodicElement> {
        self.state.borrow().element(id).cloned()
    }

    pub fn search_term(&self) -> String {
        self.state.borrow().search_term.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn state_changes(&self) -> WatchStream<StoreState> {
        WatchStream::from_changes(self.state.subscribe())
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn fail(&self, request: InFlight<'_>, operation: &'static str, err: ProviderError) -> StoreError {
        warn!(operation, error = %err, "provider request failed");
        let message = err.message.clone();
        request.finish(|state| state.error = Some(message.clone()));
        let _ = self.events.send(StoreEvent::Notification(Notification::error(
            message,
            self.notification_duration,
        )));
        StoreError::from(err)
    }
}

fn apply_search_term(
    state: &watch::Sender<StoreState>,
    events: &broadcast::Sender<StoreEvent>,
    term: String,
) {
    let changed = state.send_if_modified(|state| {
        if state.search_term == term {
            return false;
        }
        state.search_term = term.clone();
        true
    });
    if changed {
        debug!(term = %term, "search term applied");
        let _ = events.send(StoreEvent::SearchApplied(term));
    }
}

/// Outstanding provider request. Finishing or dropping it releases its share
/// of the loading flag.
struct InFlight<'a> {
    state: &'a watch::Sender<StoreState>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a watch::Sender<StoreState>) -> Self {
        state.send_modify(|state| {
            state.in_flight += 1;
            state.loading = true;
        });
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, apply: impl FnOnce(&mut StoreState)) {
        self.finished = true;
        self.state.send_modify(|state| {
            apply(state);
            release(state);
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.send_modify(release);
        }
    }
}

fn release(state: &mut StoreState) {
    state.in_flight = state.in_flight.saturating_sub(1);
    state.loading = state.in_flight > 0;
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
