use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc, Mutex as StdMutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{ElementId, PeriodicElement},
    error::ProviderError,
};
use tokio::sync::Mutex;

use crate::provider::DatasetProvider;

pub(crate) fn hydrogen() -> PeriodicElement {
    PeriodicElement::new(1, "Hydrogen", 1, 1.0079, "H")
}

pub(crate) fn helium() -> PeriodicElement {
    PeriodicElement::new(2, "Helium", 2, 4.0026, "He")
}

pub(crate) struct TestProvider {
    elements: Vec<PeriodicElement>,
    fetch_delay: Duration,
    update_delay: Duration,
    fail_fetch: AtomicBool,
    fail_update: AtomicBool,
    rename_on_update: Option<String>,
    fetches: AtomicU32,
    scripted_fetches: StdMutex<VecDeque<(Duration, Vec<PeriodicElement>)>>,
    updates: Arc<Mutex<Vec<(ElementId, PeriodicElement)>>>,
}

impl TestProvider {
    pub(crate) fn new(elements: Vec<PeriodicElement>) -> Self {
        Self {
            elements,
            fetch_delay: Duration::from_millis(2000),
            update_delay: Duration::from_millis(200),
            fail_fetch: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            rename_on_update: None,
            fetches: AtomicU32::new(0),
            scripted_fetches: StdMutex::new(VecDeque::new()),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_delays(mut self, fetch_delay: Duration, update_delay: Duration) -> Self {
        self.fetch_delay = fetch_delay;
        self.update_delay = update_delay;
        self
    }

    /// The provider answers updates with this name instead of echoing.
    pub(crate) fn renaming_updates_to(mut self, name: impl Into<String>) -> Self {
        self.rename_on_update = Some(name.into());
        self
    }

    /// Queues one fetch answer; queued answers are used in order before the
    /// default list and delay.
    pub(crate) fn script_next_fetch(&self, delay: Duration, elements: Vec<PeriodicElement>) {
        self.scripted_fetches
            .lock()
            .expect("scripted fetches")
            .push_back((delay, elements));
    }

    pub(crate) fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) async fn recorded_updates(&self) -> Vec<(ElementId, PeriodicElement)> {
        self.updates.lock().await.clone()
    }
}

#[async_trait]
impl DatasetProvider for TestProvider {
    async fn fetch_all(&self) -> Result<Vec<PeriodicElement>, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .scripted_fetches
            .lock()
            .expect("scripted fetches")
            .pop_front();
        let (delay, elements) =
            scripted.unwrap_or_else(|| (self.fetch_delay, self.elements.clone()));
        tokio::time::sleep(delay).await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("dataset offline"));
        }
        Ok(elements)
    }

    async fn update(
        &self,
        id: ElementId,
        element: PeriodicElement,
    ) -> Result<PeriodicElement, ProviderError> {
        self.updates.lock().await.push((id, element.clone()));
        tokio::time::sleep(self.update_delay).await;
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable("update rejected"));
        }
        let mut echoed = element;
        if let Some(name) = &self.rename_on_update {
            echoed.name = name.clone();
        }
        Ok(echoed)
    }
}
