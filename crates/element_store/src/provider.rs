//! Dataset provider contract and the in-memory mock that backs the grid.

use std::{collections::HashSet, fs, path::Path, sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{ElementId, PeriodicElement},
    error::ProviderError,
};
use tracing::{debug, info};

use crate::{config::Settings, fixture};

#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<PeriodicElement>, ProviderError>;
    async fn update(
        &self,
        id: ElementId,
        element: PeriodicElement,
    ) -> Result<PeriodicElement, ProviderError>;
}

/// Serves a fixed dataset after a simulated delay. Updates are echoed back and
/// never written to the fixture, so every new provider starts from the same
/// contents.
pub struct MockDatasetProvider {
    elements: Arc<Vec<PeriodicElement>>,
    fetch_delay: Duration,
    update_delay: Duration,
}

impl MockDatasetProvider {
    pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(2000);
    pub const DEFAULT_UPDATE_DELAY: Duration = Duration::from_millis(200);

    pub fn new(
        elements: Vec<PeriodicElement>,
        fetch_delay: Duration,
        update_delay: Duration,
    ) -> Result<Self, ProviderError> {
        ensure_unique_ids(&elements)?;
        Ok(Self {
            elements: Arc::new(elements),
            fetch_delay,
            update_delay,
        })
    }

    pub fn with_default_fixture() -> Self {
        Self {
            elements: Arc::new(fixture::default_elements()),
            fetch_delay: Self::DEFAULT_FETCH_DELAY,
            update_delay: Self::DEFAULT_UPDATE_DELAY,
        }
    }

    /// Reads a JSON array of elements from `path`.
    pub fn from_json_file(
        path: &Path,
        fetch_delay: Duration,
        update_delay: Duration,
    ) -> Result<Self, ProviderError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            ProviderError::unavailable(format!(
                "failed to read dataset '{}': {err}",
                path.display()
            ))
        })?;
        let elements: Vec<PeriodicElement> = serde_json::from_str(&raw).map_err(|err| {
            ProviderError::validation(format!(
                "dataset '{}' is not a JSON array of elements: {err}",
                path.display()
            ))
        })?;
        info!(path = %path.display(), count = elements.len(), "loaded dataset fixture");
        Self::new(elements, fetch_delay, update_delay)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        match &settings.dataset_path {
            Some(path) => {
                Self::from_json_file(path, settings.fetch_delay(), settings.update_delay())
            }
            None => Self::new(
                fixture::default_elements(),
                settings.fetch_delay(),
                settings.update_delay(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[async_trait]
impl DatasetProvider for MockDatasetProvider {
    async fn fetch_all(&self) -> Result<Vec<PeriodicElement>, ProviderError> {
        debug!(
            delay_ms = u64::try_from(self.fetch_delay.as_millis()).unwrap_or(u64::MAX),
            "fetching elements"
        );
        tokio::time::sleep(self.fetch_delay).await;
        Ok(self.elements.as_ref().clone())
    }

    async fn update(
        &self,
        id: ElementId,
        element: PeriodicElement,
    ) -> Result<PeriodicElement, ProviderError> {
        info!(element_id = %id, element = ?element, "element updated");
        tokio::time::sleep(self.update_delay).await;
        Ok(element)
    }
}

pub(crate) fn ensure_unique_ids(elements: &[PeriodicElement]) -> Result<(), ProviderError> {
    let mut seen = HashSet::with_capacity(elements.len());
    for element in elements {
        if !seen.insert(element.id) {
            return Err(ProviderError::validation(format!(
                "duplicate element id {}",
                element.id
            )));
        }
    }
    Ok(())
}
