//! Single-field edit flow: prompt for a value, coerce it to the field's type,
//! and submit it through the store only when it actually changes the element.

use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{CoercionError, ElementField, PeriodicElement};
use tracing::{debug, info};

use crate::{error::StoreError, store::ElementStore};

/// What the prompt shows: the field name and its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub title: String,
    pub value: String,
}

#[async_trait]
pub trait EditPrompt: Send + Sync {
    /// Resolves to the edited text, or `None` when the user cancels.
    async fn prompt(&self, request: EditRequest) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Cancelled,
    Abandoned(EditAbandon),
    Unchanged,
    Submitted(PeriodicElement),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditAbandon {
    EmptyValue,
    Coercion(CoercionError),
}

pub struct EditCoordinator<'a> {
    store: &'a ElementStore,
    prompt: Arc<dyn EditPrompt>,
}

impl<'a> EditCoordinator<'a> {
    pub fn new(store: &'a ElementStore, prompt: Arc<dyn EditPrompt>) -> Self {
        Self { store, prompt }
    }

    pub async fn request_edit(
        &self,
        element: &PeriodicElement,
        field: ElementField,
    ) -> Result<EditOutcome, StoreError> {
        let request = EditRequest {
            title: field.to_string(),
            value: element.field_text(field),
        };
        let Some(raw) = self.prompt.prompt(request).await else {
            debug!(element_id = %element.id, %field, "edit cancelled");
            return Ok(EditOutcome::Cancelled);
        };

        let candidate = match build_candidate(element, field, &raw) {
            Ok(candidate) => candidate,
            Err(reason) => {
                debug!(element_id = %element.id, %field, ?reason, "edit abandoned");
                return Ok(EditOutcome::Abandoned(reason));
            }
        };

        if candidate == *element {
            debug!(element_id = %element.id, %field, "edit left the element unchanged");
            return Ok(EditOutcome::Unchanged);
        }

        info!(element_id = %element.id, %field, "submitting edit");
        let updated = self.store.update_element(candidate).await?;
        Ok(EditOutcome::Submitted(updated))
    }
}

fn build_candidate(
    element: &PeriodicElement,
    field: ElementField,
    raw: &str,
) -> Result<PeriodicElement, EditAbandon> {
    if raw.is_empty() {
        return Err(EditAbandon::EmptyValue);
    }
    element
        .with_field(field, raw)
        .map_err(EditAbandon::Coercion)
}

#[cfg(test)]
#[path = "tests/edit_tests.rs"]
mod tests;
