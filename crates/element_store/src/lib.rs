//! Client-side state for the periodic table grid: a dataset provider
//! contract, the element store with its debounced search, and the edit flow
//! that writes single-field changes back through the store.

pub mod config;
pub mod debounce;
pub mod edit;
pub mod error;
pub mod fixture;
pub mod notification;
pub mod provider;
pub mod store;

pub use config::{load_settings, Settings};
pub use debounce::Debouncer;
pub use edit::{EditAbandon, EditCoordinator, EditOutcome, EditPrompt, EditRequest};
pub use error::StoreError;
pub use notification::Notification;
pub use provider::{DatasetProvider, MockDatasetProvider};
pub use store::{filter_elements, ElementStore, StoreEvent, StoreState};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
