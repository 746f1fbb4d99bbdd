use shared::error::ProviderError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("dataset provider request failed: {0}")]
    Provider(#[from] ProviderError),
}

impl StoreError {
    pub fn message(&self) -> String {
        match self {
            StoreError::Provider(err) => err.message.clone(),
        }
    }
}
