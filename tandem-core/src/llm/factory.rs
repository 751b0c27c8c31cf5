//! Factory for creating chat backends from configuration

use std::sync::Arc;

use crate::config::{BackendConfig, TandemConfig};
use crate::error::Result;
use crate::llm::{ChatBackend, OpenAiCompatBackend};

/// Create a chat backend from a single backend configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn backend_for(config: &BackendConfig) -> Result<Arc<dyn ChatBackend>> {
    let backend = OpenAiCompatBackend::from_config(config)?;
    Ok(Arc::new(backend))
}

/// Create a chat backend from the primary entry of a full configuration.
///
/// # Errors
///
/// Returns an error if the backend list is empty.
pub fn backend_from_config(config: &TandemConfig) -> Result<Arc<dyn ChatBackend>> {
    backend_for(config.primary_backend()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for() {
        let config = BackendConfig::new("m", "http://x");
        let backend = backend_for(&config).unwrap();
        assert_eq!(backend.model_info().model_name, "m");
    }

    #[test]
    fn test_backend_from_empty_config() {
        let config = TandemConfig::default();
        assert!(backend_from_config(&config).is_err());
    }
}
