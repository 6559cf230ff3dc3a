use std::sync::Arc;

use crate::auth::{JwtError, TokenVerifier};
use crate::config::AppConfig;
use crate::database::InvoiceStore;

/// Shared, read-only state handed to every middleware and handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvoiceStore>,
    pub verifier: Arc<TokenVerifier>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: impl InvoiceStore) -> Result<Self, JwtError> {
        let verifier = TokenVerifier::new(&config.security.jwt_secret)?;

        Ok(Self {
            store: Arc::new(store),
            verifier: Arc::new(verifier),
            config: Arc::new(config),
        })
    }
}
