use std::sync::Arc;

use crate::assistant::Rewriter;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable storage. `PgStore` when DATABASE_URL is set, else `MemoryStore`.
    pub store: Arc<dyn Store>,
    /// `None` when ANTHROPIC_API_KEY is unset; AI endpoints then answer 503.
    pub rewriter: Option<Arc<dyn Rewriter>>,
}
