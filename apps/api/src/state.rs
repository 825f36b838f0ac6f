use std::sync::Arc;

use crate::lexicon::Lexicon;
use crate::llm_client::Gateway;

/// Shared application state injected into all route handlers via Axum
/// extractors. Stateless with respect to any one analysis — the gateway
/// handle is reused across requests but holds no per-call state.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn Gateway>,
    /// Section taxonomy and action-verb set, loaded once at startup.
    pub lexicon: Arc<Lexicon>,
}
