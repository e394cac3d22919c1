use axum::Router;
use bursar::application::jobs::RegistrationQueue;
use bursar::application::registry::ApplicationRegistry;
use bursar::application::wallet::WalletService;
use bursar::infrastructure::in_memory::InMemoryApplicationStore;
use bursar::infrastructure::scripted::ScriptedProvider;
use bursar::interfaces::http::{AppState, router};
use std::sync::Arc;

/// A fully wired portal on in-memory storage and a scripted provider.
pub fn portal(provider: Arc<ScriptedProvider>) -> (Router, AppState) {
    let registry = Arc::new(ApplicationRegistry::new(
        Box::new(InMemoryApplicationStore::new()),
        RegistrationQueue::new(provider.clone()),
    ));
    let wallet = Arc::new(WalletService::new(provider.clone(), 3));
    let state = AppState {
        registry,
        wallet,
        provider,
    };
    (router(state.clone()), state)
}
