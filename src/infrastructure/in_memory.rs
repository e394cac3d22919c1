use crate::domain::application::Application;
use crate::domain::ports::ApplicationStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for scholarship applications.
///
/// Uses `Arc<RwLock<HashMap<Uuid, Application>>>` to allow shared concurrent
/// access. The default store when no database path is configured; concurrent
/// writers follow last-write-wins.
#[derive(Default, Clone)]
pub struct InMemoryApplicationStore {
    applications: Arc<RwLock<HashMap<Uuid, Application>>>,
}

impl InMemoryApplicationStore {
    /// Creates a new, empty in-memory application store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn put(&self, application: Application) -> Result<()> {
        let mut applications = self.applications.write().await;
        applications.insert(application.id, application);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Application>> {
        let applications = self.applications.read().await;
        Ok(applications.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(applications.values().cloned().collect())
    }
}
