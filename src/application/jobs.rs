use crate::domain::ports::{SharedProvider, commands};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "state", content = "detail")]
pub enum RegistrationStatus {
    Pending,
    Succeeded,
    Failed(String),
}

impl RegistrationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RegistrationStatus::Pending)
    }
}

/// One attempt to register a student as a payee with the provider.
#[derive(Debug, Serialize, Clone)]
pub struct RegistrationJob {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub status: RegistrationStatus,
    pub enqueued_at: DateTime<Utc>,
}

/// Background payee registration with observable outcomes.
///
/// Registration is best-effort by contract: the operation that enqueues a job
/// never waits on it and never sees its failure. Each job's fate stays
/// queryable here instead of vanishing into a dropped future.
#[derive(Clone)]
pub struct RegistrationQueue {
    provider: SharedProvider,
    jobs: Arc<RwLock<HashMap<Uuid, RegistrationJob>>>,
}

impl RegistrationQueue {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Records a pending job and spawns the provider call. Returns the job id
    /// immediately.
    pub async fn enqueue(&self, email: &str, name: &str) -> Uuid {
        let job = RegistrationJob {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            status: RegistrationStatus::Pending,
            enqueued_at: Utc::now(),
        };
        let id = job.id;
        self.jobs.write().await.insert(id, job);

        let queue = self.clone();
        let email = email.to_string();
        let name = name.to_string();
        tokio::spawn(async move {
            queue.run(id, &email, &name).await;
        });

        id
    }

    async fn run(&self, id: Uuid, email: &str, name: &str) {
        let status = match self
            .provider
            .ask(&commands::add_payee(email, name), None)
            .await
        {
            Ok(_) => {
                tracing::info!(%email, "payee registered with provider");
                RegistrationStatus::Succeeded
            }
            Err(err) => {
                tracing::warn!(%email, error = %err, "payee registration failed");
                RegistrationStatus::Failed(err.to_string())
            }
        };

        if let Some(job) = self.jobs.write().await.get_mut(&id) {
            job.status = status;
        }
    }

    pub async fn job(&self, id: Uuid) -> Option<RegistrationJob> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// All jobs, newest first.
    pub async fn jobs(&self) -> Vec<RegistrationJob> {
        let mut jobs: Vec<RegistrationJob> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| b.enqueued_at.cmp(&a.enqueued_at));
        jobs
    }
}
