use crate::application::jobs::RegistrationQueue;
use crate::domain::application::{Application, ApplicationStatus, NewApplication};
use crate::domain::ports::ApplicationStoreBox;
use crate::error::{PortalError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Dashboard aggregates over the registry.
#[derive(Debug, Serialize, PartialEq, Clone, Default)]
pub struct RegistryStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub paid: usize,
    /// Sum of approved and paid amounts.
    pub total_awarded: Decimal,
    pub total_paid: Decimal,
}

/// Owns the scholarship-application lifecycle.
///
/// `ApplicationRegistry` validates submissions, keeps listings ordered newest
/// first, and guards the one-directional review state machine. Approval
/// triggers best-effort payee registration through the background queue.
pub struct ApplicationRegistry {
    store: ApplicationStoreBox,
    registrations: RegistrationQueue,
}

impl ApplicationRegistry {
    pub fn new(store: ApplicationStoreBox, registrations: RegistrationQueue) -> Self {
        Self {
            store,
            registrations,
        }
    }

    /// Validates and persists a new submission as `pending`, dated today.
    pub async fn submit(&self, new: NewApplication) -> Result<Application> {
        let amount = new.validate()?;
        let now = Utc::now();

        let application = Application {
            id: Uuid::new_v4(),
            student_name: new.student_name,
            student_email: new.student_email,
            student_id: if new.student_id.trim().is_empty() {
                "N/A".to_string()
            } else {
                new.student_id
            },
            scholarship_name: new.scholarship_name,
            amount: amount.value(),
            status: ApplicationStatus::Pending,
            applied_date: now.date_naive(),
            submitted_at: now,
            description: new.description,
            category: new.category,
            requirements: new.requirements,
        };

        self.store.put(application.clone()).await?;
        tracing::info!(
            id = %application.id,
            student = %application.student_email,
            scholarship = %application.scholarship_name,
            "application submitted"
        );
        Ok(application)
    }

    /// Every application, newest first. The government review view.
    pub async fn list_all(&self) -> Result<Vec<Application>> {
        let mut applications = self.store.all().await?;
        applications.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(applications)
    }

    /// Applications owned by one student, newest first.
    pub async fn list_for_student(&self, email: &str) -> Result<Vec<Application>> {
        let mut applications = self.list_all().await?;
        applications.retain(|application| application.student_email == email);
        Ok(applications)
    }

    /// Applies a review decision. Disallowed transitions fail without
    /// touching the record. On approval the student is enqueued for payee
    /// registration with the provider, best-effort: the approval stands even
    /// if that registration later fails.
    pub async fn set_status(&self, id: Uuid, next: ApplicationStatus) -> Result<Application> {
        let Some(mut application) = self.store.get(id).await? else {
            return Err(PortalError::NotFound(id));
        };

        let previous = application.status;
        if !previous.can_transition(next) {
            return Err(PortalError::InvalidTransition {
                from: previous,
                to: next,
            });
        }

        application.status = next;
        self.store.put(application.clone()).await?;
        tracing::info!(%id, %previous, status = %next, "application status changed");

        if next == ApplicationStatus::Approved {
            self.registrations
                .enqueue(&application.student_email, &application.student_name)
                .await;
        }

        Ok(application)
    }

    /// Aggregates for the dashboards, portal-wide or per student.
    pub async fn stats(&self, student_email: Option<&str>) -> Result<RegistryStats> {
        let applications = match student_email {
            Some(email) => self.list_for_student(email).await?,
            None => self.list_all().await?,
        };

        let mut stats = RegistryStats {
            total: applications.len(),
            ..RegistryStats::default()
        };
        for application in &applications {
            match application.status {
                ApplicationStatus::Pending => stats.pending += 1,
                ApplicationStatus::Approved => {
                    stats.approved += 1;
                    stats.total_awarded += application.amount;
                }
                ApplicationStatus::Rejected => stats.rejected += 1,
                ApplicationStatus::Paid => {
                    stats.paid += 1;
                    stats.total_awarded += application.amount;
                    stats.total_paid += application.amount;
                }
            }
        }
        Ok(stats)
    }

    pub fn registrations(&self) -> &RegistrationQueue {
        &self.registrations
    }
}
