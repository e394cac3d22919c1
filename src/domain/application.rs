use crate::domain::wallet::Amount;
use crate::error::{PortalError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl ApplicationStatus {
    /// The review lifecycle:
    ///
    /// ```text
    /// pending --approve--> approved --mark paid--> paid
    /// pending --reject---> rejected
    /// ```
    ///
    /// `rejected` and `paid` are terminal; nothing returns to `pending`.
    pub fn can_transition(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Paid)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Paid)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Paid => "paid",
        };
        f.write_str(name)
    }
}

/// A student's request for scholarship funding, tracked through the review
/// lifecycle. `student_email` identifies ownership for row-level access.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Application {
    pub id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub student_id: String,
    pub scholarship_name: String,
    pub amount: Decimal,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    pub description: String,
    pub category: String,
    pub requirements: String,
}

/// A submission payload. Id, status and dates are assigned by the registry.
#[derive(Debug, Deserialize, Clone)]
pub struct NewApplication {
    pub student_name: String,
    pub student_email: String,
    #[serde(default)]
    pub student_id: String,
    pub scholarship_name: String,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub requirements: String,
}

impl NewApplication {
    /// Field-level validation, run before any I/O. Returns the validated
    /// amount so the caller cannot forget the positivity check.
    pub fn validate(&self) -> Result<Amount> {
        let required = [
            ("student_name", &self.student_name),
            ("student_email", &self.student_email),
            ("scholarship_name", &self.scholarship_name),
            ("description", &self.description),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PortalError::Validation(format!("{field} must not be empty")));
            }
        }
        Amount::new(self.amount)
    }
}
