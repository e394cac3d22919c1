//! End-to-end review lifecycle against in-memory storage with a scripted
//! provider.

mod common;

use bursar::application::jobs::RegistrationStatus;
use bursar::domain::application::{ApplicationStatus, NewApplication};
use bursar::error::PortalError;
use bursar::infrastructure::scripted::ScriptedProvider;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn submission(name: &str, email: &str, amount: rust_decimal::Decimal) -> NewApplication {
    NewApplication {
        student_name: name.to_string(),
        student_email: email.to_string(),
        student_id: String::new(),
        scholarship_name: "STEM Grant".to_string(),
        amount,
        description: "Tuition support".to_string(),
        category: "academic".to_string(),
        requirements: String::new(),
    }
}

#[tokio::test]
async fn test_submit_approve_register_flow() {
    let provider = Arc::new(ScriptedProvider::new().with_text("Payee added."));
    let (_, state) = common::portal(provider.clone());

    // One pending record owned by ada@uni.edu with the submitted amount.
    let created = state
        .registry
        .submit(submission("Ada Lovelace", "ada@uni.edu", dec!(500)))
        .await
        .unwrap();
    assert_eq!(created.status, ApplicationStatus::Pending);

    let mine = state.registry.list_for_student("ada@uni.edu").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].amount, dec!(500));

    // Government approval flips the status and attempts payee registration.
    let approved = state
        .registry
        .set_status(created.id, ApplicationStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, ApplicationStatus::Approved);

    let mut settled = None;
    for _ in 0..100 {
        let jobs = state.registry.registrations().jobs().await;
        if let Some(job) = jobs.first()
            && job.status.is_terminal()
        {
            settled = Some(job.clone());
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let job = settled.expect("registration job never settled");
    assert_eq!(job.status, RegistrationStatus::Succeeded);

    let commands = provider.commands().await;
    assert_eq!(
        commands,
        vec!["Add payee with email ada@uni.edu and name \"Ada Lovelace\"".to_string()]
    );

    // The record re-reads as approved.
    let all = state.registry.list_all().await.unwrap();
    assert_eq!(all[0].status, ApplicationStatus::Approved);
}

#[tokio::test]
async fn test_amount_round_trip() {
    let (_, state) = common::portal(Arc::new(ScriptedProvider::new()));

    state
        .registry
        .submit(submission("Grace Hopper", "grace@uni.edu", dec!(250.5)))
        .await
        .unwrap();

    let mine = state
        .registry
        .list_for_student("grace@uni.edu")
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].amount, dec!(250.5));
    assert_eq!(mine[0].status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn test_rejected_application_cannot_be_approved() {
    let provider = Arc::new(ScriptedProvider::new());
    let (_, state) = common::portal(provider.clone());

    let created = state
        .registry
        .submit(submission("Ada Lovelace", "ada@uni.edu", dec!(500)))
        .await
        .unwrap();
    state
        .registry
        .set_status(created.id, ApplicationStatus::Rejected)
        .await
        .unwrap();

    let result = state
        .registry
        .set_status(created.id, ApplicationStatus::Approved)
        .await;
    assert!(matches!(
        result,
        Err(PortalError::InvalidTransition { .. })
    ));

    // Status is unchanged and no side effect ran.
    let all = state.registry.list_all().await.unwrap();
    assert_eq!(all[0].status, ApplicationStatus::Rejected);
    assert!(state.registry.registrations().jobs().await.is_empty());
    assert!(provider.commands().await.is_empty());
}

#[tokio::test]
async fn test_paid_is_terminal() {
    let (_, state) = common::portal(Arc::new(ScriptedProvider::new().with_text("ok")));

    let created = state
        .registry
        .submit(submission("Ada Lovelace", "ada@uni.edu", dec!(500)))
        .await
        .unwrap();
    state
        .registry
        .set_status(created.id, ApplicationStatus::Approved)
        .await
        .unwrap();
    state
        .registry
        .set_status(created.id, ApplicationStatus::Paid)
        .await
        .unwrap();

    let result = state
        .registry
        .set_status(created.id, ApplicationStatus::Approved)
        .await;
    assert!(matches!(result, Err(PortalError::InvalidTransition { .. })));
}
