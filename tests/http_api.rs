//! In-process HTTP API tests: the axum router driven through
//! `tower::ServiceExt::oneshot` against a scripted provider.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bursar::infrastructure::scripted::ScriptedProvider;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn ada_submission() -> Value {
    json!({
        "student_name": "Ada Lovelace",
        "student_email": "ada@uni.edu",
        "student_id": "S-1815",
        "scholarship_name": "STEM Grant",
        "amount": 500,
        "description": "First-year tuition support",
        "category": "academic"
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new()));
    let (status, body) = request(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_submit_list_and_filter() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new()));

    let (status, body) = request(&app, "POST", "/api/applications", Some(ada_submission())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("pending"));
    assert_eq!(body["data"]["student_id"], json!("S-1815"));

    let (status, body) = request(&app, "GET", "/api/applications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = request(
        &app,
        "GET",
        "/api/applications?student_email=ada@uni.edu",
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = request(
        &app,
        "GET",
        "/api/applications?student_email=nobody@uni.edu",
        None,
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_filter_and_stats() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new().with_text("ok")));

    let (_, body) = request(&app, "POST", "/api/applications", Some(ada_submission())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    request(
        &app,
        "POST",
        &format!("/api/applications/{id}/status"),
        Some(json!({"status": "approved"})),
    )
    .await;

    let (_, body) = request(&app, "GET", "/api/applications?status=approved", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = request(&app, "GET", "/api/applications?status=pending", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = request(&app, "GET", "/api/applications/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["approved"], json!(1));
    assert_eq!(body["data"]["total_awarded"], json!("500"));
}

#[tokio::test]
async fn test_submit_validation_errors() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new()));

    let mut invalid = ada_submission();
    invalid["amount"] = json!(0);
    let (status, body) = request(&app, "POST", "/api/applications", Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("positive"));
}

#[tokio::test]
async fn test_approval_flow_with_registration_side_effect() {
    let provider = Arc::new(ScriptedProvider::new().with_text("Payee added."));
    let (app, _) = common::portal(provider.clone());

    let (_, body) = request(&app, "POST", "/api/applications", Some(ada_submission())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/applications/{id}/status"),
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("approved"));

    // The registration job becomes observable and settles.
    let mut settled = false;
    for _ in 0..100 {
        let (_, body) = request(&app, "GET", "/api/registrations", None).await;
        let jobs = body["data"].as_array().unwrap();
        if !jobs.is_empty() && jobs[0]["status"]["state"] != json!("pending") {
            assert_eq!(jobs[0]["status"]["state"], json!("succeeded"));
            assert_eq!(jobs[0]["email"], json!("ada@uni.edu"));
            settled = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(settled, "registration job never settled");

    let commands = provider.commands().await;
    assert!(
        commands
            .iter()
            .any(|command| command.contains("ada@uni.edu"))
    );
}

#[tokio::test]
async fn test_invalid_transition_is_conflict() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new()));

    let (_, body) = request(&app, "POST", "/api/applications", Some(ada_submission())).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    request(
        &app,
        "POST",
        &format!("/api/applications/{id}/status"),
        Some(json!({"status": "rejected"})),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/applications/{id}/status"),
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_unknown_application_is_not_found() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new()));
    let (status, _) = request(
        &app,
        "POST",
        "/api/applications/00000000-0000-0000-0000-000000000000/status",
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wallet_balance_parsed_and_fallback() {
    let provider = Arc::new(ScriptedProvider::new().with_text(
        "Total Balance: 845.84 TSD\nSpendable Balance: 845.84 TSD\nPending Balance: 0.00 TSD",
    ));
    let (app, _) = common::portal(provider);

    let (status, body) = request(&app, "GET", "/api/wallet/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], json!("parsed"));
    assert_eq!(body["data"]["balance"]["spendable"], json!("845.84"));

    // Script exhausted: the next reply is empty and demo data is served.
    let (status, body) = request(&app, "GET", "/api/wallet/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], json!("fallback"));
    assert_eq!(body["data"]["balance"]["total"], json!("843.84"));
}

#[tokio::test]
async fn test_payees_endpoint() {
    let provider = Arc::new(
        ScriptedProvider::new().with_text("1. Ada Lovelace (ada@uni.edu)\n2. kartik design"),
    );
    let (app, _) = common::portal(provider);

    let (status, body) = request(&app, "GET", "/api/payees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], json!("parsed"));
    let payees = body["data"]["payees"].as_array().unwrap();
    assert_eq!(payees.len(), 2);
    assert_eq!(payees[0]["email"], json!("ada@uni.edu"));
    assert_eq!(payees[1]["email"], json!("kartik.design@example.com"));
}

#[tokio::test]
async fn test_transaction_history_endpoint() {
    let document = "\
### Detailed Transaction Log
| Date | Recipient | Amount | Type | Status | Created By |
|------|-----------|--------|------|--------|-----------|
| 2024-01-15 | Payment to john | 1.00 TSD | DEBIT | Completed | expenzse |
";
    let provider = Arc::new(ScriptedProvider::new().with_text(document));
    let (app, _) = common::portal(provider);

    let (status, body) = request(&app, "GET", "/api/wallet/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], json!("parsed"));
    let transactions = body["data"]["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["recipient"], json!("john"));
    assert_eq!(transactions[0]["kind"], json!("DEBIT"));
    assert_eq!(body["data"]["summary"]["total_transactions"], json!(1));
}

#[tokio::test]
async fn test_add_payee_and_send_payment() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .with_text("Payee added.")
            .with_text("Payment sent."),
    );
    let (app, _) = common::portal(provider.clone());

    let (status, body) = request(
        &app,
        "POST",
        "/api/payees",
        Some(json!({"email": "ada@uni.edu", "name": "Ada Lovelace"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));

    let (status, body) = request(
        &app,
        "POST",
        "/api/payments",
        Some(json!({"amount": 25.5, "recipient_name": "sahaj jain", "description": "stipend"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let commands = provider.commands().await;
    assert_eq!(commands.len(), 2);
    assert_eq!(
        commands[0],
        "Add payee with email ada@uni.edu and name \"Ada Lovelace\""
    );
    assert_eq!(commands[1], "pay 25.5 tds to sahaj jain");
}

#[tokio::test]
async fn test_payment_validation() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new()));

    let (status, _) = request(
        &app,
        "POST",
        "/api/payments",
        Some(json!({"amount": -1, "recipient_name": "sahaj jain", "description": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/api/payments",
        Some(json!({"amount": 5, "recipient_name": "  ", "description": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_failure_maps_to_bad_gateway() {
    let provider = Arc::new(ScriptedProvider::new().with_failure("provider unreachable"));
    let (app, _) = common::portal(provider);

    let (status, body) = request(
        &app,
        "POST",
        "/api/payments",
        Some(json!({"amount": 5, "recipient_name": "sahaj jain", "description": "stipend"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_oauth_callback() {
    let (app, _) = common::portal(Arc::new(ScriptedProvider::new()));

    let (status, body) = request(&app, "GET", "/oauth/callback?code=abc123", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["authenticated"], json!(true));
    assert_eq!(body["data"]["expires_in"], json!(3600));

    let (status, _) = request(&app, "GET", "/oauth/callback?error=access_denied", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = request(&app, "GET", "/oauth/callback", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
