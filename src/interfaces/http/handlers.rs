use super::AppState;
use crate::application::jobs::RegistrationJob;
use crate::application::registry::RegistryStats;
use crate::domain::application::{Application, ApplicationStatus, NewApplication};
use crate::domain::payee::Payee;
use crate::domain::wallet::{Amount, TransactionReport, WalletBalance};
use crate::error::PortalError;
use crate::interfaces::response::Source;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uniform response envelope.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn fail(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Maps domain errors onto HTTP statuses; handlers bubble `PortalError` with
/// `?` and the envelope is produced here.
pub struct ApiError(PortalError);

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::InvalidTransition { .. } => StatusCode::CONFLICT,
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Provider(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ApiResponse::fail(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("ok"))
}

pub async fn submit_application(
    State(state): State<AppState>,
    Json(new): Json<NewApplication>,
) -> ApiResult<impl IntoResponse> {
    let application = state.registry.submit(new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(application))))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub student_email: Option<String>,
    pub status: Option<ApplicationStatus>,
}

pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Application>>>> {
    let mut applications = match query.student_email {
        Some(email) => state.registry.list_for_student(&email).await?,
        None => state.registry.list_all().await?,
    };
    if let Some(status) = query.status {
        applications.retain(|application| application.status == status);
    }
    Ok(Json(ApiResponse::ok(applications)))
}

pub async fn application_stats(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<RegistryStats>>> {
    let stats = state.registry.stats(query.student_email.as_deref()).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> ApiResult<Json<ApiResponse<Application>>> {
    let application = state.registry.set_status(id, request.status).await?;
    Ok(Json(ApiResponse::ok(application)))
}

pub async fn list_registrations(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<RegistrationJob>>> {
    Json(ApiResponse::ok(state.registry.registrations().jobs().await))
}

#[derive(Serialize)]
pub struct BalancePayload {
    pub source: Source,
    pub balance: WalletBalance,
}

pub async fn wallet_balance(State(state): State<AppState>) -> Json<ApiResponse<BalancePayload>> {
    let extracted = state.wallet.balance().await;
    Json(ApiResponse::ok(BalancePayload {
        source: extracted.source,
        balance: extracted.records,
    }))
}

#[derive(Serialize)]
pub struct HistoryPayload {
    pub source: Source,
    #[serde(flatten)]
    pub report: TransactionReport,
}

pub async fn transaction_history(
    State(state): State<AppState>,
) -> Json<ApiResponse<HistoryPayload>> {
    let extracted = state.wallet.history().await;
    Json(ApiResponse::ok(HistoryPayload {
        source: extracted.source,
        report: extracted.records,
    }))
}

#[derive(Serialize)]
pub struct PayeesPayload {
    pub source: Source,
    pub payees: Vec<Payee>,
}

pub async fn list_payees(State(state): State<AppState>) -> Json<ApiResponse<PayeesPayload>> {
    let extracted = state.wallet.payees().await;
    Json(ApiResponse::ok(PayeesPayload {
        source: extracted.source,
        payees: extracted.records,
    }))
}

#[derive(Deserialize)]
pub struct AddPayeeRequest {
    pub email: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct ProviderAck {
    pub status: Option<String>,
}

pub async fn add_payee(
    State(state): State<AppState>,
    Json(request): Json<AddPayeeRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.trim().is_empty() || request.name.trim().is_empty() {
        return Err(PortalError::Validation("email and name must not be empty".to_string()).into());
    }
    let reply = state
        .wallet
        .register_payee(&request.email, &request.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ProviderAck {
            status: reply.status,
        })),
    ))
}

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub recipient_name: String,
    pub description: String,
}

pub async fn send_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<Json<ApiResponse<ProviderAck>>> {
    if request.recipient_name.trim().is_empty() {
        return Err(PortalError::Validation("recipient_name must not be empty".to_string()).into());
    }
    let amount = Amount::new(request.amount)?;
    let reply = state
        .wallet
        .send_payment(amount, &request.recipient_name, &request.description)
        .await?;
    Ok(Json(ApiResponse::ok(ProviderAck {
        status: reply.status,
    })))
}

#[derive(Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct SessionPayload {
    pub authenticated: bool,
    pub expires_in: u64,
}

/// Server-side authorization-code exchange. The token stays in the provider
/// client; the browser only learns that a session now exists.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallback>,
) -> ApiResult<Json<ApiResponse<SessionPayload>>> {
    if let Some(error) = query.error {
        return Err(PortalError::Provider(format!("authorization denied: {error}")).into());
    }
    let code = query
        .code
        .ok_or_else(|| PortalError::Validation("missing code parameter".to_string()))?;

    let token = state.provider.exchange_code(&code).await?;
    Ok(Json(ApiResponse::ok(SessionPayload {
        authenticated: true,
        expires_in: token.expires_in,
    })))
}
