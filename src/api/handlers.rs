use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::task::JoinError;
use tracing::{debug, error};

use super::types::{
    ErrorBody, HealthResponse, ReplyRequest, StatusUpdateRequest, SubmitQueryRequest,
    SubmitQueryResponse,
};
use super::AppState;
use crate::error::{ErrorKind, HelpdeskError};
use crate::orchestrator::TicketOrchestrator;
use crate::ticket::{Ticket, TicketStatusView};

const SUBMITTED_MESSAGE: &str = "Your query has been received and routed successfully!";

/// Failure of a request: either the operation failed or its worker did.
#[derive(Debug)]
pub enum ApiError {
    Helpdesk(HelpdeskError),
    Worker(JoinError),
}

impl From<HelpdeskError> for ApiError {
    fn from(e: HelpdeskError) -> Self {
        ApiError::Helpdesk(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Helpdesk(e) => {
                let status = match e.kind() {
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::Persistence | ErrorKind::Config => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
            ApiError::Worker(e) => {
                error!(error = %e, "request worker failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

// Orchestrator calls block on SQLite and SMTP; keep them off the async workers.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&TicketOrchestrator) -> Result<T, HelpdeskError> + Send + 'static,
{
    let orchestrator = Arc::clone(&state.orchestrator);
    tokio::task::spawn_blocking(move || f(&orchestrator))
        .await
        .map_err(ApiError::Worker)?
        .map_err(ApiError::from)
}

// Malformed or mistyped bodies answer with the route's validation error.
fn body_or<T>(
    payload: Result<Json<T>, JsonRejection>,
    invalid: HelpdeskError,
) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(error = %rejection, "rejected request body");
        ApiError::from(invalid)
    })
}

// Ids that are not integers cannot name a ticket.
fn ticket_key(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(HelpdeskError::NotFound))
}

pub async fn submit_query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitQueryRequest>, JsonRejection>,
) -> Result<Json<SubmitQueryResponse>, ApiError> {
    let req = body_or(payload, HelpdeskError::MissingFields)?;
    let submission = blocking(&state, move |orch| {
        orch.submit_query(
            req.email.as_deref().unwrap_or_default(),
            req.subject.as_deref().unwrap_or_default(),
            req.body.as_deref().unwrap_or_default(),
        )
    })
    .await?;

    Ok(Json(SubmitQueryResponse {
        message: SUBMITTED_MESSAGE.to_string(),
        ticket_id: submission.ticket_id,
        routed_to: submission.department,
    }))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let tickets = blocking(&state, |orch| orch.list_tickets()).await?;
    Ok(Json(tickets))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let id = ticket_key(&id)?;
    let req = body_or(payload, HelpdeskError::InvalidStatus(String::new()))?;
    let ticket = blocking(&state, move |orch| {
        orch.set_status(id, req.status.as_deref().unwrap_or_default())
    })
    .await?;
    Ok(Json(ticket))
}

pub async fn ticket_status(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<String>,
) -> Result<Json<TicketStatusView>, ApiError> {
    let view = blocking(&state, move |orch| orch.lookup(&ticket_id)).await?;
    Ok(Json(view))
}

pub async fn reply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<Json<Ticket>, ApiError> {
    let id = ticket_key(&id)?;
    let req = body_or(payload, HelpdeskError::MissingReply)?;
    let ticket = blocking(&state, move |orch| {
        orch.reply_and_resolve(id, req.reply_text.as_deref().unwrap_or_default())
    })
    .await?;
    Ok(Json(ticket))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}
