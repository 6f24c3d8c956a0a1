//! Corpos JSON trocados pela API HTTP do helpdesk.
//!
//! Os mesmos tipos servem ao servidor (axum) e ao cliente (reqwest).
//! Campos de entrada são opcionais para que ausências virem erros de
//! validação (400) em vez de falhas de desserialização.

use serde::{Deserialize, Serialize};

/// Corpo de `POST /submit-query`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitQueryRequest {
    pub email: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// Resposta de sucesso de `POST /submit-query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitQueryResponse {
    pub message: String,
    pub ticket_id: String,
    /// Departamento que recebeu o ticket.
    pub routed_to: String,
}

/// Corpo de `POST /api/ticket/:id/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// Corpo de `POST /api/ticket/:id/reply`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyRequest {
    pub reply_text: Option<String>,
}

/// Corpo de toda resposta de erro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Resposta de `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
