//! HTTP surface of the helpdesk: the axum server and a reqwest client for it.

pub mod client;
pub mod handlers;
pub mod types;

pub use client::HelpdeskClient;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::orchestrator::TicketOrchestrator;

/// State shared by every handler.
pub struct AppState {
    pub orchestrator: Arc<TicketOrchestrator>,
    pub started: Instant,
}

impl AppState {
    pub fn new(orchestrator: TicketOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            started: Instant::now(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/submit-query", post(handlers::submit_query))
        .route("/api/tickets", get(handlers::list_tickets))
        .route("/api/ticket/:id/status", post(handlers::update_status))
        .route("/api/ticket/:id/reply", post(handlers::reply))
        .route("/api/ticket/status/:ticket_id", get(handlers::ticket_status))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve the API on `bind` until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
            }
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::HelpdeskConfig;
    use crate::notify::testing::RecordingNotifier;
    use crate::router::DepartmentRouter;
    use crate::store::SqliteStore;

    fn app() -> (Router, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let orchestrator = TicketOrchestrator::new(
            DepartmentRouter::from_config(&HelpdeskConfig::default()),
            Arc::new(SqliteStore::open_in_memory().unwrap()),
            notifier.clone(),
        );
        (router(Arc::new(AppState::new(orchestrator))), notifier)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn call_raw(
        app: &Router,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn submit(app: &Router) -> Value {
        let (status, body) = call(
            app,
            "POST",
            "/submit-query",
            Some(json!({
                "email": "a@x.com",
                "subject": "Need help",
                "body": "I forgot my wifi password"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn first_ticket_id(app: &Router) -> i64 {
        let (_, tickets) = call(app, "GET", "/api/tickets", None).await;
        tickets[0]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn submit_query_routes_and_notifies() {
        let (app, notifier) = app();
        let body = submit(&app).await;

        assert_eq!(body["routed_to"], "IT Support");
        assert_eq!(
            body["message"],
            "Your query has been received and routed successfully!"
        );
        assert!(body["ticket_id"].as_str().unwrap().starts_with("TICKET-"));
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn submit_query_missing_fields_is_400() {
        let (app, notifier) = app();
        let (status, body) = call(
            &app,
            "POST",
            "/submit-query",
            Some(json!({"email": "a@x.com", "subject": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
        assert!(notifier.sent().is_empty());

        let (_, tickets) = call(&app, "GET", "/api/tickets", None).await;
        assert_eq!(tickets, json!([]));
    }

    #[tokio::test]
    async fn list_tickets_newest_first() {
        let (app, _) = app();
        let first = submit(&app).await;
        let second = submit(&app).await;

        let (status, tickets) = call(&app, "GET", "/api/tickets", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = tickets
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["ticket_id"].as_str().unwrap())
            .collect();
        assert_eq!(
            ids,
            vec![
                second["ticket_id"].as_str().unwrap(),
                first["ticket_id"].as_str().unwrap()
            ]
        );
        assert_eq!(tickets[0]["status"], "New");
        assert_eq!(tickets[0]["department"], "IT Support");
    }

    #[tokio::test]
    async fn update_status_changes_and_notifies() {
        let (app, notifier) = app();
        submit(&app).await;
        let id = first_ticket_id(&app).await;

        let (status, ticket) = call(
            &app,
            "POST",
            &format!("/api/ticket/{id}/status"),
            Some(json!({"status": "In Progress"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ticket["status"], "In Progress");
        assert_eq!(notifier.sent().len(), 3);
    }

    #[tokio::test]
    async fn update_status_rejects_invalid() {
        let (app, _) = app();
        submit(&app).await;
        let id = first_ticket_id(&app).await;

        for body in [json!({"status": "Closed"}), json!({})] {
            let (status, err) =
                call(&app, "POST", &format!("/api/ticket/{id}/status"), Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(err["error"], "Missing or invalid status");
        }
    }

    #[tokio::test]
    async fn update_status_unknown_ticket_is_404() {
        let (app, _) = app();
        let (status, err) = call(
            &app,
            "POST",
            "/api/ticket/404/status",
            Some(json!({"status": "Resolved"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["error"], "Ticket not found");
    }

    #[tokio::test]
    async fn ticket_status_lookup() {
        let (app, _) = app();
        let submitted = submit(&app).await;
        let ticket_id = submitted["ticket_id"].as_str().unwrap();

        let (status, view) =
            call(&app, "GET", &format!("/api/ticket/status/{ticket_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["ticket_id"], ticket_id);
        assert_eq!(view["subject"], "Need help");
        assert_eq!(view["status"], "New");
        assert!(view.get("body").is_none());

        let (status, _) = call(&app, "GET", "/api/ticket/status/TICKET-nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reply_resolves_ticket() {
        let (app, notifier) = app();
        submit(&app).await;
        let id = first_ticket_id(&app).await;

        let (status, ticket) = call(
            &app,
            "POST",
            &format!("/api/ticket/{id}/reply"),
            Some(json!({"reply_text": "Reset it at the portal."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ticket["status"], "Resolved");
        let last = notifier.sent().pop().unwrap();
        assert!(last.subject.starts_with("Solution for your ticket"));
    }

    #[tokio::test]
    async fn reply_missing_text_is_400_and_unknown_is_404() {
        let (app, _) = app();
        submit(&app).await;
        let id = first_ticket_id(&app).await;

        let (status, err) = call(
            &app,
            "POST",
            &format!("/api/ticket/{id}/reply"),
            Some(json!({"reply_text": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Reply text is missing");

        let (status, _) = call(
            &app,
            "POST",
            "/api/ticket/999/reply",
            Some(json!({"reply_text": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = app();
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn malformed_bodies_use_route_errors() {
        let (app, notifier) = app();
        submit(&app).await;
        let id = first_ticket_id(&app).await;
        let status_uri = format!("/api/ticket/{id}/status");
        let reply_uri = format!("/api/ticket/{id}/reply");
        let json = Some("application/json");

        let cases: [(&str, Option<&str>, &'static str, &str); 6] = [
            ("/submit-query", None, r#"{"email":"a@x.com"}"#, "Missing required fields"),
            ("/submit-query", json, "", "Missing required fields"),
            (status_uri.as_str(), json, r#"{"status": 5}"#, "Missing or invalid status"),
            (status_uri.as_str(), None, r#"{"status":"Resolved"}"#, "Missing or invalid status"),
            (reply_uri.as_str(), json, "not json", "Reply text is missing"),
            (reply_uri.as_str(), json, r#"{"reply_text": ["a"]}"#, "Reply text is missing"),
        ];
        for (uri, content_type, body, message) in cases {
            let (status, err) = call_raw(&app, uri, content_type, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
            assert_eq!(err["error"], message, "{uri} {body}");
        }

        let (_, tickets) = call(&app, "GET", "/api/tickets", None).await;
        assert_eq!(tickets.as_array().unwrap().len(), 1);
        assert_eq!(tickets[0]["status"], "New");
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn non_numeric_ticket_id_is_404() {
        let (app, _) = app();
        for uri in ["/api/ticket/abc/status", "/api/ticket/abc/reply"] {
            let (status, err) = call_raw(
                &app,
                uri,
                Some("application/json"),
                r#"{"status":"Resolved","reply_text":"hi"}"#,
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(err["error"], "Ticket not found");
        }
    }
}
