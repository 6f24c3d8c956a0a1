use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::types::{ErrorBody, SubmitQueryRequest, SubmitQueryResponse};
use crate::ticket::TicketStatusView;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("server returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Talks to a running helpdesk server.
pub struct HelpdeskClient {
    client: Client,
    base_url: String,
}

impl HelpdeskClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn submit_query(
        &self,
        req: &SubmitQueryRequest,
    ) -> Result<SubmitQueryResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}/submit-query", self.base_url))
            .json(req)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn ticket_status(&self, ticket_id: &str) -> Result<TicketStatusView, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/ticket/status/{ticket_id}", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
