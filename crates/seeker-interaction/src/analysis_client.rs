//! Client for the streaming analysis endpoint.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use seeker_core::Result;
use seeker_core::config::ClientConfig;
use seeker_core::session::{SearchSession, SessionOutcome, SessionReport};
use tokio_util::sync::CancellationToken;

use crate::http::{ensure_success, with_bearer};
use crate::stream_reader::StreamReader;

pub const EVENT_STREAM: &str = "text/event-stream";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    query: &'a str,
    search_id: &'a str,
}

/// Opens one analysis stream per session. Requests are never retried.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    stream_url: String,
    token: Option<String>,
}

impl AnalysisClient {
    /// The stream itself has no timeout; only connecting is bounded.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            stream_url: config.stream_url(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    /// Sends the POST and checks the status. The body is left unread.
    pub async fn open(&self, query: &str, search_id: &str) -> Result<reqwest::Response> {
        let request = self
            .client
            .post(&self.stream_url)
            .header(ACCEPT, EVENT_STREAM)
            .json(&AnalysisRequest { query, search_id });

        let response = with_bearer(request, self.token.as_deref()).send().await?;
        ensure_success(response).await
    }

    /// Runs `session` against the backend until it reaches a terminal state.
    ///
    /// Connection failures and non-2xx statuses finalize the session as
    /// `Errored` (persisting whatever it holds) before the error is returned.
    pub async fn run(
        &self,
        session: &mut SearchSession,
        reader: &StreamReader,
        cancel: &CancellationToken,
    ) -> Result<Option<SessionReport>> {
        tracing::info!(
            search_id = session.search_id(),
            url = %self.stream_url,
            "Opening analysis stream"
        );

        let query = session.query().to_string();
        let search_id = session.search_id().to_string();
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            opened = self.open(&query, &search_id) => Some(opened),
        };
        let Some(opened) = opened else {
            return Ok(session.finalize(SessionOutcome::Aborted));
        };

        let response = match opened {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(search_id = session.search_id(), error = %e, "Analysis request failed");
                session.finalize(SessionOutcome::Errored {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        reader.drive(session, response.bytes_stream(), cancel).await
    }
}
