//! REST client for the collaborator endpoints: auth, credits and the
//! server-side search history.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use seeker_core::auth::TokenStore;
use seeker_core::config::ClientConfig;
use seeker_core::history::HistoryEntry;
use seeker_core::{Result, SeekerError};

use crate::http::{ensure_success, with_bearer};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const ACTIVATE_PATH: &str = "/api/auth/activate";
pub const GOOGLE_AUTH_PATH: &str = "/api/auth/google";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const CREDITS_PATH: &str = "/api/credits";
pub const HISTORY_PATH: &str = "/api/history";

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct Registration<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct Activation<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    token: String,
}

/// Credit balance of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    #[serde(alias = "credits", alias = "remaining_credits")]
    pub remaining: i64,
    #[serde(default, alias = "total_credits")]
    pub total: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryListResponse {
    Bare(Vec<HistoryEntry>),
    Wrapped { history: Vec<HistoryEntry> },
}

/// Bearer-authenticated client for everything except the analysis stream.
///
/// Non-2xx responses become `SeekerError::Transport` with the status set.
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.tokens.load()?;
        let request = self.client.request(method, self.config.endpoint(path));
        Ok(with_bearer(request, token.as_deref()))
    }

    /// Signs in and stores the returned bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let response = self
            .client
            .post(self.config.endpoint(LOGIN_PATH))
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body: TokenResponse = ensure_success(response).await?.json().await?;
        if body.token.is_empty() {
            return Err(SeekerError::Security("login returned an empty token".into()));
        }
        self.tokens.save(&body.token)?;
        tracing::info!(email, "Signed in");
        Ok(body.token)
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<()> {
        let response = self
            .client
            .post(self.config.endpoint(REGISTER_PATH))
            .json(&Registration {
                email,
                password,
                name,
            })
            .send()
            .await?;
        ensure_success(response).await?;
        tracing::info!(email, "Registered account; activation pending");
        Ok(())
    }

    pub async fn activate(&self, activation_token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.config.endpoint(ACTIVATE_PATH))
            .json(&Activation {
                token: activation_token,
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Where the browser should be sent to start Google sign-in.
    pub fn google_auth_url(&self) -> String {
        self.config.endpoint(GOOGLE_AUTH_PATH)
    }

    /// Invalidates the session server-side and forgets the local token.
    ///
    /// The local token is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let remote = match self.request(Method::POST, LOGOUT_PATH) {
            Ok(request) => match request.send().await {
                Ok(response) => ensure_success(response).await.map(|_| ()),
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e),
        };
        if let Err(e) = &remote {
            tracing::warn!(error = %e, "Server-side logout failed");
        }
        self.tokens.clear()?;
        remote
    }

    pub async fn credits(&self) -> Result<CreditBalance> {
        let response = self.request(Method::GET, CREDITS_PATH)?.send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Lists the account's search history as kept by the server.
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let response = self.request(Method::GET, HISTORY_PATH)?.send().await?;
        let body: HistoryListResponse = ensure_success(response).await?.json().await?;
        Ok(match body {
            HistoryListResponse::Bare(entries) => entries,
            HistoryListResponse::Wrapped { history } => history,
        })
    }

    pub async fn delete_history(&self, id: &str) -> Result<()> {
        let path = format!("{}/{}", HISTORY_PATH, id);
        let response = self.request(Method::DELETE, &path)?.send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
