//! Remote ledger gateway client over HTTP.
//!
//! Gateway protocol (JSON bodies):
//!
//! | Call | Request | Success body |
//! |------|---------|--------------|
//! | connect | `GET /v1/accounts` | `{"accounts": ["<id>", ...]}` |
//! | submit | `POST /v1/records` `{"digest", "owner"}` | `{"tx_id"}` |
//! | confirm | `GET /v1/transactions/{tx_id}` | `{"status": "pending" \| "confirmed" \| "failed", "confirmed_at"?, "failure"?}` |
//! | lookup | `GET /v1/records/{digest}` | `{"found", "owner"?}` (404 means not found) |
//!
//! Non-2xx bodies are parsed as provider-shaped `LedgerFailure`s and passed
//! through untouched for the classifier. Transport errors become
//! `Unreachable`/`Timeout` failures.

use crate::errors::{http_client_error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docanchor_core::{
    Commitment, Digest, FailureCode, Identity, LedgerClient, LedgerFailure, LedgerResult,
    PendingRecord, RecordLookup, Session,
};
use docanchor_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest gateway body echoed into a failure message
const MAX_ECHOED_BODY: usize = 200;

/// Connection settings for `HttpLedgerClient`
#[derive(Debug, Clone)]
pub struct HttpLedgerConfig {
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay between confirmation polls
    pub poll_interval: Duration,
    /// Confirmation polls before giving up
    pub max_polls: u32,
    pub token: Option<Sensitive<String>>,
    /// Identity to act as; the gateway's first account when unset
    pub identity: Option<Identity>,
}

impl HttpLedgerConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(1000),
            max_polls: 60,
            token: None,
            identity: None,
        }
    }
}

/// HTTP-based Ledger Client
pub struct HttpLedgerClient {
    config: HttpLedgerConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    #[serde(default)]
    accounts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    digest: &'a str,
    owner: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    tx_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TransactionState {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct TransactionStatus {
    status: TransactionState,
    #[serde(default)]
    confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    failure: Option<LedgerFailure>,
}

impl HttpLedgerClient {
    /// Create a client with default settings
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(HttpLedgerConfig::new(base_url))
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an `ERR_CONFIG` error if the underlying HTTP client cannot be
    /// built with the configured timeout and proxy settings.
    pub fn with_config(config: HttpLedgerConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(http_client_error)?;
        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(self.config.timeout);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> LedgerResult<reqwest::Response> {
        self.authorized(builder)
            .send()
            .await
            .map_err(transport_failure)
    }

    async fn json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> LedgerResult<T> {
        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;
        if !status.is_success() {
            return Err(failure_from_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| {
            LedgerFailure::new(format!(
                "malformed gateway response ({}): {}",
                e,
                echo(&body)
            ))
        })
    }

    async fn transaction_status(&self, tx_id: &str) -> LedgerResult<TransactionStatus> {
        let url = self.url(&format!("/v1/transactions/{}", tx_id));
        let response = self.send(self.client.get(&url)).await?;
        Self::json(response).await
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn connect(&self) -> LedgerResult<Session> {
        let response = self.send(self.client.get(self.url("/v1/accounts"))).await?;
        let accounts: AccountsResponse = Self::json(response).await?;

        let chosen = match &self.config.identity {
            Some(identity) => accounts
                .accounts
                .iter()
                .find(|a| a.as_str() == identity.as_str())
                .cloned()
                .ok_or_else(|| {
                    LedgerFailure::new(format!(
                        "identity {} is not available from the gateway",
                        identity
                    ))
                })?,
            None => accounts
                .accounts
                .into_iter()
                .next()
                .ok_or_else(|| LedgerFailure::new("gateway exposes no accounts"))?,
        };

        let identity = Identity::parse(&chosen).map_err(|e| LedgerFailure::new(e.to_string()))?;
        tracing::debug!(identity = %identity, base_url = %self.config.base_url, "connected to ledger gateway");
        Ok(Session::new(identity))
    }

    async fn submit_record(
        &self,
        session: &Session,
        digest: &Digest,
    ) -> LedgerResult<PendingRecord> {
        let body = SubmitRequest {
            digest: digest.as_str(),
            owner: session.identity().as_str(),
        };
        let response = self
            .send(self.client.post(self.url("/v1/records")).json(&body))
            .await?;
        let submitted: SubmitResponse = Self::json(response).await?;

        Ok(PendingRecord {
            tx_id: submitted.tx_id,
            digest: digest.clone(),
            owner: session.identity().clone(),
        })
    }

    async fn await_commitment(&self, pending: &PendingRecord) -> LedgerResult<Commitment> {
        for attempt in 0..self.config.max_polls {
            let status = self.transaction_status(&pending.tx_id).await?;
            match status.status {
                TransactionState::Confirmed => {
                    return Ok(Commitment {
                        tx_id: pending.tx_id.clone(),
                        confirmed_at: status.confirmed_at,
                    });
                }
                TransactionState::Failed => {
                    return Err(status.failure.unwrap_or_else(|| {
                        LedgerFailure::new("transaction failed: execution reverted")
                            .with_error_code(FailureCode::Reverted)
                    }));
                }
                TransactionState::Pending => {
                    if attempt + 1 < self.config.max_polls {
                        tokio::time::sleep(self.config.poll_interval).await;
                    }
                }
            }
        }

        Err(LedgerFailure::new(format!(
            "transaction {} not confirmed after {} polls",
            pending.tx_id, self.config.max_polls
        ))
        .with_error_code(FailureCode::Timeout))
    }

    async fn lookup_record(&self, digest: &Digest) -> LedgerResult<RecordLookup> {
        let url = self.url(&format!("/v1/records/{}", digest));
        let response = self.send(self.client.get(&url)).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(RecordLookup::not_found());
        }
        Self::json(response).await
    }
}

fn transport_failure(err: reqwest::Error) -> LedgerFailure {
    let failure = LedgerFailure::new(format!("HTTP request failed: {}", err));
    if err.is_timeout() {
        failure.with_error_code(FailureCode::Timeout)
    } else {
        failure.with_error_code(FailureCode::Unreachable)
    }
}

/// Gateways on this host are never reached through a proxy
fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .is_some_and(|host| host == "localhost" || host == "127.0.0.1" || host == "[::1]")
}

fn echo(body: &str) -> String {
    body.chars().take(MAX_ECHOED_BODY).collect()
}

/// Interpret a non-2xx gateway body.
///
/// Provider-shaped JSON is kept as is; anything else becomes a plain
/// failure naming the status.
pub(crate) fn failure_from_body(status: u16, body: &str) -> LedgerFailure {
    match serde_json::from_str::<LedgerFailure>(body) {
        Ok(failure) if failure != LedgerFailure::default() => failure,
        _ => LedgerFailure::new(format!(
            "ledger gateway returned status {}: {}",
            status,
            echo(body.trim())
        )),
    }
}
