//! Pending webhook exchange with a closed set of response expectations.
//!
//! Resolving an exchange sends the prepared POST, checks every registered
//! expectation against the raw settled response, then routes the body through
//! the reducer so callers await the flattened result rather than the raw
//! response. Failures are never retried; they reject the exchange directly.

use anyhow::{bail, Context, Result};
use axum::http::StatusCode;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::bench_contract::WebhookRequest;
use crate::bench_reduce::{reduce_webhook_response, RawWebhookExchange, ReducedWebhookResponse};

/// Expectation callback run against the settled exchange snapshot.
pub type ExchangeCheck = Box<dyn Fn(&RawWebhookExchange) -> Result<()> + Send + Sync>;

#[derive(Serialize)]
#[serde(untagged)]
enum BenchPayload {
    Request(Box<WebhookRequest>),
    Raw(Value),
}

/// The expectation variants an exchange can register. The underlying HTTP
/// test surface's combined forms (status plus body, status plus callback,
/// header pair plus callback) are expressed as chains of these.
enum BenchExpectation {
    Status(StatusCode),
    Body(Value),
    Header { name: String, value: String },
    Check(ExchangeCheck),
}

/// One pending webhook exchange against the session's listener.
pub struct IntentExchange {
    client: Client,
    endpoint: String,
    payload: BenchPayload,
    expectations: Vec<BenchExpectation>,
}

impl IntentExchange {
    pub(crate) fn from_request(client: Client, endpoint: String, request: WebhookRequest) -> Self {
        Self {
            client,
            endpoint,
            payload: BenchPayload::Request(Box::new(request)),
            expectations: Vec::new(),
        }
    }

    pub(crate) fn from_raw(client: Client, endpoint: String, payload: Value) -> Self {
        Self {
            client,
            endpoint,
            payload: BenchPayload::Raw(payload),
            expectations: Vec::new(),
        }
    }

    /// Expect the settled response to carry exactly this status code.
    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expectations.push(BenchExpectation::Status(status));
        self
    }

    /// Expect the settled response body to deep-equal this JSON value.
    pub fn expect_body(mut self, body: Value) -> Self {
        self.expectations.push(BenchExpectation::Body(body));
        self
    }

    /// Expect a response header to be present with exactly this value.
    pub fn expect_header(mut self, name: &str, value: &str) -> Self {
        self.expectations.push(BenchExpectation::Header {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Run an arbitrary check against the settled exchange snapshot.
    pub fn expect_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&RawWebhookExchange) -> Result<()> + Send + Sync + 'static,
    {
        self.expectations
            .push(BenchExpectation::Check(Box::new(check)));
        self
    }

    /// Send the exchange and await its reduced result.
    ///
    /// Expectations run against the raw settled response first; the body must
    /// then decode as JSON before reduction. Transport failures, the fixed
    /// deadline, failed expectations, and undecodable bodies all reject.
    pub async fn resolve(self) -> Result<ReducedWebhookResponse> {
        let raw = self.settle().await?;
        let body: Value = serde_json::from_slice(&raw.body_bytes)
            .context("settled webhook response body is not valid JSON")?;
        reduce_webhook_response(raw, body)
    }

    /// Send the exchange and await the raw settled snapshot without
    /// reduction. Registered expectations still run.
    pub async fn resolve_raw(self) -> Result<RawWebhookExchange> {
        self.settle().await
    }

    async fn settle(self) -> Result<RawWebhookExchange> {
        let response = match self
            .client
            .post(&self.endpoint)
            .json(&self.payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) if error.is_timeout() => {
                return Err(error).context("webhook exchange exceeded its deadline");
            }
            Err(error) => {
                return Err(error).context("webhook exchange failed before a response settled");
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .bytes()
            .await
            .context("failed to read settled webhook response body")?;
        let raw = RawWebhookExchange {
            status,
            headers,
            body_bytes,
        };

        for expectation in &self.expectations {
            check_expectation(expectation, &raw)?;
        }
        Ok(raw)
    }
}

fn check_expectation(expectation: &BenchExpectation, raw: &RawWebhookExchange) -> Result<()> {
    match expectation {
        BenchExpectation::Status(expected) => {
            if raw.status != *expected {
                bail!("expected status {expected}, got {}", raw.status);
            }
        }
        BenchExpectation::Body(expected) => {
            let actual: Value = serde_json::from_slice(&raw.body_bytes)
                .context("body expectation requires a JSON response body")?;
            if actual != *expected {
                bail!("expected body {expected}, got {actual}");
            }
        }
        BenchExpectation::Header { name, value } => {
            let Some(actual) = raw.headers.get(name.as_str()) else {
                bail!("expected header '{name}' is missing");
            };
            let actual = actual
                .to_str()
                .with_context(|| format!("header '{name}' is not valid utf-8"))?;
            if actual != value {
                bail!("expected header '{name}' to be '{value}', got '{actual}'");
            }
        }
        BenchExpectation::Check(check) => check(raw)?,
    }
    Ok(())
}
