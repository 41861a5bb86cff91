//! Reduces settled webhook responses into a flat, assertion-friendly shape.

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::bench_contract::WebhookResponseBody;

#[derive(Debug, Clone)]
/// Snapshot of one settled HTTP exchange.
pub struct RawWebhookExchange {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body_bytes: Bytes,
}

#[derive(Debug, Clone)]
/// Flattened projection of a webhook response.
///
/// `display_text` and `text_to_speech` keep the original item order; an item
/// contributing both fields appears in both sequences at its position.
pub struct ReducedWebhookResponse {
    /// The settled exchange the reduction was derived from.
    pub raw: RawWebhookExchange,
    /// The decoded response body, untouched.
    pub body: Value,
    /// Whether the handler expects further user input. False when the
    /// assistant payload is absent.
    pub expect_user_response: bool,
    /// All non-empty display texts from rich-response items, in order.
    pub display_text: Vec<String>,
    /// All non-empty spoken texts from rich-response items, in order.
    pub text_to_speech: Vec<String>,
}

/// Reduce a settled exchange and its decoded body into assertable fields.
///
/// A missing `payload.google` branch is not an error: it reduces to a false
/// flag and empty sequences. A body whose nesting mismatches the contract
/// types (an object expected, something else found) is rejected.
pub fn reduce_webhook_response(
    raw: RawWebhookExchange,
    body: Value,
) -> Result<ReducedWebhookResponse> {
    let decoded: WebhookResponseBody = serde_json::from_value(body.clone())
        .context("webhook response body does not match the dialogflow payload contract")?;

    let mut expect_user_response = false;
    let mut display_text = Vec::new();
    let mut text_to_speech = Vec::new();

    if let Some(google) = decoded.payload.and_then(|payload| payload.google) {
        expect_user_response = google.expect_user_response.unwrap_or(false);
        let items = google
            .rich_response
            .and_then(|rich| rich.items)
            .unwrap_or_default();
        for item in items {
            let Some(simple) = item.simple_response else {
                continue;
            };
            if let Some(text) = simple.display_text {
                if !text.is_empty() {
                    display_text.push(text);
                }
            }
            if let Some(text) = simple.text_to_speech {
                if !text.is_empty() {
                    text_to_speech.push(text);
                }
            }
        }
    }

    Ok(ReducedWebhookResponse {
        raw,
        body,
        expect_user_response,
        display_text,
        text_to_speech,
    })
}
