//! Loopback test bench for Dialogflow-style webhook handlers.
//!
//! Hosts a caller-supplied webhook handler behind an ephemeral HTTP listener,
//! synthesizes "an intent was triggered" requests against it, and reduces the
//! rich JSON responses into flat, assertable fields (displayed text, spoken
//! text, whether further user input is expected).
//!
//! ```rust,no_run
//! use dialogflow_bench::{DialogflowBench, IntentTriggerOptions, WebhookRequest};
//! use serde_json::json;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let bench = DialogflowBench::start(|_request: WebhookRequest| {
//!     json!({
//!         "payload": { "google": {
//!             "expectUserResponse": true,
//!             "richResponse": { "items": [
//!                 { "simpleResponse": { "displayText": "Welcome", "textToSpeech": "Welcome!" } }
//!             ] }
//!         } }
//!     })
//! })
//! .await?;
//!
//! let reduced = bench
//!     .trigger_intent("welcome", &IntentTriggerOptions::default())
//!     .resolve()
//!     .await?;
//! assert!(reduced.expect_user_response);
//! assert_eq!(reduced.display_text, vec!["Welcome"]);
//!
//! bench.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod bench_contract;
pub mod bench_exchange;
pub mod bench_reduce;
pub mod bench_request;
pub mod bench_session;

pub use bench_contract::*;
pub use bench_exchange::*;
pub use bench_reduce::*;
pub use bench_request::*;
pub use bench_session::*;
