//! Wire contract types for the Dialogflow v2 webhook request/response pair.
//!
//! Request types serialize with the exact field names a consuming webhook SDK
//! expects, so synthesized payloads decode unchanged on the handler side.
//! Response types decode leniently: every level is optional and unknown fields
//! are ignored, because handlers routinely emit partial payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Language tag stamped on every synthesized query result.
pub const BENCH_LANGUAGE_CODE: &str = "en";

/// Synthetic session context path used to carry intent data into a turn.
pub const BENCH_SESSION_CONTEXT_NAME: &str =
    "projects/foo/agent/sessions/12345/contexts/_actions_on_google";

/// Lifespan stamped on the synthetic context entry so it outlives the turn.
pub const BENCH_CONTEXT_LIFESPAN: u32 = 100;

/// Context parameter key holding the JSON-serialized intent data.
pub const BENCH_CONTEXT_DATA_KEY: &str = "data";

/// Capability names advertised for the simulated client surface. Models a
/// full-featured smart-display surface and is not parameterized.
pub const BENCH_SURFACE_CAPABILITIES: [&str; 4] = [
    "actions.capability.WEB_BROWSER",
    "actions.capability.AUDIO_OUTPUT",
    "actions.capability.SCREEN_OUTPUT",
    "actions.capability.MEDIA_RESPONSE_AUDIO",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Inbound webhook request delivered to the handler under test.
pub struct WebhookRequest {
    pub query_result: QueryResult,
    pub original_detect_intent_request: OriginalDetectIntentRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Query-result block of a webhook request.
pub struct QueryResult {
    pub action: String,
    pub intent: IntentRef,
    pub language_code: String,
    pub output_contexts: Vec<ContextEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Matched-intent reference inside a query result.
pub struct IntentRef {
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Session context entry attached to a query result.
pub struct ContextEntry {
    pub name: String,
    pub lifespan_count: u32,
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Original-detection block carrying the simulated client surface.
pub struct OriginalDetectIntentRequest {
    pub payload: DetectIntentPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectIntentPayload {
    pub surface: Surface,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Surface {
    pub capabilities: Vec<SurfaceCapability>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceCapability {
    pub name: String,
}

impl OriginalDetectIntentRequest {
    /// Fixed rich-surface payload advertised on every synthesized request.
    pub fn simulated_surface() -> Self {
        Self {
            payload: DetectIntentPayload {
                surface: Surface {
                    capabilities: BENCH_SURFACE_CAPABILITIES
                        .iter()
                        .map(|name| SurfaceCapability {
                            name: (*name).to_string(),
                        })
                        .collect(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
/// Lenient top-level shape of a webhook response body.
pub struct WebhookResponseBody {
    #[serde(default)]
    pub payload: Option<ResponsePayload>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
/// Platform payload wrapper of a webhook response.
pub struct ResponsePayload {
    #[serde(default)]
    pub google: Option<GooglePayload>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Assistant branch of the response payload.
pub struct GooglePayload {
    #[serde(default)]
    pub expect_user_response: Option<bool>,
    #[serde(default)]
    pub rich_response: Option<RichResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
/// Ordered rich-response item list.
pub struct RichResponse {
    #[serde(default)]
    pub items: Option<Vec<RichResponseItem>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RichResponseItem {
    #[serde(default)]
    pub simple_response: Option<SimpleResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Simple spoken/displayed text pair carried by a rich-response item.
pub struct SimpleResponse {
    #[serde(default)]
    pub display_text: Option<String>,
    #[serde(default)]
    pub text_to_speech: Option<String>,
}
