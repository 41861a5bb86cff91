//! Synthesizes webhook requests representing a triggered intent.
//!
//! The builder is total: any combination of options produces a well-formed
//! request. Absent options omit their request fields entirely rather than
//! sending empty values.

use serde_json::{Map, Value};

use crate::bench_contract::{
    ContextEntry, IntentRef, OriginalDetectIntentRequest, QueryResult, WebhookRequest,
    BENCH_CONTEXT_DATA_KEY, BENCH_CONTEXT_LIFESPAN, BENCH_LANGUAGE_CODE,
    BENCH_SESSION_CONTEXT_NAME,
};

#[derive(Debug, Clone, Default)]
/// Options shaping a synthesized intent trigger.
pub struct IntentTriggerOptions {
    /// Raw user utterance copied into `queryText` when present.
    pub text: Option<String>,
    /// Slot-filling parameters copied verbatim into the query result.
    pub parameters: Option<Map<String, Value>>,
    /// Carried conversational state, serialized into a single session context.
    pub intent_data: Option<Value>,
}

/// Build the webhook request for a triggered intent.
///
/// The intent id doubles as `action` and the matched intent's display name.
/// `intent_data` yields exactly one context entry whose `data` parameter is
/// the JSON string serialization of the supplied value; without it the
/// context list stays empty.
pub fn build_webhook_request(intent_id: &str, options: &IntentTriggerOptions) -> WebhookRequest {
    let mut output_contexts = Vec::new();
    if let Some(intent_data) = &options.intent_data {
        let mut parameters = Map::new();
        parameters.insert(
            BENCH_CONTEXT_DATA_KEY.to_string(),
            Value::String(intent_data.to_string()),
        );
        output_contexts.push(ContextEntry {
            name: BENCH_SESSION_CONTEXT_NAME.to_string(),
            lifespan_count: BENCH_CONTEXT_LIFESPAN,
            parameters,
        });
    }

    WebhookRequest {
        query_result: QueryResult {
            action: intent_id.to_string(),
            intent: IntentRef {
                display_name: intent_id.to_string(),
            },
            language_code: BENCH_LANGUAGE_CODE.to_string(),
            output_contexts,
            query_text: options.text.clone(),
            parameters: options.parameters.clone(),
        },
        original_detect_intent_request: OriginalDetectIntentRequest::simulated_surface(),
    }
}
