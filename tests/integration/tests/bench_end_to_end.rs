//! End-to-end scenarios driving a webhook handler over a real loopback socket.

use dialogflow_bench::{
    BenchConfig, DialogflowBench, IntentTriggerOptions, WebhookRequest,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

fn welcome_handler() -> impl Fn(WebhookRequest) -> Value + Send + Sync + 'static {
    |_request: WebhookRequest| {
        json!({
            "payload": { "google": {
                "expectUserResponse": true,
                "richResponse": { "items": [
                    { "simpleResponse": { "displayText": "Welcome", "textToSpeech": "Welcome!" } }
                ] }
            } }
        })
    }
}

fn echo_intent_handler() -> impl Fn(WebhookRequest) -> Value + Send + Sync + 'static {
    |request: WebhookRequest| {
        let action = request.query_result.action;
        json!({
            "payload": { "google": {
                "expectUserResponse": false,
                "richResponse": { "items": [
                    { "simpleResponse": {
                        "displayText": format!("handled {action}"),
                        "textToSpeech": format!("spoke {action}")
                    } }
                ] }
            } }
        })
    }
}

#[tokio::test]
async fn integration_welcome_scenario_reduces_rich_response() {
    let bench = DialogflowBench::start_with_config(welcome_handler(), BenchConfig { port: 0 })
        .await
        .expect("start bench");

    let reduced = bench
        .trigger_intent("anything.at.all", &IntentTriggerOptions::default())
        .resolve()
        .await
        .expect("resolve welcome exchange");

    assert!(reduced.expect_user_response);
    assert_eq!(reduced.display_text, vec!["Welcome"]);
    assert_eq!(reduced.text_to_speech, vec!["Welcome!"]);

    bench.close().await.expect("close bench");
}

#[tokio::test]
async fn integration_concurrent_triggers_resolve_independently() {
    let bench = DialogflowBench::start_with_config(echo_intent_handler(), BenchConfig { port: 0 })
        .await
        .expect("start bench");

    let first = bench.trigger_intent("order.pizza", &IntentTriggerOptions::default());
    let second = bench.trigger_intent("cancel.order", &IntentTriggerOptions::default());
    let (first, second) = tokio::join!(first.resolve(), second.resolve());

    let first = first.expect("first exchange");
    assert_eq!(first.display_text, vec!["handled order.pizza"]);
    assert_eq!(first.text_to_speech, vec!["spoke order.pizza"]);

    let second = second.expect("second exchange");
    assert_eq!(second.display_text, vec!["handled cancel.order"]);
    assert_eq!(second.text_to_speech, vec!["spoke cancel.order"]);

    bench.close().await.expect("close bench");
}

#[tokio::test]
async fn integration_intent_data_round_trips_to_handler_context() {
    let handler = |request: WebhookRequest| {
        let carried = request
            .query_result
            .output_contexts
            .first()
            .and_then(|context| context.parameters.get("data"))
            .and_then(Value::as_str)
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .unwrap_or(Value::Null);
        json!({
            "payload": { "google": {
                "expectUserResponse": true,
                "richResponse": { "items": [
                    { "simpleResponse": { "displayText": carried["topic"].clone() } }
                ] }
            } }
        })
    };
    let bench = DialogflowBench::start_with_config(handler, BenchConfig { port: 0 })
        .await
        .expect("start bench");

    let options = IntentTriggerOptions {
        intent_data: Some(json!({ "topic": "weather", "turn": 4 })),
        ..IntentTriggerOptions::default()
    };
    let reduced = bench
        .trigger_intent("follow.up", &options)
        .resolve()
        .await
        .expect("resolve exchange");
    assert_eq!(reduced.display_text, vec!["weather"]);

    bench.close().await.expect("close bench");
}

#[tokio::test]
async fn integration_close_makes_port_immediately_rebindable() {
    let bench = DialogflowBench::start_with_config(welcome_handler(), BenchConfig { port: 0 })
        .await
        .expect("start bench");
    let addr = bench.local_addr();

    assert!(
        TcpListener::bind(addr).await.is_err(),
        "open session must hold its port"
    );

    bench.close().await.expect("close bench");
    TcpListener::bind(addr)
        .await
        .expect("port must be rebindable after close");
}
