//! Failure injection tests for the relay's retry and classification paths.

use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn transient_errors_are_retried_with_growing_backoff() {
    let (upstream, log) = common::start_upstream(|index| {
        if index < 2 {
            (503, r#"{"detail":"warming up"}"#.to_string())
        } else {
            (200, r#"{"status":"success","num_frames":4}"#.to_string())
        }
    })
    .await;

    let relay = common::spawn_relay(common::fast_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{relay}/proxy/generate"))
        .json(&json!({ "prompt": "a cat", "colab_url": format!("http://{upstream}") }))
        .send()
        .await
        .expect("relay unreachable");

    assert_eq!(res.status(), 200, "should succeed on the third attempt");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 3, "exactly three attempts expected");

    // Backoff doubles between attempts (100ms then 200ms base, plus jitter),
    // so the second gap must be wider than the first.
    let first_gap = seen[1].at.duration_since(seen[0].at);
    let second_gap = seen[2].at.duration_since(seen[1].at);
    assert!(
        first_gap >= Duration::from_millis(80),
        "first gap too short: {first_gap:?}"
    );
    assert!(
        second_gap > first_gap,
        "delays must grow: {first_gap:?} then {second_gap:?}"
    );
}

#[tokio::test]
async fn retries_exhausted_surface_the_last_upstream_status() {
    let (upstream, log) =
        common::start_upstream(|_| (503, r#"{"detail":"still busy"}"#.to_string())).await;
    let relay = common::spawn_relay(common::fast_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{relay}/proxy/generate"))
        .json(&json!({ "prompt": "x", "colab_url": format!("http://{upstream}") }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("503"), "detail was: {detail}");
    assert!(detail.contains("still busy"), "detail was: {detail}");
    assert_eq!(log.lock().unwrap().len(), 3, "retry budget is 3 total tries");
}

#[tokio::test]
async fn interstitial_page_is_classified_as_malformed_response() {
    // An ngrok-style warning page: 200 OK wrapping HTML instead of the
    // expected JSON. Pad it well past the excerpt bound and plant a marker
    // at the tail that must never reach the caller.
    let page = format!(
        "<!DOCTYPE html><html><head><title>You are about to visit</title></head><body>{}TAIL-MARKER</body></html>",
        "x".repeat(300)
    );
    let (upstream, _log) = common::start_upstream(move |_| (200, page.clone())).await;
    let relay = common::spawn_relay(common::fast_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{relay}/proxy/generate"))
        .json(&json!({ "prompt": "x", "colab_url": format!("http://{upstream}") }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(
        detail.contains("Ngrok warning page"),
        "detail must name the likely cause: {detail}"
    );
    assert!(detail.contains("HTTP 200"), "detail was: {detail}");
    assert!(
        detail.contains("<!DOCTYPE html>"),
        "detail must carry the body excerpt: {detail}"
    );
    assert!(
        !detail.contains("TAIL-MARKER"),
        "excerpt must be truncated to ~200 characters"
    );
}

#[tokio::test]
async fn unreachable_upstream_reports_transport_failure_within_bounds() {
    // Reserve a port, then free it so nothing answers there.
    let dead = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let mut config = common::fast_config();
    config.retries.base_delay_ms = 50;
    let relay = common::spawn_relay(config).await;
    let client = reqwest::Client::new();

    let start = Instant::now();
    let res = client
        .post(format!("http://{relay}/proxy/generate"))
        .json(&json!({ "prompt": "x", "colab_url": format!("http://{dead}") }))
        .send()
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Failed to contact Colab"),
        "detail was: {}",
        body["detail"]
    );

    // Refused connections fail fast; three tries plus two short backoffs
    // must land well under the per-attempt timeout budget.
    assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");
}
