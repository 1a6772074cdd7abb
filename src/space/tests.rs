use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::mock::MockTransport;
use super::{ComparisonRequest, Language, SpaceClient, SpaceConfig, SpaceError};

fn test_config() -> SpaceConfig {
    SpaceConfig::new("http://mock.space")
        .max_retries(2)
        .backoff_base(Duration::from_secs_f64(1.5))
}

fn test_request() -> ComparisonRequest {
    ComparisonRequest {
        language: Language::English,
        text_a: "hello world".to_string(),
        text_b: "hello world".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_compare_pair_shape() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client
        .transport()
        .push_predict(Ok(json!(["some label", 0.87])));

    let score = client
        .compare(&test_request())
        .await
        .expect("should compare");

    assert_eq!(score, 0.87);
    assert_eq!(client.transport().predict_count(), 1);
    assert_eq!(client.transport().connect_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_compare_scalar_shape() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client.transport().push_predict(Ok(json!(0.42)));

    let score = client
        .compare(&test_request())
        .await
        .expect("should compare");

    assert_eq!(score, 0.42);
}

#[tokio::test(start_paused = true)]
async fn test_compare_forwards_inputs_positionally() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    let request = ComparisonRequest {
        language: Language::Kannada,
        text_a: "ಒಂದು".to_string(),
        text_b: "ಎರಡು".to_string(),
    };

    client.compare(&request).await.expect("should compare");

    assert_eq!(
        client.transport().last_inputs(),
        Some(vec![json!("Kannada"), json!("ಒಂದು"), json!("ಎರಡು")])
    );
}

#[tokio::test(start_paused = true)]
async fn test_compare_bounds_each_call_with_configured_timeout() {
    let config = SpaceConfig::new("http://mock.space").timeout(Duration::from_secs(7));
    let client = SpaceClient::new(config, MockTransport::new());
    client.transport().push_predict(Ok(json!(0.5)));

    client.compare(&test_request()).await.expect("should compare");

    assert_eq!(
        client.transport().last_timeout(),
        Some(Duration::from_secs(7))
    );
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_make_n_plus_one_attempts() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client
        .transport()
        .set_predict_fallback(Err(MockTransport::network_error("boom")));

    let err = client
        .compare(&test_request())
        .await
        .expect_err("should exhaust retries");

    assert_eq!(client.transport().predict_count(), 3);
    match err {
        SpaceError::CallFailed { detail, .. } => {
            assert!(detail.expect("should carry cause").contains("boom"));
        }
        other => panic!("expected call failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_backoff_is_linear_in_attempt_number() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client
        .transport()
        .set_predict_fallback(Err(MockTransport::network_error("boom")));

    let start = tokio::time::Instant::now();
    let _ = client.compare(&test_request()).await;

    // Two retries: 1.5s * 1 before attempt 2, 1.5s * 2 before attempt 3.
    assert_eq!(start.elapsed(), Duration::from_secs_f64(4.5));
}

#[tokio::test(start_paused = true)]
async fn test_protocol_error_is_retried_to_the_limit() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client
        .transport()
        .set_predict_fallback(Ok(json!({"unexpected": "shape"})));

    let err = client
        .compare(&test_request())
        .await
        .expect_err("should fail on shape");

    assert_eq!(client.transport().predict_count(), 3);
    // A bad shape is not a dead connection; the session stays.
    assert_eq!(client.transport().connect_count(), 1);
    match err {
        SpaceError::CallFailed { detail, .. } => {
            assert!(detail.expect("should carry raw response").contains("unexpected"));
        }
        other => panic!("expected call failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_invalidates_session_then_recovers() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client
        .transport()
        .push_predict(Err(MockTransport::network_error("reset")));
    client
        .transport()
        .push_predict(Err(MockTransport::network_error("reset")));
    client.transport().push_predict(Ok(json!(["label", 0.87])));

    let score = client
        .compare(&test_request())
        .await
        .expect("should recover");

    assert_eq!(score, 0.87);
    assert_eq!(client.transport().predict_count(), 3);
    // Initial session plus one re-establishment per dead-handle attempt.
    assert_eq!(client.transport().connect_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_ensure_session_retries_establishment() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client.transport().push_connect_failures(2);

    client
        .ensure_session()
        .await
        .expect("should connect on third attempt");

    assert_eq!(client.transport().connect_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_connect_exhaustion_surfaces_connection_error() {
    let config = test_config().max_retries(1);
    let client = SpaceClient::new(config, MockTransport::new());
    client
        .transport()
        .set_connect_fallback(Err(MockTransport::network_error("refused")));

    let err = client
        .compare(&test_request())
        .await
        .expect_err("should fail to connect");

    assert!(matches!(err, SpaceError::Connection { .. }));
    assert_eq!(client.transport().connect_count(), 2);
    assert_eq!(client.transport().predict_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_construction_tolerates_unreachable_space() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client
        .transport()
        .set_connect_fallback(Err(MockTransport::network_error("cold start")));

    // Construction already succeeded; healthcheck collapses the failure.
    assert!(!client.healthcheck().await);
}

#[tokio::test(start_paused = true)]
async fn test_healthcheck_true_when_endpoint_listed() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    assert!(client.healthcheck().await);
}

#[tokio::test(start_paused = true)]
async fn test_healthcheck_false_when_endpoint_missing() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client
        .transport()
        .set_api_info(Ok(json!({"named_endpoints": {}})));

    assert!(!client.healthcheck().await);
}

#[tokio::test(start_paused = true)]
async fn test_healthcheck_false_on_malformed_description() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client.transport().set_api_info(Ok(json!("not an object")));
    assert!(!client.healthcheck().await);

    client
        .transport()
        .set_api_info(Err(MockTransport::network_error("info failed")));
    assert!(!client.healthcheck().await);
}

#[tokio::test(start_paused = true)]
async fn test_healthcheck_accepts_description_without_endpoint_map() {
    let client = SpaceClient::new(test_config(), MockTransport::new());
    client.transport().set_api_info(Ok(json!({"version": "4.0"})));

    assert!(client.healthcheck().await);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_compares_share_one_session() {
    let client = Arc::new(SpaceClient::new(test_config(), MockTransport::new()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(
            async move { client.compare(&test_request()).await },
        ));
    }

    for handle in handles {
        let score = handle
            .await
            .expect("task should not panic")
            .expect("should compare");
        assert_eq!(score, 1.0);
    }

    // One establishment observed by everyone; nobody saw a torn handle.
    assert_eq!(client.transport().connect_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_compares_survive_a_dead_session() {
    let client = Arc::new(SpaceClient::new(test_config(), MockTransport::new()));
    client
        .transport()
        .push_predict(Err(MockTransport::network_error("reset")));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let client = client.clone();
        handles.push(tokio::spawn(
            async move { client.compare(&test_request()).await },
        ));
    }

    for handle in handles {
        let score = handle
            .await
            .expect("task should not panic")
            .expect("should compare");
        assert_eq!(score, 1.0);
    }
}
