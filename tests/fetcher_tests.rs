use link_previewer::{
    ErrorKind, Fetcher, FetcherConfig, PreviewError, PreviewResult, MAX_ERROR_BODY_WIDTH,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> Fetcher {
    Fetcher::new_with_config(FetcherConfig::default().with_endpoint(server.uri())).unwrap()
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_posts_joined_urls_and_parses_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "urls": "https://example.com,http://foo.org/x" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "url": "https://example.com",
                "title": "Example Domain",
                "favicon": "https://example.com/favicon.ico",
                "description": "For use in illustrative examples",
                "image": "https://example.com/hero.png"
            },
            {
                "url": "http://foo.org/x",
                "title": "Foo",
                "favicon": "",
                "description": "",
                "image": ""
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = fetcher_for(&server)
        .fetch(&urls(&["https://example.com", "http://foo.org/x"]))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Example Domain");
    assert_eq!(results[0].image, "https://example.com/hero.png");
    assert_eq!(results[1].url, "http://foo.org/x");
}

#[tokio::test]
async fn test_missing_and_null_fields_become_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "url": "https://example.com", "title": null, "image": null }
        ])))
        .mount(&server)
        .await;

    let results = fetcher_for(&server)
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![PreviewResult {
            url: "https://example.com".into(),
            ..Default::default()
        }]
    );
}

#[tokio::test]
async fn test_empty_array_is_validation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap_err();

    assert!(matches!(err, PreviewError::EmptyResult));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap_err();

    match &err {
        PreviewError::HttpStatus { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "upstream exploded");
        }
        e => panic!("Expected HttpStatus, got: {:?}", e),
    }
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_long_error_body_is_cut() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>".repeat(1000)))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap_err();

    match err {
        PreviewError::HttpStatus { status, message } => {
            assert_eq!(status, 502);
            assert!(message.chars().count() <= MAX_ERROR_BODY_WIDTH);
            assert!(message.starts_with("<html>"));
            assert!(message.ends_with("..."));
        }
        e => panic!("Expected HttpStatus, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_client_error_without_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap_err();

    match err {
        PreviewError::HttpStatus { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        e => panic!("Expected HttpStatus, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "url": "https://example.com" }]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher = Fetcher::new_with_config(
        FetcherConfig::default()
            .with_endpoint(server.uri())
            .with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = fetcher
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap_err();

    assert!(
        matches!(err, PreviewError::TimeoutError(_)),
        "Expected TimeoutError, got: {:?}",
        err
    );
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/preview-urls"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap_err();

    assert!(matches!(err, PreviewError::DecodeError(_)));
}

#[tokio::test]
async fn test_endpoint_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/preview-urls"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "url": "https://example.com" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new_with_config(
        FetcherConfig::default().with_endpoint(format!("{}/api/v1", server.uri())),
    )
    .unwrap();

    assert_eq!(
        fetcher.preview_url().as_str(),
        format!("{}/api/v1/preview-urls", server.uri())
    );
    let results = fetcher.fetch(&urls(&["https://example.com"])).await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_no_urls_means_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch(&[]).await.unwrap_err();
    assert!(matches!(err, PreviewError::NoValidUrls));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    let fetcher = Fetcher::new_with_config(
        FetcherConfig::default()
            .with_endpoint("http://127.0.0.1:1")
            .with_timeout(Duration::from_millis(500)),
    )
    .unwrap();

    let err = fetcher
        .fetch(&urls(&["https://example.com"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn test_invalid_endpoint_is_rejected() {
    let err = Fetcher::new_with_config(FetcherConfig::default().with_endpoint("not a url"))
        .unwrap_err();
    assert!(matches!(err, PreviewError::InvalidEndpoint(_)));
    assert_eq!(err.kind(), ErrorKind::Config);
}
