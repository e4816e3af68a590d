use vidquest_core::config::{SafeSearch, SearchConfig};
use vidquest_core::error::Error;
use vidquest_core::SearchQuery;
use vidquest_search::{create_search_provider, DuckDuckGoProvider, SearchError};

#[test]
fn test_unknown_provider_rejected() {
    let config = SearchConfig {
        provider: "bing".to_string(),
        ..SearchConfig::default()
    };

    match create_search_provider(&config) {
        Err(Error::Config(msg)) => assert!(msg.contains("Unknown search provider: 'bing'")),
        Err(other) => panic!("expected config error, got {other:?}"),
        Ok(_) => panic!("expected config error"),
    }
}

#[test]
fn test_default_provider_created() {
    let config = SearchConfig::default();
    assert!(create_search_provider(&config).is_ok());
}

#[test]
fn test_search_error_conversion() {
    let err: Error = SearchError::RateLimited("'rust' returned 202 Accepted".to_string()).into();
    assert!(matches!(err, Error::Search(ref msg) if msg.contains("rate limited")));

    let err: Error = SearchError::ConfigError("bad agent".to_string()).into();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_search_error() {
    use vidquest_core::SearchService;

    let provider = DuckDuckGoProvider::with_endpoint(
        "http://127.0.0.1:9/html/".to_string(),
        "vidquest-tests",
        2,
    )
    .unwrap();

    let query = SearchQuery {
        text: "rust".to_string(),
        max_results: 5,
        safe_search: SafeSearch::Moderate,
        region: None,
    };

    let err = provider.search(&query).await.unwrap_err();
    assert!(matches!(err, Error::Search(_)), "got {err:?}");
}

#[tokio::test]
#[ignore = "Requires network access to DuckDuckGo"]
async fn test_live_search() {
    use vidquest_core::SearchService;

    let provider = create_search_provider(&SearchConfig::default()).unwrap();
    let query = SearchQuery {
        text: "rust programming language".to_string(),
        max_results: 5,
        safe_search: SafeSearch::Moderate,
        region: None,
    };

    let hits = provider.search(&query).await.unwrap();
    assert!(hits.len() <= 5);
    for hit in &hits {
        assert!(hit.href.is_some());
    }
}
