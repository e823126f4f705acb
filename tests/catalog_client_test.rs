use mockito::Matcher;
use std::time::Duration;
use travel_extract_rs::{CandidateOrigin, CatalogClient, CatalogSource, TravelPipeline};

const LOUVRE_PAYLOAD: &str = r#"{
  "data": [
    {
      "location_id": "188757",
      "name": "Louvre Museum",
      "category": { "name": "Museum" },
      "address_string": "Rue de Rivoli, 75001 Paris France",
      "rating": "4.7",
      "num_reviews": "181,403",
      "web_url": "https://catalog.example.com/louvre"
    },
    {
      "location_id": "4210",
      "name": "Cafe Marly",
      "category": "Restaurant",
      "address_string": "93 Rue de Rivoli, Paris France",
      "rating": 4.0
    }
  ]
}"#;

fn client(server: &mockito::ServerGuard) -> CatalogClient {
    CatalogClient::new(&server.url())
        .unwrap()
        .with_initial_backoff(Duration::from_millis(1))
}

#[tokio::test]
async fn test_search_sends_query_and_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "museums in Paris".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LOUVRE_PAYLOAD)
        .create_async()
        .await;

    let candidates = client(&server)
        .with_api_key("test-key")
        .with_result_limit(5)
        .search("museums in Paris")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].id, "188757");
    assert_eq!(candidates[0].category, "Museum");
    assert_eq!(candidates[0].rating, Some(4.7));
    assert_eq!(candidates[0].review_count, Some(181_403));
    assert_eq!(
        candidates[0].detail_url.as_deref(),
        Some("https://catalog.example.com/louvre")
    );
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(r#"{"error": {"message": "maintenance"}}"#)
        .expect(4)
        .create_async()
        .await;

    let err = client(&server).search("top attractions in Paris").await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.error_code(), "CATALOG_ERROR");
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_rate_limit_honours_retry_after() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("retry-after", "0")
        .expect(4)
        .create_async()
        .await;

    let err = client(&server).search("things to do in Paris").await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.error_code(), "RATE_LIMIT_ERROR");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("no such endpoint")
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).search("museums in Paris").await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.error_code(), "CATALOG_ERROR");
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let client = CatalogClient::with_timeout("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = client.search("museums in Paris").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err.error_code(),
        "CATALOG_UNREACHABLE" | "TIMEOUT_ERROR"
    ));
}

#[tokio::test]
async fn test_pipeline_over_http_catalog() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LOUVRE_PAYLOAD)
        .expect(4)
        .create_async()
        .await;

    let pipeline = TravelPipeline::new(client(&server));
    let recommendations = pipeline.recommend("Paris", None).await;

    mock.assert_async().await;
    assert_eq!(recommendations.origin, CandidateOrigin::Live);
    assert_eq!(recommendations.names(), vec!["Louvre Museum"]);
    assert!(recommendations.failed_queries.is_empty());
}
