//! Integration tests for the Nominatim client (wiremock-based)

use domain::Coordinate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_nominatim::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
    REVERSE_PLACEHOLDER_LABEL,
};

fn config_for_mock(base_url: &str) -> NominatimConfig {
    NominatimConfig {
        base_url: base_url.to_string(),
        ..NominatimConfig::for_testing()
    }
}

fn client_for(server: &MockServer) -> NominatimGeocodingClient {
    NominatimGeocodingClient::new(&config_for_mock(&server.uri())).unwrap()
}

const fn hermitage_json() -> &'static str {
    r#"[{
        "place_id": 1234,
        "lat": "59.9398",
        "lon": "30.3146",
        "display_name": "Hermitage Museum, Palace Square, Saint Petersburg"
    }]"#
}

const fn suggestions_json() -> &'static str {
    r#"[
        {"place_id": 1, "lat": "59.9398", "lon": "30.3146", "display_name": "Hermitage Museum"},
        {"place_id": 2, "lat": "59.9410", "lon": "30.3130", "display_name": "Hermitage Theatre"},
        {"place_id": 3, "lat": "55.7700", "lon": "37.6100", "display_name": "Hermitage Garden"},
        {"place_id": 4, "lat": "59.9400", "lon": "30.3200", "display_name": "Hermitage Bridge"},
        {"place_id": 5, "lat": "59.9350", "lon": "30.3250", "display_name": "Hermitage Hotel"},
        {"place_id": 6, "lat": "59.9300", "lon": "30.3300", "display_name": "Hermitage Cafe"}
    ]"#
}

#[tokio::test]
async fn test_search_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Hermitage"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(hermitage_json()))
        .expect(1)
        .mount(&server)
        .await;

    let place = client_for(&server).search("Hermitage").await.unwrap();

    assert_eq!(place.place_id, Some(1234));
    assert!(place.label.starts_with("Hermitage Museum"));
    assert!((place.coordinate.latitude() - 59.9398).abs() < 1e-9);
    assert!((place.coordinate.longitude() - 30.3146).abs() < 1e-9);
}

#[tokio::test]
async fn test_search_no_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let result = client_for(&server).search("Atlantis").await;
    assert!(matches!(result, Err(GeocodingError::PlaceNotFound(q)) if q == "Atlantis"));
}

#[tokio::test]
async fn test_search_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).search("Hermitage").await.unwrap_err();
    assert!(matches!(err, GeocodingError::RequestFailed(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_search_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client_for(&server).search("Hermitage").await.unwrap_err();
    assert!(matches!(err, GeocodingError::RateLimitExceeded));
}

#[tokio::test]
async fn test_search_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).search("Hermitage").await.unwrap_err();
    assert!(matches!(err, GeocodingError::ParseError(_)));
}

#[tokio::test]
async fn test_search_sends_optional_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("countrycodes", "ru"))
        .and(query_param("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(hermitage_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        country_filter: Some("ru".to_string()),
        accept_language: Some("en".to_string()),
        ..config_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();
    assert!(client.search("Hermitage").await.is_ok());
}

#[tokio::test]
async fn test_search_results_are_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(hermitage_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        cache_ttl_hours: 1,
        ..config_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();

    let first = client.search("Hermitage").await.unwrap();
    let second = client.search("  hermitage ").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_suggest_caps_results_in_rank_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(suggestions_json()))
        .mount(&server)
        .await;

    let suggestions = client_for(&server).suggest("Hermi").await;

    let ids: Vec<_> = suggestions.iter().filter_map(|p| p.place_id).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_suggest_short_query_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(suggestions_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.suggest("").await.is_empty());
    assert!(client.suggest("He").await.is_empty());
}

#[tokio::test]
async fn test_suggest_swallows_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client_for(&server).suggest("Hermitage").await.is_empty());
}

#[tokio::test]
async fn test_reverse_lookup_uses_display_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "59.95"))
        .and(query_param("lon", "30.32"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"place_id": 99, "lat": "59.9501", "lon": "30.3199", "display_name": "Kronverksky Prospekt, 1"}"#,
        ))
        .mount(&server)
        .await;

    let tapped = Coordinate::new(59.95, 30.32).unwrap();
    let place = client_for(&server).reverse_lookup(&tapped).await.unwrap();

    assert_eq!(place.label, "Kronverksky Prospekt, 1");
    assert_eq!(place.coordinate, tapped);
    assert_eq!(place.place_id, Some(99));
}

#[tokio::test]
async fn test_reverse_lookup_placeholder_label() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"error": "Unable to geocode"}"#),
        )
        .mount(&server)
        .await;

    let tapped = Coordinate::new(0.0, -140.0).unwrap();
    let place = client_for(&server).reverse_lookup(&tapped).await.unwrap();

    assert_eq!(place.label, REVERSE_PLACEHOLDER_LABEL);
    assert_eq!(place.coordinate, tapped);
}

#[tokio::test]
async fn test_connection_refused() {
    let config = config_for_mock("http://127.0.0.1:1");
    let client = NominatimGeocodingClient::new(&config).unwrap();

    let err = client.search("Hermitage").await.unwrap_err();
    assert!(matches!(
        err,
        GeocodingError::ConnectionFailed(_) | GeocodingError::Timeout
    ));
}
