//! Integration tests for `PlacesClient` against a local `wiremock` server.

use std::time::Duration;

use eatwhat_core::Coordinates;
use eatwhat_places::{ClientOptions, PlacesClient, PlacesError};
use eatwhat_reconcile::SearchRequest;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NEARBY: &str = "/maps/api/place/nearbysearch/json";
const TEXT: &str = "/maps/api/place/textsearch/json";
const DETAILS: &str = "/maps/api/place/details/json";
const GEOCODE: &str = "/maps/api/geocode/json";

fn test_client(server: &MockServer, max_retries: u32) -> PlacesClient {
    let options = ClientOptions {
        timeout_secs: 5,
        user_agent: "eatwhat-test/0.1".to_owned(),
        max_retries,
        backoff_base_ms: 0,
        page_delay: Duration::from_secs(2),
    };
    PlacesClient::new(&server.uri(), "test-key", &options).expect("failed to build test client")
}

fn place(id: &str, name: &str) -> Value {
    json!({
        "place_id": id,
        "name": name,
        "types": ["restaurant", "food"],
        "rating": 4.2,
        "price_level": 1,
        "geometry": { "location": { "lat": 3.1478, "lng": 101.6953 } },
        "vicinity": "Jalan Alor, Bukit Bintang"
    })
}

fn page(results: Vec<Value>, next: Option<&str>) -> Value {
    let mut body = json!({ "status": "OK", "results": results });
    if let Some(token) = next {
        body["next_page_token"] = json!(token);
    }
    body
}

fn kl() -> SearchRequest {
    SearchRequest::nearby(Coordinates::new(3.139, 101.6869), 5_000, 20)
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nearby_search_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .and(query_param("location", "3.139,101.6869"))
        .and(query_param("radius", "5000"))
        .and(query_param("type", "restaurant"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place("a", "Wong Ah Wah"), place("b", "Sai Woo")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let venues = test_client(&server, 0).search(&kl()).await.unwrap();
    let ids: Vec<&str> = venues.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(venues[0].price_tag(), "$");
    assert_eq!(venues[0].area_label, "Jalan Alor");
}

#[tokio::test]
async fn zero_results_is_an_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TEXT))
        .and(query_param("query", "durian buffet"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let venues = test_client(&server, 0)
        .search(&SearchRequest::text("durian buffet", 20))
        .await
        .unwrap();
    assert!(venues.is_empty());
}

#[tokio::test]
async fn follows_continuation_token_and_drops_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .and(query_param("location", "3.139,101.6869"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place("a", "A"), place("b", "B")],
            Some("tok-2"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place("b", "B again"), place("c", "C")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let venues = test_client(&server, 0).search(&kl()).await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(2));

    let names: Vec<&str> = venues.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[tokio::test]
async fn stops_paging_once_limit_is_reached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place("a", "A"), place("b", "B"), place("c", "C")],
            Some("tok-2"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let request = SearchRequest::nearby(Coordinates::new(3.139, 101.6869), 5_000, 2);
    let venues = test_client(&server, 0).search(&request).await.unwrap();
    assert_eq!(venues.len(), 2);
}

#[tokio::test]
async fn endless_continuation_token_finalizes_with_collected_venues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place("a", "A"), place("b", "B")],
            Some("again"),
        )))
        .expect(10)
        .mount(&server)
        .await;

    let venues = test_client(&server, 0).search(&kl()).await.unwrap();
    let ids: Vec<&str> = venues.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn unmappable_records_do_not_count_toward_the_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .and(query_param("location", "3.139,101.6869"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                place("a", "A"),
                json!({ "place_id": "ghost-1", "name": "Nowhere" }),
                json!({ "place_id": "ghost-2", "name": "Nowhere Else" }),
            ],
            Some("tok-2"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![place("b", "B"), place("c", "C")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let request = SearchRequest::nearby(Coordinates::new(3.139, 101.6869), 5_000, 3);
    let venues = test_client(&server, 0).search(&request).await.unwrap();
    let ids: Vec<&str> = venues.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[tokio::test]
async fn records_without_coordinates_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                json!({ "place_id": "ghost", "name": "Nowhere" }),
                place("a", "A"),
                json!({
                    "name": "No Id",
                    "geometry": { "location": { "lat": 3.0, "lng": 101.0 } }
                }),
            ],
            None,
        )))
        .mount(&server)
        .await;

    let venues = test_client(&server, 0).search(&kl()).await.unwrap();
    let ids: Vec<&str> = venues.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["a", "place-2"]);
}

#[tokio::test]
async fn request_denied_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server, 3).search(&kl()).await.unwrap_err();
    match err {
        PlacesError::Upstream { status, message, .. } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn over_query_limit_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "OVER_QUERY_LIMIT", "results": [] })),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![place("a", "A")], None)))
        .expect(1)
        .mount(&server)
        .await;

    let venues = test_client(&server, 2).search(&kl()).await.unwrap();
    assert_eq!(venues.len(), 1);
}

#[tokio::test]
async fn http_429_exhausts_retries_as_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(3)
        .mount(&server)
        .await;

    let err = test_client(&server, 2).search(&kl()).await.unwrap_err();
    assert!(matches!(err, PlacesError::RateLimited { .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NEARBY))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server, 0).search(&kl()).await.unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }), "{err:?}");
}

// ---------------------------------------------------------------------------
// details / geocode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn details_maps_extended_fields() {
    let server = MockServer::start().await;
    let mut result = place("a", "Wong Ah Wah");
    result["formatted_phone_number"] = json!("03-2144 2463");
    result["website"] = json!("https://wah.example.com");
    result["photos"] = json!([{ "photo_reference": "ref-1" }]);
    result["reviews"] = json!([{
        "author_name": "Hui",
        "rating": 5,
        "relative_time_description": "2 months ago",
        "text": "Chicken wings!"
    }]);
    result["opening_hours"] = json!({
        "periods": [{
            "open": { "day": 5, "time": "1700" },
            "close": { "day": 6, "time": "0400" }
        }],
        "weekday_text": ["Friday: 5:00 PM – 4:00 AM"]
    });

    Mock::given(method("GET"))
        .and(path(DETAILS))
        .and(query_param("place_id", "a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "OK", "result": result })),
        )
        .mount(&server)
        .await;

    let details = test_client(&server, 0).details("a").await.unwrap();
    assert_eq!(details.venue.phone_number.as_deref(), Some("03-2144 2463"));
    assert_eq!(details.reviews.len(), 1);
    assert_eq!(details.photos.len(), 1);
    assert!(details.photos[0].contains("photo_reference=ref-1"));
    assert!(!details.photos[0].contains("test-key"));
    assert_eq!(details.hours_text.len(), 1);
    assert_eq!(details.venue.opening_schedule.map(|s| s.len()), Some(1));
}

#[tokio::test]
async fn details_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DETAILS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "NOT_FOUND" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server, 3).details("gone").await.unwrap_err();
    assert!(
        matches!(err, PlacesError::NotFound { ref place_id } if place_id == "gone"),
        "{err:?}"
    );
}

#[tokio::test]
async fn reverse_geocode_returns_first_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("latlng", "3.1478,101.6953"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                { "formatted_address": "Jalan Alor, 50200 Kuala Lumpur" },
                { "formatted_address": "Bukit Bintang, Kuala Lumpur" }
            ]
        })))
        .mount(&server)
        .await;

    let address = test_client(&server, 0)
        .reverse_geocode(Coordinates::new(3.1478, 101.6953))
        .await
        .unwrap();
    assert_eq!(address.as_deref(), Some("Jalan Alor, 50200 Kuala Lumpur"));
}

#[tokio::test]
async fn failed_geocode_describes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "REQUEST_DENIED" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let address =
        eatwhat_places::describe_position(&client, Coordinates::new(3.1478, 101.6953)).await;
    assert!(address.is_none());
}
