//! HTTP-level adapter tests against a mock upstream.
//!
//! Exercises the real reqwest paths of the catalog adapters: payload
//! canonicalization, status-code error mapping, malformed-payload handling,
//! and the memoized place photo lookup.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalogue_search::cache::SearchCache;
use catalogue_search::provider::{
    BooksProvider, GamesProvider, PlacesProvider, ScreenProvider, SearchProvider,
};
use catalogue_search::{LocationHint, ProviderError, ResultKind, Scope, SearchQuery};

const TIMEOUT: Duration = Duration::from_secs(2);

fn query(text: &str) -> SearchQuery {
    SearchQuery::new(text, Scope::All, "en-US")
}

fn screen_provider(server: &MockServer) -> ScreenProvider {
    ScreenProvider::new("test-key".into(), Some(server.uri()), TIMEOUT)
}

#[tokio::test]
async fn screen_multi_search_maps_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "batman"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "id": 268,
                    "media_type": "movie",
                    "title": "Batman",
                    "release_date": "1989-06-23",
                    "overview": "The Dark Knight of Gotham City.",
                    "poster_path": "/batman89.jpg"
                },
                {
                    "id": 999,
                    "media_type": "movie",
                    "title": "Posterless Batman Bootleg",
                    "poster_path": null
                },
                {
                    "id": 2287,
                    "media_type": "tv",
                    "name": "Batman: The Animated Series",
                    "first_air_date": "1992-09-05",
                    "poster_path": "/btas.jpg"
                },
                {
                    "id": 2220,
                    "media_type": "person",
                    "name": "Adam West",
                    "profile_path": null
                }
            ]
        })))
        .mount(&server)
        .await;

    let results = screen_provider(&server).execute(&query("batman")).await.unwrap();

    // The posterless movie is dropped; the photo-less person is kept with a
    // placeholder.
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "screen:movie:268");
    assert_eq!(results[0].year, Some(1989));
    assert!(results[0].image_url.ends_with("/batman89.jpg"));
    assert_eq!(results[1].kind, ResultKind::Series);
    assert_eq!(results[2].kind, ResultKind::Person);
    assert!(results.iter().all(|r| !r.image_url.is_empty()));
}

#[tokio::test]
async fn screen_empty_results_are_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let results = screen_provider(&server).execute(&query("xq7zz")).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn status_codes_map_to_typed_errors() {
    for (status, expected) in [
        (429, ProviderError::RateLimited),
        (401, ProviderError::AuthFailure),
        (403, ProviderError::AuthFailure),
        (404, ProviderError::NotFound),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = screen_provider(&server)
            .execute(&query("batman"))
            .await
            .unwrap_err();
        assert_eq!(err, expected, "status {status}");
    }
}

#[tokio::test]
async fn malformed_payload_is_a_typed_error_not_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = screen_provider(&server)
        .execute(&query("batman"))
        .await
        .unwrap_err();
    assert_matches!(err, ProviderError::MalformedResponse(_));
}

#[tokio::test]
async fn games_adapter_drops_artless_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/games"))
        .and(query_param("search", "zelda"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "id": 22511,
                    "name": "The Legend of Zelda: Breath of the Wild",
                    "released": "2017-03-03",
                    "background_image": "https://media.example/botw.jpg",
                    "metacritic": 97
                },
                { "id": 1, "name": "Unreleased Prototype", "background_image": null }
            ]
        })))
        .mount(&server)
        .await;

    let provider = GamesProvider::new("rawg-key".into(), Some(server.uri()), TIMEOUT);
    let results = provider.execute(&query("zelda")).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "games:game:22511");
    assert_eq!(results[0].year, Some(2017));
}

#[tokio::test]
async fn books_adapter_tolerates_missing_items_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/volumes"))
        .and(query_param("q", "dune"))
        .and(query_param("langRestrict", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalItems": 0 })))
        .mount(&server)
        .await;

    let provider = BooksProvider::new("books-key".into(), Some(server.uri()), TIMEOUT);
    let results = provider.execute(&query("dune")).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn places_photo_lookup_is_memoized_across_searches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/search"))
        .and(query_param("query", "coffee, Lisbon, Portugal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "fsq_id": "v1001",
                    "name": "Copenhagen Coffee Lab",
                    "categories": [{ "name": "Coffee Shop" }],
                    "location": { "formatted_address": "Lisbon, Portugal" }
                }
            ]
        })))
        .mount(&server)
        .await;

    // The costly photo round trip must happen exactly once; the second
    // search is served from the long-TTL asset cache.
    Mock::given(method("GET"))
        .and(path("/places/v1001/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "prefix": "https://photos.example/", "suffix": "/v1001.jpg" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(SearchCache::new(
        Duration::from_secs(300),
        Duration::from_secs(86_400),
    ));
    let provider = PlacesProvider::new("fsq-key".into(), Some(server.uri()), TIMEOUT, cache);

    let hinted = query("coffee").with_location(LocationHint {
        city: "Lisbon".into(),
        country: Some("Portugal".into()),
    });

    for _ in 0..2 {
        let results = provider.execute(&hinted).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].image_url,
            "https://photos.example/300x450/v1001.jpg"
        );
        assert_eq!(results[0].description.as_deref(), Some("Lisbon, Portugal"));
    }
}

#[tokio::test]
async fn slow_photo_endpoints_resolve_concurrently() {
    let server = MockServer::start().await;
    let rows: Vec<_> = (1..=4)
        .map(|n| {
            json!({
                "fsq_id": format!("v{n}"),
                "name": format!("Venue {n}"),
                "categories": []
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/places/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": rows })))
        .mount(&server)
        .await;
    for n in 1..=4 {
        Mock::given(method("GET"))
            .and(path(format!("/places/v{n}/photos")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(300))
                    .set_body_json(json!([
                        { "prefix": "https://photos.example/", "suffix": format!("/v{n}.jpg") }
                    ])),
            )
            .mount(&server)
            .await;
    }

    let cache = Arc::new(SearchCache::new(
        Duration::from_secs(300),
        Duration::from_secs(300),
    ));
    let provider = PlacesProvider::new("fsq-key".into(), Some(server.uri()), TIMEOUT, cache);

    // Four photo lookups at 300 ms each: run sequentially they would need
    // 1.2 s; run concurrently the whole search settles in roughly one delay.
    let started = std::time::Instant::now();
    let results = provider.execute(&query("venue")).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.image_url.contains("photos.example")));
    assert!(
        elapsed < Duration::from_millis(900),
        "photo lookups stacked up sequentially: {elapsed:?}"
    );
}

#[tokio::test]
async fn places_photo_failure_falls_back_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/places/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "fsq_id": "v2", "name": "Hidden Bar", "categories": [] }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/places/v2/photos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cache = Arc::new(SearchCache::new(
        Duration::from_secs(300),
        Duration::from_secs(300),
    ));
    let provider = PlacesProvider::new("fsq-key".into(), Some(server.uri()), TIMEOUT, cache);

    let results = provider.execute(&query("hidden bar")).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(!results[0].image_url.is_empty());
    assert!(results[0].image_url.contains("picsum.photos"));
}
