//! Integration tests for the Gatherer client against a mocked HTTP server.
//!
//! Every test builds its own client against a private wiremock server, so the
//! shared process-wide instance is never involved and tests stay independent.

use gatherer_access::{Error, GathererAccess, MemoryCache};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> (GathererAccess, Arc<MemoryCache>) {
    let base = Url::parse(&server.uri()).expect("mock server uri");
    let cache = Arc::new(MemoryCache::new());
    (GathererAccess::new(base, cache.clone()), cache)
}

#[tokio::test]
async fn card_returns_the_details_page_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Pages/Card/Details.aspx"))
        .and(query_param("multiverseid", "193871"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>Akroma, Angel of Wrath</html>", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (access, _) = client_for(&server);
    let response = access.card("193871").await.unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.body, "<html>Akroma, Angel of Wrath</html>");
    assert_eq!(response.header("content-type"), Some("text/html"));
}

#[tokio::test]
async fn homepage_sends_no_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Pages/Default.aspx"))
        .and(|request: &Request| request.url.query().is_none())
        .respond_with(ResponseTemplate::new(200).set_body_string("meta"))
        .expect(1)
        .mount(&server)
        .await;

    let (access, _) = client_for(&server);
    let response = access.homepage().await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "meta");
}

#[tokio::test]
async fn repeated_fetches_hit_the_cache() {
    let server = MockServer::start().await;
    // expect(1): a second network call would fail verification on drop.
    Mock::given(method("GET"))
        .and(path("/Pages/Default.aspx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("meta"))
        .expect(1)
        .mount(&server)
        .await;

    let (access, cache) = client_for(&server);
    let first = access.homepage().await.unwrap();
    let second = access.homepage().await.unwrap();

    assert_eq!(first.body, second.body);
    assert_eq!(first.status, second.status);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn redirect_chain_is_followed_and_each_hop_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Pages/Card/Details.aspx"))
        .and(query_param("multiverseid", "383021"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/redirect/b"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redirect/b"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/redirect/c"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redirect/c"))
        .respond_with(ResponseTemplate::new(200).set_body_string("terminal page"))
        .expect(1)
        .mount(&server)
        .await;

    let (access, cache) = client_for(&server);
    let response = access.card("383021").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "terminal page");
    // One entry per hop: original URI, /redirect/b, /redirect/c.
    assert_eq!(cache.len().await, 3);

    // A second lookup is served entirely from cache (expect(1) above would
    // trip otherwise) and still resolves to the terminal response.
    let again = access.card("383021").await.unwrap();
    assert_eq!(again.body, "terminal page");
}

#[tokio::test]
async fn search_sends_the_raw_unfiltered_options() {
    let server = MockServer::start().await;
    // The outgoing request carries the caller's options verbatim: the text
    // value is not wrapped in +["…"] and the unrecognized key is not dropped.
    Mock::given(method("GET"))
        .and(path("/Pages/Search/Default.aspx"))
        .and(query_param("name", "Jace Beleren"))
        .and(query_param("color", "blue"))
        .and(query_param("output", "standard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("results"))
        .expect(1)
        .mount(&server)
        .await;

    let (access, _) = client_for(&server);
    let options: BTreeMap<String, String> = [
        ("name", "Jace Beleren"),
        ("color", "blue"),
        ("output", "standard"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let response = access.search(&options).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "results");
}

#[tokio::test]
async fn search_with_a_single_match_follows_the_redirect_to_the_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Pages/Search/Default.aspx"))
        .and(query_param("name", "Counterspell"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/Pages/Card/Details.aspx?multiverseid=202437"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Pages/Card/Details.aspx"))
        .and(query_param("multiverseid", "202437"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Counterspell</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let (access, _) = client_for(&server);
    let options: BTreeMap<String, String> =
        [("name".to_string(), "Counterspell".to_string())].into();
    let response = access.search(&options).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "<html>Counterspell</html>");
}

#[tokio::test]
async fn redirect_loop_fails_with_limit_exceeded() {
    let server = MockServer::start().await;
    // Self-referential redirect. With the memory cache only the first hop
    // touches the network; the loop then replays the cached redirect until
    // the hop limit trips.
    Mock::given(method("GET"))
        .and(path("/Pages/Default.aspx"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/Pages/Default.aspx"))
        .expect(1)
        .mount(&server)
        .await;

    let (access, _) = client_for(&server);
    let err = access.homepage().await.unwrap_err();

    match err {
        Error::RedirectLimitExceeded { limit, uri } => {
            assert_eq!(limit, 10);
            assert_eq!(uri, "/Pages/Default.aspx");
        }
        other => panic!("expected RedirectLimitExceeded, got {other:?}"),
    }
}
