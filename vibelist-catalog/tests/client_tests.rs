//! HTTP-level tests of the catalog client

use serde_json::json;
use std::time::Duration;
use vibelist_catalog::{CatalogApi, CatalogClient, CatalogError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&server.uri(), "catalog-token", 50, Duration::from_secs(5)).unwrap()
}

fn track_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "uri": format!("spotify:track:{id}"),
        "name": name,
        "artists": [{"name": "Miles Davis"}],
        "album": {"name": "Kind of Blue", "album_type": "album", "images": []},
        "preview_url": null,
        "popularity": 71
    })
}

#[tokio::test]
async fn test_search_sends_query_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "track:\"So What\" artist:\"Miles Davis\""))
        .and(query_param("type", "track"))
        .and(query_param("limit", "20"))
        .and(header("authorization", "Bearer catalog-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {"items": [track_json("a1", "So What")]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tracks = client(&server)
        .search_tracks("track:\"So What\" artist:\"Miles Davis\"", 20)
        .await
        .unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].uri, "spotify:track:a1");
}

#[tokio::test]
async fn test_search_without_tracks_key_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let tracks = client(&server).search_tracks("anything", 20).await.unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn test_non_success_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("non existing id"))
        .mount(&server)
        .await;

    let result = client(&server).track("missing").await;
    assert_eq!(
        result,
        Err(CatalogError::Api(404, "non existing id".to_string()))
    );
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client(&server).current_user_id().await;
    assert!(matches!(result, Err(CatalogError::Parse(_))));
}

#[tokio::test]
async fn test_playlist_creation_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "listener"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/listener/playlists"))
        .and(body_json(json!({
            "name": "Rainy Jazz",
            "description": "Generated by YouLists AI",
            "public": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pl-9",
            "external_urls": {"spotify": "https://open.spotify.com/playlist/pl-9"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/pl-9/tracks"))
        .and(body_json(json!({"uris": ["spotify:track:a1"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "s1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let user = client.current_user_id().await.unwrap();
    let created = client
        .create_playlist(&user, "Rainy Jazz", "Generated by YouLists AI")
        .await
        .unwrap();
    assert_eq!(created.id, "pl-9");
    assert_eq!(
        created.url.as_deref(),
        Some("https://open.spotify.com/playlist/pl-9")
    );

    client
        .add_tracks("pl-9", &["spotify:track:a1".to_string()])
        .await
        .unwrap();
}
