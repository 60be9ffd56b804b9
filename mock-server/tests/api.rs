use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Dataset};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "Bearer test-token";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

fn match_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/players/match")
        .header(http::header::AUTHORIZATION, TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn ids(values: &Value) -> Vec<&str> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect()
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let resp = app()
        .oneshot(Request::builder().uri("/players").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(resp).await.is_empty());
}

// --- list ---

#[tokio::test]
async fn list_players_returns_all_without_filters() {
    let resp = app().oneshot(get("/players")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(ids(&body["data"]), vec!["123", "456", "789"]);
    assert!(body["included"].as_array().unwrap().is_empty());
    assert!(body["links"]["next"].is_null());
    assert!(body["links"]["prev"].is_null());
}

#[tokio::test]
async fn list_players_filters_and_includes() {
    let resp = app()
        .oneshot(get("/players?filter%5Bsearch%5D=alice&include=server%2Cidentifier"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(ids(&body["data"]), vec!["123", "456"]);
    let kinds: Vec<&str> = body["included"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds.iter().filter(|k| **k == "server").count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == "identifier").count(), 4);
}

#[tokio::test]
async fn list_players_pages_with_links() {
    let resp = app()
        .oneshot(get("/players?page%5Bsize%5D=2"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(ids(&body["data"]), vec!["123", "456"]);
    assert_eq!(
        body["links"]["next"],
        "http://localhost/players?page%5Bsize%5D=2&page%5Boffset%5D=2"
    );
    assert!(body["links"]["prev"].is_null());

    let resp = app()
        .oneshot(get("/players?page%5Bsize%5D=2&page%5Boffset%5D=2"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(ids(&body["data"]), vec!["789"]);
    assert!(body["links"]["next"].is_null());
    assert!(body["links"]["prev"].is_string());
}

#[tokio::test]
async fn list_players_rejects_unknown_include() {
    let resp = app().oneshot(get("/players?include=bogus")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_players_rejects_zero_page_size() {
    let resp = app().oneshot(get("/players?page%5Bsize%5D=0")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_players_past_the_end_is_empty() {
    let uri = format!("/players?page%5Bsize%5D=100&page%5Boffset%5D={}", usize::MAX);
    let resp = app().oneshot(get(&uri)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert!(body["links"]["next"].is_null());
    assert!(body["links"]["prev"].is_string());
}

// --- get ---

#[tokio::test]
async fn get_player_with_flags() {
    let resp = app()
        .oneshot(get("/players/123?include=playerFlag,flagPlayer,playerCounter"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["id"], "123");
    assert_eq!(body["data"]["attributes"]["name"], "alice");
    assert_eq!(body["data"]["relationships"]["server"]["data"][0]["id"], "77");
    assert_eq!(ids(&body["included"]), vec!["f-1", "f-1-123", "pc-123"]);
}

#[tokio::test]
async fn get_player_not_found() {
    let resp = app().oneshot(get("/players/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_player_from_custom_dataset() {
    let resp = app_with(Dataset::default())
        .oneshot(get("/players/123"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- match ---

#[tokio::test]
async fn quick_match_finds_shared_identifier() {
    let resp = app()
        .oneshot(match_request(
            r#"{"data":[{"type":"identifier","attributes":{"type":"ip","identifier":"203.0.113.5"}}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let players: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["relationships"]["player"]["data"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(players, vec!["123", "456"]);
}

#[tokio::test]
async fn quick_match_without_hits_is_empty() {
    let resp = app()
        .oneshot(match_request(
            r#"{"data":[{"type":"identifier","attributes":{"type":"steamID","identifier":"0"}}]}"#,
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn quick_match_rejects_batches() {
    let resp = app().oneshot(match_request(r#"{"data":[]}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quick_match_malformed_json_returns_422() {
    let resp = app().oneshot(match_request(r#"{"data":"x"}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- related identifiers ---

#[tokio::test]
async fn related_identifiers_mark_common_identifiers() {
    let resp = app()
        .oneshot(get("/players/123/relationships/related-identifiers?include=player"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["meta"]["commonIdentifier"], false);
    assert_eq!(data[1]["meta"]["commonIdentifier"], true);
    assert_eq!(data[1]["relationships"]["relatedPlayers"]["data"][0]["id"], "456");
    assert_eq!(ids(&body["included"]), vec!["123", "456"]);
}

#[tokio::test]
async fn related_identifiers_rejects_player_scoped_include() {
    let resp = app()
        .oneshot(get("/players/123/relationships/related-identifiers?include=server"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
