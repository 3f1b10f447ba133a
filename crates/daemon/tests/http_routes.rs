//! Integration tests for the codebook pages and status routes
//!
//! Requests go through the full router (trailing-slash normalization
//! included) against an in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use common::prelude::{Codebook, Notice, PathState};
use ecc_daemon::{http_server, ServiceConfig, ServiceState};

async fn setup() -> ServiceState {
    let config = ServiceConfig::ephemeral(([127, 0, 0, 1], 0).into());
    ServiceState::from_config(&config).await.unwrap()
}

async fn send(state: &ServiceState, request: Request<Body>) -> (StatusCode, String) {
    let response = http_server::service(state.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// A full save form: the default codebook with `overrides` applied, plus the secret
fn save_form(secret: &str, overrides: &[(char, &str)]) -> String {
    let mut pairs = vec![format!("pathPass={}", secret)];
    for (key, value) in Codebook::default().iter() {
        let value = overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(value);
        pairs.push(format!("{}={}", key, value));
    }
    pairs.join("&")
}

fn letter_input(key: char, value: &str) -> String {
    format!(r#"id="{key}" name="{key}" value="{value}""#)
}

#[tokio::test]
async fn test_index_page() {
    let state = setup().await;
    let (status, body) = send(&state, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("About"));
}

#[tokio::test]
async fn test_unclaimed_page_shows_default_codebook() {
    let state = setup().await;
    let (status, body) = send(&state, get("/doesnotexistyet")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("This page is claimed"));
    assert!(!body.contains(r#"id="errMsg""#));
    assert!(body.contains(&letter_input('a', "z")));
    assert!(body.contains(&letter_input('z', "a")));

    // viewing never writes
    assert_eq!(
        state.registry().state("doesnotexistyet").await.unwrap(),
        PathState::Absent
    );
}

#[tokio::test]
async fn test_claimed_page_says_so() {
    let state = setup().await;
    state
        .registry()
        .submit_secret("testpath", "pw1")
        .await
        .unwrap();

    let (status, body) = send(&state, get("/testpath")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This page is claimed"));
}

#[tokio::test]
async fn test_encode_and_decode() {
    let state = setup().await;

    let (status, body) = send(
        &state,
        post_form("/testpath/encode", "encInput=abc".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"id="encOutput""#));
    assert!(body.contains("Encoded text: zyx"));

    let (status, body) = send(
        &state,
        post_form("/testpath/decode", "decInput=zyx".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"id="decOutput""#));
    assert!(body.contains("Decoded text: abc"));
}

#[tokio::test]
async fn test_encode_uses_the_claimed_codebook() {
    let state = setup().await;
    send(
        &state,
        post_form("/mine/save", save_form("pw", &[('a', "q")])),
    )
    .await;

    let (_, body) = send(&state, post_form("/mine/encode", "encInput=ab".to_string())).await;
    assert!(body.contains("Encoded text: qy"));
}

#[tokio::test]
async fn test_save_flow() {
    let state = setup().await;

    // first save claims the path with the default letters
    let (status, body) = send(&state, post_form("/testpath/save", save_form("pw1", &[]))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains(r#"id="errMsg""#));
    assert!(body.contains(&letter_input('a', "z")));
    assert!(body.contains("This page is claimed"));

    // the right secret edits
    let (_, body) = send(
        &state,
        post_form("/testpath/save", save_form("pw1", &[('a', "a")])),
    )
    .await;
    assert!(!body.contains(r#"id="errMsg""#));
    assert!(body.contains(&letter_input('a', "a")));

    // the wrong secret does not
    let (status, body) = send(
        &state,
        post_form("/testpath/save", save_form("pw2", &[('a', "b")])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"id="errMsg""#));
    assert!(body.contains("Invalid Secret"));
    assert!(body.contains(&letter_input('a', "a")));

    let (_, body) = send(&state, get("/testpath")).await;
    assert!(body.contains("This page is claimed"));
    assert!(body.contains(&letter_input('a', "a")));
}

#[tokio::test]
async fn test_corrupt_codebook_degrades_until_saved() {
    let state = setup().await;
    state
        .registry()
        .submit_secret("broken", "pw1")
        .await
        .unwrap();
    sqlx::query("UPDATE codes SET valueMap = 'junk' WHERE path = ?")
        .bind("broken")
        .execute(&**state.database())
        .await
        .unwrap();

    let view = state.registry().resolve("broken").await;
    assert!(view.is_claimed);
    assert_eq!(view.notice, Some(Notice::LoadFailed));
    assert_eq!(view.codebook, Codebook::default());

    let (status, body) = send(&state, get("/broken")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This page is claimed"));
    assert!(body.contains(r#"id="errMsg""#));
    assert!(body.contains("Unable to load valueMap"));
    assert!(body.contains(&letter_input('a', "z")));

    // no output is rendered from a codebook that failed to load
    let (status, body) = send(
        &state,
        post_form("/broken/encode", "encInput=abc".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Unable to load valueMap"));
    assert!(!body.contains(r#"id="encOutput""#));

    let (_, body) = send(
        &state,
        post_form("/broken/decode", "decInput=zyx".to_string()),
    )
    .await;
    assert!(!body.contains(r#"id="decOutput""#));

    let (_, body) = send(
        &state,
        post_form("/broken/save", save_form("pw2", &[('a', "q")])),
    )
    .await;
    assert!(body.contains("Invalid Secret"));

    // the right secret overwrites the corrupt row
    let (_, body) = send(
        &state,
        post_form("/broken/save", save_form("pw1", &[('a', "q")])),
    )
    .await;
    assert!(!body.contains(r#"id="errMsg""#));
    assert!(body.contains(&letter_input('a', "q")));

    let view = state.registry().resolve("broken").await;
    assert_eq!(view.notice, None);
    assert_eq!(view.codebook.get('a'), Some("q"));

    let (_, body) = send(
        &state,
        post_form("/broken/encode", "encInput=ab".to_string()),
    )
    .await;
    assert!(body.contains("Encoded text: qy"));
}

#[tokio::test]
async fn test_get_on_action_routes_renders_page() {
    let state = setup().await;
    for uri in ["/testpath/encode", "/testpath/decode", "/testpath/save"] {
        let (status, body) = send(&state, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.contains(&letter_input('a', "z")), "{}", uri);
    }
}

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let state = setup().await;
    let (status, body) = send(&state, get("/testpath/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/testpath"));
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
    let state = setup().await;
    for uri in ["/a/b/c", "/testpath/encrypt"] {
        let (status, _) = send(&state, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let (status, _) = send(&state, post_form("/a/b/c", String::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_routes() {
    let state = setup().await;

    let (status, body) = send(&state, get("/_status/livez")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ok"));

    let (status, body) = send(&state, get("/_status/readyz")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ok"));

    let (status, body) = send(&state, get("/_status/version")).await;
    assert_eq!(status, StatusCode::OK);
    let info: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(info["version"].is_string());
}

#[tokio::test]
async fn test_static_assets() {
    let state = setup().await;

    let response = http_server::service(state.clone())
        .oneshot(get("/static/style.css"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

    let (status, _) = send(&state, get("/static/missing.css")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
