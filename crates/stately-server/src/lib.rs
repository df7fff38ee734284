//! Stately server library — runtime configuration and router assembly.
//!
//! The binary in `main.rs` loads [`ServerConfig`], opens the SQLite store,
//! and serves the [`app`] router: the embedded index page at `/`, the
//! `/states` API, and a content-negotiated 404 fallback.

pub mod seed;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  http::{HeaderMap, StatusCode, header},
  response::{Html, IntoResponse, Response},
  routing::get,
};
use serde::Deserialize;
use serde_json::json;
use stately_core::store::FunFactStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` overlaid
/// with `STATELY_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

const INDEX_HTML: &str = include_str!("../assets/index.html");
const NOT_FOUND_HTML: &str = include_str!("../assets/404.html");

/// Build the full application router for `store`.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: FunFactStore + 'static,
{
  Router::new()
    .route("/", get(index))
    .nest("/states", stately_api::states_router(store))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
  Html(INDEX_HTML)
}

/// Catch-all 404: an HTML page for clients that accept HTML, a JSON error
/// for JSON clients, plain text otherwise. An absent `Accept` header means
/// the client accepts anything and gets the HTML page.
async fn not_found(headers: HeaderMap) -> Response {
  let accept = headers
    .get(header::ACCEPT)
    .and_then(|v| v.to_str().ok())
    .unwrap_or("*/*");

  if accept.contains("text/html") || accept.contains("*/*") {
    return (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response();
  }
  if accept.contains("application/json") {
    return (
      StatusCode::NOT_FOUND,
      Json(json!({ "error": "404 Not Found" })),
    )
      .into_response();
  }
  (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use stately_store_sqlite::SqliteFunFactStore;
  use tower::ServiceExt as _;

  async fn test_app() -> Router {
    let store = SqliteFunFactStore::open_in_memory().await.unwrap();
    app(Arc::new(store))
  }

  /// Fire one request at a clone of `app` and parse the JSON body.
  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap_or("")
  }

  // ── Listing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn all_states_returns_fifty() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/states", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 50);
  }

  #[tokio::test]
  async fn contig_true_excludes_the_detached_states() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/states?contig=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 48);
    assert!(
      list
        .iter()
        .all(|s| s["code"] != "AK" && s["code"] != "HI")
    );
  }

  #[tokio::test]
  async fn contig_false_returns_only_the_detached_states() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/states?contig=false", None).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|s| s["code"].as_str().unwrap())
      .collect();
    assert_eq!(codes, ["AK", "HI"]);
  }

  #[tokio::test]
  async fn contig_with_other_value_returns_all() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/states?contig=maybe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 50);
  }

  // ── Single state ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn state_resolves_by_code_name_and_slug() {
    let app = test_app().await;
    for uri in ["/states/KS", "/states/ks", "/states/Kansas", "/states/kansas"] {
      let (status, body) = send(&app, "GET", uri, None).await;
      assert_eq!(status, StatusCode::OK, "{uri}");
      assert_eq!(body["code"], "KS");
      assert_eq!(body["state"], "Kansas");
      assert_eq!(body["capital_city"], "Topeka");
    }
    let (_, body) = send(&app, "GET", "/states/new-hampshire", None).await;
    assert_eq!(body["code"], "NH");
  }

  #[tokio::test]
  async fn unknown_state_is_400_on_every_endpoint() {
    let app = test_app().await;
    let cases = [
      ("GET", "/states/ZZ", None),
      ("GET", "/states/ZZ/funfact", None),
      ("GET", "/states/ZZ/capital", None),
      ("GET", "/states/ZZ/nickname", None),
      ("GET", "/states/ZZ/population", None),
      ("GET", "/states/ZZ/admission", None),
      ("POST", "/states/ZZ/funfact", Some(json!({"funfacts": ["x"]}))),
      (
        "PATCH",
        "/states/ZZ/funfact",
        Some(json!({"index": 1, "funfact": "x"})),
      ),
      ("DELETE", "/states/ZZ/funfact", Some(json!({"index": 1}))),
    ];
    for (method, uri, body) in cases {
      let (status, body) = send(&app, method, uri, body).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
      assert_eq!(message(&body), "Invalid state abbreviation parameter");
    }
  }

  // ── Field endpoints ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn field_endpoints_return_their_payloads() {
    let app = test_app().await;

    let (_, body) = send(&app, "GET", "/states/KS/capital", None).await;
    assert_eq!(body, json!({ "state": "Kansas", "capital": "Topeka" }));

    let (_, body) = send(&app, "GET", "/states/KS/nickname", None).await;
    assert_eq!(
      body,
      json!({ "state": "Kansas", "nickname": "The Sunflower State" })
    );

    let (_, body) = send(&app, "GET", "/states/KS/population", None).await;
    assert_eq!(
      body,
      json!({ "state": "Kansas", "population": "2,937,880" })
    );

    let (_, body) = send(&app, "GET", "/states/KS/admission", None).await;
    assert_eq!(body, json!({ "state": "Kansas", "admitted": "1861-01-29" }));
  }

  // ── Random fun fact ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn funfact_without_facts_is_404_with_state_name() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/states/AZ/funfact", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "No Fun Facts found for Arizona");
  }

  #[tokio::test]
  async fn funfact_returns_one_of_the_stored_facts() {
    let app = test_app().await;
    send(
      &app,
      "POST",
      "/states/KS/funfact",
      Some(json!({"funfacts": ["one", "two"]})),
    )
    .await;

    let (status, body) = send(&app, "GET", "/states/KS/funfact", None).await;
    assert_eq!(status, StatusCode::OK);
    let fact = body["funfact"].as_str().unwrap();
    assert!(["one", "two"].contains(&fact), "got {fact:?}");
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_creates_then_appends_in_order() {
    let app = test_app().await;

    let (status, body) = send(
      &app,
      "POST",
      "/states/MO/funfact",
      Some(json!({"funfacts": ["a", "b"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "state": "Missouri", "funfacts": ["a", "b"] }));

    let (status, body) = send(
      &app,
      "POST",
      "/states/MO/funfact",
      Some(json!({"funfacts": ["c"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["funfacts"], json!(["a", "b", "c"]));
  }

  #[tokio::test]
  async fn post_rejects_missing_empty_or_non_string_funfacts() {
    let app = test_app().await;
    let bad_bodies = [
      json!({}),
      json!({ "funfacts": [] }),
      json!({ "funfacts": "not an array" }),
      json!({ "funfacts": ["ok", 7] }),
    ];
    for bad in bad_bodies {
      let (status, body) =
        send(&app, "POST", "/states/KS/funfact", Some(bad.clone())).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "body {bad}");
      assert_eq!(
        message(&body),
        "State fun facts value required and must be a non-empty array"
      );
    }
  }

  #[tokio::test]
  async fn merged_state_gains_funfacts_only_after_post() {
    let app = test_app().await;

    let (_, before) = send(&app, "GET", "/states/NE", None).await;
    assert!(before.get("funfacts").is_none());

    send(
      &app,
      "POST",
      "/states/NE/funfact",
      Some(json!({"funfacts": ["unicameral"]})),
    )
    .await;

    let (_, after) = send(&app, "GET", "/states/NE", None).await;
    assert_eq!(after["funfacts"], json!(["unicameral"]));

    // The listing picks up the same merge; other states stay bare.
    let (_, listing) = send(&app, "GET", "/states", None).await;
    for state in listing.as_array().unwrap() {
      if state["code"] == "NE" {
        assert_eq!(state["funfacts"], json!(["unicameral"]));
      } else {
        assert!(state.get("funfacts").is_none(), "{}", state["code"]);
      }
    }
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_replaces_only_the_indexed_fact() {
    let app = test_app().await;
    send(
      &app,
      "POST",
      "/states/CO/funfact",
      Some(json!({"funfacts": ["a", "b", "c"]})),
    )
    .await;

    let (status, body) = send(
      &app,
      "PATCH",
      "/states/CO/funfact",
      Some(json!({"index": 2, "funfact": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "state": "Colorado", "funfacts": ["a", "x", "c"] }));
  }

  #[tokio::test]
  async fn patch_with_missing_fields_is_400() {
    let app = test_app().await;
    let bad_bodies = [
      json!({}),
      json!({ "index": 1 }),
      json!({ "funfact": "x" }),
      json!({ "index": 1, "funfact": "" }),
    ];
    for bad in bad_bodies {
      let (status, body) =
        send(&app, "PATCH", "/states/KS/funfact", Some(bad.clone())).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "body {bad}");
      assert_eq!(message(&body), "Both index and funfact are required");
    }
  }

  #[tokio::test]
  async fn patch_out_of_bounds_index_is_404_with_state_name() {
    let app = test_app().await;
    send(
      &app,
      "POST",
      "/states/OK/funfact",
      Some(json!({"funfacts": ["only"]})),
    )
    .await;

    for index in [0, -1, 2] {
      let (status, body) = send(
        &app,
        "PATCH",
        "/states/OK/funfact",
        Some(json!({"index": index, "funfact": "x"})),
      )
      .await;
      assert_eq!(status, StatusCode::NOT_FOUND, "index {index}");
      assert_eq!(
        message(&body),
        "No Fun Fact found at that index for Oklahoma"
      );
    }
  }

  #[tokio::test]
  async fn patch_on_state_without_facts_is_404() {
    let app = test_app().await;
    let (status, body) = send(
      &app,
      "PATCH",
      "/states/VT/funfact",
      Some(json!({"index": 1, "funfact": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "No Fun Facts found for Vermont");
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_removes_the_indexed_fact_and_closes_the_gap() {
    let app = test_app().await;
    send(
      &app,
      "POST",
      "/states/NE/funfact",
      Some(json!({"funfacts": ["a", "b", "c"]})),
    )
    .await;

    let (status, body) = send(
      &app,
      "DELETE",
      "/states/NE/funfact",
      Some(json!({"index": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "state": "Nebraska", "funfacts": ["a", "c"] }));
  }

  #[tokio::test]
  async fn delete_with_missing_index_is_400() {
    let app = test_app().await;
    let (status, body) =
      send(&app, "DELETE", "/states/KS/funfact", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "State fun fact index value required");
  }

  #[tokio::test]
  async fn delete_on_state_without_facts_is_404() {
    let app = test_app().await;
    let (status, body) = send(
      &app,
      "DELETE",
      "/states/VT/funfact",
      Some(json!({"index": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "No Fun Facts found for Vermont");
  }

  // ── Index page and 404 fallback ─────────────────────────────────────────────

  #[tokio::test]
  async fn root_serves_the_index_page() {
    let app = test_app().await;
    let resp = app
      .clone()
      .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    assert!(std::str::from_utf8(&bytes).unwrap().contains("<html"));
  }

  async fn fallback(accept: Option<&str>) -> (StatusCode, String, String) {
    let app = test_app().await;
    let mut builder = Request::builder().uri("/no/such/page");
    if let Some(accept) = accept {
      builder = builder.header(header::ACCEPT, accept);
    }
    let resp = app
      .oneshot(builder.body(Body::empty()).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let content_type = resp
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .unwrap_or("")
      .to_string();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
  }

  #[tokio::test]
  async fn fallback_serves_html_to_html_clients() {
    let (status, content_type, body) = fallback(Some("text/html")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content_type.contains("text/html"), "{content_type}");
    assert!(body.contains("404 Not Found"));
  }

  #[tokio::test]
  async fn fallback_serves_json_to_json_clients() {
    let (status, content_type, body) =
      fallback(Some("application/json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content_type.contains("application/json"), "{content_type}");
    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed, json!({ "error": "404 Not Found" }));
  }

  #[tokio::test]
  async fn fallback_serves_plain_text_otherwise() {
    let (status, content_type, body) = fallback(Some("text/plain")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content_type.contains("text/plain"), "{content_type}");
    assert_eq!(body, "404 Not Found");
  }
}
