//! Handlers for `/states/:state/funfact`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/states/:state/funfact` | One uniformly random fact |
//! | `POST`   | `/states/:state/funfact` | Body: `{"funfacts":[...]}`; 201 + full list |
//! | `PATCH`  | `/states/:state/funfact` | Body: `{"index":N,"funfact":"..."}`; 1-based |
//! | `DELETE` | `/states/:state/funfact` | Body: `{"index":N}`; 1-based |
//!
//! Mutation bodies are parsed by hand from a raw JSON value so missing or
//! malformed fields yield the documented 400 messages rather than the
//! framework's default rejection. The 1-based index is handed to the store
//! untranslated; the store owns the off-by-one arithmetic.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};
use stately_core::{funfact, store::FunFactStore};

use crate::{error::ApiError, states::resolve};

const FUNFACTS_REQUIRED: &str =
  "State fun facts value required and must be a non-empty array";

// ─── Random ──────────────────────────────────────────────────────────────────

/// `GET /states/:state/funfact`
pub async fn random<S>(
  State(store): State<Arc<S>>,
  Path(state): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
{
  let record = resolve(&state)?;
  let facts = store
    .get(record.code)
    .await
    .map_err(ApiError::backend)?
    .unwrap_or_default();
  match funfact::pick_random(&facts) {
    Some(fact) => Ok(Json(json!({ "funfact": fact }))),
    None => Err(ApiError::NoFacts(record.name.clone())),
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /states/:state/funfact` — upsert-append; 201 + the full list.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(state): Path<String>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FunFactStore,
{
  let record = resolve(&state)?;
  let facts = parse_funfacts(&body)?;
  let list = store
    .append(record.code, facts)
    .await
    .map_err(ApiError::from_store(record))?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "state": record.name, "funfacts": list })),
  ))
}

fn parse_funfacts(body: &Value) -> Result<Vec<String>, ApiError> {
  let Some(array) = body.get("funfacts").and_then(Value::as_array) else {
    return Err(ApiError::Validation(FUNFACTS_REQUIRED.into()));
  };
  if array.is_empty() {
    return Err(ApiError::Validation(FUNFACTS_REQUIRED.into()));
  }
  array
    .iter()
    .map(|v| v.as_str().map(str::to_owned))
    .collect::<Option<Vec<_>>>()
    .ok_or_else(|| ApiError::Validation(FUNFACTS_REQUIRED.into()))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /states/:state/funfact` — replace the fact at a 1-based index.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(state): Path<String>,
  Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
{
  let record = resolve(&state)?;
  let index = body.get("index").and_then(Value::as_i64);
  let fact = body
    .get("funfact")
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty());
  let (Some(index), Some(fact)) = (index, fact) else {
    return Err(ApiError::Validation(
      "Both index and funfact are required".into(),
    ));
  };

  let list = store
    .replace_at(record.code, index, fact.to_owned())
    .await
    .map_err(ApiError::from_store(record))?;
  Ok(Json(json!({ "state": record.name, "funfacts": list })))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /states/:state/funfact` — remove the fact at a 1-based index.
pub async fn destroy<S>(
  State(store): State<Arc<S>>,
  Path(state): Path<String>,
  Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError>
where
  S: FunFactStore,
{
  let record = resolve(&state)?;
  let Some(index) = body.get("index").and_then(Value::as_i64) else {
    return Err(ApiError::Validation(
      "State fun fact index value required".into(),
    ));
  };

  let list = store
    .delete_at(record.code, index)
    .await
    .map_err(ApiError::from_store(record))?;
  Ok(Json(json!({ "state": record.name, "funfacts": list })))
}
