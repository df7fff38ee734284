//! Handlers for the state listing, single-state view, and field endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/states` | Optional `?contig=true\|false` |
//! | `GET` | `/states/:state` | Merged static + fun-facts view |
//! | `GET` | `/states/:state/capital` | `{state, capital}` |
//! | `GET` | `/states/:state/nickname` | `{state, nickname}` |
//! | `GET` | `/states/:state/population` | `{state, population}`, grouped string |
//! | `GET` | `/states/:state/admission` | `{state, admitted}` |
//!
//! The field endpoints read only from the static table — they never touch
//! the fun-fact store.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use stately_core::{dataset, state::StateRecord, store::FunFactStore};

use crate::error::ApiError;

/// Resolve the `:state` path segment, or fail with the 400-level error.
pub(crate) fn resolve(param: &str) -> Result<&'static StateRecord, ApiError> {
  dataset::table().resolve(param).ok_or(ApiError::InvalidState)
}

// ─── Merged view ─────────────────────────────────────────────────────────────

/// A static record spread with its persisted fun facts. The `funfacts` key
/// appears only when the persisted list is non-empty.
#[derive(Debug, Serialize)]
pub struct MergedState {
  #[serde(flatten)]
  record:   &'static StateRecord,
  #[serde(skip_serializing_if = "Option::is_none")]
  funfacts: Option<Vec<String>>,
}

impl MergedState {
  fn new(record: &'static StateRecord, funfacts: Option<Vec<String>>) -> Self {
    Self {
      record,
      funfacts: funfacts.filter(|list| !list.is_empty()),
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// `"true"` keeps only the lower 48; `"false"` keeps only AK and HI; any
  /// other value (or absence) keeps all fifty.
  pub contig: Option<String>,
}

/// `GET /states[?contig=true|false]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<MergedState>>, ApiError>
where
  S: FunFactStore,
{
  let records: Vec<&'static StateRecord> = match params.contig.as_deref() {
    Some("true") => {
      dataset::table().iter().filter(|r| r.is_contiguous()).collect()
    }
    Some("false") => {
      dataset::table().iter().filter(|r| !r.is_contiguous()).collect()
    }
    _ => dataset::table().iter().collect(),
  };

  let codes: Vec<_> = records.iter().map(|r| r.code).collect();
  let mut lists = store.list_all(&codes).await.map_err(ApiError::backend)?;

  let merged = records
    .into_iter()
    .map(|r| MergedState::new(r, lists.remove(&r.code)))
    .collect();
  Ok(Json(merged))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /states/:state`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(state): Path<String>,
) -> Result<Json<MergedState>, ApiError>
where
  S: FunFactStore,
{
  let record = resolve(&state)?;
  let funfacts = store.get(record.code).await.map_err(ApiError::backend)?;
  Ok(Json(MergedState::new(record, funfacts)))
}

// ─── Field endpoints ──────────────────────────────────────────────────────────

/// `GET /states/:state/capital`
pub async fn capital(Path(state): Path<String>) -> Result<Json<Value>, ApiError> {
  let record = resolve(&state)?;
  Ok(Json(json!({ "state": record.name, "capital": record.capital })))
}

/// `GET /states/:state/nickname`
pub async fn nickname(Path(state): Path<String>) -> Result<Json<Value>, ApiError> {
  let record = resolve(&state)?;
  Ok(Json(json!({ "state": record.name, "nickname": record.nickname })))
}

/// `GET /states/:state/population` — population as a comma-grouped string.
pub async fn population(Path(state): Path<String>) -> Result<Json<Value>, ApiError> {
  let record = resolve(&state)?;
  Ok(Json(json!({
    "state": record.name,
    "population": group_thousands(record.population),
  })))
}

/// `GET /states/:state/admission`
pub async fn admission(Path(state): Path<String>) -> Result<Json<Value>, ApiError> {
  let record = resolve(&state)?;
  Ok(Json(json!({ "state": record.name, "admitted": record.admission })))
}

/// Render a count with comma thousands separators (12345678 → "12,345,678").
fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}
