//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body uses the wire format `{"message": "..."}`. Store
//! failures are logged server-side and rendered as a generic 500 body.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stately_core::{state::StateRecord, store::StoreError};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The `:state` path segment did not resolve. Deliberately a 400, not a
  /// 404 — unknown identifiers are a client error on every endpoint.
  #[error("Invalid state abbreviation parameter")]
  InvalidState,

  /// Missing or malformed request-body field.
  #[error("{0}")]
  Validation(String),

  /// The state resolved but has no persisted facts.
  #[error("No Fun Facts found for {0}")]
  NoFacts(String),

  /// Facts exist but the 1-based index is out of current bounds.
  #[error("No Fun Fact found at that index for {0}")]
  NoFactAtIndex(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store failure on a fact endpoint, interpolating the resolved
  /// state's full name into the not-found messages.
  pub fn from_store<E>(
    record: &StateRecord,
  ) -> impl FnOnce(StoreError<E>) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let name = record.name.clone();
    move |err| match err {
      StoreError::NoFacts(_) => ApiError::NoFacts(name),
      StoreError::NoFactAtIndex { .. } => ApiError::NoFactAtIndex(name),
      StoreError::EmptyFacts => ApiError::Validation(
        "State fun facts value required and must be a non-empty array".into(),
      ),
      StoreError::Backend(e) => ApiError::Store(Box::new(e)),
    }
  }

  /// Map a store failure on a read path where the domain variants cannot
  /// occur.
  pub fn backend<E>(err: StoreError<E>) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(err))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::InvalidState => (StatusCode::BAD_REQUEST, self.to_string()),
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NoFacts(_) | ApiError::NoFactAtIndex(_) => {
        (StatusCode::NOT_FOUND, self.to_string())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "fun-fact store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
