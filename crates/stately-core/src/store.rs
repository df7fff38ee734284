//! The `FunFactStore` trait and its shared domain error type.
//!
//! The trait is implemented by storage backends (e.g.
//! `stately-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.
//!
//! Indices at this boundary are 1-based, exactly as clients send them; the
//! single 1-based → 0-based translation happens inside the backend.

use std::{collections::HashMap, future::Future};

use thiserror::Error;

use crate::state::StateCode;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Domain failures shared by every backend, generic over the backend's own
/// error type so callers can map variants to responses without downcasting.
#[derive(Debug, Error)]
pub enum StoreError<E> {
  /// No row exists for the code, or the row's list is empty.
  #[error("no fun facts recorded for {0}")]
  NoFacts(StateCode),

  /// The 1-based index is outside the list's current bounds.
  #[error("no fun fact at index {index} for {code}")]
  NoFactAtIndex { code: StateCode, index: i64 },

  /// Append called with an empty list, or with a blank fact.
  #[error("fun facts must be a non-empty list of non-empty strings")]
  EmptyFacts,

  #[error(transparent)]
  Backend(E),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the per-state fun-fact store.
///
/// All operations key on an already-resolved [`StateCode`], never on raw
/// user input. All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait FunFactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persisted lists for the given codes. A code with no row produces no
  /// entry — absence, not an empty list.
  fn list_all<'a>(
    &'a self,
    codes: &'a [StateCode],
  ) -> impl Future<Output = Result<HashMap<StateCode, Vec<String>>, StoreError<Self::Error>>>
  + Send
  + 'a;

  /// The ordered list for one code, or `None` if no row exists.
  fn get(
    &self,
    code: StateCode,
  ) -> impl Future<Output = Result<Option<Vec<String>>, StoreError<Self::Error>>> + Send + '_;

  /// Create the row if absent, then append `facts` at the end in the given
  /// order. Returns the full list after the append.
  fn append(
    &self,
    code: StateCode,
    facts: Vec<String>,
  ) -> impl Future<Output = Result<Vec<String>, StoreError<Self::Error>>> + Send + '_;

  /// Overwrite the element at 1-based `index` in place, preserving every
  /// other position. Returns the full list after the write.
  fn replace_at(
    &self,
    code: StateCode,
    index: i64,
    fact: String,
  ) -> impl Future<Output = Result<Vec<String>, StoreError<Self::Error>>> + Send + '_;

  /// Remove the element at 1-based `index`, shifting later elements down to
  /// close the gap. Returns the full list after the removal.
  fn delete_at(
    &self,
    code: StateCode,
    index: i64,
  ) -> impl Future<Output = Result<Vec<String>, StoreError<Self::Error>>> + Send + '_;
}
