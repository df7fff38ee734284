//! JSON REST API for Stately.
//!
//! Exposes an axum [`Router`] backed by any
//! [`stately_core::store::FunFactStore`]. Static pages, the 404 fallback,
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/states", stately_api::states_router(store.clone()))
//! ```

pub mod error;
pub mod funfacts;
pub mod states;

use std::sync::Arc;

use axum::{Router, routing::get};
use stately_core::store::FunFactStore;

pub use error::ApiError;

/// Build a fully-materialised `/states` router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn states_router<S>(store: Arc<S>) -> Router<()>
where
  S: FunFactStore + 'static,
{
  Router::new()
    .route("/", get(states::list::<S>))
    .route("/{state}", get(states::get_one::<S>))
    .route(
      "/{state}/funfact",
      get(funfacts::random::<S>)
        .post(funfacts::create::<S>)
        .patch(funfacts::update::<S>)
        .delete(funfacts::destroy::<S>),
    )
    .route("/{state}/capital", get(states::capital))
    .route("/{state}/nickname", get(states::nickname))
    .route("/{state}/population", get(states::population))
    .route("/{state}/admission", get(states::admission))
    .with_state(store)
}
