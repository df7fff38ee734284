//! Core types and trait definitions for the Stately state-facts service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod dataset;
pub mod error;
pub mod funfact;
pub mod state;
pub mod store;

pub use error::{Error, Result};
