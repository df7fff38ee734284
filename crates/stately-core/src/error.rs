//! Error types for `stately-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid state code: {0:?}")]
  InvalidStateCode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
