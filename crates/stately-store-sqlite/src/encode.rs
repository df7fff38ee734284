//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Fact lists are stored as compact JSON arrays; state codes as two-letter
//! uppercase strings.

use stately_core::state::StateCode;

use crate::Result;

pub fn encode_facts(facts: &[String]) -> Result<String> {
  Ok(serde_json::to_string(facts)?)
}

pub fn decode_facts(json: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(json)?)
}

pub fn decode_code(s: &str) -> Result<StateCode> {
  Ok(s.parse::<StateCode>()?)
}

/// Wrap a non-SQL error for propagation out of a `conn.call` closure.
pub fn call_err<E>(e: E) -> tokio_rusqlite::Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tokio_rusqlite::Error::Other(Box::new(e))
}
