//! State identity types — the canonical key and the static reference record.
//!
//! [`StateCode`] is the join key between the static table and persisted
//! fun-fact rows. It is a distinct, shape-validated type so the store is
//! never handed a raw, unresolved identifier: handlers obtain one from a
//! resolved [`StateRecord`], and backends decode one from a stored row.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

// ─── StateCode ───────────────────────────────────────────────────────────────

/// A two-letter USPS state code, uppercase-normalized.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateCode([u8; 2]);

impl StateCode {
  pub fn as_str(&self) -> &str {
    // Both bytes are ASCII uppercase letters by construction.
    std::str::from_utf8(&self.0).expect("state code is ASCII")
  }
}

impl FromStr for StateCode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s.as_bytes() {
      [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
        Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
      }
      _ => Err(Error::InvalidStateCode(s.to_owned())),
    }
  }
}

impl fmt::Display for StateCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl fmt::Debug for StateCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "StateCode({:?})", self.as_str())
  }
}

impl Serialize for StateCode {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for StateCode {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── StateRecord ─────────────────────────────────────────────────────────────

/// A static reference record for one U.S. state.
///
/// Loaded once at startup from the embedded dataset and never mutated.
/// Serde field names follow the public wire format (`state`, `capital_city`,
/// `admission_date`), so a record serialises directly into a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
  #[serde(rename = "state")]
  pub name:       String,
  pub slug:       String,
  pub code:       StateCode,
  pub nickname:   String,
  #[serde(rename = "capital_city")]
  pub capital:    String,
  pub population: u64,
  #[serde(rename = "admission_date")]
  pub admission:  NaiveDate,
}

impl StateRecord {
  /// Alaska and Hawaii are the two states detached from the lower 48.
  pub fn is_contiguous(&self) -> bool {
    !matches!(self.code.as_str(), "AK" | "HI")
  }
}
