//! The static reference table and identifier resolution.
//!
//! The table is parsed from an embedded JSON asset into a process-wide
//! static on first access. It never changes during a process lifetime, so
//! concurrent readers need no locking.

use std::sync::LazyLock;

use crate::state::{StateCode, StateRecord};

const STATES_JSON: &str = include_str!("states.json");

static TABLE: LazyLock<StateTable> = LazyLock::new(|| {
  let records: Vec<StateRecord> = serde_json::from_str(STATES_JSON)
    .expect("embedded state dataset is well-formed");
  StateTable { records }
});

/// The process-wide table, parsed on first access.
pub fn table() -> &'static StateTable {
  &TABLE
}

/// The immutable table of all fifty state records.
pub struct StateTable {
  records: Vec<StateRecord>,
}

impl StateTable {
  pub fn iter(&self) -> impl Iterator<Item = &StateRecord> {
    self.records.iter()
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Resolve a user-supplied identifier to a record.
  ///
  /// Precedence: uppercased `input` against `code` first; failing that, one
  /// scan in table order matching `slug` or lowercased `name` against the
  /// lowercased `input`. Exact, case-insensitive matches only — no fuzzy or
  /// partial matching.
  pub fn resolve(&self, input: &str) -> Option<&StateRecord> {
    if input.is_empty() {
      return None;
    }
    if let Ok(code) = input.parse::<StateCode>()
      && let Some(record) = self.records.iter().find(|r| r.code == code)
    {
      return Some(record);
    }
    let lower = input.to_lowercase();
    self
      .records
      .iter()
      .find(|r| r.slug == lower || r.name.to_lowercase() == lower)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_has_fifty_unique_codes() {
    let t = table();
    assert_eq!(t.len(), 50);
    let mut codes: Vec<&str> = t.iter().map(|r| r.code.as_str()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), 50);
  }

  #[test]
  fn exactly_two_states_are_non_contiguous() {
    let detached: Vec<&str> = table()
      .iter()
      .filter(|r| !r.is_contiguous())
      .map(|r| r.code.as_str())
      .collect();
    assert_eq!(detached, ["AK", "HI"]);
  }

  #[test]
  fn resolves_codes_in_any_case() {
    for input in ["KS", "ks", "Ks"] {
      let record = table().resolve(input).expect(input);
      assert_eq!(record.name, "Kansas");
    }
  }

  #[test]
  fn resolves_full_names_in_any_case() {
    for input in ["Kansas", "kansas", "KANSAS", "new hampshire", "New Hampshire"] {
      assert!(table().resolve(input).is_some(), "failed on {input:?}");
    }
  }

  #[test]
  fn resolves_slugs() {
    let record = table().resolve("new-hampshire").unwrap();
    assert_eq!(record.code.as_str(), "NH");
    assert_eq!(
      table().resolve("rhode-island").unwrap().name,
      "Rhode Island"
    );
  }

  #[test]
  fn code_name_and_slug_resolve_to_the_same_record() {
    for record in table().iter() {
      let by_code = table().resolve(record.code.as_str()).unwrap();
      let by_name = table().resolve(&record.name).unwrap();
      let by_slug = table().resolve(&record.slug).unwrap();
      assert_eq!(by_code.code, record.code);
      assert_eq!(by_name.code, record.code);
      assert_eq!(by_slug.code, record.code);
    }
  }

  #[test]
  fn unknown_inputs_do_not_resolve() {
    for input in ["", "zz", "ZZ", "kansa", "kansass", "  ", "new_hampshire"] {
      assert!(table().resolve(input).is_none(), "resolved {input:?}");
    }
  }
}
