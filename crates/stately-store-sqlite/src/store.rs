//! [`SqliteFunFactStore`] — the SQLite implementation of [`FunFactStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::OptionalExtension as _;
use stately_core::{
  state::StateCode,
  store::{FunFactStore, StoreError},
};

use crate::{
  Error, Result,
  encode::{call_err, decode_code, decode_facts, encode_facts},
  schema::SCHEMA,
};

/// The single 1-based → 0-based translation point for the whole workspace.
fn position(index: i64, len: usize) -> Option<usize> {
  let idx = usize::try_from(index.checked_sub(1)?).ok()?;
  (idx < len).then_some(idx)
}

/// Outcome of a read-modify-write closure, carried across the `conn.call`
/// boundary so domain failures survive as values rather than SQL errors.
enum Mutation {
  Applied(Vec<String>),
  NoRow,
  OutOfBounds,
}

fn backend(e: tokio_rusqlite::Error) -> StoreError<Error> {
  StoreError::Backend(Error::Database(e))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fun-fact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
///
/// Every mutation runs its read-modify-write inside one `conn.call` closure
/// under an explicit transaction. Closures execute serially on the
/// connection's thread, so two concurrent mutations of the same state code
/// cannot interleave; the transaction makes the write atomic against any
/// other process sharing the database file.
#[derive(Clone)]
pub struct SqliteFunFactStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteFunFactStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Apply `mutate` to the current list for `code` and persist the result,
  /// all inside one transaction. An absent row and an empty list both come
  /// back as [`Mutation::NoRow`]; `mutate` returning `None` signals an
  /// out-of-bounds index. The length seen by `mutate` is the length at
  /// operation time — no snapshot or stale-index protection.
  async fn mutate_row(
    &self,
    code: StateCode,
    mutate: impl FnOnce(&mut Vec<String>) -> Option<()> + Send + 'static,
  ) -> Result<Mutation, tokio_rusqlite::Error> {
    let code_str = code.as_str().to_owned();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing: Option<String> = tx
          .query_row(
            "SELECT facts_json FROM fun_facts WHERE state_code = ?1",
            rusqlite::params![code_str],
            |row| row.get(0),
          )
          .optional()?;

        let Some(json) = existing else {
          return Ok(Mutation::NoRow);
        };
        let mut facts = decode_facts(&json).map_err(call_err)?;
        if facts.is_empty() {
          return Ok(Mutation::NoRow);
        }
        if mutate(&mut facts).is_none() {
          return Ok(Mutation::OutOfBounds);
        }

        let updated = encode_facts(&facts).map_err(call_err)?;
        tx.execute(
          "UPDATE fun_facts SET facts_json = ?2 WHERE state_code = ?1",
          rusqlite::params![code_str, updated],
        )?;
        tx.commit()?;
        Ok(Mutation::Applied(facts))
      })
      .await
  }
}

// ─── FunFactStore impl ───────────────────────────────────────────────────────

impl FunFactStore for SqliteFunFactStore {
  type Error = Error;

  async fn list_all<'a>(
    &'a self,
    codes: &'a [StateCode],
  ) -> Result<HashMap<StateCode, Vec<String>>, StoreError<Error>> {
    let wanted: Vec<String> =
      codes.iter().map(|c| c.as_str().to_owned()).collect();

    let raws: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        if wanted.is_empty() {
          return Ok(Vec::new());
        }
        let placeholders = vec!["?"; wanted.len()].join(", ");
        let sql = format!(
          "SELECT state_code, facts_json FROM fun_facts
           WHERE state_code IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(wanted.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(backend)?;

    let mut lists = HashMap::with_capacity(raws.len());
    for (code_str, json) in raws {
      let code = decode_code(&code_str).map_err(StoreError::Backend)?;
      let facts = decode_facts(&json).map_err(StoreError::Backend)?;
      lists.insert(code, facts);
    }
    Ok(lists)
  }

  async fn get(
    &self,
    code: StateCode,
  ) -> Result<Option<Vec<String>>, StoreError<Error>> {
    let code_str = code.as_str().to_owned();
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT facts_json FROM fun_facts WHERE state_code = ?1",
              rusqlite::params![code_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
      .map_err(backend)?;

    raw
      .as_deref()
      .map(decode_facts)
      .transpose()
      .map_err(StoreError::Backend)
  }

  async fn append(
    &self,
    code: StateCode,
    facts: Vec<String>,
  ) -> Result<Vec<String>, StoreError<Error>> {
    if facts.is_empty() || facts.iter().any(|f| f.trim().is_empty()) {
      return Err(StoreError::EmptyFacts);
    }

    let code_str = code.as_str().to_owned();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing: Option<String> = tx
          .query_row(
            "SELECT facts_json FROM fun_facts WHERE state_code = ?1",
            rusqlite::params![code_str],
            |row| row.get(0),
          )
          .optional()?;

        let mut list = match existing.as_deref() {
          Some(json) => decode_facts(json).map_err(call_err)?,
          None => Vec::new(),
        };
        list.extend(facts);

        let updated = encode_facts(&list).map_err(call_err)?;
        tx.execute(
          "INSERT INTO fun_facts (state_code, facts_json) VALUES (?1, ?2)
           ON CONFLICT(state_code) DO UPDATE SET facts_json = excluded.facts_json",
          rusqlite::params![code_str, updated],
        )?;
        tx.commit()?;
        Ok(list)
      })
      .await
      .map_err(backend)
  }

  async fn replace_at(
    &self,
    code: StateCode,
    index: i64,
    fact: String,
  ) -> Result<Vec<String>, StoreError<Error>> {
    let outcome = self
      .mutate_row(code, move |facts| {
        let idx = position(index, facts.len())?;
        facts[idx] = fact;
        Some(())
      })
      .await
      .map_err(backend)?;

    match outcome {
      Mutation::Applied(facts) => Ok(facts),
      Mutation::NoRow => Err(StoreError::NoFacts(code)),
      Mutation::OutOfBounds => Err(StoreError::NoFactAtIndex { code, index }),
    }
  }

  async fn delete_at(
    &self,
    code: StateCode,
    index: i64,
  ) -> Result<Vec<String>, StoreError<Error>> {
    let outcome = self
      .mutate_row(code, move |facts| {
        let idx = position(index, facts.len())?;
        facts.remove(idx);
        Some(())
      })
      .await
      .map_err(backend)?;

    match outcome {
      Mutation::Applied(facts) => Ok(facts),
      Mutation::NoRow => Err(StoreError::NoFacts(code)),
      Mutation::OutOfBounds => Err(StoreError::NoFactAtIndex { code, index }),
    }
  }
}
