//! Seed-file loading — the run-then-exit `--seed` helper mode.
//!
//! A seed file is a JSON array of `{"stateCode": "...", "funfacts": [...]}`
//! entries. Facts already present for a state are not appended again, so
//! re-running a seed is harmless.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;
use stately_core::{dataset, store::FunFactStore};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedEntry {
  state_code: String,
  funfacts:   Vec<String>,
}

/// Apply every entry of the seed file at `path` to `store`.
///
/// Entries whose state code does not resolve against the static table are
/// logged and skipped rather than aborting the run.
pub async fn run<S>(store: &S, path: &Path) -> anyhow::Result<()>
where
  S: FunFactStore,
{
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read seed file {path:?}"))?;
  let entries: Vec<SeedEntry> =
    serde_json::from_str(&raw).context("failed to parse seed file")?;

  for entry in entries {
    let Some(record) = dataset::table().resolve(&entry.state_code) else {
      tracing::warn!(
        code = %entry.state_code,
        "unknown state code in seed file; skipping"
      );
      continue;
    };

    let existing = store
      .get(record.code)
      .await
      .with_context(|| format!("failed to read facts for {}", record.code))?
      .unwrap_or_default();

    let fresh: Vec<String> = entry
      .funfacts
      .into_iter()
      .filter(|fact| !existing.contains(fact))
      .collect();
    if fresh.is_empty() {
      tracing::info!(code = %record.code, "already seeded");
      continue;
    }

    let appended = fresh.len();
    store
      .append(record.code, fresh)
      .await
      .with_context(|| format!("failed to seed facts for {}", record.code))?;
    tracing::info!(code = %record.code, appended, "seeded fun facts");
  }

  Ok(())
}
