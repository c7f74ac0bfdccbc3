//! Error types for `factry-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A trigger with this exact text already exists.
  #[error("trigger already exists: {0:?}")]
  DuplicateTrigger(String),

  /// The fact text already exists, either in the same category or anywhere
  /// (fact text is globally unique).
  #[error("fact already exists in category {category:?}: {fact:?}")]
  DuplicateFact { category: String, fact: String },

  #[error("trigger not found: {0:?}")]
  TriggerNotFound(String),

  /// The trigger test matched, but the exact-text category lookup of the
  /// substituted token came back empty.
  #[error("no stored category for matched trigger text {0:?}")]
  MissingTriggerCategory(String),

  /// The fetched fact has no contributor row (e.g. the no-facts sentinel).
  #[error("no contributor recorded for fact {0:?}")]
  MissingFactContributor(String),

  #[error("database error: {0}")]
  Database(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
