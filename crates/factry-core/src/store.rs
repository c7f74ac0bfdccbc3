//! The `FactStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `factry-store-sqlite`).
//! Higher layers (the matcher, the command handlers) depend on this
//! abstraction, not on any concrete backend.
//!
//! Every operation is a single atomic statement; there are no multi-step
//! transactions. Concurrent duplicate submissions are resolved by the store's
//! uniqueness constraints, which surface as [`Error::DuplicateTrigger`] or
//! [`Error::DuplicateFact`](crate::Error::DuplicateFact) to the loser.
//!
//! [`Error::DuplicateTrigger`]: crate::Error::DuplicateTrigger

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Returned by [`FactStore::random_fact`] when the category holds no facts.
/// A benign sentinel, not an error.
pub const NO_FACTS_SENTINEL: &str =
  "There are no fun facts found for this category. :(";

/// All facts stored under one category, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFacts {
  pub category: String,
  pub facts:    Vec<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the Factry trigger/fact store backend.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait FactStore: Send + Sync {
  // ── Existence checks ──────────────────────────────────────────────────

  /// True iff any *trigger* row references `category`. A category that has
  /// facts but no trigger does not count as existing here.
  fn category_exists(
    &self,
    category: &str,
  ) -> impl Future<Output = Result<bool>> + Send;

  fn trigger_exists(
    &self,
    trigger: &str,
  ) -> impl Future<Output = Result<bool>> + Send;

  /// Exact-text check for `fact` within `category` (never fuzzy).
  fn fact_exists(
    &self,
    category: &str,
    fact: &str,
  ) -> impl Future<Output = Result<bool>> + Send;

  // ── Curation writes ───────────────────────────────────────────────────

  /// Insert a fact. Fails with
  /// [`Error::DuplicateFact`](crate::Error::DuplicateFact) if the (category,
  /// fact) pair already exists, or if the fact text exists anywhere (fact
  /// text is globally unique).
  fn add_fact(
    &self,
    category: &str,
    author_id: &str,
    fact: &str,
  ) -> impl Future<Output = Result<()>> + Send;

  /// Delete the fact with exactly this text. Succeeds unconditionally —
  /// removing an absent fact is a no-op, unlike [`remove_trigger`].
  ///
  /// [`remove_trigger`]: FactStore::remove_trigger
  fn remove_fact(&self, fact: &str)
  -> impl Future<Output = Result<()>> + Send;

  /// Insert a trigger. A single conditional insert: the store's uniqueness
  /// constraint is the source of truth, surfacing as
  /// [`Error::DuplicateTrigger`](crate::Error::DuplicateTrigger).
  fn add_trigger(
    &self,
    trigger: &str,
    category: &str,
    author_id: &str,
  ) -> impl Future<Output = Result<()>> + Send;

  /// Delete a trigger. Fails with
  /// [`Error::TriggerNotFound`](crate::Error::TriggerNotFound) if no trigger
  /// with this exact text exists.
  fn remove_trigger(
    &self,
    trigger: &str,
  ) -> impl Future<Output = Result<()>> + Send;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All trigger texts, in insertion order.
  fn all_triggers(&self)
  -> impl Future<Output = Result<Vec<String>>> + Send;

  /// The category of every trigger row, in insertion order. One entry per
  /// trigger: categories referenced by several triggers appear once per
  /// trigger, not deduplicated.
  fn all_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<String>>> + Send;

  /// Exact-text lookup of the category a trigger belongs to.
  fn trigger_category(
    &self,
    trigger: &str,
  ) -> impl Future<Output = Result<Option<String>>> + Send;

  /// Number of triggers, optionally restricted to one category.
  fn count_triggers(
    &self,
    category: Option<&str>,
  ) -> impl Future<Output = Result<u64>> + Send;

  /// Number of facts, optionally restricted to one category.
  fn count_facts(
    &self,
    category: Option<&str>,
  ) -> impl Future<Output = Result<u64>> + Send;

  /// A uniformly random fact from `category`, or [`NO_FACTS_SENTINEL`] when
  /// the category holds none.
  fn random_fact(
    &self,
    category: &str,
  ) -> impl Future<Output = Result<String>> + Send;

  /// Contributor identity of the fact with exactly this text.
  fn fact_author(
    &self,
    fact: &str,
  ) -> impl Future<Output = Result<Option<String>>> + Send;

  /// Every stored fact grouped by category — categories in first-seen order,
  /// facts in insertion order within each group.
  fn list_all_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<CategoryFacts>>> + Send;
}
