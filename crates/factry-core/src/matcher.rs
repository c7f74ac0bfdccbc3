//! The trigger matcher — turns a raw chat message into at most one fact reply.
//!
//! Stateless: the working set (all categories, all triggers) is re-read from
//! the store on every invocation; there is no cached index.
//!
//! Matching runs in two stages per token. First the token is snapped to the
//! nearest known category if one scores at or above the similarity threshold.
//! Then the (possibly substituted) value is tested against every stored
//! trigger; the first trigger scoring at or above the threshold declares a
//! match. The reply's trigger name is the matched trigger's *stored* text,
//! while its category comes from an exact-text lookup of the *substituted*
//! value — a long-standing quirk that curated data now depends on, so it is
//! preserved rather than silently corrected.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  similarity::ratio,
  store::FactStore,
};

/// Minimum similarity ratio for both the category substitution and the
/// trigger test.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// A successful match, ready for the transport layer to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactReply {
  /// The matched trigger's stored text.
  pub trigger:     String,
  /// Category the fact was drawn from.
  pub category:    String,
  /// Formatted fact body (already wrapped in "Fun ... fact!" when needed).
  pub body:        String,
  /// Identity of whoever contributed the fact.
  pub contributor: String,
}

// ─── Tokenization ────────────────────────────────────────────────────────────

/// Lowercase, trim, strip everything that is neither alphanumeric nor
/// whitespace, then split on single spaces.
///
/// Splitting on `' '` (not on whitespace runs) intentionally yields empty
/// tokens for doubled spaces; those simply never match anything.
pub fn normalize(content: &str) -> Vec<String> {
  let cleaned: String = content
    .to_lowercase()
    .trim()
    .chars()
    .filter(|c| c.is_alphanumeric() || c.is_whitespace())
    .collect();

  cleaned.split(' ').map(str::to_owned).collect()
}

// ─── Category substitution ───────────────────────────────────────────────────

/// The best-scoring category for `token`, or the token itself when no
/// category reaches the threshold.
///
/// `categories` carries one entry per trigger row (duplicates included);
/// ties keep the earliest entry.
pub fn nearest_category(token: &str, categories: &[String]) -> String {
  let mut best = token.to_owned();
  let mut best_score = 0.0_f64;

  for category in categories {
    let score = ratio(token, category);
    if score > best_score {
      best_score = score;
      best = category.clone();
    }
  }

  if best_score < SIMILARITY_THRESHOLD {
    return token.to_owned();
  }
  best
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Resolve a raw message to at most one [`FactReply`].
///
/// Tokens are tried in order; the first match wins and no further tokens are
/// considered. `Ok(None)` means no token came close to any trigger.
pub async fn resolve<S: FactStore>(
  store: &S,
  content: &str,
) -> Result<Option<FactReply>> {
  let categories = store.all_categories().await?;
  let triggers = store.all_triggers().await?;

  for token in normalize(content) {
    let candidate = nearest_category(&token, &categories);

    // Stored trigger text is the first ratio argument, the candidate the
    // second; the ratio is not symmetric in block tie-breaking.
    let Some(trigger) = triggers
      .iter()
      .find(|t| ratio(t, &candidate) >= SIMILARITY_THRESHOLD)
    else {
      continue;
    };

    let category = store
      .trigger_category(&candidate)
      .await?
      .ok_or_else(|| Error::MissingTriggerCategory(candidate.clone()))?;

    let fact = store.random_fact(&category).await?;
    let contributor = store
      .fact_author(&fact)
      .await?
      .ok_or_else(|| Error::MissingFactContributor(fact.clone()))?;

    let body = if fact.to_lowercase().contains("fun fact") {
      fact
    } else {
      format!("Fun {trigger} fact! {fact}")
    };

    return Ok(Some(FactReply {
      trigger: trigger.clone(),
      category,
      body,
      contributor,
    }));
  }

  Ok(None)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::{nearest_category, normalize};

  #[test]
  fn normalize_lowercases_and_strips_symbols() {
    assert_eq!(normalize("I love Trains!!"), vec!["i", "love", "trains"]);
  }

  #[test]
  fn normalize_trims_surrounding_whitespace() {
    assert_eq!(normalize("  hello world  "), vec!["hello", "world"]);
  }

  #[test]
  fn normalize_keeps_empty_tokens_for_doubled_spaces() {
    assert_eq!(normalize("a  b"), vec!["a", "", "b"]);
  }

  #[test]
  fn normalize_pure_punctuation_becomes_one_empty_token() {
    assert_eq!(normalize("?!?"), vec![""]);
  }

  #[test]
  fn nearest_category_substitutes_close_match() {
    let cats = vec!["train".to_owned(), "space".to_owned()];
    assert_eq!(nearest_category("trains", &cats), "train");
  }

  #[test]
  fn nearest_category_keeps_token_below_threshold() {
    let cats = vec!["train".to_owned(), "space".to_owned()];
    assert_eq!(nearest_category("hello", &cats), "hello");
  }

  #[test]
  fn nearest_category_with_no_categories_keeps_token() {
    assert_eq!(nearest_category("anything", &[]), "anything");
  }

  #[test]
  fn nearest_category_ties_keep_earliest() {
    let cats = vec!["trains".to_owned(), "trains".to_owned()];
    assert_eq!(nearest_category("trains", &cats), "trains");
  }
}
