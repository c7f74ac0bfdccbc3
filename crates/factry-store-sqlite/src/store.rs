//! [`SqliteStore`] — the SQLite implementation of [`FactStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use factry_core::{
  Error, Result,
  store::{CategoryFacts, FactStore, NO_FACTS_SENTINEL},
};

use crate::schema;

/// Wrap a backend failure into the domain error taxonomy.
fn db_err(e: tokio_rusqlite::Error) -> Error {
  Error::Database(Box::new(e))
}

/// True when the error is a SQLite uniqueness/constraint violation — the
/// backstop that resolves racing duplicate submissions.
fn is_constraint_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Factry trigger/fact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run the additive schema
  /// migration. A migration failure here aborts startup.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(db_err)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(db_err)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        schema::modernize(conn)?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }
}

// ─── FactStore impl ──────────────────────────────────────────────────────────

impl FactStore for SqliteStore {
  // ── Existence checks ──────────────────────────────────────────────────────

  async fn category_exists(&self, category: &str) -> Result<bool> {
    let category = category.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT category FROM triggers WHERE category = ?1",
              rusqlite::params![category],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await
      .map_err(db_err)
  }

  async fn trigger_exists(&self, trigger: &str) -> Result<bool> {
    let trigger = trigger.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT trigger FROM triggers WHERE trigger = ?1",
              rusqlite::params![trigger],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await
      .map_err(db_err)
  }

  async fn fact_exists(&self, category: &str, fact: &str) -> Result<bool> {
    let category = category.to_owned();
    let fact = fact.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT fact FROM category_facts
               WHERE category = ?1 AND fact = ?2",
              rusqlite::params![category, fact],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await
      .map_err(db_err)
  }

  // ── Curation writes ───────────────────────────────────────────────────────

  async fn add_fact(
    &self,
    category: &str,
    author_id: &str,
    fact: &str,
  ) -> Result<()> {
    // The per-category pre-check is semantically finer than the global
    // fact-text constraint, so it stays; the constraint remains the backstop.
    if self.fact_exists(category, fact).await? {
      return Err(Error::DuplicateFact {
        category: category.to_owned(),
        fact:     fact.to_owned(),
      });
    }

    let category_owned = category.to_owned();
    let author_owned = author_id.to_owned();
    let fact_owned = fact.to_owned();

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO category_facts (category, added_by, fact)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![category_owned, author_owned, fact_owned],
        )?;
        Ok(())
      })
      .await;

    match inserted {
      Ok(()) => Ok(()),
      Err(e) if is_constraint_violation(&e) => Err(Error::DuplicateFact {
        category: category.to_owned(),
        fact:     fact.to_owned(),
      }),
      Err(e) => Err(db_err(e)),
    }
  }

  async fn remove_fact(&self, fact: &str) -> Result<()> {
    let fact = fact.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM category_facts WHERE fact = ?1",
          rusqlite::params![fact],
        )?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }

  async fn add_trigger(
    &self,
    trigger: &str,
    category: &str,
    author_id: &str,
  ) -> Result<()> {
    let trigger_owned = trigger.to_owned();
    let category_owned = category.to_owned();
    let author_owned = author_id.to_owned();

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO triggers (trigger, added_by, category)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![trigger_owned, author_owned, category_owned],
        )?;
        Ok(())
      })
      .await;

    match inserted {
      Ok(()) => Ok(()),
      Err(e) if is_constraint_violation(&e) => {
        Err(Error::DuplicateTrigger(trigger.to_owned()))
      }
      Err(e) => Err(db_err(e)),
    }
  }

  async fn remove_trigger(&self, trigger: &str) -> Result<()> {
    if !self.trigger_exists(trigger).await? {
      return Err(Error::TriggerNotFound(trigger.to_owned()));
    }

    let trigger = trigger.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM triggers WHERE trigger = ?1",
          rusqlite::params![trigger],
        )?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn all_triggers(&self) -> Result<Vec<String>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT trigger FROM triggers")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)
  }

  async fn all_categories(&self) -> Result<Vec<String>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT category FROM triggers")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)
  }

  async fn trigger_category(&self, trigger: &str) -> Result<Option<String>> {
    let trigger = trigger.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT category FROM triggers WHERE trigger = ?1",
              rusqlite::params![trigger],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
      .map_err(db_err)
  }

  async fn count_triggers(&self, category: Option<&str>) -> Result<u64> {
    let category = category.map(str::to_owned);
    self
      .conn
      .call(move |conn| {
        let count: i64 = match category {
          Some(c) => conn.query_row(
            "SELECT COUNT(*) FROM triggers WHERE category = ?1",
            rusqlite::params![c],
            |row| row.get(0),
          )?,
          None => conn.query_row(
            "SELECT COUNT(*) FROM triggers",
            [],
            |row| row.get(0),
          )?,
        };
        Ok(count as u64)
      })
      .await
      .map_err(db_err)
  }

  async fn count_facts(&self, category: Option<&str>) -> Result<u64> {
    let category = category.map(str::to_owned);
    self
      .conn
      .call(move |conn| {
        let count: i64 = match category {
          Some(c) => conn.query_row(
            "SELECT COUNT(*) FROM category_facts WHERE category = ?1",
            rusqlite::params![c],
            |row| row.get(0),
          )?,
          None => conn.query_row(
            "SELECT COUNT(*) FROM category_facts",
            [],
            |row| row.get(0),
          )?,
        };
        Ok(count as u64)
      })
      .await
      .map_err(db_err)
  }

  async fn random_fact(&self, category: &str) -> Result<String> {
    let category = category.to_owned();
    self
      .conn
      .call(move |conn| {
        let fact: Option<String> = conn
          .query_row(
            "SELECT fact FROM category_facts
             WHERE category = ?1
             ORDER BY RANDOM()
             LIMIT 1",
            rusqlite::params![category],
            |row| row.get(0),
          )
          .optional()?;
        Ok(fact.unwrap_or_else(|| NO_FACTS_SENTINEL.to_owned()))
      })
      .await
      .map_err(db_err)
  }

  async fn fact_author(&self, fact: &str) -> Result<Option<String>> {
    let fact = fact.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT added_by FROM category_facts WHERE fact = ?1",
              rusqlite::params![fact],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
      .map_err(db_err)
  }

  async fn list_all_facts(&self) -> Result<Vec<CategoryFacts>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT category, fact FROM category_facts")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    // Group by category in first-seen order.
    let mut grouped: Vec<CategoryFacts> = Vec::new();
    for (category, fact) in rows {
      match grouped.iter_mut().find(|g| g.category == category) {
        Some(group) => group.facts.push(fact),
        None => grouped.push(CategoryFacts { category, facts: vec![fact] }),
      }
    }

    Ok(grouped)
  }
}
