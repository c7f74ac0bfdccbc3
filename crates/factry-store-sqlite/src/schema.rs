//! Target schema descriptor and the additive `modernize` migration.
//!
//! The schema is a static, ordered list of table definitions, each an ordered
//! list of column name/declaration pairs. [`modernize`] walks it once at open:
//! missing tables are created whole, missing columns are added with
//! `ALTER TABLE ... ADD COLUMN`. Columns are never dropped, renamed, or
//! rewritten, and there are no down-migrations.

use rusqlite::OptionalExtension as _;

pub struct ColumnDef {
  pub name: &'static str,
  pub decl: &'static str,
}

pub struct TableDef {
  pub name:    &'static str,
  pub columns: &'static [ColumnDef],
}

/// The current target schema.
///
/// `triggers.category` declares a reference to `category_facts.category` but
/// SQLite never enforces it (foreign keys stay off): a category may hold
/// facts with no trigger, or a trigger with no facts.
pub const SCHEMA: &[TableDef] = &[
  TableDef {
    name:    "triggers",
    columns: &[
      ColumnDef {
        name: "trigger",
        decl: "TEXT NOT NULL UNIQUE PRIMARY KEY",
      },
      ColumnDef { name: "added_by", decl: "TEXT NOT NULL" },
      ColumnDef {
        name: "category",
        decl: "TEXT NOT NULL REFERENCES category_facts(category)",
      },
    ],
  },
  TableDef {
    name:    "category_facts",
    columns: &[
      ColumnDef { name: "id", decl: "INTEGER PRIMARY KEY AUTOINCREMENT" },
      ColumnDef { name: "category", decl: "TEXT NOT NULL" },
      ColumnDef { name: "added_by", decl: "TEXT NOT NULL" },
      ColumnDef { name: "fact", decl: "TEXT NOT NULL UNIQUE" },
    ],
  },
];

/// `ADD COLUMN` cannot carry clauses that may not hold for existing rows
/// (PRIMARY KEY, UNIQUE, NOT NULL without a default), so the additive path
/// relaxes the declaration. The full declaration still applies to freshly
/// created tables.
fn alter_decl(decl: &str) -> String {
  let mut relaxed = decl
    .replace(" PRIMARY KEY", "")
    .replace(" AUTOINCREMENT", "")
    .replace(" UNIQUE", "");
  if relaxed.contains("NOT NULL") && !relaxed.contains("DEFAULT") {
    relaxed.push_str(" DEFAULT ''");
  }
  relaxed
}

/// Bring the live database up to [`SCHEMA`], additively.
///
/// Runs once per open, before any other store access. Failure here is fatal
/// to startup — the caller aborts rather than running against a bad schema.
pub fn modernize(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  for table in SCHEMA {
    let exists: bool = conn
      .query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        rusqlite::params![table.name],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false);

    if !exists {
      let columns = table
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.decl))
        .collect::<Vec<_>>()
        .join(", ");
      conn.execute_batch(&format!(
        "CREATE TABLE {} ({});",
        table.name, columns
      ))?;
      tracing::info!(table = table.name, "created table");
      continue;
    }

    let live: Vec<String> = conn
      .prepare(&format!("PRAGMA table_info({})", table.name))?
      .query_map([], |row| row.get::<_, String>(1))?
      .collect::<rusqlite::Result<_>>()?;

    for column in table.columns {
      if !live.iter().any(|name| name == column.name) {
        conn.execute_batch(&format!(
          "ALTER TABLE {} ADD COLUMN {} {};",
          table.name,
          column.name,
          alter_decl(column.decl)
        ))?;
        tracing::info!(
          table = table.name,
          column = column.name,
          "added missing column"
        );
      }
    }
  }

  Ok(())
}
