//! Startup seed data: built-in starter categories plus optional on-disk
//! category files, inserted idempotently after the schema migration.

use std::path::Path;

use anyhow::Context as _;
use factry_core::{Error, store::FactStore};

/// Contributor identity recorded for every seeded trigger and fact.
pub const SEED_CONTRIBUTOR: &str = "factry-seed";

/// The categories and facts the bot starts off with. Each category gets a
/// same-named trigger.
const BUILTIN: &[(&str, &[&str])] = &[
  (
    "train",
    &[
      "The first public railway to use steam locomotives was the Stockton \
       and Darlington Railway in 1825.",
      "Japan's Shinkansen, also known as the bullet train, can reach speeds \
       of up to 320 km/h (200 mph).",
      "The longest railway in the world is the Trans-Siberian Railway, which \
       spans over 9,289 kilometers (5,772 miles).",
      "The world's first underground railway, the London Underground, opened \
       in 1863.",
      "The fastest train in the world is the Shanghai Maglev, which can \
       reach speeds of up to 431 km/h (267 mph).",
      "The first electric train was built in 1879 by Siemens & Halske in \
       Berlin, Germany.",
      "The Glacier Express in Switzerland is known as the slowest express \
       train in the world, taking around 8 hours to travel 291 kilometers \
       (181 miles).",
    ],
  ),
  (
    "space",
    &[
      "A day on Venus is longer than a year on Venus.",
      "There are more stars in the universe than grains of sand on all the \
       Earth's beaches.",
      "The largest volcano in the solar system is Olympus Mons on Mars, \
       which is about 13.6 miles (22 kilometers) high.",
      "Neutron stars are so dense that a sugar-cube-sized amount of material \
       from one would weigh about a billion tons on Earth.",
      "The Milky Way galaxy is on a collision course with the Andromeda \
       galaxy, and they are expected to merge in about 4.5 billion years.",
      "The footprints left by astronauts on the Moon are likely to remain \
       there for millions of years because there is no wind or water to \
       erode them.",
      "Jupiter has the shortest day of all the planets in the solar system, \
       with a rotation period of just under 10 hours.",
    ],
  ),
  (
    "literature",
    &[
      "The longest novel ever written is \"In Search of Lost Time\" by \
       Marcel Proust, which contains an estimated 1.2 million words.",
      "William Shakespeare is credited with inventing over 1,700 words in \
       the English language.",
      "The first book ever written using a typewriter was \"The Adventures \
       of Tom Sawyer\" by Mark Twain.",
      "The world's most expensive book ever sold is Leonardo da Vinci's \
       \"Codex Leicester,\" which was purchased by Bill Gates for $30.8 \
       million in 1994.",
      "The shortest war in history was between Britain and Zanzibar on \
       August 27, 1896, lasting between 38 and 45 minutes.",
      "The first novel ever written is considered to be \"The Tale of \
       Genji,\" written by Murasaki Shikibu in the early 11th century.",
      "The Library of Congress in Washington, D.C., is the largest library \
       in the world, with over 170 million items in its collections.",
    ],
  ),
  (
    "science",
    &[
      "Water can boil and freeze at the same time, a phenomenon known as \
       the \"triple point\".",
      "Bananas are naturally radioactive due to their high potassium \
       content.",
      "The speed of light in a vacuum is approximately 299,792 kilometers \
       per second (186,282 miles per second).",
      "The human body contains about 37.2 trillion cells.",
      "The DNA in a single human cell, if stretched out, would be about 2 \
       meters (6.5 feet) long.",
      "The Earth's core is as hot as the surface of the Sun, with \
       temperatures reaching up to 5,500 degrees Celsius (9,932 degrees \
       Fahrenheit).",
      "A single bolt of lightning contains enough energy to toast 100,000 \
       slices of bread.",
    ],
  ),
];

/// Seed the store with the built-in categories, merged with any on-disk
/// category files. Duplicate inserts are swallowed — seeding is idempotent.
pub async fn seed_store<S: FactStore>(
  store: &S,
  categories_dir: Option<&Path>,
) -> anyhow::Result<()> {
  let mut seed: Vec<(String, Vec<String>)> = BUILTIN
    .iter()
    .map(|(category, facts)| {
      (
        (*category).to_owned(),
        facts.iter().map(|f| (*f).to_owned()).collect(),
      )
    })
    .collect();

  if let Some(dir) = categories_dir {
    merge_category_files(&mut seed, dir)
      .with_context(|| format!("failed to read categories from {dir:?}"))?;
  }

  for (category, facts) in &seed {
    match store.add_trigger(category, category, SEED_CONTRIBUTOR).await {
      Ok(()) | Err(Error::DuplicateTrigger(_)) => {}
      Err(err) => return Err(err.into()),
    }

    for fact in facts {
      match store.add_fact(category, SEED_CONTRIBUTOR, fact).await {
        Ok(()) | Err(Error::DuplicateFact { .. }) => {}
        Err(err) => return Err(err.into()),
      }
    }
  }

  Ok(())
}

/// Merge `<dir>/<category>.txt` files into the seed map, one fact per line.
/// A file replaces the built-in entry of the same name.
fn merge_category_files(
  seed: &mut Vec<(String, Vec<String>)>,
  dir: &Path,
) -> std::io::Result<()> {
  if !dir.exists() {
    return Ok(());
  }

  for entry in std::fs::read_dir(dir)? {
    let path = entry?.path();
    if path.extension().and_then(|e| e.to_str()) != Some("txt") {
      continue;
    }
    let Some(category) = path.file_stem().and_then(|s| s.to_str()) else {
      continue;
    };

    let facts: Vec<String> = std::fs::read_to_string(&path)?
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(str::to_owned)
      .collect();

    match seed.iter_mut().find(|(name, _)| name == category) {
      Some((_, existing)) => *existing = facts,
      None => seed.push((category.to_owned(), facts)),
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use factry_core::store::FactStore;
  use factry_store_sqlite::SqliteStore;

  use super::*;

  #[tokio::test]
  async fn seeding_is_idempotent() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    seed_store(&store, None).await.unwrap();
    let triggers = store.count_triggers(None).await.unwrap();
    let facts = store.count_facts(None).await.unwrap();
    assert_eq!(triggers, BUILTIN.len() as u64);

    seed_store(&store, None).await.unwrap();
    assert_eq!(store.count_triggers(None).await.unwrap(), triggers);
    assert_eq!(store.count_facts(None).await.unwrap(), facts);
  }

  #[tokio::test]
  async fn seeded_facts_carry_the_seed_contributor() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    seed_store(&store, None).await.unwrap();

    let fact = store.random_fact("train").await.unwrap();
    let author = store.fact_author(&fact).await.unwrap();
    assert_eq!(author.as_deref(), Some(SEED_CONTRIBUTOR));
  }

  #[tokio::test]
  async fn category_files_replace_builtin_entries() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
      dir.path().join("train.txt"),
      "Only this train fact.\n\n  \n",
    )
    .unwrap();
    std::fs::write(dir.path().join("cheese.txt"), "Cheese is aged.\n")
      .unwrap();

    let store = SqliteStore::open_in_memory().await.unwrap();
    seed_store(&store, Some(dir.path())).await.unwrap();

    assert_eq!(store.count_facts(Some("train")).await.unwrap(), 1);
    assert!(
      store.fact_exists("train", "Only this train fact.").await.unwrap()
    );
    assert!(store.fact_exists("cheese", "Cheese is aged.").await.unwrap());
    assert!(store.trigger_exists("cheese").await.unwrap());
  }

  #[tokio::test]
  async fn a_missing_categories_dir_is_not_an_error() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    seed_store(&store, Some(std::path::Path::new("/nonexistent/categories")))
      .await
      .unwrap();

    assert!(store.trigger_exists("train").await.unwrap());
  }
}
