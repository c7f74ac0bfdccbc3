//! Curation command handlers.
//!
//! Each handler runs against any [`FactStore`] and returns a finished
//! [`Reply`]. Expected failures (duplicates, missing triggers) are reported
//! to the invoker as ephemeral embeds; unexpected store errors are logged and
//! reported with a generic error embed so the command loop never crashes.

use factry_core::{Error, Result, store::FactStore};

use crate::reply::{Attachment, Embed, Reply};

/// Replies longer than this are shipped as a file attachment instead.
const MAX_MESSAGE_CHARS: usize = 2000;

fn uh_oh(description: impl Into<String>) -> Reply {
  Reply::embed(Embed::new("Uh oh!", description)).ephemeral()
}

fn error_reply(description: impl Into<String>) -> Reply {
  Reply::embed(Embed::new("Error", description)).ephemeral()
}

// ─── Triggers ────────────────────────────────────────────────────────────────

pub async fn add_trigger<S: FactStore>(
  store: &S,
  author_id: &str,
  trigger: &str,
  category: &str,
) -> Reply {
  match try_add_trigger(store, author_id, trigger, category).await {
    Ok(reply) => reply,
    Err(err) => {
      tracing::error!(trigger, category, error = %err, "add_trigger failed");
      error_reply(format!(
        "An error occurred while adding the trigger '{trigger}' to the \
         '{category}' category!"
      ))
    }
  }
}

async fn try_add_trigger<S: FactStore>(
  store: &S,
  author_id: &str,
  trigger: &str,
  category: &str,
) -> Result<Reply> {
  let category_did_exist = store.category_exists(category).await?;

  match store.add_trigger(trigger, category, author_id).await {
    Err(Error::DuplicateTrigger(_)) => {
      return Ok(uh_oh("The trigger already exists!"));
    }
    other => other?,
  }

  let facts_count = store.count_facts(Some(category)).await?;

  let mut embed = Embed::new(
    "Trigger added",
    format!(
      "The trigger '{trigger}' has been added to the '{category}' category!"
    ),
  )
  .footer(
    "Note: Triggers that are too similar to each other will cause problems. \
     Eg, You and your.",
  );

  if !category_did_exist && facts_count == 0 {
    embed = embed.field(
      "New category",
      "That category did not exist before, so it has been created.\n\
       This category now has only 1 trigger, but no facts associated with \
       it.\n\
       You can add a fact to the category using the /add_fact command.",
    );
  } else if category_did_exist && facts_count == 0 {
    embed = embed.field(
      "No facts",
      "The category already existed, but it does not have any facts for the \
       category saved.\n\
       You can add a fact to the category using the /add_fact command.",
    );
  }

  Ok(Reply::embed(embed).ephemeral())
}

pub async fn remove_trigger<S: FactStore>(store: &S, trigger: &str) -> Reply {
  match try_remove_trigger(store, trigger).await {
    Ok(reply) => reply,
    Err(err) => {
      tracing::error!(trigger, error = %err, "remove_trigger failed");
      error_reply(format!(
        "An error occurred while removing the trigger '{trigger}'!"
      ))
    }
  }
}

async fn try_remove_trigger<S: FactStore>(
  store: &S,
  trigger: &str,
) -> Result<Reply> {
  match store.remove_trigger(trigger).await {
    Err(Error::TriggerNotFound(_)) => {
      return Ok(
        Reply::embed(Embed::new(
          "Trigger not found",
          format!("The trigger '{trigger}' was not found!"),
        ))
        .ephemeral(),
      );
    }
    other => other?,
  }

  Ok(
    Reply::embed(Embed::new(
      "Trigger removed",
      format!("The trigger '{trigger}' has been removed!"),
    ))
    .ephemeral(),
  )
}

// ─── Facts ───────────────────────────────────────────────────────────────────

pub async fn add_fact<S: FactStore>(
  store: &S,
  author_id: &str,
  category: &str,
  fact: &str,
) -> Reply {
  match try_add_fact(store, author_id, category, fact).await {
    Ok(reply) => reply,
    Err(err) => {
      tracing::error!(category, error = %err, "add_fact failed");
      error_reply(format!(
        "An error occurred while adding the fact to the '{category}' \
         category!"
      ))
    }
  }
}

async fn try_add_fact<S: FactStore>(
  store: &S,
  author_id: &str,
  category: &str,
  fact: &str,
) -> Result<Reply> {
  let category_did_exist = store.category_exists(category).await?;

  match store.add_fact(category, author_id, fact).await {
    Err(Error::DuplicateFact { .. }) => {
      return Ok(uh_oh(format!(
        "The fact already exists in the '{category}' category!"
      )));
    }
    other => other?,
  }

  let mut embed = Embed::new(
    "Fact added",
    format!("The fact has been added to the '{category}' category!"),
  );

  if !category_did_exist {
    embed = embed.field(
      "New category",
      "That category did not exist before, so it has been created.\n\
       This means the category has facts, but no triggers associated with \
       it.\n\
       You can add a trigger to the category using the /add_trigger command.",
    );
  } else if store.count_triggers(Some(category)).await? == 0 {
    embed = embed.field(
      "No triggers",
      "The category already existed, but it did not have any triggers \
       associated with it.\n\
       You can add a trigger to the category using the /add_trigger command.",
    );
  }

  Ok(Reply::embed(embed).ephemeral())
}

pub async fn remove_fact<S: FactStore>(store: &S, fact: &str) -> Reply {
  match store.remove_fact(fact).await {
    // Removing an absent fact is deliberately a silent success, unlike
    // remove_trigger.
    Ok(()) => Reply::embed(Embed::new(
      "Fact removed",
      "The fact has been deleted from the record.",
    ))
    .ephemeral(),
    Err(err) => {
      tracing::error!(error = %err, "remove_fact failed");
      error_reply("An error occurred while removing the fact!")
    }
  }
}

// ─── Listings ────────────────────────────────────────────────────────────────

pub async fn list_triggers<S: FactStore>(store: &S) -> Reply {
  match store.all_triggers().await {
    Ok(triggers) => {
      Reply::embed(Embed::new("All Triggers", triggers.join("\n"))).ephemeral()
    }
    Err(err) => {
      tracing::error!(error = %err, "list_triggers failed");
      error_reply("An error occurred while listing the triggers!")
    }
  }
}

pub async fn list_categories<S: FactStore>(store: &S) -> Reply {
  match store.all_categories().await {
    // One entry per trigger row; duplicates are intentional.
    Ok(categories) => {
      Reply::embed(Embed::new("All Categories", categories.join("\n")))
        .ephemeral()
    }
    Err(err) => {
      tracing::error!(error = %err, "list_categories failed");
      error_reply("An error occurred while listing the categories!")
    }
  }
}

pub async fn list_facts<S: FactStore>(store: &S) -> Reply {
  let grouped = match store.list_all_facts().await {
    Ok(grouped) => grouped,
    Err(err) => {
      tracing::error!(error = %err, "list_facts failed");
      return error_reply("An error occurred while listing the facts!");
    }
  };

  if grouped.is_empty() {
    return uh_oh("No facts were found in the database!");
  }

  let mut body = String::new();
  for group in &grouped {
    for fact in &group.facts {
      body.push_str(&format!("**{}**\n{}\n\n", group.category, fact));
    }
  }

  if body.chars().count() <= MAX_MESSAGE_CHARS {
    Reply::text(format!("Here's all the fun facts we have saved!\n\n{body}"))
  } else {
    Reply::text(
      "Here's all the fun facts we have saved! (Too long to send in a \
       message)",
    )
    .with_attachment(Attachment {
      filename: "fun_facts.txt".to_owned(),
      contents: body,
    })
  }
}

#[cfg(test)]
mod tests {
  use factry_store_sqlite::SqliteStore;

  use super::*;
  use crate::reply::ReplyBody;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory().await.unwrap()
  }

  fn embed_of(reply: &Reply) -> &Embed {
    match &reply.body {
      ReplyBody::Embed(embed) => embed,
      ReplyBody::Text(text) => panic!("expected embed, got text: {text}"),
    }
  }

  #[tokio::test]
  async fn adding_a_trigger_to_a_fresh_category_advises_adding_facts() {
    let store = store().await;

    let reply = add_trigger(&store, "u1", "train", "train").await;
    let embed = embed_of(&reply);

    assert!(reply.ephemeral);
    assert_eq!(embed.title, "Trigger added");
    assert_eq!(embed.fields.len(), 1);
    assert_eq!(embed.fields[0].name, "New category");
  }

  #[tokio::test]
  async fn adding_a_trigger_to_a_factless_category_warns() {
    let store = store().await;
    store.add_trigger("train", "train", "u1").await.unwrap();

    let reply = add_trigger(&store, "u1", "rail", "train").await;
    let embed = embed_of(&reply);

    assert_eq!(embed.title, "Trigger added");
    assert_eq!(embed.fields[0].name, "No facts");
  }

  #[tokio::test]
  async fn duplicate_trigger_is_reported_to_the_invoker() {
    let store = store().await;
    store.add_trigger("train", "train", "u1").await.unwrap();

    let reply = add_trigger(&store, "u2", "train", "rail").await;
    let embed = embed_of(&reply);

    assert!(reply.ephemeral);
    assert_eq!(embed.title, "Uh oh!");
    assert_eq!(embed.description, "The trigger already exists!");
  }

  #[tokio::test]
  async fn removing_a_missing_trigger_is_reported() {
    let store = store().await;

    let reply = remove_trigger(&store, "train").await;

    assert_eq!(embed_of(&reply).title, "Trigger not found");
  }

  #[tokio::test]
  async fn adding_a_fact_to_a_new_category_creates_it() {
    let store = store().await;

    let reply = add_fact(&store, "u1", "train", "Trains are fast.").await;
    let embed = embed_of(&reply);

    assert_eq!(embed.title, "Fact added");
    assert_eq!(embed.fields[0].name, "New category");
    assert!(store.fact_exists("train", "Trains are fast.").await.unwrap());
  }

  #[tokio::test]
  async fn duplicate_fact_is_reported_with_the_category() {
    let store = store().await;
    store.add_fact("train", "u1", "Trains are fast.").await.unwrap();

    let reply = add_fact(&store, "u2", "train", "Trains are fast.").await;
    let embed = embed_of(&reply);

    assert_eq!(embed.title, "Uh oh!");
    assert_eq!(
      embed.description,
      "The fact already exists in the 'train' category!"
    );
  }

  #[tokio::test]
  async fn removing_an_absent_fact_still_reports_success() {
    let store = store().await;

    let reply = remove_fact(&store, "Trains are slow.").await;

    assert_eq!(embed_of(&reply).title, "Fact removed");
  }

  #[tokio::test]
  async fn list_categories_keeps_one_entry_per_trigger() {
    let store = store().await;
    store.add_trigger("train", "train", "u1").await.unwrap();
    store.add_trigger("rail", "train", "u1").await.unwrap();

    let reply = list_categories(&store).await;
    let embed = embed_of(&reply);

    assert!(reply.ephemeral);
    assert_eq!(embed.title, "All Categories");
    assert_eq!(embed.description, "train\ntrain");
  }

  #[tokio::test]
  async fn list_facts_with_an_empty_store_says_so() {
    let store = store().await;

    let reply = list_facts(&store).await;

    assert_eq!(
      embed_of(&reply).description,
      "No facts were found in the database!"
    );
  }

  #[tokio::test]
  async fn short_fact_listings_go_out_as_plain_text() {
    let store = store().await;
    store.add_fact("train", "u1", "Trains are fast.").await.unwrap();

    let reply = list_facts(&store).await;

    match &reply.body {
      ReplyBody::Text(text) => {
        assert_eq!(
          text,
          "Here's all the fun facts we have saved!\n\n**train**\nTrains are \
           fast.\n\n"
        );
      }
      other => panic!("expected text, got {other:?}"),
    }
    assert!(reply.attachment.is_none());
  }

  #[tokio::test]
  async fn long_fact_listings_ship_as_an_attachment() {
    let store = store().await;
    for i in 0..40 {
      let fact = format!("Fact number {i} is {}.", "x".repeat(80));
      store.add_fact("train", "u1", &fact).await.unwrap();
    }

    let reply = list_facts(&store).await;

    let attachment = reply.attachment.as_ref().expect("attachment");
    assert_eq!(attachment.filename, "fun_facts.txt");
    assert!(attachment.contents.chars().count() > MAX_MESSAGE_CHARS);
  }
}
