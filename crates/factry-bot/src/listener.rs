//! Inbound-message handling: run the trigger matcher, render the embed.

use factry_core::{matcher, store::FactStore};

use crate::reply::{Embed, Reply};

/// An inbound chat message as the transport delivers it.
#[derive(Debug, Clone)]
pub struct InboundMessage {
  pub content:       String,
  pub author_id:     String,
  pub author_is_bot: bool,
}

/// Handle one inbound message; at most one reply per message.
///
/// Matching failures are logged and silently drop the reply rather than
/// spamming chat with errors.
pub async fn on_message<S: FactStore>(
  store: &S,
  message: &InboundMessage,
) -> Option<Reply> {
  if message.author_is_bot {
    return None;
  }

  match matcher::resolve(store, &message.content).await {
    Ok(Some(matched)) => {
      let description = format!(
        "{}\n\n*This fact was contributed by <@{}>!*",
        matched.body, matched.contributor
      );
      Some(Reply::embed(Embed::new(matched.trigger, description)))
    }
    Ok(None) => None,
    Err(err) => {
      tracing::error!(
        author = %message.author_id,
        error = %err,
        "trigger matching failed; dropping reply"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use factry_store_sqlite::SqliteStore;

  use super::*;
  use crate::reply::ReplyBody;

  fn message(content: &str) -> InboundMessage {
    InboundMessage {
      content:       content.to_owned(),
      author_id:     "u1".to_owned(),
      author_is_bot: false,
    }
  }

  async fn seeded_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.add_trigger("train", "train", "u1").await.unwrap();
    store.add_fact("train", "u2", "Trains are fast.").await.unwrap();
    store
  }

  #[tokio::test]
  async fn matched_messages_get_an_attributed_embed() {
    let store = seeded_store().await;

    let reply = on_message(&store, &message("i love trains")).await.unwrap();

    match reply.body {
      ReplyBody::Embed(embed) => {
        assert_eq!(embed.title, "train");
        assert_eq!(
          embed.description,
          "Fun train fact! Trains are fast.\n\n*This fact was contributed \
           by <@u2>!*"
        );
      }
      other => panic!("expected embed, got {other:?}"),
    }
    assert!(!reply.ephemeral);
  }

  #[tokio::test]
  async fn unmatched_messages_get_no_reply() {
    let store = seeded_store().await;

    assert!(on_message(&store, &message("hello world")).await.is_none());
  }

  #[tokio::test]
  async fn bot_authors_are_ignored() {
    let store = seeded_store().await;

    let mut msg = message("i love trains");
    msg.author_is_bot = true;

    assert!(on_message(&store, &msg).await.is_none());
  }

  #[tokio::test]
  async fn matcher_errors_drop_the_reply() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    // A trigger whose category has no facts ends in a lookup error once the
    // sentinel body fails author resolution.
    store.add_trigger("train", "train", "u1").await.unwrap();

    assert!(on_message(&store, &message("i love trains")).await.is_none());
  }
}
