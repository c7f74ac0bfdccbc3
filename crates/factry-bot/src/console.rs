//! Line-oriented console session — the local stand-in for a chat transport.
//!
//! `/`-prefixed lines are curation commands mirroring the bot's slash-command
//! surface; anything else is treated as an ordinary inbound message.

use factry_core::store::FactStore;

use crate::{
  commands,
  reply::{Reply, ReplyBody},
};

/// Author identity attached to everything typed into the console.
pub const CONSOLE_AUTHOR: &str = "console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  AddTrigger { trigger: String, category: String },
  RemoveTrigger { trigger: String },
  AddFact { category: String, fact: String },
  RemoveFact { fact: String },
  ListTriggers,
  ListCategories,
  ListFacts,
}

/// Parse a `/`-prefixed console line.
///
/// Returns `None` when the line is not a command at all, `Some(Err(usage))`
/// when it is a malformed or unknown one.
pub fn parse_command(line: &str) -> Option<Result<Command, String>> {
  let rest = line.trim().strip_prefix('/')?;
  let mut parts = rest.split_whitespace();
  let name = parts.next().unwrap_or("");

  let parsed = match name {
    "add_trigger" => match (parts.next(), parts.next()) {
      (Some(trigger), Some(category)) => Ok(Command::AddTrigger {
        trigger:  trigger.to_owned(),
        category: category.to_owned(),
      }),
      _ => Err("usage: /add_trigger <trigger> <category>".to_owned()),
    },
    "rm_trigger" => match parts.next() {
      Some(trigger) => {
        Ok(Command::RemoveTrigger { trigger: trigger.to_owned() })
      }
      None => Err("usage: /rm_trigger <trigger>".to_owned()),
    },
    "add_fact" => {
      let category = parts.next();
      let fact = parts.collect::<Vec<_>>().join(" ");
      match category {
        Some(category) if !fact.is_empty() => Ok(Command::AddFact {
          category: category.to_owned(),
          fact,
        }),
        _ => Err("usage: /add_fact <category> <fact text>".to_owned()),
      }
    }
    "rm_fact" => {
      let fact = parts.collect::<Vec<_>>().join(" ");
      if fact.is_empty() {
        Err("usage: /rm_fact <fact text>".to_owned())
      } else {
        Ok(Command::RemoveFact { fact })
      }
    }
    "list_triggers" => Ok(Command::ListTriggers),
    "list_categories" => Ok(Command::ListCategories),
    "list_facts" => Ok(Command::ListFacts),
    other => Err(format!("unknown command: /{other}")),
  };

  Some(parsed)
}

/// Run one parsed command against the store.
pub async fn dispatch<S: FactStore>(
  store: &S,
  author_id: &str,
  command: Command,
) -> Reply {
  match command {
    Command::AddTrigger { trigger, category } => {
      commands::add_trigger(store, author_id, &trigger, &category).await
    }
    Command::RemoveTrigger { trigger } => {
      commands::remove_trigger(store, &trigger).await
    }
    Command::AddFact { category, fact } => {
      commands::add_fact(store, author_id, &category, &fact).await
    }
    Command::RemoveFact { fact } => commands::remove_fact(store, &fact).await,
    Command::ListTriggers => commands::list_triggers(store).await,
    Command::ListCategories => commands::list_categories(store).await,
    Command::ListFacts => commands::list_facts(store).await,
  }
}

/// Render a reply as console text.
pub fn render(reply: &Reply) -> String {
  let mut out = String::new();

  match &reply.body {
    ReplyBody::Text(text) => out.push_str(text),
    ReplyBody::Embed(embed) => {
      out.push_str(&format!("== {} ==\n{}", embed.title, embed.description));
      for field in &embed.fields {
        out.push_str(&format!("\n\n[{}]\n{}", field.name, field.value));
      }
      if let Some(footer) = &embed.footer {
        out.push_str(&format!("\n-- {footer}"));
      }
    }
  }

  if let Some(attachment) = &reply.attachment {
    out.push_str(&format!(
      "\n(attached {})\n{}",
      attachment.filename, attachment.contents
    ));
  }

  if reply.ephemeral {
    out.push_str("\n(visible only to you)");
  }

  out
}

#[cfg(test)]
mod tests {
  use super::{Command, parse_command};

  #[test]
  fn non_slash_lines_are_not_commands() {
    assert!(parse_command("i love trains").is_none());
  }

  #[test]
  fn add_trigger_round_trips() {
    assert_eq!(
      parse_command("/add_trigger train rail").unwrap().unwrap(),
      Command::AddTrigger {
        trigger:  "train".to_owned(),
        category: "rail".to_owned(),
      }
    );
  }

  #[test]
  fn add_fact_keeps_the_full_fact_text() {
    assert_eq!(
      parse_command("/add_fact train Trains are fast.").unwrap().unwrap(),
      Command::AddFact {
        category: "train".to_owned(),
        fact:     "Trains are fast.".to_owned(),
      }
    );
  }

  #[test]
  fn rm_fact_requires_text() {
    assert!(parse_command("/rm_fact").unwrap().is_err());
    assert_eq!(
      parse_command("/rm_fact Trains are fast.").unwrap().unwrap(),
      Command::RemoveFact { fact: "Trains are fast.".to_owned() }
    );
  }

  #[test]
  fn listings_parse() {
    assert_eq!(
      parse_command("/list_triggers").unwrap().unwrap(),
      Command::ListTriggers
    );
    assert_eq!(
      parse_command("/list_categories").unwrap().unwrap(),
      Command::ListCategories
    );
    assert_eq!(
      parse_command("/list_facts").unwrap().unwrap(),
      Command::ListFacts
    );
  }

  #[test]
  fn unknown_commands_report_usage() {
    assert!(parse_command("/frobnicate").unwrap().is_err());
  }
}
