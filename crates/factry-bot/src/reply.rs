//! Reply payloads handed to the chat transport.
//!
//! The transport contract is "deliver text or a rich embed, optionally with
//! one file attachment, optionally visible only to the invoker". These types
//! are serde-serialisable so any transport can encode them.

use serde::{Deserialize, Serialize};

/// Dark-theme embed colour used across all bot replies.
pub const COLOURLESS: u32 = 0x2b2d31;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
  pub name:  String,
  pub value: String,
}

/// A title/description/colour/footer/fields reply structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
  pub title:       String,
  pub description: String,
  pub colour:      u32,
  pub footer:      Option<String>,
  pub fields:      Vec<EmbedField>,
}

impl Embed {
  pub fn new(
    title: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      colour:      COLOURLESS,
      footer:      None,
      fields:      Vec::new(),
    }
  }

  pub fn footer(mut self, text: impl Into<String>) -> Self {
    self.footer = Some(text.into());
    self
  }

  pub fn field(
    mut self,
    name: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.fields.push(EmbedField { name: name.into(), value: value.into() });
    self
  }
}

/// A single text file shipped alongside a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
  pub filename: String,
  pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyBody {
  Text(String),
  Embed(Embed),
}

/// An outbound reply, ready for the transport to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
  pub body:       ReplyBody,
  pub attachment: Option<Attachment>,
  /// Visible only to the invoking user.
  pub ephemeral:  bool,
}

impl Reply {
  pub fn text(body: impl Into<String>) -> Self {
    Self {
      body:       ReplyBody::Text(body.into()),
      attachment: None,
      ephemeral:  false,
    }
  }

  pub fn embed(embed: Embed) -> Self {
    Self {
      body:       ReplyBody::Embed(embed),
      attachment: None,
      ephemeral:  false,
    }
  }

  pub fn ephemeral(mut self) -> Self {
    self.ephemeral = true;
    self
  }

  pub fn with_attachment(mut self, attachment: Attachment) -> Self {
    self.attachment = Some(attachment);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::{COLOURLESS, Embed, Reply, ReplyBody};

  #[test]
  fn embed_builder_fills_defaults() {
    let embed = Embed::new("Trigger added", "done").footer("note");
    assert_eq!(embed.colour, COLOURLESS);
    assert_eq!(embed.footer.as_deref(), Some("note"));
    assert!(embed.fields.is_empty());
  }

  #[test]
  fn replies_serialize_for_transports() {
    let reply = Reply::embed(Embed::new("All Triggers", "train")).ephemeral();
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["ephemeral"], true);
    assert_eq!(json["body"]["Embed"]["title"], "All Triggers");
  }

  #[test]
  fn text_replies_are_public_by_default() {
    let reply = Reply::text("hello");
    assert!(!reply.ephemeral);
    assert!(matches!(reply.body, ReplyBody::Text(ref t) if t == "hello"));
  }
}
