//! Input record schema. Only the fields the splitter reads are declared; serde ignores the rest.
//!
//! Nodes that end up in a tree (post, top-level comments, sub-comments, reposts) need
//! `id`, `user.id` and `user.screen_name`. Comments nested deeper are only counted and
//! need just `user.id`. A record missing a required field fails to decode as a whole
//! and never reaches counting or output.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Prefix marking a comment or repost whose body is an image placeholder.
pub const IMAGE_COMMENT_MARKER: &str = "图片评论";

/// Fast-path view used by the timestamp scan: just `created_at`.
#[derive(Debug, Deserialize)]
pub struct TimestampProbe {
    #[serde(default)]
    pub created_at: Option<Value>,
}

impl TimestampProbe {
    pub fn created_at_str(&self) -> Option<&str> {
        self.created_at.as_ref().and_then(Value::as_str)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserRef {
    pub id: Value,
    pub screen_name: Value,
}

impl UserRef {
    /// Stringified id used for interaction keys and profile lookups.
    pub fn key(&self) -> String {
        user_key(&self.id)
    }
}

/// `reply_comment` of a sub-comment. A missing `id` means "the enclosing top-level comment".
#[derive(Clone, Debug, Deserialize)]
pub struct ReplyRef {
    #[serde(default)]
    pub id: Option<Value>,
}

/// Author of a comment that is only counted, never built into a node.
#[derive(Clone, Debug, Deserialize)]
pub struct InteractorRef {
    pub id: Value,
}

/// Top-level comment. Built into a node at depth 1.
#[derive(Clone, Debug, Deserialize)]
pub struct Comment {
    pub id: Value,
    pub user: UserRef,
    #[serde(default)]
    pub text_raw: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<SubComment>,
}

/// Sub-comment nested one level under a top-level comment. Built into a node and
/// attached through `reply_comment`.
#[derive(Clone, Debug, Deserialize)]
pub struct SubComment {
    pub id: Value,
    pub user: UserRef,
    #[serde(default)]
    pub text_raw: Option<String>,
    #[serde(default)]
    pub reply_comment: Option<ReplyRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<NestedComment>,
}

/// Anything nested below a sub-comment. Only counted, so only `user.id` is required.
#[derive(Clone, Debug, Deserialize)]
pub struct NestedComment {
    pub user: InteractorRef,
    #[serde(default)]
    pub text_raw: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<NestedComment>,
}

impl Comment {
    pub fn text(&self) -> &str {
        self.text_raw.as_deref().unwrap_or("")
    }

    pub fn is_image(&self) -> bool {
        is_image_comment(self.text())
    }
}

impl SubComment {
    pub fn text(&self) -> &str {
        self.text_raw.as_deref().unwrap_or("")
    }

    pub fn is_image(&self) -> bool {
        is_image_comment(self.text())
    }

    /// Explicit reply target, if the input carries one.
    pub fn reply_target(&self) -> Option<&Value> {
        self.reply_comment.as_ref().and_then(|r| r.id.as_ref())
    }
}

impl NestedComment {
    pub fn text(&self) -> &str {
        self.text_raw.as_deref().unwrap_or("")
    }

    pub fn is_image(&self) -> bool {
        is_image_comment(self.text())
    }

    pub fn interactor_key(&self) -> String {
        user_key(&self.user.id)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Repost {
    pub id: Value,
    pub user: UserRef,
    #[serde(default)]
    pub text_law: Option<String>,
    #[serde(default)]
    pub text_raw: Option<String>,
}

impl Repost {
    /// `text_law` wins over `text_raw` when both are present.
    pub fn text(&self) -> &str {
        self.text_law
            .as_deref()
            .or(self.text_raw.as_deref())
            .unwrap_or("")
    }

    pub fn is_image(&self) -> bool {
        is_image_comment(self.text())
    }
}

/// One root post with its comment thread and reposts.
#[derive(Clone, Debug, Deserialize)]
pub struct Record {
    pub id: Value,
    pub user: UserRef,
    #[serde(default)]
    pub text_raw: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reposts: Vec<Repost>,
}

impl Record {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn author_key(&self) -> String {
        self.user.key()
    }

    pub fn text(&self) -> &str {
        self.text_raw.as_deref().unwrap_or("")
    }
}

/// `"comments": null` reads the same as an absent list.
fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

pub fn is_image_comment(text: &str) -> bool {
    text.trim().starts_with(IMAGE_COMMENT_MARKER)
}

/// Stringify a user id: strings as-is, anything else as its JSON text (`123` -> `"123"`).
pub fn user_key(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Identity key for comment ids. Type-sensitive: the number `5` and the string `"5"`
/// are different comments.
pub fn id_key(v: &Value) -> String {
    v.to_string()
}
