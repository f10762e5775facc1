//! Prompt templates for each assistant feature.
//!
//! Every feature sends a fixed system persona plus one user message. User
//! text is embedded as-is.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub const REPLY_SYSTEM: &str =
    "You are a helpful assistant for a social media website. Your job is to reply to comments.";
pub const BLOG_SYSTEM: &str = "You are an expert blog writer.";
pub const COMMENT_SYSTEM: &str =
    "You are a helpful assistant. Your job is to generate comments for social media posts.";
pub const MODERATION_SYSTEM: &str = "You are a content moderation AI.";
pub const CHAT_SYSTEM: &str = "You are a helpful assistant for a social media platform.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The system instruction and the user content for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePair {
    pub system: String,
    pub user: String,
}

impl MessagePair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Messages in wire order: system first, then user.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.user.clone(),
            },
        ]
    }
}

/// Requested blog post length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl PostLength {
    pub const ALL: [PostLength; 3] = [PostLength::Short, PostLength::Medium, PostLength::Long];

    /// Parse a length key, falling back to [`PostLength::Medium`] for
    /// anything unrecognised.
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostLength::Short => "short",
            PostLength::Medium => "medium",
            PostLength::Long => "long",
        }
    }

    pub fn descriptor(self) -> &'static str {
        match self {
            PostLength::Short => "a brief yet informative blog post",
            PostLength::Medium => "a detailed and engaging blog post",
            PostLength::Long => "an in-depth and comprehensive blog post",
        }
    }
}

impl FromStr for PostLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(PostLength::Short),
            "medium" => Ok(PostLength::Medium),
            "long" => Ok(PostLength::Long),
            other => Err(format!("unknown post length: {other:?}")),
        }
    }
}

impl fmt::Display for PostLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One prompt-worthy request, with its parameters.
#[derive(Debug, Clone, Copy)]
pub enum Task<'a> {
    Reply { comment: &'a str },
    Blog { topic: &'a str, length: PostLength },
    CommentForPost { content: &'a str },
    Moderation { content: &'a str },
    Chat { message: &'a str },
}

pub fn build_prompt(task: Task<'_>) -> MessagePair {
    match task {
        Task::Reply { comment } => MessagePair::new(REPLY_SYSTEM, comment),
        Task::Blog { topic, length } => MessagePair::new(
            BLOG_SYSTEM,
            format!(
                "Write {} on the topic: {}. Ensure it is engaging and relevant.",
                length.descriptor(),
                topic
            ),
        ),
        Task::CommentForPost { content } => MessagePair::new(
            COMMENT_SYSTEM,
            format!(
                "Here is the content of the post: {}\nPlease generate a relevant comment.",
                content
            ),
        ),
        Task::Moderation { content } => MessagePair::new(MODERATION_SYSTEM, moderation_rubric(content)),
        Task::Chat { message } => MessagePair::new(CHAT_SYSTEM, message),
    }
}

fn moderation_rubric(content: &str) -> String {
    format!(
        "You are a content moderation AI. Review the following content and determine if it \
        adheres to the community guidelines.\n\n\
        Content: {}\n\n\
        Answer in exactly this format and nothing else:\n\
        Verdict: Appropriate or Inappropriate\n\
        Explanation: a brief explanation of your decision\n\n\
        Use \"Appropriate\" if the content is suitable and \"Inappropriate\" if it violates the guidelines.",
        content
    )
}
