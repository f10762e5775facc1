//! Social media assistant: comment replies, blog posts, post comments,
//! content moderation and platform chat, each backed by an OpenAI-compatible
//! chat completion API.
//!
//! [`assistant::Assistant`] holds the feature logic; [`web_server`] and the
//! `socialbot` binary bind it to a browser form UI and a CLI.

pub mod assistant;
pub mod chat;
pub mod completion;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod moderation;
pub mod prompts;
pub mod web_server;

pub use assistant::Assistant;
pub use config::Config;
pub use error::{AssistantError, Result};
pub use moderation::ModerationVerdict;
pub use prompts::PostLength;
