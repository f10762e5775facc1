//! The assistant features, independent of any UI.
//!
//! Each method is one stateless round trip (or a fixed number of them for
//! comment batches): fetch and extract if a URL is involved, build the
//! prompt, call the completion API, parse the reply.

use std::future::Future;

use futures::future::try_join_all;
use tracing::{info, instrument, warn};

use crate::completion::CompletionClient;
use crate::config::Config;
use crate::error::{AssistantError, Result};
use crate::extractor::extract_text;
use crate::fetcher::PageFetcher;
use crate::moderation::{parse_verdict, ModerationVerdict};
use crate::prompts::{build_prompt, MessagePair, PostLength, Task};

/// Returned as the only entry of a comment batch when the post has no text.
pub const NO_CONTENT_MESSAGE: &str = "Could not fetch post content.";

#[derive(Debug, Clone)]
pub struct Assistant {
    fetcher: PageFetcher,
    completions: CompletionClient,
    model: String,
}

impl Assistant {
    pub fn new(config: &Config) -> Result<Self> {
        info!(model = %config.model, api_base = %config.api_base, "Initializing assistant");
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            completions: CompletionClient::new(config)?,
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &MessagePair) -> Result<String> {
        self.completions.complete(messages, &self.model).await
    }

    /// Generate a reply to a social media comment.
    #[instrument(skip(self, comment))]
    pub async fn reply(&self, comment: &str) -> Result<String> {
        info!("Generating comment reply");
        self.complete(&build_prompt(Task::Reply { comment })).await
    }

    /// Write a blog post on `topic`.
    #[instrument(skip(self))]
    pub async fn write_post(&self, topic: &str, length: PostLength) -> Result<String> {
        info!("Writing blog post");
        self.complete(&build_prompt(Task::Blog { topic, length })).await
    }

    /// Fetch the page at `url` and return its visible text (possibly empty).
    #[instrument(skip(self))]
    pub async fn fetch_post_content(&self, url: &str) -> Result<String> {
        let markup = self.fetcher.fetch(url).await?;
        Ok(extract_text(&markup))
    }

    /// Generate `count` independent comments for the post at `url`, in
    /// request order.
    ///
    /// If the page has no visible text the batch is the single entry
    /// [`NO_CONTENT_MESSAGE`] and no completion is requested.
    #[instrument(skip(self))]
    pub async fn comments_for(&self, url: &str, count: usize) -> Result<Vec<String>> {
        let content = self.fetch_post_content(url).await?;
        if content.is_empty() {
            warn!("Post has no extractable content");
            return Ok(vec![NO_CONTENT_MESSAGE.to_string()]);
        }

        info!(count, "Generating comments for post");
        let prompt = build_prompt(Task::CommentForPost { content: &content });
        in_request_order(count, |_| self.complete(&prompt)).await
    }

    /// Moderate the post at `url`.
    #[instrument(skip(self))]
    pub async fn moderate(&self, url: &str) -> Result<ModerationVerdict> {
        let content = self.fetch_post_content(url).await?;
        if content.is_empty() {
            return Err(AssistantError::Extraction(format!("no visible text at {url}")));
        }
        self.moderate_content(&content).await
    }

    /// Moderate text that is already at hand.
    #[instrument(skip(self, content))]
    pub async fn moderate_content(&self, content: &str) -> Result<ModerationVerdict> {
        info!("Checking content appropriateness");
        let reply = self.complete(&build_prompt(Task::Moderation { content })).await?;
        let verdict = parse_verdict(&reply)?;
        info!(appropriate = verdict.appropriate, "Moderation verdict");
        Ok(verdict)
    }

    /// Answer a question about the platform.
    #[instrument(skip(self, message))]
    pub async fn chat(&self, message: &str) -> Result<String> {
        info!("Answering chat message");
        self.complete(&build_prompt(Task::Chat { message })).await
    }
}

/// Run `count` requests concurrently. Results are indexed by request, not by
/// completion time, and the first failure fails the batch.
async fn in_request_order<T, F, Fut>(count: usize, request: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    try_join_all((0..count).map(request)).await
}

/// Render a comment batch as numbered blocks separated by blank lines.
pub fn format_comments(comments: &[String]) -> String {
    comments
        .iter()
        .enumerate()
        .map(|(i, comment)| format!("Comment {}:\n{}", i + 1, comment))
        .collect::<Vec<_>>()
        .join("\n\n")
}
