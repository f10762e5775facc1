use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    serve, Form, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::{Deserialize, Serialize};
use std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::assistant::{format_comments, Assistant};
use crate::config::Config;
use crate::error::AssistantError;
use crate::prompts::PostLength;

pub const MIN_COMMENTS: usize = 1;
pub const MAX_COMMENTS: usize = 9;
pub const DEFAULT_COMMENTS: usize = 4;

/// The five feature tabs of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Reply,
    Blog,
    Comments,
    Moderate,
    Chat,
}

impl Tab {
    fn output_label(self) -> &'static str {
        match self {
            Tab::Reply => "Generated Reply:",
            Tab::Blog => "Generated Blog Post:",
            Tab::Comments => "Generated Comments:",
            Tab::Moderate => "Moderation Result:",
            Tab::Chat => "Bot's response:",
        }
    }
}

// Shared application state
#[derive(Clone)]
struct AppState {
    templates: Arc<AutoReloader>,
    assistant: Arc<Assistant>,
}

/// Everything the page template needs: the active tab, the inputs to
/// redisplay, and the outcome of the last submission.
#[derive(Debug, Serialize)]
struct PageView {
    title: &'static str,
    active: Tab,
    output_label: &'static str,
    comment: String,
    topic: String,
    length: PostLength,
    lengths: [PostLength; 3],
    post_url: String,
    count: usize,
    min_count: usize,
    max_count: usize,
    moderation_url: String,
    message: String,
    output: Option<String>,
    error: Option<String>,
}

impl PageView {
    fn new(active: Tab) -> Self {
        Self {
            title: "Social Media Assistant Bot",
            active,
            output_label: active.output_label(),
            comment: String::new(),
            topic: String::new(),
            length: PostLength::Short,
            lengths: PostLength::ALL,
            post_url: String::new(),
            count: DEFAULT_COMMENTS,
            min_count: MIN_COMMENTS,
            max_count: MAX_COMMENTS,
            moderation_url: String::new(),
            message: String::new(),
            output: None,
            error: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TabQuery {
    #[serde(default)]
    tab: Tab,
}

#[derive(Debug, Deserialize)]
struct ReplyForm {
    comment: String,
}

#[derive(Debug, Deserialize)]
struct BlogForm {
    topic: String,
    #[serde(default)]
    length: String,
}

#[derive(Debug, Deserialize)]
struct CommentsForm {
    url: String,
    #[serde(default)]
    count: Option<String>,
}

impl CommentsForm {
    /// The requested count within range. Missing or unparseable input
    /// falls back to the default instead of rejecting the form.
    fn count(&self) -> usize {
        self.count
            .as_deref()
            .map(str::trim)
            .and_then(|count| count.parse::<usize>().ok())
            .unwrap_or(DEFAULT_COMMENTS)
            .clamp(MIN_COMMENTS, MAX_COMMENTS)
    }
}

#[derive(Debug, Deserialize)]
struct ModerateForm {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatForm {
    message: String,
}

/// HTTP status shown alongside a failed request.
pub fn error_status(err: &AssistantError) -> StatusCode {
    match err {
        AssistantError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AssistantError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssistantError::Fetch { .. } | AssistantError::Upstream(_) | AssistantError::Parse(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

// Minijinja Environment setup
fn create_minijinja_env(template_dir: PathBuf) -> AutoReloader {
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&template_dir));
        // Watch the templates directory for changes
        notifier.watch_path(&template_dir, true);
        Ok(env)
    })
}

impl AppState {
    fn render(&self, status: StatusCode, view: &PageView) -> (StatusCode, Html<String>) {
        let rendered = self.templates.acquire_env().and_then(|env| {
            env.get_template("index.html")
                .and_then(|tmpl| tmpl.render(view))
        });
        match rendered {
            Ok(body) => (status, Html(body)),
            Err(e) => {
                error!("Failed to get or render template: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(format!("Internal Server Error: {}", e)),
                )
            }
        }
    }

    /// Render the page with a feature's outcome in its tab.
    fn render_outcome(
        &self,
        mut view: PageView,
        outcome: Result<String, AssistantError>,
    ) -> (StatusCode, Html<String>) {
        match outcome {
            Ok(text) => {
                view.output = Some(text);
                self.render(StatusCode::OK, &view)
            }
            Err(e) => {
                warn!(error = %e, tab = ?view.active, "Request failed");
                let status = error_status(&e);
                view.error = Some(e.to_string());
                self.render(status, &view)
            }
        }
    }
}

async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<TabQuery>,
) -> (StatusCode, Html<String>) {
    state.render(StatusCode::OK, &PageView::new(query.tab))
}

async fn reply_handler(
    State(state): State<AppState>,
    Form(form): Form<ReplyForm>,
) -> (StatusCode, Html<String>) {
    let outcome = state.assistant.reply(&form.comment).await;
    let mut view = PageView::new(Tab::Reply);
    view.comment = form.comment;
    state.render_outcome(view, outcome)
}

async fn blog_handler(
    State(state): State<AppState>,
    Form(form): Form<BlogForm>,
) -> (StatusCode, Html<String>) {
    let length = PostLength::from_key(&form.length);
    let outcome = state.assistant.write_post(&form.topic, length).await;
    let mut view = PageView::new(Tab::Blog);
    view.topic = form.topic;
    view.length = length;
    state.render_outcome(view, outcome)
}

async fn comments_handler(
    State(state): State<AppState>,
    Form(form): Form<CommentsForm>,
) -> (StatusCode, Html<String>) {
    let count = form.count();
    let outcome = state
        .assistant
        .comments_for(&form.url, count)
        .await
        .map(|comments| format_comments(&comments));
    let mut view = PageView::new(Tab::Comments);
    view.post_url = form.url;
    view.count = count;
    state.render_outcome(view, outcome)
}

async fn moderate_handler(
    State(state): State<AppState>,
    Form(form): Form<ModerateForm>,
) -> (StatusCode, Html<String>) {
    let outcome = state
        .assistant
        .moderate(&form.url)
        .await
        .map(|verdict| verdict.to_string());
    let mut view = PageView::new(Tab::Moderate);
    view.moderation_url = form.url;
    state.render_outcome(view, outcome)
}

async fn chat_handler(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> (StatusCode, Html<String>) {
    let outcome = state.assistant.chat(&form.message).await;
    let mut view = PageView::new(Tab::Chat);
    view.message = form.message;
    state.render_outcome(view, outcome)
}

/// Build the application router.
pub fn router(assistant: Arc<Assistant>, config: &Config) -> Router {
    let state = AppState {
        templates: Arc::new(create_minijinja_env(config.template_dir.clone())),
        assistant,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/reply", post(reply_handler))
        .route("/blog", post(blog_handler))
        .route("/comments", post(comments_handler))
        .route("/moderate", post(moderate_handler))
        .route("/chat", post(chat_handler))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http()) // Add request logging
}

/// Serve the UI on `port` until `shutdown` resolves.
pub async fn start_web_server<F>(
    port: u16,
    assistant: Arc<Assistant>,
    config: &Config,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(assistant, config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server failed")?;

    Ok(())
}
