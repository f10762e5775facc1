use anyhow::{Context, Result};
use clap::{builder::TypedValueParser, Parser};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};

use socialbot::assistant::{format_comments, Assistant};
use socialbot::config::Config;
use socialbot::prompts::PostLength;
use socialbot::{chat, web_server};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Model identifier sent to the completion API (overrides SOCIALBOT_MODEL).
    #[arg(long, global = true)]
    model: Option<String>,
    /// Base URL of the OpenAI-compatible API (overrides OPENAI_BASE_URL).
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the web UI.
    Serve {
        #[arg(long, env = "SOCIALBOT_PORT", default_value_t = 7860, help = "Port for the web server.")]
        port: u16,
    },
    /// Generate a reply to a social media comment.
    Reply {
        comment: String,
    },
    /// Write a blog post on a topic.
    Blog {
        topic: String,
        #[arg(long, value_enum, default_value_t = LengthArg::Medium)]
        length: LengthArg,
    },
    /// Generate comments for the post at a URL.
    Comments {
        url: String,
        #[arg(long, default_value_t = web_server::DEFAULT_COMMENTS,
              value_parser = clap::value_parser!(u8).range(1..=9).map(usize::from))]
        count: usize,
    },
    /// Check whether the post at a URL is appropriate.
    Moderate {
        url: String,
    },
    /// Chat with the platform assistant on the terminal.
    Chat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LengthArg {
    Short,
    Medium,
    Long,
}

impl From<LengthArg> for PostLength {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::Short => PostLength::Short,
            LengthArg::Medium => PostLength::Medium,
            LengthArg::Long => PostLength::Long,
        }
    }
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,socialbot=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Fail fast on a missing credential, before any request is attempted.
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base.trim_end_matches('/').to_string();
    }
    info!(?config, "Configuration loaded");

    let assistant = Assistant::new(&config).context("Failed to initialize assistant")?;

    match cli.command {
        Commands::Serve { port } => {
            info!("Starting web UI on port {}...", port);
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl-C: {:?}", e);
                }
                info!("Ctrl-C received, initiating shutdown...");
            };
            web_server::start_web_server(port, Arc::new(assistant), &config, shutdown).await?;
            info!("Shutdown complete.");
        }
        Commands::Reply { comment } => {
            let reply = assistant.reply(&comment).await?;
            println!("{}", reply);
        }
        Commands::Blog { topic, length } => {
            let post = assistant.write_post(&topic, length.into()).await?;
            println!("{}", post);
        }
        Commands::Comments { url, count } => {
            let comments = assistant.comments_for(&url, count).await?;
            println!("{}", format_comments(&comments));
        }
        Commands::Moderate { url } => {
            let verdict = assistant.moderate(&url).await?;
            println!("{}", verdict);
        }
        Commands::Chat => {
            let stdin = BufReader::new(tokio::io::stdin());
            chat::run_chat(&assistant, stdin, std::io::stdout())
                .await
                .context("Chat session failed")?;
        }
    }

    Ok(())
}
