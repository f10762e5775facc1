// Interactive chat on the terminal.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::assistant::Assistant;

/// Read messages line by line and answer each one until EOF or an empty line.
///
/// A failed request is reported and the session continues.
pub async fn run_chat<R, W>(assistant: &Assistant, input: R, mut output: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Starting chat session...");
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        write!(output, "You: ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        match assistant.chat(message).await {
            Ok(reply) => {
                writeln!(output, "Bot: {}", reply.trim())?;
                answered += 1;
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                writeln!(output, "Error: {}", e)?;
            }
        }
    }

    writeln!(output)?;
    info!(answered, "Chat session finished");
    Ok(answered)
}
