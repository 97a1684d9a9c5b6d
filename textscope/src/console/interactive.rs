use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

use crate::shared::prelude::STDOUT_WRITER;

/// Input that ends the session, compared case-insensitively.
pub const QUIT_SENTINEL: &str = "quit";

const PROMPT: &str = "\nEnter some text (\"quit\" to stop)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    AwaitingInput,
    Terminated,
}

/// One round of analysis over a line of console input. Implementations log
/// their own results and must not fail the loop.
#[automock]
#[async_trait]
pub trait InputHandler: Send + Sync {
    async fn handle(&self, text: &str);
}

/// Reads lines until the quit sentinel or end of input, handing every other
/// line to the handler.
pub async fn interactive_loop<T>(handler: &dyn InputHandler, input: T) -> Result<()>
where
    T: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut state = LoopState::AwaitingInput;

    while state == LoopState::AwaitingInput {
        writeln!(STDOUT_WRITER.write().await, "{}", PROMPT)?;
        state = match lines.next_line().await? {
            None => LoopState::Terminated,
            Some(line) if line.trim().eq_ignore_ascii_case(QUIT_SENTINEL) => LoopState::Terminated,
            Some(line) => {
                handler.handle(&line).await;
                LoopState::AwaitingInput
            }
        };
    }

    debug!("Console session ended");
    Ok(())
}
