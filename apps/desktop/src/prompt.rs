//! Edit prompt over the shared stdin reader.

use std::{io::Write, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use element_store::{EditPrompt, EditRequest};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};
use tracing::warn;

pub type SharedLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> SharedLines {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

pub async fn next_line(lines: &SharedLines) -> Result<Option<String>> {
    Ok(lines.lock().await.next_line().await?)
}

/// Reads the replacement value from one stdin line. An empty line or end of
/// input cancels the edit.
pub struct StdinPrompt {
    lines: SharedLines,
}

impl StdinPrompt {
    pub fn new(lines: SharedLines) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl EditPrompt for StdinPrompt {
    async fn prompt(&self, request: EditRequest) -> Option<String> {
        print!("{} [{}] (empty line cancels): ", request.title, request.value);
        let _ = std::io::stdout().flush();

        match next_line(&self.lines).await {
            Ok(Some(line)) if !line.is_empty() => Some(line),
            Ok(_) => None,
            Err(err) => {
                warn!("failed to read edit value: {err}");
                None
            }
        }
    }
}
