use std::future::Future;
use std::time::Duration;

use crate::common::PageError;
use crate::config::Selectors;

use super::page::MessageNode;

const HTML_LOG_LIMIT: usize = 200;

/// Raw field values read from one message node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub raw_timestamp: String,
    pub username: Option<String>,
    pub message: Option<String>,
}

/// Reads timestamp, username and message text from chat entry nodes.
///
/// The overlay inserts a node before its text is filled in, so an empty
/// field is re-read a few times. A field whose element is missing is not.
#[derive(Debug, Clone)]
pub struct MessageExtractor {
    selectors: Selectors,
    attempts: u32,
    retry_delay: Duration,
}

impl MessageExtractor {
    pub fn new(selectors: Selectors, attempts: u32, retry_delay: Duration) -> Self {
        Self {
            selectors,
            attempts,
            retry_delay,
        }
    }

    pub async fn extract<N: MessageNode>(&self, node: &N) -> Result<ExtractedFields, PageError> {
        match node.inner_html().await {
            Ok(html) => log::debug!("Raw HTML: {}...", truncate(&html, HTML_LOG_LIMIT)),
            Err(err) => log::debug!("Raw HTML unavailable: {err}"),
        }

        let raw_timestamp = self
            .read_field(node, &self.selectors.timestamp)
            .await?
            .unwrap_or_default();
        log::debug!("Raw timestamp: '{raw_timestamp}'");

        let username = self.read_field(node, &self.selectors.username).await?;
        log::debug!("Raw username: {username:?}");

        let message = self.read_field(node, &self.selectors.message).await?;
        log::debug!("Raw message: {message:?}");

        Ok(ExtractedFields {
            raw_timestamp,
            username,
            message,
        })
    }

    async fn read_field<N: MessageNode>(
        &self,
        node: &N,
        selector: &str,
    ) -> Result<Option<String>, PageError> {
        retry_text(self.attempts, self.retry_delay, || node.child_text(selector)).await
    }
}

/// Calls `read` until it yields non-empty text, at most `attempts` times.
///
/// `Ok(None)` from `read` means the element is absent and ends the loop at
/// once. When every attempt yields empty text the last (empty) value is
/// returned.
pub async fn retry_text<F, Fut>(
    attempts: u32,
    delay: Duration,
    mut read: F,
) -> Result<Option<String>, PageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<String>, PageError>>,
{
    let attempts = attempts.max(1);
    let mut last = String::new();
    for attempt in 1..=attempts {
        match read().await? {
            None => return Ok(None),
            Some(text) if !text.is_empty() => return Ok(Some(text)),
            Some(text) => last = text,
        }
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(Some(last))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
