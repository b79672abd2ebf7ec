use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::common::{ChatMessage, MessageId, ScraperError};
use crate::config::{AppConfig, Selectors};
use crate::lifecycle::StopSignal;
use crate::storage::Transcript;
use crate::timestamp::TimestampNormalizer;

use super::extractor::MessageExtractor;
use super::page::{MessageNode, OverlayPage};

/// Result of a finished polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSummary {
    pub saved: usize,
    pub output: PathBuf,
}

/// Polls the overlay for new chat entries and saves each complete one.
pub struct ChatPoller {
    selectors: Selectors,
    extractor: MessageExtractor,
    normalizer: TimestampNormalizer,
    poll_interval: Duration,
    container_retry: Duration,
    stop: StopSignal,
    seen: HashSet<MessageId>,
    transcript: Transcript,
    container_found: bool,
    container_missing_logged: bool,
}

impl ChatPoller {
    pub fn new(config: &AppConfig, stop: StopSignal) -> Self {
        Self {
            selectors: config.selectors.clone(),
            extractor: MessageExtractor::new(
                config.selectors.clone(),
                config.field_retries,
                config.field_retry_delay(),
            ),
            normalizer: TimestampNormalizer::from_name(&config.timezone),
            poll_interval: config.poll_interval(),
            container_retry: config.container_retry(),
            stop,
            seen: HashSet::new(),
            transcript: Transcript::new(&config.output_file),
            container_found: false,
            container_missing_logged: false,
        }
    }

    /// Runs until the stop signal fires, then closes `page`.
    pub async fn run<P: OverlayPage>(mut self, page: P) -> PollSummary {
        log::info!("Chat poller started");

        while !self.stop.is_triggered() {
            let pause = match self.poll_once(&page).await {
                Ok(pause) => pause,
                Err(err) => {
                    log::error!("Error parsing messages: {err}");
                    self.poll_interval
                }
            };
            if self.stop.sleep(pause).await {
                break;
            }
        }

        if let Err(err) = page.close().await {
            log::warn!("Failed to close browser session: {err}");
        }

        PollSummary {
            saved: self.transcript.count(),
            output: self.transcript.path().to_path_buf(),
        }
    }

    /// One pass over the page. Returns how long to wait before the next.
    async fn poll_once<P: OverlayPage>(&mut self, page: &P) -> Result<Duration, ScraperError> {
        if page.find_all(&self.selectors.container).await?.is_empty() {
            if !self.container_missing_logged {
                log::info!("Chat container not found, continuing to monitor...");
                self.container_missing_logged = true;
            }
            return Ok(self.container_retry);
        }
        if !self.container_found {
            log::info!("Chat container found");
            self.container_found = true;
        }

        let nodes = page.find_all(&self.selectors.message_item).await?;
        for node in &nodes {
            if self.stop.is_triggered() {
                break;
            }
            self.process_node(node).await?;
        }

        Ok(self.poll_interval)
    }

    async fn process_node<N: MessageNode>(&mut self, node: &N) -> Result<(), ScraperError> {
        let id = match node.attribute("id").await? {
            Some(id) if !id.is_empty() => MessageId::Dom(id),
            _ => MessageId::text_hash(&node.text().await?),
        };
        // Marked before extraction: a node that comes back incomplete is not re-read.
        if !self.seen.insert(id.clone()) {
            return Ok(());
        }

        let fields = self.extractor.extract(node).await?;
        let timestamp = self.normalizer.normalize(&fields.raw_timestamp);

        let Some(message) = ChatMessage::complete(timestamp, fields.username, fields.message)
        else {
            log::debug!("Skipping incomplete message {id}");
            return Ok(());
        };

        log::info!(
            "Parsed: [{}] {}: {}",
            message.timestamp,
            message.username.as_deref().unwrap_or_default(),
            message.message.as_deref().unwrap_or_default()
        );
        self.transcript.push(message)
    }
}
