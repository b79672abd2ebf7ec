//! In-memory page used by the poller and extractor tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::common::PageError;
use crate::config::Selectors;

use super::page::{MessageNode, OverlayPage};

#[derive(Clone)]
struct FakeField {
    value: String,
    /// Reads that return "" before `value` shows up.
    empty_reads: u32,
}

#[derive(Default)]
struct NodeState {
    fields: HashMap<String, FakeField>,
    reads: HashMap<String, u32>,
}

#[derive(Clone)]
pub struct FakeNode {
    id: Option<String>,
    state: Arc<Mutex<NodeState>>,
}

impl FakeNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: (!id.is_empty()).then(|| id.to_string()),
            state: Arc::new(Mutex::new(NodeState::default())),
        }
    }

    pub fn complete(id: &str, timestamp: &str, username: &str, message: &str) -> Self {
        let selectors = Selectors::default();
        Self::new(id)
            .with_field(&selectors.timestamp, timestamp)
            .with_field(&selectors.username, username)
            .with_field(&selectors.message, message)
    }

    pub fn with_field(self, selector: &str, value: &str) -> Self {
        self.with_late_field(selector, value, 0)
    }

    pub fn with_late_field(self, selector: &str, value: &str, empty_reads: u32) -> Self {
        self.state.lock().expect("fake node lock").fields.insert(
            selector.to_string(),
            FakeField {
                value: value.to_string(),
                empty_reads,
            },
        );
        self
    }

    pub fn reads(&self, selector: &str) -> u32 {
        let state = self.state.lock().expect("fake node lock");
        state.reads.get(selector).copied().unwrap_or(0)
    }
}

impl MessageNode for FakeNode {
    async fn child_text(&self, selector: &str) -> Result<Option<String>, PageError> {
        let mut state = self.state.lock().expect("fake node lock");
        let count = {
            let reads = state.reads.entry(selector.to_string()).or_insert(0);
            *reads += 1;
            *reads
        };
        Ok(state.fields.get(selector).map(|field| {
            if count > field.empty_reads {
                field.value.trim().to_string()
            } else {
                String::new()
            }
        }))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(match name {
            "id" => self.id.clone(),
            _ => None,
        })
    }

    async fn text(&self) -> Result<String, PageError> {
        let state = self.state.lock().expect("fake node lock");
        let mut parts: Vec<&str> = state
            .fields
            .values()
            .map(|field| field.value.as_str())
            .collect();
        parts.sort_unstable();
        Ok(parts.join(" "))
    }

    async fn inner_html(&self) -> Result<String, PageError> {
        Ok(format!("<div id=\"{}\"></div>", self.id.as_deref().unwrap_or("")))
    }
}

/// Shared handle: clones see the same nodes and flags.
#[derive(Clone, Default)]
pub struct FakePage {
    container: Arc<AtomicBool>,
    nodes: Arc<Mutex<Vec<FakeNode>>>,
    closed: Arc<AtomicBool>,
    failures: Arc<AtomicU32>,
    queries: Arc<AtomicU32>,
}

impl FakePage {
    pub fn with_container() -> Self {
        let page = Self::default();
        page.show_container();
        page
    }

    pub fn show_container(&self) {
        self.container.store(true, Ordering::SeqCst);
    }

    pub fn push(&self, node: FakeNode) {
        self.nodes.lock().expect("fake page lock").push(node);
    }

    /// Makes the next `count` queries fail.
    pub fn fail_next(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

impl OverlayPage for FakePage {
    type Node = FakeNode;

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeNode>, PageError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PageError::Command(format!("injected failure for {selector}")));
        }

        let selectors = Selectors::default();
        if selector == selectors.container {
            return Ok(if self.container.load(Ordering::SeqCst) {
                vec![FakeNode::new("chat")]
            } else {
                Vec::new()
            });
        }
        if selector == selectors.message_item {
            return Ok(self.nodes.lock().expect("fake page lock").clone());
        }
        Ok(Vec::new())
    }

    async fn close(self) -> Result<(), PageError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
