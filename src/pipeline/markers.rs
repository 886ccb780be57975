// src/pipeline/markers.rs
use crate::dom::{NodeId, SubscriptionId};
use std::collections::{HashMap, HashSet};

/// Pipeline bookkeeping kept outside the host tree.
///
/// A node in `processed` is never evaluated again, even if the host later
/// changes its text. Entries are never cleared.
#[derive(Debug, Default)]
pub struct Markers {
    processed: HashSet<NodeId>,
    originals: HashMap<NodeId, String>,
    watched: HashMap<NodeId, SubscriptionId>,
}

impl Markers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, node: NodeId) -> bool {
        self.processed.contains(&node)
    }

    /// Returns false if the node was already marked.
    pub fn mark_processed(&mut self, node: NodeId) -> bool {
        self.processed.insert(node)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn record_original(&mut self, node: NodeId, text: String) {
        self.originals.entry(node).or_insert(text);
    }

    pub fn original_text(&self, node: NodeId) -> Option<&str> {
        self.originals.get(&node).map(String::as_str)
    }

    pub fn subscription_for(&self, container: NodeId) -> Option<SubscriptionId> {
        self.watched.get(&container).copied()
    }

    pub fn is_watched(&self, container: NodeId) -> bool {
        self.watched.contains_key(&container)
    }

    pub fn watch(&mut self, container: NodeId, subscription: SubscriptionId) {
        self.watched.insert(container, subscription);
    }

    pub fn unwatch(&mut self, container: NodeId) -> Option<SubscriptionId> {
        self.watched.remove(&container)
    }
}
