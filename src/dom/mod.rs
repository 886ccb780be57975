// src/dom/mod.rs
//! The host document contract.
//!
//! The pipeline never touches host objects directly. It sees opaque
//! [`NodeId`] handles and keeps its own bookkeeping on the side, so any tree
//! that can answer these calls can be translated.

pub mod document;
pub mod shapes;

pub use document::Document;
pub use shapes::Shape;

/// Opaque handle to a node in the host tree. Never reused for another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// Nodes added under an observed subtree, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch {
    pub subscription: SubscriptionId,
    pub added: Vec<NodeId>,
}

pub trait HostTree {
    fn document_root(&self) -> NodeId;

    /// Minimal readiness: the host has finished its initial parse.
    fn is_ready(&self) -> bool;

    /// `None` once a handle no longer resolves to anything.
    fn kind(&self, node: NodeId) -> Option<NodeKind>;
    fn tag(&self, node: NodeId) -> Option<&str>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool;

    fn text_content(&self, node: NodeId) -> Option<String>;
    fn set_text(&mut self, node: NodeId, text: &str) -> bool;

    /// Inserts a new element carrying `text` right after `node`.
    fn insert_after(&mut self, node: NodeId, class: &str, text: &str) -> Option<NodeId>;

    fn subscribe(&mut self, root: NodeId) -> Option<SubscriptionId>;
    fn unsubscribe(&mut self, subscription: SubscriptionId);
    fn take_mutations(&mut self) -> Vec<MutationBatch>;

    fn is_connected(&self, node: NodeId) -> bool {
        let root = self.document_root();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn matches(&self, node: NodeId, shape: &Shape) -> bool {
        shape.matches(self, node)
    }

    /// Descendants of `root` (excluding `root`) matching `shape`, in
    /// document order.
    fn query(&self, root: NodeId, shape: &Shape) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.kind(node) != Some(NodeKind::Element) {
                continue;
            }
            if self.matches(node, shape) {
                found.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        found
    }

    fn query_first(&self, root: NodeId, shape: &Shape) -> Option<NodeId> {
        self.query(root, shape).into_iter().next()
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> bool {
        let current = self.attribute(node, "class").unwrap_or_default();
        if current.split_whitespace().any(|c| c == class) {
            return true;
        }
        let updated = if current.is_empty() {
            class.to_string()
        } else {
            format!("{} {}", current, class)
        };
        self.set_attribute(node, "class", &updated)
    }

    fn set_title(&mut self, node: NodeId, title: &str) -> bool {
        self.set_attribute(node, "title", title)
    }
}
