// File: src/dom/document.rs
use crate::dom::{HostTree, MutationBatch, NodeId, NodeKind, SubscriptionId};

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Subscription {
    id: SubscriptionId,
    root: NodeId,
    pending: Vec<NodeId>,
}

/// An in-memory arena document. Detached nodes keep their slot, so handles
/// stay valid and are never handed out twice.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    ready: bool,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Node {
            data: NodeData::Element {
                tag: "body".to_string(),
                attributes: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![body],
            root: NodeId(0),
            ready: false,
            subscriptions: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn create_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Appends `child` (detaching it first) and records the insertion for
    /// every subscription observing `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let position = match self.node(parent) {
            Some(node) => node.children.len(),
            None => return false,
        };
        self.insert_child(parent, position, child)
    }

    fn insert_child(&mut self, parent: NodeId, position: usize, child: NodeId) -> bool {
        if parent == child || self.node(child).is_none() || self.is_ancestor(child, parent) {
            return false;
        }
        match self.node(parent).map(|n| &n.data) {
            Some(NodeData::Element { .. }) => {}
            _ => return false,
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let position = position.min(siblings.len());
        siblings.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        self.record_added(parent, child);
        true
    }

    /// Removes `node` from its parent. The subtree stays addressable.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != node);
        self.nodes[node.0].parent = None;
    }

    /// Puts `replacement` where `old` was, the way a host re-renders a panel.
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) -> bool {
        let Some(parent) = self.node(old).and_then(|n| n.parent) else {
            return false;
        };
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == old)
            .unwrap_or(0);
        self.detach(old);
        self.insert_child(parent, position, replacement)
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn record_added(&mut self, parent: NodeId, child: NodeId) {
        let observers: Vec<usize> = self
            .subscriptions
            .iter()
            .enumerate()
            .filter(|(_, s)| self.is_ancestor(s.root, parent))
            .map(|(i, _)| i)
            .collect();
        for i in observers {
            self.subscriptions[i].pending.push(child);
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl HostTree for Document {
    fn document_root(&self) -> NodeId {
        self.root
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| match n.data {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
        })
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        let Some(NodeData::Element { attributes, .. }) =
            self.nodes.get_mut(node.0).map(|n| &mut n.data)
        else {
            return false;
        };
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        true
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let current = self.node(id)?;
            match &current.data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Element { .. } => stack.extend(current.children.iter().rev()),
            }
        }
        Some(out)
    }

    /// Text nodes change in place; elements get their children replaced by a
    /// single new text node, which observers see as an insertion.
    fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        match self.kind(node) {
            Some(NodeKind::Text) => {
                self.nodes[node.0].data = NodeData::Text(text.to_string());
                true
            }
            Some(NodeKind::Element) => {
                for child in self.children(node) {
                    self.detach(child);
                }
                let text_node = self.create_text(text);
                self.append_child(node, text_node)
            }
            None => false,
        }
    }

    fn insert_after(&mut self, node: NodeId, class: &str, text: &str) -> Option<NodeId> {
        let parent = self.node(node)?.parent?;
        let position = self.nodes[parent.0].children.iter().position(|&c| c == node)? + 1;
        let span = self.create_element("span", &[("class", class)]);
        let text_node = self.create_text(text);
        self.nodes[span.0].children.push(text_node);
        self.nodes[text_node.0].parent = Some(span);
        self.insert_child(parent, position, span).then_some(span)
    }

    fn subscribe(&mut self, root: NodeId) -> Option<SubscriptionId> {
        self.node(root)?;
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            root,
            pending: Vec::new(),
        });
        Some(id)
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.retain(|s| s.id != subscription);
    }

    fn take_mutations(&mut self) -> Vec<MutationBatch> {
        self.subscriptions
            .iter_mut()
            .filter(|s| !s.pending.is_empty())
            .map(|s| MutationBatch {
                subscription: s.id,
                added: std::mem::take(&mut s.pending),
            })
            .collect()
    }
}
