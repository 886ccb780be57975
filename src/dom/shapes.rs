// src/dom/shapes.rs
use crate::dom::{HostTree, NodeId, NodeKind};

/// A structural hint, the subset of CSS selectors the pipeline relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `[name="value"]`
    Attribute { name: &'static str, value: &'static str },
    /// `.class`
    Class(&'static str),
    /// `[class*="fragment"]`
    ClassContains(&'static str),
}

impl Shape {
    pub fn matches<H: HostTree + ?Sized>(&self, host: &H, node: NodeId) -> bool {
        if host.kind(node) != Some(NodeKind::Element) {
            return false;
        }
        match *self {
            Shape::Attribute { name, value } => host.attribute(node, name) == Some(value),
            Shape::Class(class) => host
                .attribute(node, "class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == class)),
            Shape::ClassContains(fragment) => host
                .attribute(node, "class")
                .is_some_and(|c| c.contains(fragment)),
        }
    }

    pub fn matches_any<H: HostTree + ?Sized>(shapes: &[Shape], host: &H, node: NodeId) -> bool {
        shapes.iter().any(|s| s.matches(host, node))
    }
}

/// Whole chat messages, highest priority first.
pub const MESSAGE_SHAPES: &[Shape] = &[
    Shape::Attribute { name: "data-a-target", value: "chat-message-container" },
    Shape::Class("chat-line__message"),
    Shape::ClassContains("chat-line"),
    Shape::Class("message"),
];

/// The text-bearing part of a message.
pub const FRAGMENT_SHAPES: &[Shape] = &[
    Shape::Attribute { name: "data-a-target", value: "chat-message-text" },
    Shape::Class("text-fragment"),
];

/// Candidate mount points for the watcher, highest priority first.
pub const CONTAINER_SHAPES: &[Shape] = &[
    Shape::Attribute { name: "data-a-target", value: "chat-scroller" },
    Shape::Class("chat-scrollable-area__message-container"),
    Shape::ClassContains("chat-list"),
    Shape::Class("chat-list"),
    Shape::Attribute { name: "role", value: "log" },
    Shape::Class("stream-chat"),
];

/// Anything plausibly chat-shaped, tried last.
pub const CONTAINER_FALLBACK: Shape = Shape::ClassContains("chat");

/// Elements whose text is never content.
pub const SKIPPED_TAGS: &[&str] = &["script", "style"];

pub const TRANSLATED_CLASS: &str = "austrian-translated";
pub const APPEND_CLASS: &str = "austrian-translation-append";
