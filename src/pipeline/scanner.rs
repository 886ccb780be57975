// File: src/pipeline/scanner.rs
use crate::dom::shapes::{Shape, FRAGMENT_SHAPES, MESSAGE_SHAPES, SKIPPED_TAGS};
use crate::dom::{HostTree, NodeId, NodeKind};
use crate::pipeline::markers::Markers;
use crate::pipeline::processor::{FragmentProcessor, Outcome};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub visited: usize,
    pub translated: usize,
}

impl ScanStats {
    pub fn merge(self, other: ScanStats) -> ScanStats {
        ScanStats {
            visited: self.visited + other.visited,
            translated: self.translated + other.translated,
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Translated => {
                self.visited += 1;
                self.translated += 1;
            }
            Outcome::Unchanged => self.visited += 1,
            _ => {}
        }
    }
}

/// Finds fragments under a subtree and hands each to the processor.
///
/// Fragment shapes and raw text leaves can overlap; the processed marker is
/// what keeps a node from being translated twice.
pub struct TreeScanner<'a> {
    processor: FragmentProcessor<'a>,
}

impl<'a> TreeScanner<'a> {
    pub fn new(processor: FragmentProcessor<'a>) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &FragmentProcessor<'a> {
        &self.processor
    }

    pub fn scan<H: HostTree + ?Sized>(
        &self,
        host: &mut H,
        markers: &mut Markers,
        root: NodeId,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        if host.kind(root).is_none() {
            return stats;
        }

        self.process_fragments(host, markers, root, &mut stats);

        if enclosing_message(host, root).is_some() {
            self.walk_text(host, markers, root, &mut stats);
        } else {
            for message in collect(host, root, MESSAGE_SHAPES) {
                self.walk_text(host, markers, message, &mut stats);
            }
        }
        stats
    }

    /// One message: its fragments first, then any loose text inside it.
    pub fn scan_message<H: HostTree + ?Sized>(
        &self,
        host: &mut H,
        markers: &mut Markers,
        message: NodeId,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        self.process_fragments(host, markers, message, &mut stats);
        self.walk_text(host, markers, message, &mut stats);
        stats
    }

    fn process_fragments<H: HostTree + ?Sized>(
        &self,
        host: &mut H,
        markers: &mut Markers,
        root: NodeId,
        stats: &mut ScanStats,
    ) {
        for fragment in collect(host, root, FRAGMENT_SHAPES) {
            stats.record(self.processor.process(host, markers, fragment));
        }
    }

    /// Depth-first over text leaves, skipping scripts, styles and anything
    /// under an already processed node.
    fn walk_text<H: HostTree + ?Sized>(
        &self,
        host: &mut H,
        markers: &mut Markers,
        root: NodeId,
        stats: &mut ScanStats,
    ) {
        if is_covered(host, markers, root) {
            return;
        }
        let mut leaves = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if markers.is_processed(node) {
                continue;
            }
            match host.kind(node) {
                Some(NodeKind::Text) => {
                    let has_text = host
                        .text_content(node)
                        .is_some_and(|t| !t.trim().is_empty());
                    if has_text {
                        leaves.push(node);
                    }
                }
                Some(NodeKind::Element) => {
                    let skipped = host
                        .tag(node)
                        .is_some_and(|tag| SKIPPED_TAGS.contains(&tag));
                    if !skipped {
                        stack.extend(host.children(node).into_iter().rev());
                    }
                }
                None => {}
            }
        }
        for leaf in leaves {
            stats.record(self.processor.process(host, markers, leaf));
        }
    }
}

/// `root` itself (if it matches) followed by its matching descendants, for
/// each shape in priority order.
fn collect<H: HostTree + ?Sized>(host: &H, root: NodeId, shapes: &[Shape]) -> Vec<NodeId> {
    let mut found = Vec::new();
    for shape in shapes {
        if host.matches(root, shape) {
            found.push(root);
        }
        found.extend(host.query(root, shape));
    }
    found
}

pub fn is_message<H: HostTree + ?Sized>(host: &H, node: NodeId) -> bool {
    Shape::matches_any(MESSAGE_SHAPES, host, node)
}

fn enclosing_message<H: HostTree + ?Sized>(host: &H, node: NodeId) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if is_message(host, id) {
            return Some(id);
        }
        current = host.parent(id);
    }
    None
}

fn is_covered<H: HostTree + ?Sized>(host: &H, markers: &Markers, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if markers.is_processed(id) {
            return true;
        }
        if host.kind(id) == Some(NodeKind::Element)
            && host.tag(id).is_some_and(|tag| SKIPPED_TAGS.contains(&tag))
        {
            return true;
        }
        current = host.parent(id);
    }
    false
}
