// File: src/pipeline/locator.rs
use crate::dom::shapes::{Shape, CONTAINER_FALLBACK, CONTAINER_SHAPES};
use crate::dom::{HostTree, NodeId};

/// Best-effort discovery of the chat mount point. Retry policy belongs to
/// the caller.
#[derive(Debug, Clone, Copy)]
pub struct ContainerLocator {
    shapes: &'static [Shape],
    fallback: Option<Shape>,
}

impl Default for ContainerLocator {
    fn default() -> Self {
        Self {
            shapes: CONTAINER_SHAPES,
            fallback: Some(CONTAINER_FALLBACK),
        }
    }
}

impl ContainerLocator {
    pub fn new(shapes: &'static [Shape], fallback: Option<Shape>) -> Self {
        Self { shapes, fallback }
    }

    pub fn locate<H: HostTree + ?Sized>(&self, host: &H) -> Option<NodeId> {
        let root = host.document_root();
        self.shapes
            .iter()
            .chain(self.fallback.iter())
            .find_map(|shape| host.query_first(root, shape))
    }
}
