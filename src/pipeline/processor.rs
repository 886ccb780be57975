// File: src/pipeline/processor.rs
use crate::core::engine::TranslationEngine;
use crate::dom::shapes::{APPEND_CLASS, TRANSLATED_CLASS};
use crate::dom::{HostTree, NodeId, NodeKind};
use crate::pipeline::markers::Markers;
use crate::settings::{Settings, TranslationMode};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Disabled,
    AlreadyProcessed,
    /// The handle no longer resolves.
    Vanished,
    Unchanged,
    Translated,
}

/// Translates exactly one fragment. Never descends into children.
#[derive(Clone, Copy)]
pub struct FragmentProcessor<'a> {
    engine: &'a TranslationEngine,
    settings: &'a Settings,
}

impl<'a> FragmentProcessor<'a> {
    pub fn new(engine: &'a TranslationEngine, settings: &'a Settings) -> Self {
        Self { engine, settings }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn process<H: HostTree + ?Sized>(
        &self,
        host: &mut H,
        markers: &mut Markers,
        node: NodeId,
    ) -> Outcome {
        if !self.settings.enabled {
            return Outcome::Disabled;
        }
        if markers.is_processed(node) {
            return Outcome::AlreadyProcessed;
        }
        let Some(text) = host.text_content(node) else {
            return Outcome::Vanished;
        };

        let result = self.engine.translate(&text);
        markers.mark_processed(node);
        if !result.changed {
            return Outcome::Unchanged;
        }
        markers.record_original(node, text);

        match self.settings.translation_mode {
            TranslationMode::Replace => {
                host.set_text(node, &result.output_text);
                // text nodes carry no attributes, annotate the owning element
                let target = match host.kind(node) {
                    Some(NodeKind::Text) => host.parent(node),
                    _ => Some(node),
                };
                if let Some(target) = target {
                    host.add_class(target, TRANSLATED_CLASS);
                    if self.settings.show_original {
                        host.set_title(target, &format!("Original: {}", result.source_text));
                    }
                }
            }
            TranslationMode::Append => {
                let annotation = format!(" [🇦🇹 {}]", result.output_text);
                if let Some(sibling) = host.insert_after(node, APPEND_CLASS, &annotation) {
                    markers.mark_processed(sibling);
                }
            }
        }
        debug!(?node, mode = ?self.settings.translation_mode, "fragment translated");
        Outcome::Translated
    }
}
