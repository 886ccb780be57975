// File: src/pipeline/runtime.rs
use crate::config::RuntimeConfig;
use crate::core::engine::TranslationEngine;
use crate::core::types::TranslationResult;
use crate::dom::HostTree;
use crate::pipeline::locator::ContainerLocator;
use crate::pipeline::markers::Markers;
use crate::pipeline::processor::FragmentProcessor;
use crate::pipeline::scanner::{ScanStats, TreeScanner};
use crate::pipeline::watcher::{MutationWatcher, WatchState};
use crate::settings::{Settings, SettingsStore, SettingsUpdate};
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The host document is still loading.
    AwaitingDocument,
    /// Ready; giving the host time to render its backlog.
    Settling { until: u64 },
    Running,
}

/// Owns the pipeline for one host document.
///
/// Single-threaded and run-to-completion: every call to [`tick`] drains
/// settings updates, advances the startup phase, runs due timers and then
/// handles pending mutation batches in delivery order.
///
/// [`tick`]: ChatTranslator::tick
pub struct ChatTranslator<H: HostTree> {
    host: H,
    engine: TranslationEngine,
    settings: Settings,
    updates: Option<Receiver<SettingsUpdate>>,
    markers: Markers,
    watcher: MutationWatcher,
    config: RuntimeConfig,
    phase: Phase,
}

impl<H: HostTree> ChatTranslator<H> {
    pub fn new(host: H, engine: TranslationEngine, settings: Settings, config: RuntimeConfig) -> Self {
        Self {
            host,
            engine,
            settings,
            updates: None,
            markers: Markers::new(),
            watcher: MutationWatcher::new(ContainerLocator::default(), &config),
            config,
            phase: Phase::AwaitingDocument,
        }
    }

    /// Reads the stored settings and subscribes to their changes. A store
    /// that cannot be read leaves the defaults in place.
    pub fn start(
        host: H,
        engine: TranslationEngine,
        store: &mut dyn SettingsStore,
        config: RuntimeConfig,
    ) -> Self {
        let settings = store.load().unwrap_or_else(|e| {
            warn!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        });
        info!(?settings, "initializing translator");
        let mut translator = Self::new(host, engine, settings, config);
        translator.updates = Some(store.subscribe());
        translator
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn engine(&self) -> &TranslationEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn watch_state(&self) -> WatchState {
        self.watcher.state()
    }

    /// Same engine the pipeline uses, for preview surfaces.
    pub fn preview(&self, text: &str) -> TranslationResult {
        self.engine.translate(text)
    }

    pub fn apply_settings(&mut self, update: &SettingsUpdate) {
        self.settings = self.settings.merge(update);
        debug!(settings = ?self.settings, "settings updated");
    }

    fn drain_settings(&mut self) {
        let Some(updates) = &self.updates else {
            return;
        };
        let pending: Vec<SettingsUpdate> = updates.try_iter().collect();
        for update in pending {
            self.apply_settings(&update);
        }
    }

    pub fn tick(&mut self, now: u64) -> ScanStats {
        self.drain_settings();
        let mut stats = ScanStats::default();

        if self.phase == Phase::AwaitingDocument && self.host.is_ready() {
            self.phase = Phase::Settling {
                until: now + self.config.startup_delay_ms,
            };
            debug!(delay_ms = self.config.startup_delay_ms, "document ready");
        }

        if let Phase::Settling { until } = self.phase {
            if now >= until {
                stats = stats.merge(self.initial_scan());
                self.watcher.start(now);
                self.phase = Phase::Running;
            }
        }

        if self.phase == Phase::Running {
            self.watcher.poll(&mut self.host, &mut self.markers, now);
            stats = stats.merge(self.scan_backlog());
            stats = stats.merge(self.pump_mutations());
        }
        stats
    }

    fn initial_scan(&mut self) -> ScanStats {
        let scanner = TreeScanner::new(FragmentProcessor::new(&self.engine, &self.settings));
        let root = self.host.document_root();
        let stats = scanner.scan(&mut self.host, &mut self.markers, root);
        info!(translated = stats.translated, "initial scan complete");
        stats
    }

    /// Messages already inside a freshly attached container, e.g. after the
    /// host re-rendered its chat panel.
    fn scan_backlog(&mut self) -> ScanStats {
        let Some(container) = self.watcher.take_backlog() else {
            return ScanStats::default();
        };
        let scanner = TreeScanner::new(FragmentProcessor::new(&self.engine, &self.settings));
        let stats = scanner.scan(&mut self.host, &mut self.markers, container);
        if stats.translated > 0 {
            info!(translated = stats.translated, "container backlog translated");
        }
        stats
    }

    fn pump_mutations(&mut self) -> ScanStats {
        let batches = self.host.take_mutations();
        let scanner = TreeScanner::new(FragmentProcessor::new(&self.engine, &self.settings));
        let mut stats = ScanStats::default();
        for batch in &batches {
            stats = stats.merge(self.watcher.handle_batch(
                &mut self.host,
                &mut self.markers,
                &scanner,
                batch,
            ));
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use crate::settings::{MemoryStore, TranslationMode};

    fn config() -> RuntimeConfig {
        RuntimeConfig {
            startup_delay_ms: 2000,
            retry_delay_ms: 1000,
            watchdog_interval_ms: 5000,
        }
    }

    fn chat_document() -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.document_root();
        let list = doc.create_element("div", &[("role", "log")]);
        doc.append_child(root, list);
        (doc, list)
    }

    fn post(doc: &mut Document, list: NodeId, text: &str) -> NodeId {
        let line = doc.create_element("div", &[("class", "chat-line__message")]);
        let body = doc.create_element("span", &[("class", "text-fragment")]);
        let text = doc.create_text(text);
        doc.append_child(body, text);
        doc.append_child(line, body);
        doc.append_child(list, line);
        body
    }

    #[test]
    fn test_startup_waits_for_ready_and_delay() {
        let (mut doc, list) = chat_document();
        let backlog = post(&mut doc, list, "Hallo");
        let engine = TranslationEngine::builtin().unwrap();
        let mut store = MemoryStore::default();
        let mut translator = ChatTranslator::start(doc, engine, &mut store, config());

        translator.tick(0);
        assert_eq!(translator.phase(), Phase::AwaitingDocument);

        translator.host_mut().set_ready(true);
        translator.tick(100);
        assert_eq!(translator.phase(), Phase::Settling { until: 2100 });
        assert_eq!(translator.host().text_content(backlog).as_deref(), Some("Hallo"));

        let stats = translator.tick(2100);
        assert_eq!(stats.translated, 1);
        assert_eq!(translator.phase(), Phase::Running);
        assert_eq!(translator.host().text_content(backlog).as_deref(), Some("Servus"));
        assert!(matches!(translator.watch_state(), WatchState::Attached { .. }));
    }

    #[test]
    fn test_settings_changes_apply_on_next_tick() {
        let (mut doc, list) = chat_document();
        doc.set_ready(true);
        let engine = TranslationEngine::builtin().unwrap();
        let mut store = MemoryStore::default();
        let mut translator = ChatTranslator::start(doc, engine, &mut store, config());
        translator.tick(0);
        translator.tick(2000);

        store
            .update(SettingsUpdate {
                translation_mode: Some(TranslationMode::Append),
                ..Default::default()
            })
            .unwrap();
        let body = post(translator.host_mut(), list, "nicht schlecht");
        translator.tick(2100);

        assert_eq!(translator.settings().translation_mode, TranslationMode::Append);
        assert_eq!(
            translator.host().text_content(body).as_deref(),
            Some("nicht schlecht")
        );
        let line = translator.host().parent(body).unwrap();
        assert_eq!(
            translator.host().text_content(line).as_deref(),
            Some("nicht schlecht [🇦🇹 net schlecht]")
        );
    }

    #[test]
    fn test_unreadable_store_falls_back_to_defaults() {
        struct BrokenStore;
        impl SettingsStore for BrokenStore {
            fn load(&self) -> crate::errors::Result<Settings> {
                Err(crate::errors::TranslatorError::Storage("locked".into()))
            }
            fn update(&mut self, _: SettingsUpdate) -> crate::errors::Result<Settings> {
                Err(crate::errors::TranslatorError::Storage("locked".into()))
            }
            fn subscribe(&mut self) -> Receiver<SettingsUpdate> {
                crossbeam_channel::never()
            }
        }

        let (doc, _) = chat_document();
        let engine = TranslationEngine::builtin().unwrap();
        let translator = ChatTranslator::start(doc, engine, &mut BrokenStore, config());
        assert_eq!(*translator.settings(), Settings::default());
    }

    #[test]
    fn test_preview_shares_the_engine() {
        let (doc, _) = chat_document();
        let translator = ChatTranslator::new(
            doc,
            TranslationEngine::builtin().unwrap(),
            Settings::default(),
            config(),
        );
        let result = translator.preview("Hallo, wie geht es dir?");
        assert!(result.changed);
        assert_eq!(result.output_text, "Servus, wie geht's dir?");
    }
}
