// File: src/pipeline/watcher.rs
use crate::config::RuntimeConfig;
use crate::dom::{HostTree, MutationBatch, NodeId, SubscriptionId};
use crate::pipeline::locator::ContainerLocator;
use crate::pipeline::markers::Markers;
use crate::pipeline::scanner::{is_message, ScanStats, TreeScanner};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Not started yet.
    Idle,
    /// Looking for a container; the next lookup happens at `retry_at`.
    Searching { retry_at: u64 },
    Attached {
        container: NodeId,
        subscription: SubscriptionId,
    },
}

/// Keeps one live subscription on the chat container and feeds added nodes
/// to the scanner. Time is passed in as milliseconds so every transition can
/// be driven deterministically.
pub struct MutationWatcher {
    locator: ContainerLocator,
    state: WatchState,
    retry_delay_ms: u64,
    watchdog_interval_ms: u64,
    next_watchdog: Option<u64>,
    misses: u32,
    backlog: Option<NodeId>,
}

impl MutationWatcher {
    pub fn new(locator: ContainerLocator, config: &RuntimeConfig) -> Self {
        Self {
            locator,
            state: WatchState::Idle,
            retry_delay_ms: config.retry_delay_ms,
            watchdog_interval_ms: config.watchdog_interval_ms,
            next_watchdog: None,
            misses: 0,
            backlog: None,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// A container that was just subscribed to and whose existing messages
    /// still need a scan. Cleared on read.
    pub fn take_backlog(&mut self) -> Option<NodeId> {
        self.backlog.take()
    }

    pub fn start(&mut self, now: u64) {
        self.state = WatchState::Searching { retry_at: now };
        self.next_watchdog = Some(now + self.watchdog_interval_ms);
    }

    /// Runs whatever timers are due: the watchdog first, then a pending search.
    pub fn poll<H: HostTree + ?Sized>(&mut self, host: &mut H, markers: &mut Markers, now: u64) {
        if let Some(due) = self.next_watchdog {
            if now >= due {
                self.next_watchdog = Some(now + self.watchdog_interval_ms);
                self.watchdog(host, markers, now);
            }
        }
        if let WatchState::Searching { retry_at } = self.state {
            if now >= retry_at {
                self.search(host, markers, now);
            }
        }
    }

    fn search<H: HostTree + ?Sized>(&mut self, host: &mut H, markers: &mut Markers, now: u64) {
        match self.locator.locate(host) {
            Some(container) => self.attach(host, markers, container, now),
            None => {
                self.misses += 1;
                if self.misses == 1 {
                    info!(retry_ms = self.retry_delay_ms, "chat container not found, retrying");
                } else {
                    debug!(misses = self.misses, "chat container still missing");
                }
                self.state = WatchState::Searching {
                    retry_at: now + self.retry_delay_ms,
                };
            }
        }
    }

    fn attach<H: HostTree + ?Sized>(
        &mut self,
        host: &mut H,
        markers: &mut Markers,
        container: NodeId,
        now: u64,
    ) {
        // re-discovery of a watched container reuses its subscription
        if let Some(subscription) = markers.subscription_for(container) {
            self.state = WatchState::Attached { container, subscription };
            self.misses = 0;
            return;
        }
        match host.subscribe(container) {
            Some(subscription) => {
                markers.watch(container, subscription);
                self.state = WatchState::Attached { container, subscription };
                self.backlog = Some(container);
                self.misses = 0;
                info!(?container, "observer started for chat container");
            }
            None => {
                self.state = WatchState::Searching {
                    retry_at: now + self.retry_delay_ms,
                };
            }
        }
    }

    /// Restarts the search when the discoverable container is not the one
    /// being watched, e.g. after the host swapped its chat panel.
    fn watchdog<H: HostTree + ?Sized>(&mut self, host: &mut H, markers: &mut Markers, now: u64) {
        let found = self.locator.locate(host);
        let stale = match (self.state, found) {
            (_, Some(found)) => !markers.is_watched(found),
            (WatchState::Attached { container, .. }, None) => !host.is_connected(container),
            _ => false,
        };
        if !stale {
            return;
        }
        if let WatchState::Attached { container, subscription } = self.state {
            info!(?container, "chat container replaced, searching again");
            markers.unwatch(container);
            host.unsubscribe(subscription);
        }
        self.state = WatchState::Searching { retry_at: now };
    }

    /// Handles one batch of added nodes, in delivery order. Batches from a
    /// subscription other than the current one are dropped.
    pub fn handle_batch<H: HostTree + ?Sized>(
        &self,
        host: &mut H,
        markers: &mut Markers,
        scanner: &TreeScanner<'_>,
        batch: &MutationBatch,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        if !scanner.processor().settings().enabled {
            return stats;
        }
        match self.state {
            WatchState::Attached { subscription, .. } if subscription == batch.subscription => {}
            _ => return stats,
        }
        debug!(added = batch.added.len(), "mutation batch");
        for &node in &batch.added {
            if host.kind(node).is_none() {
                continue;
            }
            if is_message(host, node) {
                stats = stats.merge(scanner.scan_message(host, markers, node));
            }
            stats = stats.merge(scanner.scan(host, markers, node));
        }
        stats
    }
}
