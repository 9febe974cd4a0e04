// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The fps reporter: ties the registry, the rate limiter, the subtree
//! matcher and the external collaborators together once per cycle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use taskrate_core::clock::Clock;
use taskrate_core::event::EventBus;
use taskrate_core::scene::{LayerId, SceneGraphView, SceneSnapshot, TaskTag};
use taskrate_core::telemetry::{
    DeathNotifier, DeliveryError, FpsComputer, FpsListener, ListenerEvent, ListenerId,
};
use taskrate_scene::matched_layers;

use crate::config::ReporterConfig;
use crate::rate_limit::RateLimiter;
use crate::registry::ListenerRegistry;

/// What happened during one [`FpsReporter::dispatch_cycle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Listeners that received a fresh value.
    pub delivered: usize,
    /// Deliveries the transport dropped because the listener's queue was full.
    pub backpressured: usize,
    /// Listeners skipped because their rate-limit window had not elapsed.
    pub not_due: usize,
    /// Due listeners whose task matched no layer.
    pub empty_match: usize,
    /// Listeners removed because they were found dead.
    pub removed_dead: usize,
    /// Listeners removed or re-registered while the cycle was running.
    pub stale: usize,
}

/// Computes per-task fps and reports it to subscribed listeners.
///
/// `FpsReporter` is `Send + Sync`: share it behind an `Arc` between the
/// thread that registers listeners and the one that drives
/// [`dispatch_cycle`](Self::dispatch_cycle).
#[derive(Debug)]
pub struct FpsReporter {
    registry: ListenerRegistry,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    scene: Arc<dyn SceneGraphView>,
    fps: Arc<dyn FpsComputer>,
    deaths: EventBus<ListenerEvent>,
}

impl FpsReporter {
    /// Creates a reporter with the default configuration.
    pub fn new(
        scene: Arc<dyn SceneGraphView>,
        fps: Arc<dyn FpsComputer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_config(&ReporterConfig::default(), scene, fps, clock)
    }

    /// Creates a reporter whose rate-limit window comes from `config`.
    ///
    /// ## Arguments
    /// * `config` - Supplies the minimum period between two reports.
    /// * `scene` - Read once per cycle, and only when a listener is due.
    /// * `fps` - Computes the value reported for a matched layer set.
    /// * `clock` - Read once per cycle.
    pub fn with_config(
        config: &ReporterConfig,
        scene: Arc<dyn SceneGraphView>,
        fps: Arc<dyn FpsComputer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry: ListenerRegistry::new(),
            limiter: RateLimiter::new(config.min_report_period()),
            clock,
            scene,
            fps,
            deaths: EventBus::new(),
        }
    }

    /// Subscribes `listener` to fps reports for `task_tag`.
    ///
    /// Registering a listener that is already known replaces its task and
    /// makes it due immediately. The listener is linked to death
    /// notifications before it becomes visible to a cycle, and the link is
    /// bound to this registration only.
    ///
    /// ## Arguments
    /// * `listener` - The transport handle to report to.
    /// * `task_tag` - The task whose layers are measured for this listener.
    ///
    /// ## Returns
    /// The registration serial of the new subscription.
    pub fn add_listener(&self, listener: Arc<dyn FpsListener>, task_tag: TaskTag) -> u64 {
        let id = listener.id();
        let registration = self.registry.reserve_registration();
        listener.link_to_death(DeathNotifier::new(id, registration, self.deaths.sender()));

        match self.registry.insert(listener, task_tag, registration) {
            Some(previous) => {
                previous.listener.unlink_to_death(previous.registration);
                log::info!(
                    "FpsReporter: {id} re-registered, {} -> {task_tag}",
                    previous.task_tag
                );
            }
            None => log::info!("FpsReporter: {id} registered for {task_tag}"),
        }
        registration
    }

    /// Unsubscribes `id`. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        match self.registry.remove(id) {
            Some(entry) => {
                entry.listener.unlink_to_death(entry.registration);
                log::info!("FpsReporter: {id} removed");
                true
            }
            None => {
                log::trace!("FpsReporter: {id} was not registered");
                false
            }
        }
    }

    /// A sender transports use to report listener death from any thread.
    ///
    /// Notifications are applied at the start of the next cycle.
    pub fn death_sender(&self) -> flume::Sender<ListenerEvent> {
        self.deaths.sender()
    }

    /// The underlying listener registry.
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// The rate limiter in use.
    pub fn rate_limiter(&self) -> RateLimiter {
        self.limiter
    }

    /// Runs one dispatch cycle.
    ///
    /// Pending death notifications are applied first. With no listener left,
    /// neither the scene nor the fps computer is touched. Otherwise every due
    /// listener whose task matches at least one layer gets a fresh value and
    /// its window restarts; a listener with no matching layer stays due.
    pub fn dispatch_cycle(&self) -> DispatchSummary {
        let mut summary = DispatchSummary {
            removed_dead: self.process_death_notifications(),
            ..Default::default()
        };

        if self.registry.is_empty() {
            return summary;
        }

        let listeners = self.registry.active_listeners();
        let now = self.clock.now();
        let mut scene: Option<SceneSnapshot> = None;
        let mut matched_by_task: HashMap<TaskTag, HashSet<LayerId>> = HashMap::new();

        for entry in listeners {
            let id = entry.id();
            if !self.limiter.is_due(&entry, now) {
                summary.not_due += 1;
                continue;
            }

            let snapshot = scene.get_or_insert_with(|| self.scene.current_snapshot());
            let layers = matched_by_task
                .entry(entry.task_tag)
                .or_insert_with(|| matched_layers(snapshot, entry.task_tag));
            if layers.is_empty() {
                log::trace!("FpsReporter: no layer for {}, {id} stays due", entry.task_tag);
                summary.empty_match += 1;
                continue;
            }

            // Removed or re-registered since the snapshot was taken.
            if !self.registry.is_current(id, entry.registration) {
                summary.stale += 1;
                continue;
            }

            let fps = self.fps.compute_fps(layers);
            match entry.listener.on_fps_reported(fps) {
                Ok(()) => {
                    self.registry.mark_dispatched(id, entry.registration, now);
                    summary.delivered += 1;
                }
                Err(DeliveryError::Backpressure(_)) => {
                    log::debug!("FpsReporter: {id} queue is full, dropped {fps:.1} fps");
                    self.registry.mark_dispatched(id, entry.registration, now);
                    summary.backpressured += 1;
                }
                Err(err @ DeliveryError::ListenerDead(_)) => {
                    log::warn!("FpsReporter: {err}, dropping it");
                    if let Some(removed) = self.registry.remove_if_current(id, entry.registration)
                    {
                        removed.listener.unlink_to_death(removed.registration);
                        summary.removed_dead += 1;
                    }
                }
            }
        }

        log::debug!("FpsReporter: cycle done {summary:?}");
        summary
    }

    fn process_death_notifications(&self) -> usize {
        let mut removed = 0;
        for event in self.deaths.drain() {
            match event {
                ListenerEvent::Died { id, registration } => {
                    match self.registry.remove_if_current(id, registration) {
                        Some(entry) => {
                            entry.listener.unlink_to_death(entry.registration);
                            log::info!("FpsReporter: {id} died, removed");
                            removed += 1;
                        }
                        None => log::debug!(
                            "FpsReporter: ignoring death of {id} (registration {registration}), \
                             no longer subscribed"
                        ),
                    }
                }
            }
        }
        removed
    }
}
