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

//! End-to-end scenarios for the fps reporter, driven by a fake clock.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use taskrate_core::clock::FakeClock;
use taskrate_core::scene::{LayerId, SceneGraphView, SceneSnapshot, TaskTag};
use taskrate_core::telemetry::{FpsComputer, FpsListener, ListenerId};
use taskrate_scene::LayerTree;
use taskrate_telemetry::{ChannelListener, FpsReporter};

const TASK: TaskTag = TaskTag(12);

/// Returns scripted values in order and records every layer set it sees.
#[derive(Debug, Default)]
struct ScriptedTimeline {
    values: Mutex<VecDeque<f32>>,
    calls: Mutex<Vec<HashSet<LayerId>>>,
}

impl ScriptedTimeline {
    fn with_values(values: &[f32]) -> Self {
        Self {
            values: Mutex::new(values.iter().copied().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<HashSet<LayerId>> {
        self.calls.lock().unwrap().clone()
    }
}

impl FpsComputer for ScriptedTimeline {
    fn compute_fps(&self, layers: &HashSet<LayerId>) -> f32 {
        self.calls.lock().unwrap().push(layers.clone());
        self.values
            .lock()
            .unwrap()
            .pop_front()
            .expect("fps computer called more often than scripted")
    }
}

#[test]
fn reports_target_subtree_and_stops_after_removal() {
    // Parent -> Target(tag 12) -> Child -> GrandChild, plus an unrelated layer.
    let mut tree = LayerTree::new();
    let parent = tree.spawn(None);
    let target = tree.spawn(Some(TASK));
    let child = tree.spawn(None);
    let grand_child = tree.spawn(None);
    let _unrelated = tree.spawn(None);
    tree.add_child(parent, target).unwrap();
    tree.add_child(target, child).unwrap();
    tree.add_child(child, grand_child).unwrap();

    let clock = FakeClock::new();
    let timeline = Arc::new(ScriptedTimeline::with_values(&[44.0]));
    let reporter = FpsReporter::new(Arc::new(tree), timeline.clone(), Arc::new(clock.clone()));

    let (listener, receiver) = ChannelListener::pair(ListenerId(1), 4);
    reporter.add_listener(Arc::new(listener), TASK);
    clock.advance(Duration::from_millis(600));
    reporter.dispatch_cycle();

    assert_eq!(receiver.try_recv(), Some(44.0));
    assert_eq!(
        timeline.calls(),
        vec![HashSet::from([target, child, grand_child])]
    );

    assert!(reporter.remove_listener(ListenerId(1)));
    clock.advance(Duration::from_millis(600));
    reporter.dispatch_cycle();
    assert_eq!(timeline.calls().len(), 1, "no computation after removal");
}

#[test]
fn rate_limits_deliveries_to_one_per_window() {
    let mut tree = LayerTree::new();
    let target = tree.spawn(Some(TASK));

    let clock = FakeClock::new();
    let timeline = Arc::new(ScriptedTimeline::with_values(&[44.0, 53.0]));
    let reporter = FpsReporter::new(Arc::new(tree), timeline.clone(), Arc::new(clock.clone()));

    let (listener, receiver) = ChannelListener::pair(ListenerId(1), 4);
    reporter.add_listener(Arc::new(listener), TASK);

    clock.advance(Duration::from_millis(600));
    reporter.dispatch_cycle();
    assert_eq!(receiver.latest(), Some(44.0));

    for _ in 0..2 {
        clock.advance(Duration::from_millis(200));
        reporter.dispatch_cycle();
        assert_eq!(receiver.latest(), None, "no delivery inside the window");
    }

    clock.advance(Duration::from_millis(200));
    reporter.dispatch_cycle();
    assert_eq!(receiver.latest(), Some(53.0));
    assert_eq!(timeline.calls(), vec![HashSet::from([target]); 2]);
}

#[test]
fn dropped_receiver_is_removed_through_death_notification() {
    let mut tree = LayerTree::new();
    tree.spawn(Some(TASK));

    let clock = FakeClock::new();
    let timeline = Arc::new(ScriptedTimeline::with_values(&[60.0]));
    let reporter = FpsReporter::new(Arc::new(tree), timeline.clone(), Arc::new(clock.clone()));

    let (gone, gone_rx) = ChannelListener::pair(ListenerId(1), 4);
    let (kept, kept_rx) = ChannelListener::pair(ListenerId(2), 4);
    reporter.add_listener(Arc::new(gone), TASK);
    reporter.add_listener(Arc::new(kept), TASK);
    drop(gone_rx);

    let summary = reporter.dispatch_cycle();
    assert_eq!(summary.removed_dead, 1);
    assert_eq!(summary.delivered, 1);
    assert_eq!(reporter.listener_count(), 1);
    assert_eq!(kept_rx.try_recv(), Some(60.0));
    assert_eq!(timeline.calls().len(), 1);
}

#[test]
fn re_registered_id_survives_death_of_its_previous_receiver() {
    let mut tree = LayerTree::new();
    let target = tree.spawn(Some(TASK));

    let clock = FakeClock::new();
    let timeline = Arc::new(ScriptedTimeline::with_values(&[44.0]));
    let reporter = FpsReporter::new(Arc::new(tree), timeline.clone(), Arc::new(clock.clone()));

    let (old, old_rx) = ChannelListener::pair(ListenerId(1), 4);
    reporter.add_listener(Arc::new(old), TASK);
    drop(old_rx);

    // The client reconnects under the same id before the next cycle runs.
    let (fresh, fresh_rx) = ChannelListener::pair(ListenerId(1), 4);
    let registration = reporter.add_listener(Arc::new(fresh), TASK);

    let summary = reporter.dispatch_cycle();
    assert_eq!(summary.removed_dead, 0);
    assert_eq!(summary.delivered, 1);
    assert_eq!(reporter.listener_count(), 1);
    assert_eq!(reporter.registry().registration(ListenerId(1)), Some(registration));
    assert_eq!(fresh_rx.try_recv(), Some(44.0));
    assert_eq!(timeline.calls(), vec![HashSet::from([target])]);

    // The fresh receiver is still linked: dropping it removes the subscription.
    drop(fresh_rx);
    assert_eq!(reporter.dispatch_cycle().removed_dead, 1);
    assert_eq!(reporter.listener_count(), 0);
}

/// A scene that unregisters a listener while the reporter is reading it,
/// standing in for a removal request racing the dispatch thread.
#[derive(Debug)]
struct RemovingScene {
    reporter: Weak<FpsReporter>,
    victim: ListenerId,
    snapshot: SceneSnapshot,
}

impl SceneGraphView for RemovingScene {
    fn current_snapshot(&self) -> SceneSnapshot {
        if let Some(reporter) = self.reporter.upgrade() {
            reporter.remove_listener(self.victim);
        }
        self.snapshot.clone()
    }
}

#[test]
fn removal_during_cycle_skips_the_removed_listener() {
    let mut tree = LayerTree::new();
    tree.spawn(Some(TASK));
    let snapshot = tree.current_snapshot();

    let clock = FakeClock::new();
    let timeline = Arc::new(ScriptedTimeline::with_values(&[]));
    let reporter = Arc::new_cyclic(|weak| {
        FpsReporter::new(
            Arc::new(RemovingScene {
                reporter: weak.clone(),
                victim: ListenerId(1),
                snapshot,
            }),
            timeline.clone(),
            Arc::new(clock.clone()),
        )
    });

    let (listener, receiver) = ChannelListener::pair(ListenerId(1), 4);
    let listener: Arc<dyn FpsListener> = Arc::new(listener);
    reporter.add_listener(listener, TASK);

    let summary = reporter.dispatch_cycle();
    assert_eq!(summary.stale, 1);
    assert_eq!(summary.delivered, 0);
    assert!(timeline.calls().is_empty());
    assert_eq!(receiver.try_recv(), None);
    assert_eq!(reporter.listener_count(), 0);
}
