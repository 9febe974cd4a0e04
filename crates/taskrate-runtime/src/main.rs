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

// Taskrate demo runtime
// Builds a small scene, subscribes two listeners and lets the reporter run.
//
// Usage: taskrate [config.json]

mod timeline;

use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use taskrate_core::clock::SystemClock;
use taskrate_core::scene::TaskTag;
use taskrate_core::telemetry::ListenerId;
use taskrate_scene::LayerTree;
use taskrate_telemetry::{ChannelListener, FpsReporter, ReporterConfig, ReporterService};

use crate::timeline::SyntheticTimeline;

const VIDEO_TASK: TaskTag = TaskTag(12);
const GAME_TASK: TaskTag = TaskTag(40);
const RUN_TIME: Duration = Duration::from_secs(3);

fn load_config() -> Result<ReporterConfig> {
    match std::env::args().nth(1) {
        Some(path) => ReporterConfig::from_file(&path)
            .with_context(|| format!("failed to load reporter config from {path}")),
        None => Ok(ReporterConfig::default()),
    }
}

fn build_scene(timeline: &SyntheticTimeline) -> Result<LayerTree> {
    let mut tree = LayerTree::new();

    let root = tree.spawn(None);
    let video = tree.spawn(Some(VIDEO_TASK));
    let video_surface = tree.spawn(None);
    let subtitles = tree.spawn(None);
    tree.add_child(root, video)?;
    tree.add_child(video, video_surface)?;
    tree.add_child(video, subtitles)?;

    let game = tree.spawn(Some(GAME_TASK));
    let hud = tree.spawn(None);
    tree.add_child(root, game)?;
    tree.add_child(game, hud)?;

    timeline.set_rate(video_surface, 24.0);
    timeline.set_rate(subtitles, 24.0);
    timeline.set_rate(game, 60.0);
    timeline.set_rate(hud, 30.0);

    Ok(tree)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    log::info!("Reporter config: {config:?}");

    let timeline = Arc::new(SyntheticTimeline::new());
    let scene = Arc::new(RwLock::new(build_scene(&timeline)?));

    let reporter = Arc::new(FpsReporter::with_config(
        &config,
        scene,
        timeline,
        Arc::new(SystemClock),
    ));

    let (video_listener, video_rx) =
        ChannelListener::pair(ListenerId(1), config.listener_queue_capacity);
    let (game_listener, game_rx) =
        ChannelListener::pair(ListenerId(2), config.listener_queue_capacity);
    reporter.add_listener(Arc::new(video_listener), VIDEO_TASK);
    reporter.add_listener(Arc::new(game_listener), GAME_TASK);

    let mut service = ReporterService::new(Arc::clone(&reporter), &config);
    service.start();

    let started = Instant::now();
    let mut game_rx = Some(game_rx);
    while started.elapsed() < RUN_TIME {
        if let Some(fps) = video_rx.recv_timeout(Duration::from_millis(100)) {
            log::info!("{VIDEO_TASK}: {fps:.1} fps");
        }
        if let Some(rx) = &game_rx {
            if let Some(fps) = rx.latest() {
                log::info!("{GAME_TASK}: {fps:.1} fps");
            }
        }
        // Halfway through, the game client goes away.
        if game_rx.is_some() && started.elapsed() >= RUN_TIME / 2 {
            log::info!("Dropping the {GAME_TASK} listener");
            game_rx = None;
        }
        thread::yield_now();
    }

    service.stop();
    log::info!(
        "Ran {} cycles, {} listener(s) still registered",
        service.cycles(),
        reporter.listener_count()
    );
    Ok(())
}
