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

//! Background trigger that drives the reporter at a fixed tick rate.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::ReporterConfig;
use crate::reporter::FpsReporter;

/// Runs [`FpsReporter::dispatch_cycle`] on its own thread, once per tick.
///
/// Use this when no display refresh callback is available to drive the
/// reporter. The thread is stopped on [`stop`](Self::stop) or on drop.
pub struct ReporterService {
    reporter: Arc<FpsReporter>,
    tick_interval: Duration,
    running: Arc<AtomicBool>,
    cycles: Arc<AtomicU64>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ReporterService {
    /// Creates a stopped service ticking at `config.tick_rate_hz`.
    pub fn new(reporter: Arc<FpsReporter>, config: &ReporterConfig) -> Self {
        Self {
            reporter,
            tick_interval: config.tick_interval(),
            running: Arc::new(AtomicBool::new(false)),
            cycles: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Starts the dispatch thread. Does nothing if already running.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let running = Arc::clone(&self.running);
        let cycles = Arc::clone(&self.cycles);
        let reporter = Arc::clone(&self.reporter);
        let tick_interval = self.tick_interval;

        let handle = thread::spawn(move || {
            log::info!("ReporterService thread started ({tick_interval:?} per tick).");

            while running.load(Ordering::Relaxed) {
                let start_time = Instant::now();

                let summary = reporter.dispatch_cycle();
                cycles.fetch_add(1, Ordering::Relaxed);
                if summary.delivered > 0 || summary.removed_dead > 0 {
                    log::trace!("ReporterService: {summary:?}");
                }

                let elapsed = start_time.elapsed();
                if elapsed < tick_interval {
                    thread::sleep(tick_interval - elapsed);
                }
            }
            log::info!("ReporterService thread stopped.");
        });

        self.handle = Some(handle);
    }

    /// Stops the dispatch thread and waits for it to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("ReporterService thread panicked.");
            }
        }
    }

    /// Returns `true` while the dispatch thread is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// The reporter driven by this service.
    pub fn reporter(&self) -> &Arc<FpsReporter> {
        &self.reporter
    }
}

impl std::fmt::Debug for ReporterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterService")
            .field("tick_interval", &self.tick_interval)
            .field("running", &self.is_running())
            .field("cycles", &self.cycles())
            .finish()
    }
}

impl Drop for ReporterService {
    fn drop(&mut self) {
        self.stop();
    }
}
