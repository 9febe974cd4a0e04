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

//! A stand-in frame timeline for the demo.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use taskrate_core::scene::LayerId;
use taskrate_core::telemetry::FpsComputer;

/// Reports the mean of the nominal refresh rates assigned to each layer.
///
/// Layers without a rate do not count. A set with no known layer yields
/// `0.0`.
#[derive(Debug, Default)]
pub struct SyntheticTimeline {
    rates: Mutex<HashMap<LayerId, f32>>,
}

impl SyntheticTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nominal fps of `layer`.
    pub fn set_rate(&self, layer: LayerId, fps: f32) {
        self.rates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(layer, fps);
    }
}

impl FpsComputer for SyntheticTimeline {
    fn compute_fps(&self, layers: &HashSet<LayerId>) -> f32 {
        let rates = self.rates.lock().unwrap_or_else(PoisonError::into_inner);
        let (sum, count) = layers
            .iter()
            .filter_map(|id| rates.get(id))
            .fold((0.0f32, 0u32), |(sum, count), fps| (sum + fps, count + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_known_layers() {
        let timeline = SyntheticTimeline::new();
        timeline.set_rate(LayerId(1), 60.0);
        timeline.set_rate(LayerId(2), 30.0);

        let layers = HashSet::from([LayerId(1), LayerId(2), LayerId(3)]);
        assert_eq!(timeline.compute_fps(&layers), 45.0);
    }

    #[test]
    fn unknown_layers_yield_zero() {
        let timeline = SyntheticTimeline::new();
        assert_eq!(timeline.compute_fps(&HashSet::from([LayerId(9)])), 0.0);
        assert_eq!(timeline.compute_fps(&HashSet::new()), 0.0);
    }
}
