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

//! Per-listener rate limiting.

use std::time::{Duration, Instant};

use crate::registry::ListenerEntry;

/// Minimum time between two deliveries to the same listener.
pub const MIN_REPORT_PERIOD: Duration = Duration::from_millis(600);

/// Decides whether a listener is due for a fresh computation.
///
/// The limiter has no state of its own: it reads the last dispatch time
/// stored in the listener's entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    min_period: Duration,
}

impl RateLimiter {
    /// Creates a limiter with the given window.
    pub const fn new(min_period: Duration) -> Self {
        Self { min_period }
    }

    /// The configured window.
    pub fn min_period(&self) -> Duration {
        self.min_period
    }

    /// Returns `true` if `entry` should be dispatched at `now`.
    #[inline]
    pub fn is_due(&self, entry: &ListenerEntry, now: Instant) -> bool {
        self.is_due_since(entry.last_dispatch, now)
    }

    /// Returns `true` if a listener last dispatched at `last_dispatch` is due
    /// at `now`.
    ///
    /// Never-dispatched listeners are always due. The boundary is inclusive:
    /// exactly one window of elapsed time is due.
    pub fn is_due_since(&self, last_dispatch: Option<Instant>, now: Instant) -> bool {
        match last_dispatch {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_period,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MIN_REPORT_PERIOD)
    }
}
