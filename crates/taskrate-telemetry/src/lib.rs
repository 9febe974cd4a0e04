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

//! Per-task fps reporting.
//!
//! The [`FpsReporter`] keeps a registry of listeners, each subscribed to one
//! task, and on every dispatch cycle reports a freshly computed frame rate to
//! the listeners whose rate-limit window has elapsed.

#![warn(missing_docs)]

pub mod config;
pub mod rate_limit;
pub mod registry;
pub mod reporter;
pub mod service;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ReporterConfig};
pub use rate_limit::{RateLimiter, MIN_REPORT_PERIOD};
pub use registry::{ListenerEntry, ListenerRegistry};
pub use reporter::{DispatchSummary, FpsReporter};
pub use service::ReporterService;
pub use transport::{ChannelListener, FpsReceiver};
