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

//! # Taskrate Core
//!
//! Foundational crate containing the traits and core types shared by the
//! frame-rate reporter and its collaborators: the time source, the read-only
//! scene graph view, the fps computer and the listener transport contract.

#![warn(missing_docs)]

pub mod clock;
pub mod event;
pub mod scene;
pub mod telemetry;

pub use clock::{Clock, FakeClock, SystemClock};
pub use scene::{LayerId, LayerNode, SceneGraphView, SceneSnapshot, TaskTag};
pub use telemetry::{
    DeathNotifier, DeliveryError, FpsComputer, FpsListener, ListenerEvent, ListenerId,
};
