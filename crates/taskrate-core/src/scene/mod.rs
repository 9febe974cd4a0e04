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

//! Read-only scene graph contracts.
//!
//! The scene graph itself is owned elsewhere. This module only defines what
//! the reporter needs from it: layer identity, the optional task tag, the
//! child links, and a way to take a consistent snapshot.

mod layer;
mod snapshot;

pub use self::layer::{LayerId, LayerNode, TaskTag};
pub use self::snapshot::{SceneGraphView, SceneSnapshot};
