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

//! Scene-side logic of the reporter: mapping a task tag to the layers that
//! make up the task, plus a small in-memory layer tree.

#![warn(missing_docs)]

pub mod matcher;
pub mod tree;

pub use matcher::matched_layers;
pub use tree::{LayerTree, SceneError};
