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

//! The contract for turning a set of layers into a frame rate.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use crate::scene::LayerId;

/// Computes an aggregate frame rate over a set of layers.
///
/// The implementation usually lives next to the frame timeline that records
/// presentation times. It is assumed to always succeed; a set with no
/// recorded frames simply yields `0.0`.
pub trait FpsComputer: Send + Sync + Debug {
    /// Returns the aggregate fps of `layers`.
    fn compute_fps(&self, layers: &HashSet<LayerId>) -> f32;
}

impl<T: FpsComputer + ?Sized> FpsComputer for Arc<T> {
    fn compute_fps(&self, layers: &HashSet<LayerId>) -> f32 {
        (**self).compute_fps(layers)
    }
}
