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

//! An immutable, arena-backed snapshot of the scene graph.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use super::layer::{LayerId, LayerNode};

/// A frozen copy of every layer in the scene, in z-order.
///
/// Layers live in a flat arena and refer to their children by [`LayerId`];
/// a side index maps each id to its arena slot. Nothing in a snapshot holds a
/// reference to another node, so traversal never deals with lifetimes or
/// reference cycles.
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    layers: Vec<LayerNode>,
    index: HashMap<LayerId, usize>,
}

impl SceneSnapshot {
    /// Builds a snapshot from layers listed in z-order.
    ///
    /// Identifiers are expected to be unique. If one is repeated, the last
    /// occurrence wins the index slot and a warning is logged.
    pub fn new(layers: Vec<LayerNode>) -> Self {
        let mut index = HashMap::with_capacity(layers.len());
        for (slot, layer) in layers.iter().enumerate() {
            if index.insert(layer.id, slot).is_some() {
                log::warn!("SceneSnapshot: duplicate layer id {} in snapshot", layer.id);
            }
        }
        Self { layers, index }
    }

    /// Looks a layer up by id.
    #[inline]
    pub fn get(&self, id: LayerId) -> Option<&LayerNode> {
        self.index.get(&id).map(|&slot| &self.layers[slot])
    }

    /// Iterates every layer in z-order.
    pub fn iter(&self) -> impl Iterator<Item = &LayerNode> {
        self.layers.iter()
    }

    /// Number of layers in the snapshot.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the snapshot has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl FromIterator<LayerNode> for SceneSnapshot {
    fn from_iter<I: IntoIterator<Item = LayerNode>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Read-only access to the current scene graph.
///
/// Implemented by whatever owns the real layer tree. The reporter takes at
/// most one snapshot per dispatch cycle and only when some listener is due.
pub trait SceneGraphView: Send + Sync + Debug {
    /// Returns a snapshot of all layers as they are right now.
    fn current_snapshot(&self) -> SceneSnapshot;
}

impl<T: SceneGraphView + ?Sized> SceneGraphView for Arc<T> {
    fn current_snapshot(&self) -> SceneSnapshot {
        (**self).current_snapshot()
    }
}

impl<T: SceneGraphView> SceneGraphView for RwLock<T> {
    fn current_snapshot(&self) -> SceneSnapshot {
        match self.read() {
            Ok(guard) => guard.current_snapshot(),
            Err(poisoned) => poisoned.into_inner().current_snapshot(),
        }
    }
}

impl SceneGraphView for SceneSnapshot {
    fn current_snapshot(&self) -> SceneSnapshot {
        self.clone()
    }
}
