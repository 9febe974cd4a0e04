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

//! A minimal in-memory layer tree.
//!
//! This is the scene collaborator used by the runtime binary and by tests.
//! It only supports what is needed to describe a hierarchy: creating
//! layers, parenting them and tagging them with a task.

use std::collections::HashMap;

use taskrate_core::scene::{LayerId, LayerNode, SceneGraphView, SceneSnapshot, TaskTag};
use thiserror::Error;

/// Errors raised while editing a [`LayerTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The referenced layer was never spawned.
    #[error("unknown layer {0}")]
    UnknownLayer(LayerId),
    /// Parenting `child` under `parent` would make a layer its own ancestor.
    #[error("parenting {child} under {parent} would create a cycle")]
    WouldCycle {
        /// The requested parent.
        parent: LayerId,
        /// The requested child.
        child: LayerId,
    },
}

#[derive(Debug, Clone)]
struct LayerSlot {
    task_tag: Option<TaskTag>,
    parent: Option<LayerId>,
    children: Vec<LayerId>,
}

/// A mutable layer hierarchy that produces [`SceneSnapshot`]s.
///
/// Layers are kept in creation order, which doubles as z-order.
#[derive(Debug, Clone, Default)]
pub struct LayerTree {
    order: Vec<LayerId>,
    slots: HashMap<LayerId, LayerSlot>,
    next_id: u32,
}

impl LayerTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new root layer and returns its id.
    pub fn spawn(&mut self, task_tag: Option<TaskTag>) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        self.slots.insert(
            id,
            LayerSlot {
                task_tag,
                parent: None,
                children: Vec::new(),
            },
        );
        self.order.push(id);
        id
    }

    /// Makes `child` the last child of `parent`, detaching it from any
    /// previous parent.
    ///
    /// ## Errors
    /// [`SceneError::UnknownLayer`] if either id was never spawned, and
    /// [`SceneError::WouldCycle`] if `child` is `parent` or one of its
    /// ancestors.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) -> Result<(), SceneError> {
        if !self.slots.contains_key(&parent) {
            return Err(SceneError::UnknownLayer(parent));
        }
        if !self.slots.contains_key(&child) {
            return Err(SceneError::UnknownLayer(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::WouldCycle { parent, child });
        }

        if let Some(old_parent) = self.slots.get(&child).and_then(|slot| slot.parent) {
            if let Some(slot) = self.slots.get_mut(&old_parent) {
                slot.children.retain(|&c| c != child);
            }
        }
        if let Some(slot) = self.slots.get_mut(&child) {
            slot.parent = Some(parent);
        }
        if let Some(slot) = self.slots.get_mut(&parent) {
            slot.children.push(child);
        }
        Ok(())
    }

    /// Sets or clears the task tag of a layer.
    pub fn set_task_tag(&mut self, id: LayerId, tag: Option<TaskTag>) -> Result<(), SceneError> {
        let slot = self.slots.get_mut(&id).ok_or(SceneError::UnknownLayer(id))?;
        slot.task_tag = tag;
        Ok(())
    }

    /// Returns the parent of a layer, if it has one.
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.slots.get(&id).and_then(|slot| slot.parent)
    }

    /// Number of layers in the tree.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the tree has no layers.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn is_ancestor_or_self(&self, candidate: LayerId, mut id: LayerId) -> bool {
        loop {
            if id == candidate {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}

impl SceneGraphView for LayerTree {
    fn current_snapshot(&self) -> SceneSnapshot {
        self.order
            .iter()
            .filter_map(|id| {
                self.slots.get(id).map(|slot| LayerNode {
                    id: *id,
                    task_tag: slot.task_tag,
                    children: slot.children.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_assigns_unique_ids_in_order() {
        let mut tree = LayerTree::new();
        let a = tree.spawn(None);
        let b = tree.spawn(Some(TaskTag(1)));
        assert_ne!(a, b);
        assert_eq!(tree.len(), 2);

        let order: Vec<LayerId> = tree.current_snapshot().iter().map(|l| l.id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn add_child_links_both_directions() {
        let mut tree = LayerTree::new();
        let parent = tree.spawn(None);
        let child = tree.spawn(None);
        tree.add_child(parent, child).unwrap();

        assert_eq!(tree.parent(child), Some(parent));
        let snapshot = tree.current_snapshot();
        assert_eq!(snapshot.get(parent).unwrap().children, vec![child]);
    }

    #[test]
    fn reparenting_detaches_from_old_parent() {
        let mut tree = LayerTree::new();
        let first = tree.spawn(None);
        let second = tree.spawn(None);
        let child = tree.spawn(None);
        tree.add_child(first, child).unwrap();
        tree.add_child(second, child).unwrap();

        let snapshot = tree.current_snapshot();
        assert!(snapshot.get(first).unwrap().children.is_empty());
        assert_eq!(snapshot.get(second).unwrap().children, vec![child]);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = LayerTree::new();
        let a = tree.spawn(None);
        let b = tree.spawn(None);
        tree.add_child(a, b).unwrap();

        assert_eq!(
            tree.add_child(b, a),
            Err(SceneError::WouldCycle { parent: b, child: a })
        );
        assert_eq!(
            tree.add_child(a, a),
            Err(SceneError::WouldCycle { parent: a, child: a })
        );
    }

    #[test]
    fn unknown_layers_are_reported() {
        let mut tree = LayerTree::new();
        let a = tree.spawn(None);
        let ghost = LayerId(404);
        assert_eq!(tree.add_child(a, ghost), Err(SceneError::UnknownLayer(ghost)));
        assert_eq!(
            tree.set_task_tag(ghost, Some(TaskTag(1))),
            Err(SceneError::UnknownLayer(ghost))
        );
    }

    #[test]
    fn task_tag_can_be_changed() {
        let mut tree = LayerTree::new();
        let a = tree.spawn(None);
        tree.set_task_tag(a, Some(TaskTag(5))).unwrap();
        assert_eq!(tree.current_snapshot().get(a).unwrap().task_tag, Some(TaskTag(5)));
        tree.set_task_tag(a, None).unwrap();
        assert_eq!(tree.current_snapshot().get(a).unwrap().task_tag, None);
    }
}
