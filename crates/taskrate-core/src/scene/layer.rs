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

//! Layer identity and the read-only layer record.

use std::fmt;

/// A stable identifier for a layer, unique within a snapshot.
///
/// It stays the same for the whole lifetime of the layer it names, so it can
/// be handed to an fps computer that tracks frames per layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The key grouping all layers that belong to one logical application task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskTag(pub i32);

impl fmt::Display for TaskTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// A read-only view of one layer in the scene graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNode {
    /// The layer's stable identifier.
    pub id: LayerId,
    /// The task this layer was tagged with, if any.
    pub task_tag: Option<TaskTag>,
    /// Direct children, in z-order.
    pub children: Vec<LayerId>,
}

impl LayerNode {
    /// Creates an untagged layer with no children.
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            task_tag: None,
            children: Vec::new(),
        }
    }

    /// Returns the layer with its task tag set.
    pub fn with_task_tag(mut self, tag: TaskTag) -> Self {
        self.task_tag = Some(tag);
        self
    }

    /// Returns the layer with the given children appended.
    pub fn with_children(mut self, children: impl IntoIterator<Item = LayerId>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns `true` if this layer carries exactly `tag`.
    #[inline]
    pub fn is_tagged(&self, tag: TaskTag) -> bool {
        self.task_tag == Some(tag)
    }
}
