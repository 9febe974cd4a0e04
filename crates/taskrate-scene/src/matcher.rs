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

//! Finds the layers whose frame rate belongs to a task.

use std::collections::HashSet;

use taskrate_core::scene::{LayerId, SceneSnapshot, TaskTag};

/// Returns every layer that carries `tag` together with all of its
/// descendants.
///
/// Each tagged layer contributes its whole subtree down to the leaves; the
/// result is the union over all tagged layers. Untagged ancestors are never
/// included. A tag carried by no layer yields an empty set.
///
/// The walk uses an explicit stack, so tree depth is unbounded. A layer is
/// expanded only the first time it enters the set, which keeps the cost
/// linear in the size of the matched subtrees and makes a malformed snapshot
/// with a cycle terminate. Child ids missing from the snapshot are skipped.
pub fn matched_layers(snapshot: &SceneSnapshot, tag: TaskTag) -> HashSet<LayerId> {
    let mut matched = HashSet::new();
    let mut stack: Vec<LayerId> = Vec::new();

    for root in snapshot.iter().filter(|layer| layer.is_tagged(tag)) {
        stack.push(root.id);

        while let Some(id) = stack.pop() {
            let Some(layer) = snapshot.get(id) else {
                log::warn!("matched_layers: child {id} has no node in the snapshot");
                continue;
            };
            if matched.insert(id) {
                stack.extend(layer.children.iter().copied());
            }
        }
    }

    matched
}
