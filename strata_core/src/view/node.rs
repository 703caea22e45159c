// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer node arena and the per-node view operations.

use alloc::vec::Vec;

use super::View;
use super::base::BaseFlags;
use super::traverse::Nodes;
use crate::data::{CollectionFlags, CollectionId, CollectionStore, NodeId};

bitflags::bitflags! {
    /// Local, non-inherited state of one layer node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// The node's own objects are left out of the base registry. Child
        /// nodes are unaffected.
        const EXCLUDE = 1 << 0;
    }
}

/// A view's mirror of one reachable collection.
///
/// A collection linked under several parents is mirrored by one node per
/// path, each with independent local flags.
#[derive(Clone, Debug)]
pub struct LayerNode {
    pub(crate) collection: CollectionId,
    pub(crate) children: Vec<NodeId>,
    pub(crate) flags: NodeFlags,
}

impl LayerNode {
    /// The mirrored collection. Stale until the next sync if the collection
    /// was destroyed.
    #[must_use]
    pub fn collection(&self) -> CollectionId {
        self.collection
    }

    /// Child nodes, in the collection's child order as of the last sync.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Local flags.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Returns whether the node is excluded.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.flags.contains(NodeFlags::EXCLUDE)
    }
}

/// Slot storage for layer nodes.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeArena {
    entries: Vec<Option<LayerNode>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub(crate) fn alloc(&mut self, collection: CollectionId, flags: NodeFlags) -> NodeId {
        let node = LayerNode {
            collection,
            children: Vec::new(),
            flags,
        };
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(node);
            NodeId::new(idx, self.generation[idx as usize])
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX layer nodes is not supported"
            )]
            let idx = self.entries.len() as u32;
            self.entries.push(Some(node));
            self.generation.push(0);
            NodeId::new(idx, 0)
        }
    }

    /// Frees `root` and every node below it. Appends each freed node and its
    /// collection to `freed`.
    pub(crate) fn free_subtree(&mut self, root: NodeId, freed: &mut Vec<(NodeId, CollectionId)>) {
        let mut stack = Vec::from([root]);
        while let Some(id) = stack.pop() {
            if !self.is_alive(id) {
                continue;
            }
            let Some(node) = self.entries[id.idx as usize].take() else {
                continue;
            };
            self.generation[id.idx as usize] += 1;
            self.free_list.push(id.idx);
            self.live -= 1;
            freed.push((id, node.collection));
            stack.extend(node.children);
        }
    }

    pub(crate) fn is_alive(&self, id: NodeId) -> bool {
        (id.idx as usize) < self.entries.len()
            && self.generation[id.idx as usize] == id.generation
            && self.entries[id.idx as usize].is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&LayerNode> {
        if self.is_alive(id) {
            self.entries[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn slot_mut(&mut self, id: NodeId) -> &mut LayerNode {
        assert!(self.is_alive(id), "stale NodeId: {id:?}");
        self.entries[id.idx as usize]
            .as_mut()
            .unwrap_or_else(|| unreachable!("live slot is occupied"))
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}

impl View {
    /// Returns the node for `id`, or `None` if the handle is stale.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&LayerNode> {
        self.nodes.get(id)
    }

    /// Top-level nodes. After a sync this is the mirror of the scene's
    /// master collection.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Iterates all nodes depth-first, parents before children.
    #[must_use]
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(&self.nodes, &self.roots)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node at pre-order position `index`.
    #[must_use]
    pub fn node_from_index(&self, index: usize) -> Option<NodeId> {
        self.nodes().nth(index)
    }

    /// Returns the pre-order position of `node`.
    #[must_use]
    pub fn node_index(&self, node: NodeId) -> Option<usize> {
        self.nodes().position(|id| id == node)
    }

    /// Returns the first node, in pre-order, that mirrors `collection`.
    #[must_use]
    pub fn first_node_for_collection(&self, collection: CollectionId) -> Option<NodeId> {
        self.nodes()
            .find(|&id| self.nodes.get(id).is_some_and(|n| n.collection == collection))
    }

    /// Returns whether any node mirrors `collection`.
    #[must_use]
    pub fn has_collection(&self, collection: CollectionId) -> bool {
        self.first_node_for_collection(collection).is_some()
    }

    /// The active node.
    #[must_use]
    pub fn active_node(&self) -> Option<NodeId> {
        self.active_node
    }

    /// Makes `node` active. Excluded or stale nodes are refused.
    pub fn activate(&mut self, node: NodeId) -> bool {
        match self.nodes.get(node) {
            Some(n) if !n.is_excluded() => {
                self.active_node = Some(node);
                true
            }
            _ => false,
        }
    }

    /// Activates the first mirror of `node`'s first parent collection.
    ///
    /// Excluded candidates are skipped by moving further up the first-parent
    /// chain. Falls back to the first root. Returns the new active node.
    pub fn activate_parent(&mut self, collections: &CollectionStore, node: NodeId) -> Option<NodeId> {
        let mut current = self.nodes.get(node).map(|n| n.collection);
        let mut target = None;
        while let Some(collection) = current {
            let parent = collections
                .get(collection)
                .and_then(|c| c.parents().first().copied());
            let Some(parent) = parent else {
                break;
            };
            match self.first_node_for_collection(parent) {
                Some(candidate) if self.nodes.get(candidate).is_some_and(|n| !n.is_excluded()) => {
                    target = Some(candidate);
                    break;
                }
                _ => current = Some(parent),
            }
        }
        self.active_node = target.or_else(|| self.roots.first().copied());
        self.active_node
    }

    /// Sets or clears [`EXCLUDE`](NodeFlags::EXCLUDE) on `node`.
    ///
    /// Takes effect at the next sync. Returns `false` for stale handles.
    pub fn set_exclude(&mut self, node: NodeId, exclude: bool) -> bool {
        if !self.nodes.is_alive(node) {
            return false;
        }
        self.nodes.slot_mut(node).flags.set(NodeFlags::EXCLUDE, exclude);
        self.needs_sync = true;
        true
    }

    /// Selects (or deselects) the objects of `node` and of every node below
    /// it.
    ///
    /// Subtrees whose collection restricts selection are skipped, as are the
    /// direct objects of excluded nodes. Only selectable bases are selected.
    /// Returns whether any base changed.
    pub fn select_node_objects(
        &mut self,
        collections: &CollectionStore,
        node: NodeId,
        deselect: bool,
    ) -> bool {
        let mut changed = false;
        let mut stack = Vec::from([node]);
        while let Some(id) = stack.pop() {
            let Some(n) = self.nodes.get(id) else {
                continue;
            };
            let Some(collection) = collections.get(n.collection) else {
                continue;
            };
            if collection.flags.contains(CollectionFlags::RESTRICT_SELECT) {
                continue;
            }
            if !n.is_excluded() {
                for &object in collection.objects() {
                    let Some(base_id) = self.bases.find(object) else {
                        continue;
                    };
                    let Some(base) = self.bases.get_mut(base_id) else {
                        continue;
                    };
                    if deselect {
                        if base.flags.contains(BaseFlags::SELECTED) {
                            base.flags.remove(BaseFlags::SELECTED);
                            changed = true;
                        }
                    } else if base.flags.contains(BaseFlags::SELECTABLE)
                        && !base.flags.contains(BaseFlags::SELECTED)
                    {
                        base.flags.insert(BaseFlags::SELECTED);
                        changed = true;
                    }
                }
            }
            stack.extend(n.children.iter().rev());
        }
        changed
    }

    /// Returns the chain of nodes from a root down to `node`, inclusive.
    pub(crate) fn node_path(&self, node: NodeId) -> Option<Vec<NodeId>> {
        let mut path = Vec::new();
        // Entries are (node, depth); `path` holds the current branch.
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            path.truncate(depth);
            path.push(id);
            if id == node {
                return Some(path);
            }
            if let Some(n) = self.nodes.get(id) {
                stack.extend(n.children.iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        None
    }
}
