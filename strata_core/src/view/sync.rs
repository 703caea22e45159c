// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciling a view's layer tree and base registry with the collection
//! graph.
//!
//! A sync walks the graph from the scene's master collection and, at every
//! level of the mirror:
//!
//! 1. **Prunes** nodes whose collection is no longer a child at that level,
//!    freeing their whole subtree.
//! 2. **Reorders** surviving nodes into the collection's child order and
//!    creates nodes for new children. A new node starts excluded exactly when
//!    its parent node is excluded.
//! 3. **Recurses** into children, carrying the union of restriction bits of
//!    every non-master collection on the path.
//! 4. **Places** the collection's own objects in the base registry, unless the
//!    node is excluded, OR-ing in visibility bits allowed by the accumulated
//!    restrictions.
//!
//! Every sync clears the synced base bits up front, so an object reachable by
//! several paths ends up with the union of what each path grants. Bases that
//! were not placed are removed at the end.

use alloc::vec::Vec;
use core::mem;

use hashbrown::{HashMap, HashSet};

use super::View;
use super::base::BaseFlags;
use super::node::NodeFlags;
use crate::data::{BaseId, CollectionFlags, CollectionId, CollectionStore, DataId, NodeId};
#[cfg(feature = "trace-rich")]
use crate::trace::{BaseChange, BaseChangeKind, NodeChange, NodeChangeKind};
use crate::trace::{CachesInvalidatedEvent, SyncBeginEvent, SyncSummary, Tracer};

/// State shared by every level of one sync pass.
struct SyncPass {
    index: HashMap<DataId, BaseId>,
    fresh: Vec<BaseId>,
    freed: Vec<(NodeId, CollectionId)>,
    summary: SyncSummary,
    #[cfg(feature = "trace-rich")]
    node_changes: Vec<NodeChange>,
    #[cfg(feature = "trace-rich")]
    base_changes: Vec<BaseChange>,
}

/// Base flags granted by a path with the given accumulated restrictions.
fn granted_flags(restrict: CollectionFlags) -> BaseFlags {
    let mut flags = BaseFlags::empty();
    if !restrict.contains(CollectionFlags::RESTRICT_VIEW) {
        flags |= BaseFlags::VISIBLE | BaseFlags::VISIBLE_VIEWPORT;
        if !restrict.contains(CollectionFlags::RESTRICT_SELECT) {
            flags |= BaseFlags::SELECTABLE;
        }
    }
    if !restrict.contains(CollectionFlags::RESTRICT_RENDER) {
        flags |= BaseFlags::VISIBLE_RENDER;
    }
    flags
}

impl View {
    /// Returns whether a node was excluded or included since the last sync.
    #[must_use]
    pub fn needs_sync(&self) -> bool {
        self.needs_sync
    }

    /// Brings the layer tree and base registry in line with the graph below
    /// `master`.
    ///
    /// A stale `master` is treated as an empty graph: every node and base is
    /// removed.
    ///
    /// # Panics
    ///
    /// Panics if a level of the rebuilt tree does not have exactly one node
    /// per child collection.
    pub fn sync(
        &mut self,
        collections: &CollectionStore,
        master: CollectionId,
        tracer: &mut Tracer<'_>,
    ) -> SyncSummary {
        self.sync_count += 1;
        tracer.sync_begin(&SyncBeginEvent {
            sync_index: self.sync_count,
            nodes: self.nodes.len(),
            bases: self.bases.len(),
        });

        if self.bases.array_cache().is_some() {
            tracer.caches_invalidated(&CachesInvalidatedEvent {
                array: true,
                index: false,
            });
        }
        let mut pass = SyncPass {
            index: self.bases.begin_sync(),
            fresh: Vec::with_capacity(self.bases.len()),
            freed: Vec::new(),
            summary: SyncSummary {
                sync_index: self.sync_count,
                ..SyncSummary::default()
            },
            #[cfg(feature = "trace-rich")]
            node_changes: Vec::new(),
            #[cfg(feature = "trace-rich")]
            base_changes: Vec::new(),
        };

        let source: &[CollectionId] = if collections.is_alive(master) {
            core::slice::from_ref(&master)
        } else {
            &[]
        };
        let roots = mem::take(&mut self.roots);
        self.roots = self.sync_level(
            collections,
            source,
            roots,
            &mut pass,
            false,
            CollectionFlags::empty(),
        );

        let SyncPass {
            index,
            fresh,
            freed,
            mut summary,
            ..
        } = pass;
        let removed = self.bases.finish_sync(fresh, index);
        summary.nodes_pruned = freed.len();
        summary.bases_removed = removed.len();

        self.fix_active_node();
        self.needs_sync = false;

        summary.nodes = self.nodes.len();
        summary.bases = self.bases.len();

        #[cfg(feature = "trace-rich")]
        if tracer.is_active() {
            let mut node_changes = pass.node_changes;
            node_changes.extend(freed.iter().map(|&(node, collection)| NodeChange {
                node,
                collection,
                kind: NodeChangeKind::Pruned,
            }));
            let mut base_changes = pass.base_changes;
            base_changes.extend(removed.iter().map(|&(base, object)| BaseChange {
                base,
                object,
                kind: BaseChangeKind::Removed,
            }));
            tracer.node_changes(summary.sync_index, &node_changes);
            tracer.base_changes(summary.sync_index, &base_changes);
        }

        tracer.sync_end(&summary);
        summary
    }

    /// Reconciles one level. `layer` is the level's old node list; the new
    /// list is returned.
    fn sync_level(
        &mut self,
        collections: &CollectionStore,
        source: &[CollectionId],
        layer: Vec<NodeId>,
        pass: &mut SyncPass,
        parent_exclude: bool,
        parent_restrict: CollectionFlags,
    ) -> Vec<NodeId> {
        // Prune.
        let wanted: HashSet<CollectionId> = source.iter().copied().collect();
        let mut existing: HashMap<CollectionId, NodeId> = HashMap::with_capacity(layer.len());
        for node in layer {
            let keep = self
                .nodes
                .get(node)
                .map(|n| n.collection)
                .filter(|c| wanted.contains(c) && collections.is_alive(*c));
            match keep {
                Some(collection) if !existing.contains_key(&collection) => {
                    existing.insert(collection, node);
                }
                _ => self.nodes.free_subtree(node, &mut pass.freed),
            }
        }

        // Reconcile in source order.
        let mut out = Vec::with_capacity(source.len());
        for &collection_id in source {
            let Some(collection) = collections.get(collection_id) else {
                panic!("stale {collection_id:?} linked in collection graph");
            };

            let node_id = if let Some(node) = existing.remove(&collection_id) {
                node
            } else {
                let flags = if parent_exclude {
                    NodeFlags::EXCLUDE
                } else {
                    NodeFlags::empty()
                };
                let node = self.nodes.alloc(collection_id, flags);
                pass.summary.nodes_created += 1;
                #[cfg(feature = "trace-rich")]
                pass.node_changes.push(NodeChange {
                    node,
                    collection: collection_id,
                    kind: NodeChangeKind::Created,
                });
                node
            };

            let exclude = self.nodes.slot_mut(node_id).flags.contains(NodeFlags::EXCLUDE);
            let mut restrict = parent_restrict;
            if !collection.is_master() {
                restrict |= collection.flags & CollectionFlags::RESTRICT_ALL;
            }

            let children = mem::take(&mut self.nodes.slot_mut(node_id).children);
            let children = self.sync_level(
                collections,
                collection.children(),
                children,
                pass,
                exclude,
                restrict,
            );
            self.nodes.slot_mut(node_id).children = children;

            if !exclude {
                let granted = granted_flags(restrict);
                for &object in collection.objects() {
                    let (base, created) = self.bases.place(object, &mut pass.index, &mut pass.fresh);
                    if created {
                        pass.summary.bases_added += 1;
                        #[cfg(feature = "trace-rich")]
                        pass.base_changes.push(BaseChange {
                            base,
                            object,
                            kind: BaseChangeKind::Added,
                        });
                    }
                    self.bases.or_flags(base, granted);
                }
            }

            out.push(node_id);
        }

        assert_eq!(
            out.len(),
            source.len(),
            "layer tree level does not mirror its collection's children"
        );
        out
    }

    /// Keeps the active node valid: a stale (or missing) active node falls
    /// back to the first root; an excluded one moves to its nearest
    /// non-excluded ancestor.
    fn fix_active_node(&mut self) {
        let Some(active) = self.active_node.filter(|&id| self.nodes.is_alive(id)) else {
            self.active_node = self.roots.first().copied();
            return;
        };
        if !self.nodes.get(active).is_some_and(|n| n.is_excluded()) {
            return;
        }
        let ancestor = self.node_path(active).and_then(|path| {
            path.iter()
                .rev()
                .skip(1)
                .copied()
                .find(|&id| self.nodes.get(id).is_some_and(|n| !n.is_excluded()))
        });
        self.active_node = ancestor.or_else(|| self.roots.first().copied());
    }
}
