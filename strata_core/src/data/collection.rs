// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared collection graph.
//!
//! Collections form a DAG: one collection may be linked as a child of several
//! parents. The store owns every collection; views only hold
//! [`CollectionId`] handles into it and mirror the part reachable from their
//! scene's master collection.

use alloc::string::String;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{CollectionId, DataId};
use crate::dirty;
use crate::error::LinkError;

bitflags::bitflags! {
    /// Restriction and role flags of a collection.
    ///
    /// The `RESTRICT_*` bits are inherited: every object reachable below a
    /// restricted collection is restricted on that path.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CollectionFlags: u8 {
        /// Objects are hidden in the viewport.
        const RESTRICT_VIEW = 1 << 0;
        /// Objects cannot be selected.
        const RESTRICT_SELECT = 1 << 1;
        /// Objects are not rendered.
        const RESTRICT_RENDER = 1 << 2;
        /// The scene's root collection. Its own restriction bits are not
        /// inherited.
        const MASTER = 1 << 7;

        /// All inheritable restriction bits.
        const RESTRICT_ALL = Self::RESTRICT_VIEW.bits()
            | Self::RESTRICT_SELECT.bits()
            | Self::RESTRICT_RENDER.bits();
    }
}

/// One collection.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    /// User-visible name.
    pub name: String,
    /// Restriction flags.
    pub flags: CollectionFlags,
    children: Vec<CollectionId>,
    parents: Vec<CollectionId>,
    objects: Vec<DataId>,
}

impl Collection {
    /// Child collections in link order.
    #[must_use]
    pub fn children(&self) -> &[CollectionId] {
        &self.children
    }

    /// Parent collections in link order.
    #[must_use]
    pub fn parents(&self) -> &[CollectionId] {
        &self.parents
    }

    /// Directly contained objects in link order.
    #[must_use]
    pub fn objects(&self) -> &[DataId] {
        &self.objects
    }

    /// Returns whether this is a scene's master collection.
    #[must_use]
    pub fn is_master(&self) -> bool {
        self.flags.contains(CollectionFlags::MASTER)
    }
}

/// Raw collection slot indices marked on each channel since the last
/// [`CollectionStore::take_changes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionChanges {
    /// Collections whose links changed, or that were created or destroyed.
    pub hierarchy: Vec<u32>,
    /// Collections whose object list changed.
    pub contents: Vec<u32>,
    /// Collections whose effective restriction may have changed (including
    /// descendants of the collection that was modified).
    pub restrict: Vec<u32>,
}

impl CollectionChanges {
    /// Returns whether no channel was marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty() && self.contents.is_empty() && self.restrict.is_empty()
    }
}

/// Storage for the collection DAG.
#[derive(Debug)]
pub struct CollectionStore {
    entries: Vec<Option<Collection>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    dirty: DirtyTracker<u32>,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    // -- Allocation --

    /// Creates an unlinked collection.
    pub fn create(&mut self, name: impl Into<String>) -> CollectionId {
        self.insert(Collection {
            name: name.into(),
            ..Collection::default()
        })
    }

    /// Creates a scene master collection.
    pub fn create_master(&mut self, name: impl Into<String>) -> CollectionId {
        self.insert(Collection {
            name: name.into(),
            flags: CollectionFlags::MASTER,
            ..Collection::default()
        })
    }

    /// Destroys a collection, unlinking it from all parents and children.
    ///
    /// Views that mirror it keep a stale handle until their next sync, which
    /// prunes the mirror. Returns `false` for stale handles.
    pub fn destroy(&mut self, id: CollectionId) -> bool {
        let Some(collection) = self.get(id) else {
            return false;
        };
        let parents = collection.parents.clone();
        let children = collection.children.clone();
        for parent in parents {
            let _ = self.unlink_child(parent, id);
        }
        for child in children {
            let _ = self.unlink_child(id, child);
        }

        self.dirty.remove_key(id.idx);
        self.entries[id.idx as usize] = None;
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
        self.dirty.mark(id.idx, dirty::HIERARCHY);
        true
    }

    /// Returns whether the given handle refers to a live collection.
    #[must_use]
    pub fn is_alive(&self, id: CollectionId) -> bool {
        (id.idx as usize) < self.entries.len()
            && self.generation[id.idx as usize] == id.generation
            && self.entries[id.idx as usize].is_some()
    }

    /// Returns the collection for `id`, or `None` if the handle is stale.
    #[must_use]
    pub fn get(&self, id: CollectionId) -> Option<&Collection> {
        if self.is_alive(id) {
            self.entries[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// Iterates all live collections.
    pub fn iter(&self) -> impl Iterator<Item = (CollectionId, &Collection)> {
        self.entries.iter().enumerate().filter_map(|(idx, e)| {
            e.as_ref().map(|c| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "slot count is bounded by u32 allocation"
                )]
                let idx = idx as u32;
                (CollectionId::new(idx, self.generation[idx as usize]), c)
            })
        })
    }

    // -- Topology --

    /// Links `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if either handle is stale, `child` is a master collection, the
    /// link already exists, or the link would make `parent` its own
    /// descendant.
    pub fn link_child(&mut self, parent: CollectionId, child: CollectionId) -> Result<(), LinkError> {
        let (Some(p), Some(c)) = (self.get(parent), self.get(child)) else {
            return Err(LinkError::StaleCollection);
        };
        if c.is_master() {
            return Err(LinkError::MasterAsChild);
        }
        if p.children.contains(&child) {
            return Err(LinkError::AlreadyLinked);
        }
        if parent == child || self.is_descendant(parent, child) {
            return Err(LinkError::Cycle);
        }

        self.slot_mut(parent).children.push(child);
        self.slot_mut(child).parents.push(parent);

        // Child depends on parent for inherited restrictions.
        let _ = self.dirty.add_dependency(child.idx, parent.idx, dirty::RESTRICT);
        self.dirty.mark_with(child.idx, dirty::RESTRICT, &EagerPolicy);
        self.dirty.mark(parent.idx, dirty::HIERARCHY);
        Ok(())
    }

    /// Removes the link from `parent` to `child`.
    ///
    /// # Errors
    ///
    /// Fails if either handle is stale or the link does not exist.
    pub fn unlink_child(&mut self, parent: CollectionId, child: CollectionId) -> Result<(), LinkError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(LinkError::StaleCollection);
        }
        let children = &mut self.slot_mut(parent).children;
        let Some(pos) = children.iter().position(|&c| c == child) else {
            return Err(LinkError::NotLinked);
        };
        children.remove(pos);
        self.slot_mut(child).parents.retain(|&p| p != parent);

        self.dirty.remove_dependency(child.idx, parent.idx, dirty::RESTRICT);
        self.dirty.mark_with(child.idx, dirty::RESTRICT, &EagerPolicy);
        self.dirty.mark(parent.idx, dirty::HIERARCHY);
        Ok(())
    }

    /// Moves `child` to position `index` among `parent`'s children.
    ///
    /// # Errors
    ///
    /// Fails if either handle is stale or the link does not exist.
    pub fn move_child(
        &mut self,
        parent: CollectionId,
        child: CollectionId,
        index: usize,
    ) -> Result<(), LinkError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(LinkError::StaleCollection);
        }
        let children = &mut self.slot_mut(parent).children;
        let Some(pos) = children.iter().position(|&c| c == child) else {
            return Err(LinkError::NotLinked);
        };
        children.remove(pos);
        let index = index.min(children.len());
        children.insert(index, child);
        self.dirty.mark(parent.idx, dirty::HIERARCHY);
        Ok(())
    }

    /// Returns whether `node` is reachable from `ancestor` through child links.
    #[must_use]
    pub fn is_descendant(&self, node: CollectionId, ancestor: CollectionId) -> bool {
        let Some(start) = self.get(ancestor) else {
            return false;
        };
        let mut stack: Vec<CollectionId> = start.children.clone();
        let mut seen: hashbrown::HashSet<CollectionId> = hashbrown::HashSet::new();
        while let Some(id) = stack.pop() {
            if id == node {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(c) = self.get(id) {
                stack.extend_from_slice(&c.children);
            }
        }
        false
    }

    // -- Contents --

    /// Adds `object` to `collection`. Returns `false` if the handle is stale
    /// or the object is already a direct member.
    pub fn add_object(&mut self, collection: CollectionId, object: DataId) -> bool {
        if !self.is_alive(collection) {
            return false;
        }
        let objects = &mut self.slot_mut(collection).objects;
        if objects.contains(&object) {
            return false;
        }
        objects.push(object);
        self.dirty.mark(collection.idx, dirty::CONTENTS);
        true
    }

    /// Removes `object` from `collection`. Returns `false` if it was not a
    /// direct member.
    pub fn remove_object(&mut self, collection: CollectionId, object: DataId) -> bool {
        if !self.is_alive(collection) {
            return false;
        }
        let objects = &mut self.slot_mut(collection).objects;
        let Some(pos) = objects.iter().position(|&o| o == object) else {
            return false;
        };
        objects.remove(pos);
        self.dirty.mark(collection.idx, dirty::CONTENTS);
        true
    }

    /// Removes `object` from every collection that contains it.
    pub fn remove_object_everywhere(&mut self, object: DataId) {
        let holders: Vec<CollectionId> = self
            .iter()
            .filter(|(_, c)| c.objects.contains(&object))
            .map(|(id, _)| id)
            .collect();
        for id in holders {
            self.remove_object(id, object);
        }
    }

    // -- Properties --

    /// Replaces the restriction flags of `collection`, keeping its
    /// [`MASTER`](CollectionFlags::MASTER) bit. Returns `false` for stale
    /// handles.
    pub fn set_restrict(&mut self, collection: CollectionId, restrict: CollectionFlags) -> bool {
        if !self.is_alive(collection) {
            return false;
        }
        let slot = self.slot_mut(collection);
        slot.flags = (slot.flags & CollectionFlags::MASTER) | (restrict & CollectionFlags::RESTRICT_ALL);
        self.dirty.mark_with(collection.idx, dirty::RESTRICT, &EagerPolicy);
        true
    }

    /// Renames `collection`. Returns `false` for stale handles.
    pub fn rename(&mut self, collection: CollectionId, name: impl Into<String>) -> bool {
        if !self.is_alive(collection) {
            return false;
        }
        self.slot_mut(collection).name = name.into();
        true
    }

    // -- Change tracking --

    /// Drains every dirty channel.
    pub fn take_changes(&mut self) -> CollectionChanges {
        let restrict: Vec<u32> = self
            .dirty
            .drain(dirty::RESTRICT)
            .affected()
            .deterministic()
            .run()
            .collect();
        let hierarchy: Vec<u32> = self
            .dirty
            .drain(dirty::HIERARCHY)
            .deterministic()
            .run()
            .collect();
        let contents: Vec<u32> = self
            .dirty
            .drain(dirty::CONTENTS)
            .deterministic()
            .run()
            .collect();
        CollectionChanges {
            hierarchy,
            contents,
            restrict,
        }
    }

    // -- Internal helpers --

    fn insert(&mut self, collection: Collection) -> CollectionId {
        let id = if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(collection);
            CollectionId::new(idx, self.generation[idx as usize])
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX collections is not supported"
            )]
            let idx = self.entries.len() as u32;
            self.entries.push(Some(collection));
            self.generation.push(0);
            CollectionId::new(idx, 0)
        };
        self.dirty.mark(id.idx, dirty::HIERARCHY);
        id
    }

    /// Panics if the handle is stale.
    fn slot_mut(&mut self, id: CollectionId) -> &mut Collection {
        assert!(self.is_alive(id), "stale CollectionId: {id:?}");
        self.entries[id.idx as usize]
            .as_mut()
            .unwrap_or_else(|| unreachable!("live slot is occupied"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(idx: u32) -> DataId {
        DataId::new(idx, 0)
    }

    #[test]
    fn link_records_both_directions() {
        let mut store = CollectionStore::new();
        let root = store.create_master("Scene Collection");
        let a = store.create("A");
        store.link_child(root, a).unwrap();

        assert_eq!(store.get(root).unwrap().children(), &[a]);
        assert_eq!(store.get(a).unwrap().parents(), &[root]);
    }

    #[test]
    fn link_rejects_duplicates_and_cycles() {
        let mut store = CollectionStore::new();
        let a = store.create("A");
        let b = store.create("B");
        let c = store.create("C");
        store.link_child(a, b).unwrap();
        store.link_child(b, c).unwrap();

        assert_eq!(store.link_child(a, b), Err(LinkError::AlreadyLinked));
        assert_eq!(store.link_child(c, a), Err(LinkError::Cycle));
        assert_eq!(store.link_child(a, a), Err(LinkError::Cycle));
    }

    #[test]
    fn link_rejects_master_as_child() {
        let mut store = CollectionStore::new();
        let master = store.create_master("Scene Collection");
        let a = store.create("A");
        assert_eq!(store.link_child(a, master), Err(LinkError::MasterAsChild));
    }

    #[test]
    fn shared_child_has_two_parents() {
        let mut store = CollectionStore::new();
        let root = store.create_master("Scene Collection");
        let a = store.create("A");
        let c = store.create("C");
        store.link_child(root, a).unwrap();
        store.link_child(root, c).unwrap();
        store.link_child(c, a).unwrap();

        assert_eq!(store.get(a).unwrap().parents(), &[root, c]);
        assert!(store.is_descendant(a, c));
        assert!(!store.is_descendant(c, a));
    }

    #[test]
    fn destroy_unlinks_and_stales_handle() {
        let mut store = CollectionStore::new();
        let root = store.create_master("Scene Collection");
        let a = store.create("A");
        let b = store.create("B");
        store.link_child(root, a).unwrap();
        store.link_child(a, b).unwrap();

        assert!(store.destroy(a));
        assert!(!store.is_alive(a));
        assert!(store.get(root).unwrap().children().is_empty());
        assert!(store.get(b).unwrap().parents().is_empty());
        assert!(!store.destroy(a), "second destroy is a no-op");
    }

    #[test]
    fn objects_are_unique_per_collection() {
        let mut store = CollectionStore::new();
        let a = store.create("A");
        assert!(store.add_object(a, object(1)));
        assert!(!store.add_object(a, object(1)));
        assert!(store.remove_object(a, object(1)));
        assert!(!store.remove_object(a, object(1)));
    }

    #[test]
    fn remove_object_everywhere_clears_all_holders() {
        let mut store = CollectionStore::new();
        let a = store.create("A");
        let b = store.create("B");
        store.add_object(a, object(4));
        store.add_object(b, object(4));
        store.remove_object_everywhere(object(4));
        assert!(store.get(a).unwrap().objects().is_empty());
        assert!(store.get(b).unwrap().objects().is_empty());
    }

    #[test]
    fn set_restrict_keeps_master_bit() {
        let mut store = CollectionStore::new();
        let master = store.create_master("Scene Collection");
        store.set_restrict(master, CollectionFlags::RESTRICT_RENDER | CollectionFlags::MASTER);
        let flags = store.get(master).unwrap().flags;
        assert!(flags.contains(CollectionFlags::MASTER));
        assert!(flags.contains(CollectionFlags::RESTRICT_RENDER));

        let a = store.create("A");
        store.set_restrict(a, CollectionFlags::MASTER);
        assert!(!store.get(a).unwrap().is_master(), "MASTER cannot be set");
    }

    #[test]
    fn move_child_reorders() {
        let mut store = CollectionStore::new();
        let root = store.create_master("Scene Collection");
        let a = store.create("A");
        let b = store.create("B");
        store.link_child(root, a).unwrap();
        store.link_child(root, b).unwrap();
        store.move_child(root, b, 0).unwrap();
        assert_eq!(store.get(root).unwrap().children(), &[b, a]);
    }

    #[test]
    fn changes_are_drained_once() {
        let mut store = CollectionStore::new();
        let root = store.create_master("Scene Collection");
        let a = store.create("A");
        let _ = store.take_changes();
        assert!(store.take_changes().is_empty());

        store.link_child(root, a).unwrap();
        store.add_object(a, object(0));
        let changes = store.take_changes();
        assert!(changes.hierarchy.contains(&root.index()));
        assert!(changes.contents.contains(&a.index()));
        assert!(store.take_changes().is_empty());
    }

    #[test]
    fn restrict_change_marks_descendants() {
        let mut store = CollectionStore::new();
        let root = store.create_master("Scene Collection");
        let a = store.create("A");
        let b = store.create("B");
        store.link_child(root, a).unwrap();
        store.link_child(a, b).unwrap();
        let _ = store.take_changes();

        store.set_restrict(a, CollectionFlags::RESTRICT_VIEW);
        let changes = store.take_changes();
        assert!(changes.restrict.contains(&a.index()));
        assert!(
            changes.restrict.contains(&b.index()),
            "restriction propagates to descendants"
        );
    }
}
