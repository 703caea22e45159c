// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object view records and their lookup caches.
//!
//! A [`BaseRegistry`] keeps:
//!
//! - **The list**: bases in sync order. This is the source of truth.
//! - **The hash index**: object → base, built lazily on first lookup. With
//!   the `std` feature the index lives in a `OnceLock`, so concurrent first
//!   lookups from several threads build it exactly once.
//! - **The array cache**: a dense copy of the list for position-addressed
//!   access, rebuilt by evaluation and dropped by every sync.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::data::{BaseId, DataId, IdStore, ObjectType};

#[cfg(feature = "std")]
type IndexCell = std::sync::OnceLock<HashMap<DataId, BaseId>>;
#[cfg(not(feature = "std"))]
type IndexCell = core::cell::OnceCell<HashMap<DataId, BaseId>>;

bitflags::bitflags! {
    /// Selection and visibility state of a base.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BaseFlags: u8 {
        /// The object is selected.
        const SELECTED = 1 << 0;
        /// The object may be selected.
        const SELECTABLE = 1 << 1;
        /// The object is visible in the current evaluation mode.
        const VISIBLE = 1 << 2;
        /// The object is visible in the viewport.
        const VISIBLE_VIEWPORT = 1 << 3;
        /// The object is visible in renders.
        const VISIBLE_RENDER = 1 << 4;

        /// The bits recomputed by every sync.
        const SYNCED = Self::SELECTABLE.bits()
            | Self::VISIBLE.bits()
            | Self::VISIBLE_VIEWPORT.bits()
            | Self::VISIBLE_RENDER.bits();
    }
}

/// One object's state within one view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Base {
    pub(crate) object: DataId,
    pub(crate) flags: BaseFlags,
}

impl Base {
    /// The object this base represents.
    #[must_use]
    pub fn object(&self) -> DataId {
        self.object
    }

    /// Current flags.
    #[must_use]
    pub fn flags(&self) -> BaseFlags {
        self.flags
    }

    /// Returns whether the object is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.flags.contains(BaseFlags::SELECTED)
    }

    /// Returns whether the object is visible in the current evaluation mode.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(BaseFlags::VISIBLE)
    }
}

/// The flat base list of a view plus its lookup caches.
#[derive(Debug, Default)]
pub struct BaseRegistry {
    entries: Vec<Option<Base>>,
    generation: Vec<u32>,
    /// Sync epoch in which each slot was last placed.
    placed: Vec<u64>,
    free_list: Vec<u32>,
    order: Vec<BaseId>,
    index: IndexCell,
    array: Option<Box<[BaseId]>>,
    active: Option<BaseId>,
    epoch: u64,
}

impl BaseRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether there are no bases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the base for `id`, or `None` if the handle is stale.
    #[must_use]
    pub fn get(&self, id: BaseId) -> Option<&Base> {
        if self.is_alive(id) {
            self.entries[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, id: BaseId) -> Option<&mut Base> {
        if self.is_alive(id) {
            self.entries[id.idx as usize].as_mut()
        } else {
            None
        }
    }

    /// Returns whether `id` refers to a live base.
    #[must_use]
    pub fn is_alive(&self, id: BaseId) -> bool {
        (id.idx as usize) < self.entries.len()
            && self.generation[id.idx as usize] == id.generation
            && self.entries[id.idx as usize].is_some()
    }

    /// Base handles in list order.
    #[must_use]
    pub fn order(&self) -> &[BaseId] {
        &self.order
    }

    /// Iterates bases in list order.
    pub fn iter(&self) -> impl Iterator<Item = (BaseId, &Base)> {
        self.order
            .iter()
            .filter_map(|&id| self.get(id).map(|base| (id, base)))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Base> {
        self.entries.iter_mut().flatten()
    }

    // -- Hash index --

    /// Returns the base representing `object`.
    ///
    /// Builds the hash index on first use. Returns `None` when the object has
    /// no base in this view, including when the registry is empty.
    #[must_use]
    pub fn find(&self, object: DataId) -> Option<BaseId> {
        self.index().get(&object).copied()
    }

    /// Number of entries in the hash index (builds it if absent).
    #[must_use]
    pub fn index_len(&self) -> usize {
        self.index().len()
    }

    /// Returns whether the hash index is currently built.
    #[must_use]
    pub fn has_index(&self) -> bool {
        self.index.get().is_some()
    }

    fn index(&self) -> &HashMap<DataId, BaseId> {
        self.index.get_or_init(|| self.build_index())
    }

    fn build_index(&self) -> HashMap<DataId, BaseId> {
        let mut index = HashMap::with_capacity(self.order.len());
        for (id, base) in self.iter() {
            index.insert(base.object, id);
        }
        index
    }

    // -- Array cache --

    /// Drops the array cache and, when `include_index` is set, the hash
    /// index. Returns which caches were present.
    pub fn invalidate_caches(&mut self, include_index: bool) -> (bool, bool) {
        let array = self.array.take().is_some();
        let index = include_index && self.index.take().is_some();
        (array, index)
    }

    /// Rebuilds the dense array from list order.
    pub fn build_array_cache(&mut self) {
        self.array = Some(self.order.clone().into_boxed_slice());
    }

    /// The dense array, if built since the last sync.
    #[must_use]
    pub fn array_cache(&self) -> Option<&[BaseId]> {
        self.array.as_deref()
    }

    /// Returns the base at `position` in the array cache.
    #[must_use]
    pub fn base_at(&self, position: usize) -> Option<BaseId> {
        self.array.as_deref().and_then(|a| a.get(position).copied())
    }

    // -- Selection --

    /// The active base.
    #[must_use]
    pub fn active(&self) -> Option<BaseId> {
        self.active
    }

    /// Clears [`SELECTED`](BaseFlags::SELECTED) on every base. Returns whether
    /// anything changed.
    pub fn deselect_all(&mut self) -> bool {
        let mut changed = false;
        for base in self.iter_mut() {
            changed |= base.flags.contains(BaseFlags::SELECTED);
            base.flags.remove(BaseFlags::SELECTED);
        }
        changed
    }

    /// Makes `id` the active base and selects it if it is selectable.
    ///
    /// Returns whether the base ended up selected. Stale handles are ignored.
    pub fn select_base(&mut self, id: BaseId) -> bool {
        let Some(base) = self.get_mut(id) else {
            return false;
        };
        if base.flags.contains(BaseFlags::SELECTABLE) {
            base.flags.insert(BaseFlags::SELECTED);
        }
        let selected = base.is_selected();
        self.active = Some(id);
        selected
    }

    /// Returns the first base, in list order, whose object is a camera.
    #[must_use]
    pub fn camera_find(&self, ids: &IdStore) -> Option<BaseId> {
        self.iter()
            .find(|(_, base)| {
                ids.object(base.object)
                    .is_some_and(|o| o.object_type == ObjectType::Camera)
            })
            .map(|(id, _)| id)
    }

    // -- Sync support --

    /// Starts a sync pass: drops the array cache, clears the synced bits and
    /// hands out the hash index for the duration of the pass.
    pub(crate) fn begin_sync(&mut self) -> HashMap<DataId, BaseId> {
        self.array = None;
        self.epoch += 1;
        for base in self.iter_mut() {
            base.flags.remove(BaseFlags::SYNCED);
        }
        match self.index.take() {
            Some(index) => index,
            None => self.build_index(),
        }
    }

    /// Places `object` in the sync pass, creating its base if needed.
    ///
    /// Each base is appended to `fresh` at most once per pass. Returns the
    /// base and whether it was created.
    pub(crate) fn place(
        &mut self,
        object: DataId,
        index: &mut HashMap<DataId, BaseId>,
        fresh: &mut Vec<BaseId>,
    ) -> (BaseId, bool) {
        if let Some(&id) = index.get(&object) {
            if self.placed[id.idx as usize] != self.epoch {
                self.placed[id.idx as usize] = self.epoch;
                fresh.push(id);
            }
            return (id, false);
        }
        let id = self.alloc(object);
        index.insert(object, id);
        fresh.push(id);
        (id, true)
    }

    pub(crate) fn or_flags(&mut self, id: BaseId, flags: BaseFlags) {
        if let Some(base) = self.get_mut(id) {
            base.flags |= flags;
        }
    }

    /// Ends a sync pass: frees every base not placed during it, replaces the
    /// list with `fresh` and reinstalls the index. Returns the removed bases.
    pub(crate) fn finish_sync(
        &mut self,
        fresh: Vec<BaseId>,
        mut index: HashMap<DataId, BaseId>,
    ) -> Vec<(BaseId, DataId)> {
        let mut removed = Vec::new();
        for &id in &self.order {
            if self.placed[id.idx as usize] == self.epoch {
                continue;
            }
            let Some(base) = self.entries[id.idx as usize].take() else {
                continue;
            };
            index.remove(&base.object);
            self.generation[id.idx as usize] += 1;
            self.free_list.push(id.idx);
            if self.active == Some(id) {
                self.active = None;
            }
            removed.push((id, base.object));
        }
        self.order = fresh;
        self.index = IndexCell::from(index);
        removed
    }

    /// Copies the list, flags and active base. Caches are not copied.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            generation: self.generation.clone(),
            placed: self.placed.clone(),
            free_list: self.free_list.clone(),
            order: self.order.clone(),
            index: IndexCell::new(),
            array: None,
            active: self.active,
            epoch: self.epoch,
        }
    }

    fn alloc(&mut self, object: DataId) -> BaseId {
        let base = Base {
            object,
            flags: BaseFlags::empty(),
        };
        if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(base);
            self.placed[idx as usize] = self.epoch;
            BaseId::new(idx, self.generation[idx as usize])
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX bases is not supported"
            )]
            let idx = self.entries.len() as u32;
            self.entries.push(Some(base));
            self.generation.push(0);
            self.placed.push(self.epoch);
            BaseId::new(idx, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(idx: u32) -> DataId {
        DataId::new(idx, 0)
    }

    /// Runs one sync pass that places `objects` in order.
    fn sync_with(registry: &mut BaseRegistry, objects: &[DataId]) -> Vec<(BaseId, DataId)> {
        let mut index = registry.begin_sync();
        let mut fresh = Vec::new();
        for &ob in objects {
            let (id, _) = registry.place(ob, &mut index, &mut fresh);
            registry.or_flags(id, BaseFlags::SELECTABLE);
        }
        registry.finish_sync(fresh, index)
    }

    #[test]
    fn empty_registry_lookups_are_none() {
        let registry = BaseRegistry::new();
        assert!(registry.find(object(0)).is_none());
        assert!(registry.base_at(0).is_none());
        assert!(registry.array_cache().is_none());
        assert!(registry.is_empty());
    }

    #[cfg(feature = "std")]
    #[test]
    fn concurrent_first_lookups_agree() {
        let mut registry = BaseRegistry::new();
        let objects: Vec<DataId> = (0..64).map(object).collect();
        sync_with(&mut registry, &objects);
        registry.invalidate_caches(true);
        assert!(!registry.has_index());

        let registry = &registry;
        let results: Vec<Vec<Option<BaseId>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| objects.iter().map(|&ob| registry.find(ob)).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let expected: Vec<Option<BaseId>> = registry.order().iter().copied().map(Some).collect();
        for got in &results {
            assert_eq!(got, &expected, "every thread sees the same index");
        }
        assert_eq!(registry.index_len(), objects.len());
    }

    #[test]
    fn placing_twice_keeps_one_base() {
        let mut registry = BaseRegistry::new();
        sync_with(&mut registry, &[object(1), object(2), object(1)]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.index_len(), 2);
    }

    #[test]
    fn unplaced_bases_are_removed() {
        let mut registry = BaseRegistry::new();
        sync_with(&mut registry, &[object(1), object(2)]);
        let b2 = registry.find(object(2)).unwrap();
        registry.select_base(b2);

        let removed = sync_with(&mut registry, &[object(1)]);
        assert_eq!(removed, alloc::vec![(b2, object(2))]);
        assert!(registry.find(object(2)).is_none());
        assert!(!registry.is_alive(b2));
        assert_eq!(registry.active(), None, "active base was removed");
    }

    #[test]
    fn identity_and_selection_survive_resync() {
        let mut registry = BaseRegistry::new();
        sync_with(&mut registry, &[object(1), object(2)]);
        let b1 = registry.find(object(1)).unwrap();
        assert!(registry.select_base(b1));

        sync_with(&mut registry, &[object(2), object(1)]);
        assert_eq!(registry.find(object(1)), Some(b1));
        assert!(registry.get(b1).unwrap().is_selected());
        let order: Vec<DataId> = registry.iter().map(|(_, b)| b.object()).collect();
        assert_eq!(order, alloc::vec![object(2), object(1)]);
    }

    #[test]
    fn sync_drops_array_cache() {
        let mut registry = BaseRegistry::new();
        sync_with(&mut registry, &[object(1)]);
        registry.build_array_cache();
        assert_eq!(registry.array_cache().map(<[BaseId]>::len), Some(1));
        sync_with(&mut registry, &[object(1), object(3)]);
        assert!(registry.array_cache().is_none());
        registry.build_array_cache();
        assert_eq!(registry.array_cache(), Some(registry.order()));
    }

    #[test]
    fn invalidate_reports_dropped_caches() {
        let mut registry = BaseRegistry::new();
        sync_with(&mut registry, &[object(1)]);
        registry.build_array_cache();
        assert_eq!(registry.invalidate_caches(false), (true, false));
        assert!(registry.has_index());
        assert_eq!(registry.invalidate_caches(true), (false, true));
        assert!(!registry.has_index());
        assert!(registry.find(object(1)).is_some(), "index rebuilt lazily");
        assert!(registry.has_index());
    }

    #[test]
    fn select_base_requires_selectable() {
        let mut registry = BaseRegistry::new();
        let mut index = registry.begin_sync();
        let mut fresh = Vec::new();
        let (id, created) = registry.place(object(5), &mut index, &mut fresh);
        assert!(created);
        registry.finish_sync(fresh, index);

        assert!(!registry.select_base(id));
        assert_eq!(registry.active(), Some(id), "still becomes active");
        registry.or_flags(id, BaseFlags::SELECTABLE);
        assert!(registry.select_base(id));
        assert!(registry.deselect_all());
        assert!(!registry.deselect_all());
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut registry = BaseRegistry::new();
        sync_with(&mut registry, &[object(1)]);
        let old = registry.find(object(1)).unwrap();
        sync_with(&mut registry, &[]);
        sync_with(&mut registry, &[object(2)]);
        let new = registry.find(object(2)).unwrap();
        assert_eq!(old.index(), new.index());
        assert!(registry.get(old).is_none());
    }
}
