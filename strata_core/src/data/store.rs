// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Datablock storage with allocation and generation checks.

use alloc::string::String;
use alloc::vec::Vec;

use super::id::DataId;
use super::property::PropertyMap;

/// The kind of a datablock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// A scene.
    Scene,
    /// An object placed in collections.
    Object,
    /// Mesh geometry.
    Mesh,
    /// A material.
    Material,
    /// World (environment) settings.
    World,
    /// Camera settings.
    Camera,
    /// An image.
    Image,
}

/// The type of an object, used to group objects entering a mode together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// A mesh object.
    Mesh,
    /// A camera object.
    Camera,
    /// A light object.
    Light,
    /// An empty.
    Empty,
    /// An armature.
    Armature,
    /// A curve object.
    Curve,
}

bitflags::bitflags! {
    /// Interaction modes an object can be in.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjectMode: u16 {
        /// Object mode.
        const OBJECT = 1 << 0;
        /// Edit mode.
        const EDIT = 1 << 1;
        /// Sculpt mode.
        const SCULPT = 1 << 2;
        /// Vertex paint mode.
        const VERTEX_PAINT = 1 << 3;
        /// Weight paint mode.
        const WEIGHT_PAINT = 1 << 4;
        /// Texture paint mode.
        const TEXTURE_PAINT = 1 << 5;
        /// Pose mode.
        const POSE = 1 << 6;
    }
}

/// Object-specific datablock fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectData {
    /// What kind of object this is.
    pub object_type: ObjectType,
    /// The modes the object is currently in.
    pub mode: ObjectMode,
    /// Whether the object comes from a linked library and is not editable.
    pub linked: bool,
}

impl ObjectData {
    /// Creates local object data in object mode.
    #[must_use]
    pub const fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            mode: ObjectMode::OBJECT,
            linked: false,
        }
    }
}

/// One datablock.
#[derive(Clone, Debug, PartialEq)]
pub struct Datablock {
    /// The datablock kind.
    pub kind: IdKind,
    /// The user-visible name.
    pub name: String,
    /// Path-addressed properties.
    pub properties: PropertyMap,
    /// Present exactly when `kind` is [`IdKind::Object`].
    pub object: Option<ObjectData>,
}

/// Storage for all datablocks.
///
/// Datablocks are addressed by [`DataId`] handles. Removed datablocks leave
/// their slot on a free list; generation counters make old handles fail
/// [`is_alive`](Self::is_alive).
#[derive(Clone, Debug, Default)]
pub struct IdStore {
    entries: Vec<Option<Datablock>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
}

impl IdStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a datablock that is not an object.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is [`IdKind::Object`]; use
    /// [`add_object`](Self::add_object) instead.
    pub fn add(&mut self, kind: IdKind, name: impl Into<String>) -> DataId {
        assert!(kind != IdKind::Object, "objects need ObjectData");
        self.insert(Datablock {
            kind,
            name: name.into(),
            properties: PropertyMap::new(),
            object: None,
        })
    }

    /// Adds an object datablock.
    pub fn add_object(&mut self, name: impl Into<String>, data: ObjectData) -> DataId {
        self.insert(Datablock {
            kind: IdKind::Object,
            name: name.into(),
            properties: PropertyMap::new(),
            object: Some(data),
        })
    }

    /// Removes a datablock, returning it. Returns `None` for stale handles.
    pub fn remove(&mut self, id: DataId) -> Option<Datablock> {
        if !self.is_alive(id) {
            return None;
        }
        let block = self.entries[id.idx as usize].take();
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
        block
    }

    /// Returns whether the given handle refers to a live datablock.
    #[must_use]
    pub fn is_alive(&self, id: DataId) -> bool {
        (id.idx as usize) < self.entries.len()
            && self.generation[id.idx as usize] == id.generation
            && self.entries[id.idx as usize].is_some()
    }

    /// Returns the datablock for `id`, or `None` if the handle is stale.
    #[must_use]
    pub fn get(&self, id: DataId) -> Option<&Datablock> {
        if self.is_alive(id) {
            self.entries[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// Returns the datablock for `id` mutably, or `None` if the handle is stale.
    pub fn get_mut(&mut self, id: DataId) -> Option<&mut Datablock> {
        if self.is_alive(id) {
            self.entries[id.idx as usize].as_mut()
        } else {
            None
        }
    }

    /// Returns the object fields of `id`, or `None` if it is not a live object.
    #[must_use]
    pub fn object(&self, id: DataId) -> Option<&ObjectData> {
        self.get(id).and_then(|b| b.object.as_ref())
    }

    /// Returns the object fields of `id` mutably.
    pub fn object_mut(&mut self, id: DataId) -> Option<&mut ObjectData> {
        self.get_mut(id).and_then(|b| b.object.as_mut())
    }

    /// Returns whether `id` is a live object that may be edited (not linked
    /// library data).
    #[must_use]
    pub fn is_editable(&self, id: DataId) -> bool {
        self.object(id).is_some_and(|o| !o.linked)
    }

    /// Iterates all live datablocks.
    pub fn iter(&self) -> impl Iterator<Item = (DataId, &Datablock)> {
        self.entries.iter().enumerate().filter_map(|(idx, e)| {
            e.as_ref().map(|b| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "slot count is bounded by u32 allocation"
                )]
                let idx = idx as u32;
                (DataId::new(idx, self.generation[idx as usize]), b)
            })
        })
    }

    fn insert(&mut self, block: Datablock) -> DataId {
        if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(block);
            DataId::new(idx, self.generation[idx as usize])
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX datablocks is not supported"
            )]
            let idx = self.entries.len() as u32;
            self.entries.push(Some(block));
            self.generation.push(0);
            DataId::new(idx, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut ids = IdStore::new();
        let ob = ids.add_object("Cube", ObjectData::new(ObjectType::Mesh));
        assert!(ids.is_alive(ob));
        assert_eq!(ids.get(ob).map(|b| b.kind), Some(IdKind::Object));
        assert!(ids.remove(ob).is_some());
        assert!(!ids.is_alive(ob));
        assert!(ids.remove(ob).is_none(), "second remove is a no-op");
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut ids = IdStore::new();
        let a = ids.add(IdKind::Material, "A");
        ids.remove(a);
        let b = ids.add(IdKind::Material, "B");
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(ids.get(a).is_none());
        assert_eq!(ids.get(b).map(|x| x.name.as_str()), Some("B"));
    }

    #[test]
    fn linked_objects_are_not_editable() {
        let mut ids = IdStore::new();
        let mut data = ObjectData::new(ObjectType::Empty);
        data.linked = true;
        let linked = ids.add_object("Linked", data);
        let local = ids.add_object("Local", ObjectData::new(ObjectType::Empty));
        let world = ids.add(IdKind::World, "World");
        assert!(!ids.is_editable(linked));
        assert!(ids.is_editable(local));
        assert!(!ids.is_editable(world), "non-objects are never editable objects");
    }

    #[test]
    #[should_panic(expected = "objects need ObjectData")]
    fn add_object_kind_without_data_panics() {
        let mut ids = IdStore::new();
        ids.add(IdKind::Object, "Bad");
    }
}
