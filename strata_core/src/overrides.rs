// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named sets of property overrides attached to a view.
//!
//! An [`OverrideSet`] holds two ordered lists of
//! [`DynamicOverrideProperty`] records:
//!
//! - **scene-scoped** properties, applied when a scene is evaluated, and
//! - **collection-scoped** properties, applied to every evaluated object.
//!
//! Each property snapshots a datablock property value when it is added.
//! [`View::apply_overrides`] writes the snapshots onto an evaluated
//! datablock: sets in list order, then properties in list order, so later
//! entries win on the same path.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::data::{CollectionId, DataId, IdKind, IdStore, PropertyValue};
use crate::error::OverrideError;
use crate::naming::unique_name;
use crate::trace::{ApplyOutcome, OverrideApplyEvent, Tracer};
use crate::view::View;

/// Override configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverrideConfig {
    /// Longest array value a property can snapshot.
    pub max_array_len: usize,
    /// Name given to sets added without an explicit name.
    pub default_set_name: &'static str,
}

impl OverrideConfig {
    /// The default configuration: arrays up to 4 elements, sets named
    /// `"OverrideSet"`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_array_len: 4,
            default_set_name: "OverrideSet",
        }
    }

    /// Returns a copy with a different maximum array length.
    #[must_use]
    pub const fn with_max_array_len(mut self, max_array_len: usize) -> Self {
        self.max_array_len = max_array_len;
        self
    }
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies an override set within its view.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverrideSetId(pub(crate) u32);

impl fmt::Debug for OverrideSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverrideSetId({})", self.0)
    }
}

/// Identifies a property within its override set.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(pub(crate) u32);

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// Which evaluated datablocks a property applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverrideScope {
    /// Scene-level datablocks.
    Scene,
    /// Objects in the view's collections.
    Collection,
}

impl OverrideScope {
    /// Classifies the datablock kind that owns an overridden property.
    #[must_use]
    pub const fn for_owner(kind: IdKind) -> Option<Self> {
        match kind {
            IdKind::Scene | IdKind::World => Some(Self::Scene),
            IdKind::Object | IdKind::Mesh | IdKind::Material => Some(Self::Collection),
            IdKind::Camera | IdKind::Image => None,
        }
    }

    /// Scope of properties applied to an evaluated datablock of `kind`.
    #[must_use]
    pub const fn for_target(kind: IdKind) -> Option<Self> {
        match kind {
            IdKind::Scene => Some(Self::Scene),
            IdKind::Object => Some(Self::Collection),
            _ => None,
        }
    }
}

/// How a snapshot is combined with the target value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverrideOp {
    /// The snapshot replaces the value.
    #[default]
    Replace,
}

/// A snapshotted property value.
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideValue {
    /// Booleans, integers and enums.
    Ints(Vec<i32>),
    /// Floats.
    Floats(Vec<f32>),
    /// A string.
    Str(String),
    /// A datablock reference.
    Id(Option<DataId>),
}

impl OverrideValue {
    /// Snapshots `value`.
    ///
    /// # Errors
    ///
    /// Fails for arrays longer than `max_array_len` and for datablock lists.
    pub fn capture(path: &str, value: &PropertyValue, max_array_len: usize) -> Result<Self, OverrideError> {
        let len = value.array_len();
        if len > max_array_len {
            return Err(OverrideError::ArrayTooLong {
                len,
                max: max_array_len,
            });
        }
        Ok(match value {
            PropertyValue::Bool(b) => Self::Ints(Vec::from([i32::from(*b)])),
            PropertyValue::Int(i) | PropertyValue::Enum(i) => Self::Ints(Vec::from([*i])),
            PropertyValue::Float(f) => Self::Floats(Vec::from([*f])),
            PropertyValue::BoolArray(v) => Self::Ints(v.iter().map(|&b| i32::from(b)).collect()),
            PropertyValue::IntArray(v) => Self::Ints(v.clone()),
            PropertyValue::FloatArray(v) => Self::Floats(v.clone()),
            PropertyValue::String(s) => Self::Str(s.clone()),
            PropertyValue::Pointer(p) => Self::Id(*p),
            PropertyValue::Collection(_) => return Err(OverrideError::UnsupportedValue(path.into())),
        })
    }

    /// Writes the snapshot into `slot` if the shapes match. Returns whether
    /// anything was written.
    pub fn write_to(&self, slot: &mut PropertyValue) -> bool {
        match (slot, self) {
            (PropertyValue::Bool(b), Self::Ints(v)) => match v.as_slice() {
                [x] => {
                    *b = *x != 0;
                    true
                }
                _ => false,
            },
            (PropertyValue::Int(i) | PropertyValue::Enum(i), Self::Ints(v)) => match v.as_slice() {
                [x] => {
                    *i = *x;
                    true
                }
                _ => false,
            },
            (PropertyValue::Float(f), Self::Floats(v)) => match v.as_slice() {
                [x] => {
                    *f = *x;
                    true
                }
                _ => false,
            },
            (PropertyValue::BoolArray(a), Self::Ints(v)) if a.len() == v.len() => {
                for (dst, &src) in a.iter_mut().zip(v) {
                    *dst = src != 0;
                }
                true
            }
            (PropertyValue::IntArray(a), Self::Ints(v)) if a.len() == v.len() => {
                a.copy_from_slice(v);
                true
            }
            (PropertyValue::FloatArray(a), Self::Floats(v)) if a.len() == v.len() => {
                a.copy_from_slice(v);
                true
            }
            (PropertyValue::String(s), Self::Str(v)) => {
                s.clone_from(v);
                true
            }
            (PropertyValue::Pointer(p), Self::Id(v)) => {
                *p = *v;
                true
            }
            _ => false,
        }
    }
}

/// One overridden property.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicOverrideProperty {
    id: PropertyId,
    owner: DataId,
    owner_kind: IdKind,
    scope: OverrideScope,
    pub(crate) path: String,
    value: OverrideValue,
    /// Disabled properties are skipped by [`View::apply_overrides`].
    pub enabled: bool,
    operation: OverrideOp,
    array_len: usize,
}

impl DynamicOverrideProperty {
    /// Handle of this property within its set.
    #[must_use]
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// The datablock the value was captured from.
    #[must_use]
    pub fn owner(&self) -> DataId {
        self.owner
    }

    /// Kind of the owning datablock.
    #[must_use]
    pub fn owner_kind(&self) -> IdKind {
        self.owner_kind
    }

    /// Which evaluated datablocks receive the value.
    #[must_use]
    pub fn scope(&self) -> OverrideScope {
        self.scope
    }

    /// Property path on the target.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The snapshot.
    #[must_use]
    pub fn value(&self) -> &OverrideValue {
        &self.value
    }

    /// Replaces the snapshot.
    pub fn set_value(&mut self, value: OverrideValue) {
        self.value = value;
    }

    /// How the snapshot is applied.
    #[must_use]
    pub fn operation(&self) -> OverrideOp {
        self.operation
    }

    /// Array length of the captured value, 0 for scalars.
    #[must_use]
    pub fn array_len(&self) -> usize {
        self.array_len
    }
}

/// A named, ordered group of overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct OverrideSet {
    id: OverrideSetId,
    pub(crate) name: String,
    /// Disabled sets are skipped by [`View::apply_overrides`].
    pub enabled: bool,
    affected: Vec<CollectionId>,
    active_affected: usize,
    pub(crate) scene_properties: Vec<DynamicOverrideProperty>,
    pub(crate) collection_properties: Vec<DynamicOverrideProperty>,
    next_property: u32,
}

/// Keeps an active index valid after removing the entry at `removed` from a
/// list that now has `new_len` entries.
fn shift_active(active: usize, removed: usize, new_len: usize) -> usize {
    if active > removed {
        active - 1
    } else if active == removed && removed == new_len {
        removed.saturating_sub(1)
    } else {
        active
    }
}

impl OverrideSet {
    fn new(id: OverrideSetId, name: String) -> Self {
        Self {
            id,
            name,
            enabled: true,
            affected: Vec::new(),
            active_affected: 0,
            scene_properties: Vec::new(),
            collection_properties: Vec::new(),
            next_property: 0,
        }
    }

    /// Handle of this set within its view.
    #[must_use]
    pub fn id(&self) -> OverrideSetId {
        self.id
    }

    /// The set's name, unique within its view.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // -- Affected collections --

    /// Collections the set is linked to, in link order.
    #[must_use]
    pub fn affected(&self) -> &[CollectionId] {
        &self.affected
    }

    /// Index of the active affected collection.
    #[must_use]
    pub fn active_affected(&self) -> usize {
        self.active_affected
    }

    /// Sets the active affected collection. Returns `false` if out of range.
    pub fn set_active_affected(&mut self, index: usize) -> bool {
        if index < self.affected.len() {
            self.active_affected = index;
            true
        } else {
            false
        }
    }

    /// Links `collection`. Returns `false` if it is already linked.
    pub fn link_collection(&mut self, collection: CollectionId) -> bool {
        if self.affected.contains(&collection) {
            return false;
        }
        self.affected.push(collection);
        true
    }

    /// Unlinks `collection`. Returns `false` if it was not linked.
    pub fn unlink_collection(&mut self, collection: CollectionId) -> bool {
        let Some(pos) = self.affected.iter().position(|&c| c == collection) else {
            return false;
        };
        self.affected.remove(pos);
        self.active_affected = shift_active(self.active_affected, pos, self.affected.len());
        true
    }

    // -- Properties --

    /// Scene-scoped properties in application order.
    #[must_use]
    pub fn scene_properties(&self) -> &[DynamicOverrideProperty] {
        &self.scene_properties
    }

    /// Collection-scoped properties in application order.
    #[must_use]
    pub fn collection_properties(&self) -> &[DynamicOverrideProperty] {
        &self.collection_properties
    }

    /// Snapshots the property at `path` on `owner` and appends it to the
    /// list matching the owner's kind.
    ///
    /// # Errors
    ///
    /// Fails if the owner is stale or of a kind that cannot carry overrides,
    /// if it has no property at `path`, or if the value cannot be
    /// snapshotted. Nothing is added on failure.
    pub fn add_property(
        &mut self,
        ids: &IdStore,
        owner: DataId,
        path: &str,
        config: &OverrideConfig,
    ) -> Result<PropertyId, OverrideError> {
        let block = ids.get(owner).ok_or(OverrideError::StaleOwner)?;
        let scope = OverrideScope::for_owner(block.kind).ok_or(OverrideError::UnsupportedOwner(block.kind))?;
        let current = block
            .properties
            .get(path)
            .ok_or_else(|| OverrideError::UnresolvedPath(path.into()))?;
        let value = OverrideValue::capture(path, current, config.max_array_len)?;

        let id = PropertyId(self.next_property);
        self.next_property += 1;
        let property = DynamicOverrideProperty {
            id,
            owner,
            owner_kind: block.kind,
            scope,
            path: path.into(),
            value,
            enabled: true,
            operation: OverrideOp::Replace,
            array_len: current.array_len(),
        };
        match scope {
            OverrideScope::Scene => self.scene_properties.push(property),
            OverrideScope::Collection => self.collection_properties.push(property),
        }
        Ok(id)
    }

    /// Removes a property from whichever list holds it. Returns `false` if
    /// neither does.
    pub fn remove_property(&mut self, id: PropertyId) -> bool {
        for list in [&mut self.scene_properties, &mut self.collection_properties] {
            if let Some(pos) = list.iter().position(|p| p.id == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Returns the property for `id`.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> Option<&DynamicOverrideProperty> {
        self.scene_properties
            .iter()
            .chain(&self.collection_properties)
            .find(|p| p.id == id)
    }

    /// Returns the property for `id` mutably.
    pub fn property_mut(&mut self, id: PropertyId) -> Option<&mut DynamicOverrideProperty> {
        self.scene_properties
            .iter_mut()
            .chain(&mut self.collection_properties)
            .find(|p| p.id == id)
    }

    fn properties_for(&self, scope: OverrideScope) -> &[DynamicOverrideProperty] {
        match scope {
            OverrideScope::Scene => &self.scene_properties,
            OverrideScope::Collection => &self.collection_properties,
        }
    }

    pub(crate) fn properties_mut(&mut self) -> impl Iterator<Item = &mut DynamicOverrideProperty> {
        self.scene_properties
            .iter_mut()
            .chain(&mut self.collection_properties)
    }
}

impl View {
    /// Override sets in application order.
    #[must_use]
    pub fn override_sets(&self) -> &[OverrideSet] {
        &self.override_sets
    }

    /// Returns the set for `id`.
    #[must_use]
    pub fn override_set(&self, id: OverrideSetId) -> Option<&OverrideSet> {
        self.override_sets.iter().find(|s| s.id == id)
    }

    /// Returns the set for `id` mutably.
    pub fn override_set_mut(&mut self, id: OverrideSetId) -> Option<&mut OverrideSet> {
        self.override_sets.iter_mut().find(|s| s.id == id)
    }

    /// The active set, if any.
    #[must_use]
    pub fn active_override_set(&self) -> Option<OverrideSetId> {
        self.override_sets.get(self.active_override_set).map(|s| s.id)
    }

    /// Makes `id` the active set. Returns `false` if the view does not own it.
    pub fn set_active_override_set(&mut self, id: OverrideSetId) -> bool {
        match self.override_sets.iter().position(|s| s.id == id) {
            Some(pos) => {
                self.active_override_set = pos;
                true
            }
            None => false,
        }
    }

    /// Appends a set and makes it active.
    ///
    /// The name (or the configured default) is made unique among this view's
    /// sets.
    pub fn add_override_set(&mut self, name: Option<&str>, config: &OverrideConfig) -> OverrideSetId {
        let base = name.unwrap_or(config.default_set_name);
        let name = unique_name(base, |n| self.override_sets.iter().any(|s| s.name == n));
        let id = OverrideSetId(self.next_override_set);
        self.next_override_set += 1;
        self.override_sets.push(OverrideSet::new(id, name));
        self.active_override_set = self.override_sets.len() - 1;
        id
    }

    /// Removes a set. Returns `false` if the view does not own it.
    pub fn remove_override_set(&mut self, id: OverrideSetId) -> bool {
        let Some(pos) = self.override_sets.iter().position(|s| s.id == id) else {
            return false;
        };
        self.override_sets.remove(pos);
        self.active_override_set = shift_active(self.active_override_set, pos, self.override_sets.len());
        true
    }

    /// Unlinks `collection` from every set.
    pub fn unlink_collection_from_override_sets(&mut self, collection: CollectionId) {
        for set in &mut self.override_sets {
            set.unlink_collection(collection);
        }
    }

    /// Applies the enabled overrides matching `target`'s kind to its
    /// properties. Returns how many values were written.
    ///
    /// Targets that are stale or of a kind no scope applies to are left
    /// untouched. A property is skipped when the target has no value of the
    /// snapshot's shape at the property's path.
    pub fn apply_overrides(&self, ids: &mut IdStore, target: DataId, tracer: &mut Tracer<'_>) -> usize {
        let Some(block) = ids.get_mut(target) else {
            return 0;
        };
        let Some(scope) = OverrideScope::for_target(block.kind) else {
            return 0;
        };
        let mut applied = 0;
        for set in self.override_sets.iter().filter(|s| s.enabled) {
            for property in set.properties_for(scope).iter().filter(|p| p.enabled) {
                let written = block
                    .properties
                    .get_mut(&property.path)
                    .is_some_and(|slot| property.value.write_to(slot));
                if written {
                    applied += 1;
                }
                tracer.override_apply(&OverrideApplyEvent {
                    target,
                    set: set.id,
                    property: property.id,
                    outcome: if written {
                        ApplyOutcome::Applied
                    } else {
                        ApplyOutcome::Skipped
                    },
                });
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::data::{ObjectData, ObjectType};

    const CONFIG: OverrideConfig = OverrideConfig::new();

    #[test]
    fn add_set_uniquifies_name_and_activates() {
        let mut view = View::new("View Layer");
        let a = view.add_override_set(None, &CONFIG);
        let b = view.add_override_set(None, &CONFIG);
        let c = view.add_override_set(Some("Lighting"), &CONFIG);
        assert_eq!(view.override_set(a).unwrap().name(), "OverrideSet");
        assert_eq!(view.override_set(b).unwrap().name(), "OverrideSet.001");
        assert_eq!(view.override_set(c).unwrap().name(), "Lighting");
        assert_eq!(view.active_override_set(), Some(c));
    }

    #[test]
    fn remove_set_shifts_active_index() {
        let mut view = View::new("View Layer");
        let a = view.add_override_set(None, &CONFIG);
        let b = view.add_override_set(None, &CONFIG);
        let c = view.add_override_set(None, &CONFIG);

        // Removing before the active one shifts it down.
        assert!(view.remove_override_set(a));
        assert_eq!(view.active_override_set(), Some(c));
        // Removing the active last one clamps to the new last.
        assert!(view.remove_override_set(c));
        assert_eq!(view.active_override_set(), Some(b));
        assert!(view.remove_override_set(b));
        assert_eq!(view.active_override_set(), None);
        assert!(!view.remove_override_set(b), "not owned any more");
    }

    #[test]
    fn shift_rule_never_underflows() {
        assert_eq!(shift_active(0, 0, 0), 0);
        assert_eq!(shift_active(2, 0, 2), 1);
        assert_eq!(shift_active(1, 1, 1), 0);
        assert_eq!(shift_active(1, 1, 3), 1);
        assert_eq!(shift_active(0, 2, 2), 0);
    }

    #[test]
    fn link_collection_rejects_duplicates() {
        let mut view = View::new("View Layer");
        let id = view.add_override_set(None, &CONFIG);
        let set = view.override_set_mut(id).unwrap();
        let a = CollectionId::new(0, 0);
        let b = CollectionId::new(1, 0);
        assert!(set.link_collection(a));
        assert!(!set.link_collection(a));
        assert!(set.link_collection(b));
        assert!(set.set_active_affected(1));
        assert!(set.unlink_collection(b));
        assert_eq!(set.active_affected(), 0);
        assert!(!set.unlink_collection(b));
    }

    #[test]
    fn add_property_classifies_by_owner_kind() {
        let mut ids = IdStore::new();
        let scene = ids.add(IdKind::Scene, "Scene");
        ids.get_mut(scene).unwrap().properties.set("frame_start", PropertyValue::Int(1));
        let ob = ids.add_object("Cube", ObjectData::new(ObjectType::Mesh));
        ids.get_mut(ob)
            .unwrap()
            .properties
            .set("color", PropertyValue::FloatArray(vec![1.0, 0.0, 0.0, 1.0]));

        let mut view = View::new("View Layer");
        let id = view.add_override_set(None, &CONFIG);
        let set = view.override_set_mut(id).unwrap();
        let p1 = set.add_property(&ids, scene, "frame_start", &CONFIG).unwrap();
        let p2 = set.add_property(&ids, ob, "color", &CONFIG).unwrap();

        assert_eq!(set.scene_properties().len(), 1);
        assert_eq!(set.collection_properties().len(), 1);
        assert_eq!(set.property(p1).unwrap().value(), &OverrideValue::Ints(vec![1]));
        assert_eq!(set.property(p2).unwrap().array_len(), 4);
        assert_eq!(set.property(p2).unwrap().scope(), OverrideScope::Collection);
    }

    #[test]
    fn add_property_rejects_bad_shapes() {
        let mut ids = IdStore::new();
        let cam = ids.add(IdKind::Camera, "Camera");
        let mat = ids.add(IdKind::Material, "Material");
        let props = &mut ids.get_mut(mat).unwrap().properties;
        props.set("weights", PropertyValue::FloatArray(vec![0.0; 9]));
        props.set("textures", PropertyValue::Collection(Vec::new()));

        let mut view = View::new("View Layer");
        let id = view.add_override_set(None, &CONFIG);
        let set = view.override_set_mut(id).unwrap();

        assert_eq!(
            set.add_property(&ids, cam, "lens", &CONFIG),
            Err(OverrideError::UnsupportedOwner(IdKind::Camera))
        );
        assert_eq!(
            set.add_property(&ids, mat, "missing", &CONFIG),
            Err(OverrideError::UnresolvedPath("missing".into()))
        );
        assert_eq!(
            set.add_property(&ids, mat, "weights", &CONFIG),
            Err(OverrideError::ArrayTooLong { len: 9, max: 4 })
        );
        assert_eq!(
            set.add_property(&ids, mat, "textures", &CONFIG),
            Err(OverrideError::UnsupportedValue("textures".into()))
        );
        assert!(
            set.add_property(&ids, mat, "weights", &CONFIG.with_max_array_len(16))
                .is_ok()
        );
        ids.remove(mat);
        assert_eq!(
            set.add_property(&ids, mat, "weights", &CONFIG),
            Err(OverrideError::StaleOwner)
        );
    }

    #[test]
    fn remove_property_searches_both_lists() {
        let mut ids = IdStore::new();
        let world = ids.add(IdKind::World, "World");
        ids.get_mut(world).unwrap().properties.set("strength", PropertyValue::Float(1.0));
        let mut view = View::new("View Layer");
        let id = view.add_override_set(None, &CONFIG);
        let set = view.override_set_mut(id).unwrap();
        let p = set.add_property(&ids, world, "strength", &CONFIG).unwrap();
        assert!(set.remove_property(p));
        assert!(!set.remove_property(p));
    }

    #[test]
    fn apply_skips_disabled_and_mismatched() {
        let mut ids = IdStore::new();
        let scene = ids.add(IdKind::Scene, "Scene");
        {
            let props = &mut ids.get_mut(scene).unwrap().properties;
            props.set("frame_start", PropertyValue::Int(5));
            props.set("use_nodes", PropertyValue::Bool(true));
        }
        let mut view = View::new("View Layer");
        let id = view.add_override_set(None, &CONFIG);
        let set = view.override_set_mut(id).unwrap();
        let frame = set.add_property(&ids, scene, "frame_start", &CONFIG).unwrap();
        let nodes = set.add_property(&ids, scene, "use_nodes", &CONFIG).unwrap();
        set.property_mut(nodes).unwrap().set_value(OverrideValue::Ints(vec![0]));
        set.property_mut(frame).unwrap().set_value(OverrideValue::Str("x".into()));

        let target = ids.add(IdKind::Scene, "Render Scene");
        {
            let props = &mut ids.get_mut(target).unwrap().properties;
            props.set("frame_start", PropertyValue::Int(1));
            props.set("use_nodes", PropertyValue::Bool(true));
        }
        assert_eq!(view.apply_overrides(&mut ids, target, &mut Tracer::none()), 1);
        let props = &ids.get(target).unwrap().properties;
        assert_eq!(props.get("use_nodes"), Some(&PropertyValue::Bool(false)));
        assert_eq!(props.get("frame_start"), Some(&PropertyValue::Int(1)), "shape mismatch");

        view.override_set_mut(id).unwrap().enabled = false;
        ids.get_mut(target)
            .unwrap()
            .properties
            .set("use_nodes", PropertyValue::Bool(true));
        assert_eq!(view.apply_overrides(&mut ids, target, &mut Tracer::none()), 0);
    }

    #[test]
    fn write_to_requires_matching_array_length() {
        let mut slot = PropertyValue::FloatArray(vec![0.0; 3]);
        assert!(!OverrideValue::Floats(vec![1.0; 4]).write_to(&mut slot));
        assert!(OverrideValue::Floats(vec![1.0; 3]).write_to(&mut slot));
        assert_eq!(slot, PropertyValue::FloatArray(vec![1.0; 3]));

        let mut flags = PropertyValue::BoolArray(vec![false, false]);
        assert!(OverrideValue::Ints(vec![1, 0]).write_to(&mut flags));
        assert_eq!(flags, PropertyValue::BoolArray(vec![true, false]));
    }
}
