// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenes and the top-level [`Database`].
//!
//! A [`Scene`] owns a master collection in the shared graph and an ordered
//! list of [`View`]s over it. The [`Database`] owns the datablocks, the
//! collection graph and all scenes, and is where graph edits turn into view
//! syncs.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::data::{CollectionId, CollectionStore, DataId, IdKind, IdStore, ObjectData, SceneId};
use crate::naming::unique_name;
use crate::trace::{CachesInvalidatedEvent, Tracer};
use crate::view::{RenderableObjects, View};

/// Receives view renames so name-keyed lookups elsewhere can follow.
pub trait RenameListener {
    /// Called after a view of `scene` was renamed from `old` to `new`.
    fn view_renamed(&mut self, scene: DataId, old: &str, new: &str) {
        _ = (scene, old, new);
    }
}

impl RenameListener for () {}

/// One scene.
#[derive(Debug)]
pub struct Scene {
    id: DataId,
    master: CollectionId,
    views: Vec<View>,
    background: Option<SceneId>,
}

impl Scene {
    /// The scene datablock.
    #[must_use]
    pub fn id(&self) -> DataId {
        self.id
    }

    /// The scene's master collection.
    #[must_use]
    pub fn master(&self) -> CollectionId {
        self.master
    }

    /// Views in creation order.
    #[must_use]
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Returns the view at `index`.
    #[must_use]
    pub fn view(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }

    /// Returns the view at `index` mutably.
    pub fn view_mut(&mut self, index: usize) -> Option<&mut View> {
        self.views.get_mut(index)
    }

    /// Returns the index of the view named `name`.
    #[must_use]
    pub fn view_index(&self, name: &str) -> Option<usize> {
        self.views.iter().position(|v| v.name == name)
    }

    /// The background scene, whose render view contributes to renders.
    #[must_use]
    pub fn background(&self) -> Option<SceneId> {
        self.background
    }

    /// The view used for interactive work: the first non-render view, else
    /// the first view.
    #[must_use]
    pub fn default_view(&self) -> Option<&View> {
        self.views
            .iter()
            .find(|v| !v.is_render())
            .or_else(|| self.views.first())
    }

    /// The view used for renders: the first render view, else the first
    /// view.
    #[must_use]
    pub fn default_render_view(&self) -> Option<&View> {
        self.views
            .iter()
            .find(|v| v.is_render())
            .or_else(|| self.views.first())
    }

    /// Adds a render view named `name` (made unique), syncs it and returns
    /// its index.
    pub fn add_view(&mut self, collections: &CollectionStore, name: &str) -> usize {
        let name = unique_name(name, |n| self.views.iter().any(|v| v.name == n));
        let mut view = View::new(name);
        view.sync(collections, self.master, &mut Tracer::none());
        self.views.push(view);
        self.views.len() - 1
    }

    /// Copies the view at `index` under a unique variant of `name`. Returns
    /// the new index.
    pub fn duplicate_view(&mut self, index: usize, name: &str) -> Option<usize> {
        let source = self.views.get(index)?;
        let name = unique_name(name, |n| self.views.iter().any(|v| v.name == n));
        let copy = source.duplicate(name);
        self.views.push(copy);
        Some(self.views.len() - 1)
    }

    /// Removes the view at `index`. The last view cannot be removed.
    pub fn remove_view(&mut self, index: usize) -> Option<View> {
        if self.views.len() <= 1 || index >= self.views.len() {
            return None;
        }
        Some(self.views.remove(index))
    }

    /// Renames the view at `index` to a unique variant of `name`.
    ///
    /// Override property paths of every view that start with
    /// `view_layers["<old>"]` are rewritten to the new name, then `listener`
    /// is told. Returns the name actually used.
    pub fn rename_view(
        &mut self,
        index: usize,
        name: &str,
        listener: &mut dyn RenameListener,
    ) -> Option<String> {
        let old = self.views.get(index)?.name.clone();
        let new = unique_name(name, |n| {
            self.views
                .iter()
                .enumerate()
                .any(|(i, v)| i != index && v.name == n)
        });
        if new == old {
            return Some(new);
        }

        let old_prefix = format!("view_layers[\"{old}\"]");
        let new_prefix = format!("view_layers[\"{new}\"]");
        for view in &mut self.views {
            for set in &mut view.override_sets {
                for property in set.properties_mut() {
                    if let Some(rest) = property.path.strip_prefix(&old_prefix) {
                        property.path = format!("{new_prefix}{rest}");
                    }
                }
            }
        }
        self.views[index].name.clone_from(&new);
        listener.view_renamed(self.id, &old, &new);
        Some(new)
    }

    fn sync_views(&mut self, collections: &CollectionStore, tracer: &mut Tracer<'_>) {
        for view in &mut self.views {
            view.sync(collections, self.master, tracer);
        }
    }
}

/// Datablocks, the collection graph and the scenes viewing it.
#[derive(Debug, Default)]
pub struct Database {
    /// All datablocks.
    pub ids: IdStore,
    /// The collection graph.
    pub collections: CollectionStore,
    scenes: Vec<Scene>,
}

impl Database {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scenes in creation order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Returns the scene for `id`.
    #[must_use]
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id.0 as usize)
    }

    /// Returns the scene for `id` mutably.
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id.0 as usize)
    }

    /// Returns a scene's collection graph and the scene mutably, for view
    /// operations that need both.
    pub fn scene_and_collections(&mut self, id: SceneId) -> Option<(&mut Scene, &CollectionStore)> {
        let scene = self.scenes.get_mut(id.0 as usize)?;
        Some((scene, &self.collections))
    }

    /// Returns the scene mutably together with the datablock store, for
    /// snapshotting override properties into one of its views.
    pub fn scene_and_ids(&mut self, id: SceneId) -> Option<(&mut Scene, &IdStore)> {
        let scene = self.scenes.get_mut(id.0 as usize)?;
        Some((scene, &self.ids))
    }

    /// Creates a scene with a master collection and one synced render view
    /// named `"View Layer"`.
    pub fn add_scene(&mut self, name: &str) -> SceneId {
        let id = self.ids.add(IdKind::Scene, name);
        let master = self.collections.create_master("Scene Collection");
        let mut scene = Scene {
            id,
            master,
            views: Vec::new(),
            background: None,
        };
        scene.add_view(&self.collections, "View Layer");
        #[allow(
            clippy::cast_possible_truncation,
            reason = "more than u32::MAX scenes is not supported"
        )]
        let scene_id = SceneId(self.scenes.len() as u32);
        self.scenes.push(scene);
        scene_id
    }

    /// Sets the background scene of `scene`. A scene cannot be its own
    /// background; longer loops are cut when iterating.
    pub fn set_background(&mut self, scene: SceneId, background: Option<SceneId>) -> bool {
        if background == Some(scene) || background.is_some_and(|b| self.scene(b).is_none()) {
            return false;
        }
        match self.scene_mut(scene) {
            Some(s) => {
                s.background = background;
                true
            }
            None => false,
        }
    }

    /// Adds a datablock that is not an object. Returns `None` for
    /// [`IdKind::Object`], which needs [`add_object`](Self::add_object).
    pub fn add_datablock(&mut self, kind: IdKind, name: &str) -> Option<DataId> {
        (kind != IdKind::Object).then(|| self.ids.add(kind, name))
    }

    /// Adds an object and links it into `collection`.
    pub fn add_object(&mut self, collection: CollectionId, name: &str, data: ObjectData) -> DataId {
        let object = self.ids.add_object(name, data);
        self.collections.add_object(collection, object);
        object
    }

    /// Unlinks `object` from every collection and removes it. Returns `false`
    /// for stale handles.
    pub fn remove_object(&mut self, object: DataId) -> bool {
        if !self.ids.is_alive(object) {
            return false;
        }
        self.collections.remove_object_everywhere(object);
        self.ids.remove(object).is_some()
    }

    /// Destroys a collection, unlinking it from the graph and from every
    /// override set. Master collections cannot be removed.
    pub fn remove_collection(&mut self, collection: CollectionId) -> bool {
        if self.collections.get(collection).is_none_or(|c| c.is_master()) {
            return false;
        }
        for scene in &mut self.scenes {
            for view in &mut scene.views {
                view.unlink_collection_from_override_sets(collection);
            }
        }
        self.collections.destroy(collection)
    }

    // -- Sync --

    /// Syncs every view of `scene`.
    pub fn sync_scene(&mut self, scene: SceneId, tracer: &mut Tracer<'_>) {
        if let Some(s) = self.scenes.get_mut(scene.0 as usize) {
            s.sync_views(&self.collections, tracer);
        }
    }

    /// Syncs every view of every scene.
    pub fn sync_all(&mut self, tracer: &mut Tracer<'_>) {
        for scene in &mut self.scenes {
            scene.sync_views(&self.collections, tracer);
        }
    }

    /// Drops every view's caches, including the hash index, then syncs
    /// everything. Used after datablock handles were remapped.
    pub fn sync_remap(&mut self, tracer: &mut Tracer<'_>) {
        for scene in &mut self.scenes {
            for view in &mut scene.views {
                let (array, index) = view.bases.invalidate_caches(true);
                if array || index {
                    tracer.caches_invalidated(&CachesInvalidatedEvent { array, index });
                }
            }
        }
        self.sync_all(tracer);
    }

    /// Syncs all views if the collection graph changed since the last call,
    /// or individual views whose exclusion changed. Returns whether any view
    /// was synced.
    pub fn sync_if_dirty(&mut self, tracer: &mut Tracer<'_>) -> bool {
        if !self.collections.take_changes().is_empty() {
            self.sync_all(tracer);
            return true;
        }
        let mut synced = false;
        for scene in &mut self.scenes {
            for view in &mut scene.views {
                if view.needs_sync() {
                    view.sync(&self.collections, scene.master, tracer);
                    synced = true;
                }
            }
        }
        synced
    }

    // -- Evaluation --

    /// Applies the overrides of view `view` of `scene` to `target`. Returns
    /// how many values were written.
    pub fn apply_overrides(
        &mut self,
        scene: SceneId,
        view: usize,
        target: DataId,
        tracer: &mut Tracer<'_>,
    ) -> usize {
        let Some(v) = self.scenes.get(scene.0 as usize).and_then(|s| s.views.get(view)) else {
            return 0;
        };
        v.apply_overrides(&mut self.ids, target, tracer)
    }

    /// Iterates the objects rendered for `scene`, including its background
    /// scenes.
    #[must_use]
    pub fn renderable_objects(&self, scene: SceneId) -> RenderableObjects<'_> {
        RenderableObjects::new(self, scene)
    }

    /// Returns whether any view of `scene` has a base for `object`.
    #[must_use]
    pub fn scene_has_object(&self, scene: SceneId, object: DataId) -> bool {
        self.scene(scene)
            .is_some_and(|s| s.views.iter().any(|v| v.bases().find(object).is_some()))
    }
}
