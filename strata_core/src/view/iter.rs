// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filtered iteration over bases and objects.
//!
//! All iterators are lazy, single-pass cursors over a view's base list (in
//! list order) that skip entries failing their predicate.

use alloc::vec::Vec;

use hashbrown::HashSet;

use super::View;
use super::base::{Base, BaseFlags, BaseRegistry};
use crate::data::{BaseId, DataId, IdStore, ObjectMode, ObjectType, SceneId};
use crate::scene::Database;

/// Bases that have every bit of a flag mask set.
///
/// Created by [`View::bases_with`].
#[derive(Clone, Debug)]
pub struct BasesWith<'a> {
    registry: &'a BaseRegistry,
    flag: BaseFlags,
    pos: usize,
}

impl<'a> Iterator for BasesWith<'a> {
    type Item = (BaseId, &'a Base);

    fn next(&mut self) -> Option<Self::Item> {
        let order = self.registry.order();
        while let Some(&id) = order.get(self.pos) {
            self.pos += 1;
            if let Some(base) = self.registry.get(id)
                && base.flags.contains(self.flag)
            {
                return Some((id, base));
            }
        }
        None
    }
}

/// Selected objects that are not linked library data.
///
/// Created by [`View::selected_editable_objects`].
#[derive(Clone, Debug)]
pub struct SelectedEditableObjects<'a> {
    inner: BasesWith<'a>,
    ids: &'a IdStore,
}

impl Iterator for SelectedEditableObjects<'_> {
    type Item = DataId;

    fn next(&mut self) -> Option<DataId> {
        self.inner
            .by_ref()
            .map(|(_, base)| base.object)
            .find(|&object| self.ids.is_editable(object))
    }
}

/// The active base followed by the selected bases of the same object type
/// whose objects are in one of the requested modes.
///
/// The active base is yielded whatever mode its object is in.
///
/// Created by [`View::bases_in_mode`].
#[derive(Clone, Debug)]
pub struct BasesInMode<'a> {
    registry: &'a BaseRegistry,
    ids: &'a IdStore,
    active: Option<(BaseId, ObjectType)>,
    mode: ObjectMode,
    pos: usize,
    started: bool,
}

impl BasesInMode<'_> {
    fn in_mode(&self, base: &Base, object_type: ObjectType) -> bool {
        self.ids
            .object(base.object)
            .is_some_and(|o| o.object_type == object_type && o.mode.intersects(self.mode))
    }
}

impl<'a> Iterator for BasesInMode<'a> {
    type Item = (BaseId, &'a Base);

    fn next(&mut self) -> Option<Self::Item> {
        let (active, object_type) = self.active?;
        if !self.started {
            self.started = true;
            if let Some(base) = self.registry.get(active) {
                return Some((active, base));
            }
        }
        let order = self.registry.order();
        while let Some(&id) = order.get(self.pos) {
            self.pos += 1;
            if id == active {
                continue;
            }
            if let Some(base) = self.registry.get(id)
                && base.is_selected()
                && self.in_mode(base, object_type)
            {
                return Some((id, base));
            }
        }
        None
    }
}

/// Visible objects of a scene's views and of its background scenes, each
/// object yielded at most once.
///
/// The scene's first view is walked first, then its other render views, then
/// the default render view of each background scene. Every object of every
/// view involved starts out pending; the first base met for an object
/// consumes it, and the object is yielded only if that base is visible.
///
/// Created by [`Database::renderable_objects`].
#[derive(Clone, Debug)]
pub struct RenderableObjects<'a> {
    stops: Vec<&'a View>,
    stop: usize,
    pos: usize,
    pending: HashSet<DataId>,
}

impl<'a> RenderableObjects<'a> {
    pub(crate) fn new(db: &'a Database, scene: SceneId) -> Self {
        let mut stops = Vec::new();
        let mut pending = HashSet::new();
        let mut seen = HashSet::new();

        let mut next = Some(scene);
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            let Some(s) = db.scene(id) else {
                break;
            };
            for view in s.views() {
                pending.extend(view.bases.iter().map(|(_, b)| b.object));
            }
            if id == scene {
                if let Some((first, rest)) = s.views().split_first() {
                    stops.push(first);
                    stops.extend(rest.iter().filter(|v| v.is_render()));
                }
            } else if let Some(view) = s.default_render_view() {
                stops.push(view);
            }
            next = s.background();
        }

        Self {
            stops,
            stop: 0,
            pos: 0,
            pending,
        }
    }
}

impl Iterator for RenderableObjects<'_> {
    type Item = DataId;

    fn next(&mut self) -> Option<DataId> {
        while let Some(&view) = self.stops.get(self.stop) {
            let order = view.bases.order();
            while let Some(&id) = order.get(self.pos) {
                self.pos += 1;
                let Some(base) = view.bases.get(id) else {
                    continue;
                };
                if self.pending.remove(&base.object) && base.is_visible() {
                    return Some(base.object);
                }
            }
            self.stop += 1;
            self.pos = 0;
        }
        None
    }
}

impl View {
    /// Iterates bases that have every bit of `flag` set.
    #[must_use]
    pub fn bases_with(&self, flag: BaseFlags) -> BasesWith<'_> {
        BasesWith {
            registry: &self.bases,
            flag,
            pos: 0,
        }
    }

    /// Iterates selected bases.
    #[must_use]
    pub fn selected_bases(&self) -> BasesWith<'_> {
        self.bases_with(BaseFlags::SELECTED)
    }

    /// Iterates visible bases.
    #[must_use]
    pub fn visible_bases(&self) -> BasesWith<'_> {
        self.bases_with(BaseFlags::VISIBLE)
    }

    /// Iterates selected objects.
    pub fn selected_objects(&self) -> impl Iterator<Item = DataId> + '_ {
        self.selected_bases().map(|(_, b)| b.object)
    }

    /// Iterates visible objects.
    pub fn visible_objects(&self) -> impl Iterator<Item = DataId> + '_ {
        self.visible_bases().map(|(_, b)| b.object)
    }

    /// Iterates selected objects that may be edited.
    #[must_use]
    pub fn selected_editable_objects<'a>(&'a self, ids: &'a IdStore) -> SelectedEditableObjects<'a> {
        SelectedEditableObjects {
            inner: self.selected_bases(),
            ids,
        }
    }

    /// Iterates the active base and the selected bases that enter `mode`
    /// together with it.
    ///
    /// Empty when there is no active base or its object is gone.
    #[must_use]
    pub fn bases_in_mode<'a>(&'a self, ids: &'a IdStore, mode: ObjectMode) -> BasesInMode<'a> {
        let active = self.bases.active().and_then(|id| {
            let base = self.bases.get(id)?;
            Some((id, ids.object(base.object)?.object_type))
        });
        BasesInMode {
            registry: &self.bases,
            ids,
            active,
            mode,
            pos: 0,
            started: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::data::{CollectionFlags, CollectionStore, ObjectData};
    use crate::trace::Tracer;

    fn setup(objects: &[(ObjectType, bool)]) -> (IdStore, CollectionStore, View, Vec<DataId>) {
        let mut ids = IdStore::new();
        let mut collections = CollectionStore::new();
        let master = collections.create_master("Scene Collection");
        let mut obs = Vec::new();
        for &(object_type, linked) in objects {
            let mut data = ObjectData::new(object_type);
            data.linked = linked;
            let ob = ids.add_object("Ob", data);
            collections.add_object(master, ob);
            obs.push(ob);
        }
        let mut view = View::new("View Layer");
        view.sync(&collections, master, &mut Tracer::none());
        (ids, collections, view, obs)
    }

    fn select(view: &mut View, object: DataId) {
        let id = view.bases().find(object).unwrap();
        view.bases_mut().select_base(id);
    }

    #[test]
    fn flag_iterator_filters_in_list_order() {
        let (_, _, mut view, obs) = setup(&[
            (ObjectType::Mesh, false),
            (ObjectType::Mesh, false),
            (ObjectType::Mesh, false),
        ]);
        select(&mut view, obs[2]);
        select(&mut view, obs[0]);
        let selected: Vec<DataId> = view.selected_objects().collect();
        assert_eq!(selected, vec![obs[0], obs[2]]);
        assert_eq!(view.visible_objects().count(), 3);
    }

    #[test]
    fn empty_view_iterators_are_empty() {
        let view = View::new("View Layer");
        let ids = IdStore::new();
        assert!(view.selected_bases().next().is_none());
        assert!(view.bases_in_mode(&ids, ObjectMode::EDIT).next().is_none());
    }

    #[test]
    fn selected_editable_skips_linked_objects() {
        let (ids, _, mut view, obs) = setup(&[(ObjectType::Mesh, true), (ObjectType::Mesh, false)]);
        select(&mut view, obs[0]);
        select(&mut view, obs[1]);
        let editable: Vec<DataId> = view.selected_editable_objects(&ids).collect();
        assert_eq!(editable, vec![obs[1]]);
    }

    #[test]
    fn bases_in_mode_starts_with_active_and_matches_type() {
        let (mut ids, _, mut view, obs) = setup(&[
            (ObjectType::Mesh, false),
            (ObjectType::Mesh, false),
            (ObjectType::Curve, false),
            (ObjectType::Mesh, false),
        ]);
        for &ob in &obs {
            ids.object_mut(ob).unwrap().mode = ObjectMode::EDIT;
        }
        // obs[3] is selected but not in edit mode.
        ids.object_mut(obs[3]).unwrap().mode = ObjectMode::OBJECT;
        select(&mut view, obs[0]);
        select(&mut view, obs[2]);
        select(&mut view, obs[3]);
        select(&mut view, obs[1]); // active

        let got: Vec<DataId> = view
            .bases_in_mode(&ids, ObjectMode::EDIT)
            .map(|(_, b)| b.object())
            .collect();
        assert_eq!(got, vec![obs[1], obs[0]]);
    }

    #[test]
    fn bases_in_mode_yields_active_outside_mode() {
        let (mut ids, _, mut view, obs) = setup(&[(ObjectType::Mesh, false), (ObjectType::Mesh, false)]);
        ids.object_mut(obs[0]).unwrap().mode = ObjectMode::SCULPT;
        select(&mut view, obs[0]);
        select(&mut view, obs[1]);
        let got: Vec<DataId> = view
            .bases_in_mode(&ids, ObjectMode::SCULPT)
            .map(|(_, b)| b.object())
            .collect();
        assert_eq!(got, vec![obs[1], obs[0]], "active obs[1] leads while still in object mode");
    }

    #[test]
    fn bases_in_mode_yields_unselected_active() {
        let (mut ids, _, mut view, obs) = setup(&[(ObjectType::Mesh, false), (ObjectType::Mesh, false)]);
        ids.object_mut(obs[1]).unwrap().mode = ObjectMode::EDIT;
        select(&mut view, obs[1]);
        select(&mut view, obs[0]);
        view.bases_mut().deselect_all();
        let active = view.bases().active().unwrap();
        let got: Vec<BaseId> = view
            .bases_in_mode(&ids, ObjectMode::EDIT)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(got, vec![active], "unselected sibling obs[1] is left out");
    }

    #[test]
    fn hidden_bases_are_not_visible() {
        let mut ids = IdStore::new();
        let mut collections = CollectionStore::new();
        let master = collections.create_master("Scene Collection");
        let hidden = collections.create("Hidden");
        collections.link_child(master, hidden).unwrap();
        collections.set_restrict(hidden, CollectionFlags::RESTRICT_VIEW);
        let ob = ids.add_object("Ob", ObjectData::new(ObjectType::Empty));
        collections.add_object(hidden, ob);
        let mut view = View::new("View Layer");
        view.sync(&collections, master, &mut Tracer::none());
        assert_eq!(view.visible_objects().count(), 0);
        assert_eq!(view.bases_with(BaseFlags::VISIBLE_RENDER).count(), 1);
    }
}
