// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view state: the layer tree, the base registry and override sets.
//!
//! A [`View`] mirrors the part of the shared collection graph reachable from
//! its scene's master collection. It has:
//!
//! - A **layer tree** of [`LayerNode`]s, one per reachable collection *path*.
//!   Nodes carry local state ([`NodeFlags::EXCLUDE`]) that is never inherited.
//! - A [`BaseRegistry`] with one [`Base`] per reachable object, holding
//!   selection and visibility bits derived from the restriction flags of every
//!   collection on every path to the object.
//! - An active node and an active base, both weak handles that syncs keep
//!   valid.
//! - An ordered list of [`OverrideSet`](crate::overrides::OverrideSet)s.
//!
//! The tree and registry only change in [`View::sync`]; the graph itself is
//! never read outside of it except by explicit queries that take a
//! [`CollectionStore`](crate::data::CollectionStore).

mod base;
mod evaluate;
mod iter;
mod node;
mod sync;
mod traverse;

use alloc::string::String;
use alloc::vec::Vec;

pub use base::{Base, BaseFlags, BaseRegistry};
pub use evaluate::EvalMode;
pub use iter::{BasesInMode, BasesWith, RenderableObjects, SelectedEditableObjects};
pub use node::{LayerNode, NodeFlags};
pub use traverse::Nodes;

use node::NodeArena;

use crate::data::NodeId;
use crate::overrides::OverrideSet;

bitflags::bitflags! {
    /// Flags of a view.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u8 {
        /// The view takes part in final renders.
        const RENDER = 1 << 0;
    }
}

/// One view of a scene.
#[derive(Debug)]
pub struct View {
    pub(crate) name: String,
    /// View flags.
    pub flags: ViewFlags,
    pub(crate) nodes: NodeArena,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) active_node: Option<NodeId>,
    pub(crate) bases: BaseRegistry,
    pub(crate) override_sets: Vec<OverrideSet>,
    pub(crate) active_override_set: usize,
    pub(crate) next_override_set: u32,
    pub(crate) needs_sync: bool,
    pub(crate) sync_count: u64,
}

impl View {
    /// Creates an empty, render-enabled view. Call [`sync`](Self::sync) to
    /// populate it.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: ViewFlags::RENDER,
            nodes: NodeArena::default(),
            roots: Vec::new(),
            active_node: None,
            bases: BaseRegistry::new(),
            override_sets: Vec::new(),
            active_override_set: 0,
            next_override_set: 0,
            needs_sync: true,
            sync_count: 0,
        }
    }

    /// The view's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the view takes part in final renders.
    #[must_use]
    pub fn is_render(&self) -> bool {
        self.flags.contains(ViewFlags::RENDER)
    }

    /// The base registry.
    #[must_use]
    pub fn bases(&self) -> &BaseRegistry {
        &self.bases
    }

    /// The base registry, for selection changes.
    pub fn bases_mut(&mut self) -> &mut BaseRegistry {
        &mut self.bases
    }

    /// Copies this view under a new name.
    ///
    /// The tree, bases (with selection and the active base) and override sets
    /// are copied. The copy's caches start empty.
    #[must_use]
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: self.flags,
            nodes: self.nodes.clone(),
            roots: self.roots.clone(),
            active_node: self.active_node,
            bases: self.bases.duplicate(),
            override_sets: self.override_sets.clone(),
            active_override_set: self.active_override_set,
            next_override_set: self.next_override_set,
            needs_sync: self.needs_sync,
            sync_count: 0,
        }
    }
}
