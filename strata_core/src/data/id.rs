// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational handle types.
//!
//! Every arena in the crate hands out handles made of a slot index and a
//! generation counter. Destroying an entry bumps the slot's generation, so
//! handles held elsewhere (a layer node's back-reference to its collection, an
//! override set's affected-collection list) go stale instead of silently
//! pointing at whatever reuses the slot.

use core::fmt;

macro_rules! generational_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            /// Slot index into the owning arena.
            pub(crate) idx: u32,
            /// Generation counter; must match the arena's generation for this slot.
            pub(crate) generation: u32,
        }

        impl $name {
            pub(crate) const fn new(idx: u32, generation: u32) -> Self {
                Self { idx, generation }
            }

            /// Returns the raw slot index (for diagnostics only).
            #[inline]
            #[must_use]
            pub const fn index(self) -> u32 {
                self.idx
            }

            /// Returns the generation counter.
            #[inline]
            #[must_use]
            pub const fn generation(self) -> u32 {
                self.generation
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({}@gen{})"), self.idx, self.generation)
            }
        }
    };
}

generational_handle!(
    /// A handle to a datablock (scene, object, mesh, ...) in an
    /// [`IdStore`](super::IdStore).
    ///
    /// Objects are datablocks too; a view's base registry is keyed by the
    /// object's `DataId`.
    DataId,
    "DataId"
);

generational_handle!(
    /// A handle to a collection in a [`CollectionStore`](super::CollectionStore).
    CollectionId,
    "CollectionId"
);

generational_handle!(
    /// A handle to a layer node in a view's mirror tree.
    NodeId,
    "NodeId"
);

generational_handle!(
    /// A handle to a base in a view's [`BaseRegistry`](crate::view::BaseRegistry).
    BaseId,
    "BaseId"
);

/// Identifies a scene inside a [`Database`](crate::Database).
///
/// Scenes are never destroyed, so a plain index is enough.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(pub u32);

impl fmt::Debug for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneId({})", self.0)
    }
}
