// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared data owned outside of any view.
//!
//! - [`IdStore`]: datablocks (scenes, objects, meshes, materials, ...), each
//!   with a path-addressed [`PropertyMap`].
//! - [`CollectionStore`]: the collection DAG. Views mirror it but never
//!   mutate it.
//!
//! Both stores hand out generational handles ([`DataId`],
//! [`CollectionId`]) that become stale when the entry is removed.

mod collection;
mod id;
mod property;
mod store;

pub use collection::{Collection, CollectionChanges, CollectionFlags, CollectionStore};
pub use id::{BaseId, CollectionId, DataId, NodeId, SceneId};
pub use property::{PropertyMap, PropertyValue};
pub use store::{Datablock, IdKind, IdStore, ObjectData, ObjectMode, ObjectType};
