// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable error types.
//!
//! Only shape and lookup failures are reported here. Broken internal
//! invariants (stale handles passed to accessors that require live ones, a
//! sync whose mirror does not match its source) panic instead.

use alloc::string::String;

use crate::data::IdKind;

/// Why a collection link operation was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// One of the handles no longer refers to a live collection.
    #[error("collection handle is stale")]
    StaleCollection,
    /// A master collection can only be a root.
    #[error("a master collection cannot be linked as a child")]
    MasterAsChild,
    /// The child is already linked under this parent.
    #[error("collection is already linked under this parent")]
    AlreadyLinked,
    /// The link would make a collection its own descendant.
    #[error("link would create a cycle")]
    Cycle,
    /// The child is not linked under this parent.
    #[error("collection is not linked under this parent")]
    NotLinked,
}

/// Why a dynamic override property could not be added.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OverrideError {
    /// The owning datablock no longer exists.
    #[error("override owner is not a live datablock")]
    StaleOwner,
    /// Overrides are only supported on scene-level and collection-member
    /// datablocks.
    #[error("datablock kind {0:?} cannot carry dynamic overrides")]
    UnsupportedOwner(IdKind),
    /// The owner has no property at the requested path.
    #[error("no property at path `{0}`")]
    UnresolvedPath(String),
    /// The property's array is longer than the inline snapshot supports.
    #[error("array of length {len} exceeds the supported maximum of {max}")]
    ArrayTooLong {
        /// Length of the property's array.
        len: usize,
        /// Longest supported array.
        max: usize,
    },
    /// The property's value type cannot be snapshotted.
    #[error("property at `{0}` has a type that cannot be overridden")]
    UnsupportedValue(String),
}
