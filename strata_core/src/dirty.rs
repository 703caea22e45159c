// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants for the collection graph.
//!
//! The [`CollectionStore`](crate::data::CollectionStore) records every
//! mutation on one of these [`understory_dirty`] channels. Each channel
//! represents an independent category of change.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`RESTRICT`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) over dependency edges from
//!   child collection to parent collection. Changing a parent's restriction
//!   flags marks every descendant, because restrictions are inherited down
//!   every path.
//!
//! - **Local-only**: [`CONTENTS`] marks only the collection whose object
//!   list changed.
//!
//! - **Structural**: [`HIERARCHY`] is marked on link/unlink, creation and
//!   destruction.
//!
//! # Consumption
//!
//! Views never inspect the graph for changes. The owner drains the channels
//! through [`CollectionStore::take_changes`](crate::data::CollectionStore::take_changes)
//! and re-syncs views when anything was marked (see
//! [`Database::sync_if_dirty`](crate::Database::sync_if_dirty)).

use understory_dirty::Channel;

/// Child links changed, or a collection was created or destroyed.
pub const HIERARCHY: Channel = Channel::new(0);

/// A collection's directly contained objects changed.
pub const CONTENTS: Channel = Channel::new(1);

/// Restriction flags changed; propagates to descendant collections.
pub const RESTRICT: Channel = Channel::new(2);
