// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for view synchronization.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! sync pass, cache management and override application call at each stage.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-base [`BaseChange`] and
//!   per-node [`NodeChange`] events plus the corresponding `TraceSink`
//!   methods.

use crate::data::DataId;
#[cfg(feature = "trace-rich")]
use crate::data::{BaseId, CollectionId, NodeId};
use crate::overrides::{OverrideSetId, PropertyId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What happened to a base during a sync.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseChangeKind {
    /// A base was created for a newly reachable object.
    Added,
    /// A base was dropped because its object is no longer reachable.
    Removed,
}

/// What happened to a layer node during a sync.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeChangeKind {
    /// A node was created for a newly reachable collection.
    Created,
    /// A node (and its subtree) was freed.
    Pruned,
}

/// Result of applying one override property to one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplyOutcome {
    /// The snapshot was written.
    Applied,
    /// The target has no compatible property at the path.
    Skipped,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted before a view sync starts.
#[derive(Clone, Copy, Debug)]
pub struct SyncBeginEvent {
    /// Per-view sync counter.
    pub sync_index: u64,
    /// Layer nodes before the sync.
    pub nodes: usize,
    /// Bases before the sync.
    pub bases: usize,
}

/// Emitted after a view sync finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Per-view sync counter.
    pub sync_index: u64,
    /// Layer nodes after the sync.
    pub nodes: usize,
    /// Bases after the sync.
    pub bases: usize,
    /// Nodes created for newly reachable collections.
    pub nodes_created: usize,
    /// Nodes freed, counting every node of pruned subtrees.
    pub nodes_pruned: usize,
    /// Bases created for newly reachable objects.
    pub bases_added: usize,
    /// Bases dropped because their object became unreachable.
    pub bases_removed: usize,
}

/// Emitted when a view drops its caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachesInvalidatedEvent {
    /// The dense base array was dropped.
    pub array: bool,
    /// The object→base hash index was dropped.
    pub index: bool,
}

/// Emitted for every override property considered during
/// [`View::apply_overrides`](crate::view::View::apply_overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverrideApplyEvent {
    /// The datablock being evaluated.
    pub target: DataId,
    /// The set the property belongs to.
    pub set: OverrideSetId,
    /// The property.
    pub property: PropertyId,
    /// Whether the value was written.
    pub outcome: ApplyOutcome,
}

/// A per-sync base change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct BaseChange {
    /// The base that changed.
    pub base: BaseId,
    /// The object it represents.
    pub object: DataId,
    /// What happened.
    pub kind: BaseChangeKind,
}

/// A per-sync layer node change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct NodeChange {
    /// The node that changed.
    pub node: NodeId,
    /// The collection it mirrors (possibly stale for pruned nodes).
    pub collection: CollectionId,
    /// What happened.
    pub kind: NodeChangeKind,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from view synchronization and evaluation.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called before a view sync starts.
    fn on_sync_begin(&mut self, e: &SyncBeginEvent) {
        _ = e;
    }

    /// Called with the summary of a finished sync.
    fn on_sync_end(&mut self, s: &SyncSummary) {
        _ = s;
    }

    /// Called when a view drops its caches.
    fn on_caches_invalidated(&mut self, e: &CachesInvalidatedEvent) {
        _ = e;
    }

    /// Called for each override property considered during application.
    fn on_override_apply(&mut self, e: &OverrideApplyEvent) {
        _ = e;
    }

    /// Called with the bases added and removed by one sync (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_base_changes(&mut self, sync_index: u64, changes: &[BaseChange]) {
        _ = (sync_index, changes);
    }

    /// Called with the nodes created and pruned by one sync (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_changes(&mut self, sync_index: u64, changes: &[NodeChange]) {
        _ = (sync_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Returns whether events are dispatched anywhere.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`SyncBeginEvent`].
    #[inline]
    pub fn sync_begin(&mut self, e: &SyncBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sync_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SyncSummary`].
    #[inline]
    pub fn sync_end(&mut self, summary: &SyncSummary) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sync_end(summary);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = summary;
        }
    }

    /// Emits a [`CachesInvalidatedEvent`].
    #[inline]
    pub fn caches_invalidated(&mut self, e: &CachesInvalidatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_caches_invalidated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OverrideApplyEvent`].
    #[inline]
    pub fn override_apply(&mut self, e: &OverrideApplyEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_override_apply(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits base changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn base_changes(&mut self, sync_index: u64, changes: &[BaseChange]) {
        if let Some(s) = &mut self.sink {
            s.on_base_changes(sync_index, changes);
        }
    }

    /// Emits node changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_changes(&mut self, sync_index: u64, changes: &[NodeChange]) {
        if let Some(s) = &mut self.sink {
            s.on_node_changes(sync_index, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_sync_begin(&SyncBeginEvent {
            sync_index: 0,
            nodes: 0,
            bases: 0,
        });
        sink.on_sync_end(&SyncSummary::default());
        sink.on_caches_invalidated(&CachesInvalidatedEvent {
            array: true,
            index: false,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        assert!(!tracer.is_active());
        tracer.sync_end(&SyncSummary::default());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            syncs: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_sync_end(&mut self, s: &SyncSummary) {
                self.syncs.push(s.sync_index);
            }
        }

        let mut sink = RecordingSink { syncs: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.sync_end(&SyncSummary {
            sync_index: 3,
            ..SyncSummary::default()
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.syncs, &[3]);
    }
}
