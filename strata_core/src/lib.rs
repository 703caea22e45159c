// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collection visibility sync and per-view object caches.
//!
//! `strata_core` keeps per-view mirrors of a shared, DAG-shaped collection
//! graph in step with that graph, and derives per-object visibility and
//! selectability from restriction flags inherited along every path. It is
//! `no_std` compatible (with `alloc`) and uses arena storage with
//! generational handles throughout.
//!
//! # Architecture
//!
//! ```text
//!   CollectionStore edits ──► dirty channels ──► Database::sync_if_dirty()
//!                                                       │
//!                 ┌─────────────────────────────────────┘
//!                 ▼
//!   View::sync() ──► layer tree + BaseRegistry ──► View::evaluate(mode)
//!                                                       │
//!                 ┌─────────────────────────────────────┘
//!                 ▼
//!   iterators / array cache / View::apply_overrides()
//! ```
//!
//! **[`data`]**: Datablocks with path-addressed properties, and the shared
//! collection graph. Nothing here knows about views.
//!
//! **[`dirty`]**: Dirty-tracking channels via `understory_dirty`. Graph
//! mutations mark them; draining them is the "topology changed" trigger.
//!
//! **[`view`]**: The per-view layer tree, the base registry with its lazy
//! hash index and dense array cache, the sync algorithm, evaluation and
//! filtered iterators.
//!
//! **[`overrides`]**: Named override sets that snapshot property values and
//! write them onto evaluated datablocks.
//!
//! **[`scene`]**: Scenes (master collection + views + background chain) and
//! the top-level [`Database`].
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! sync instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Builds the hash index behind a `OnceLock`
//!   so views can be queried from several threads.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node and
//!   per-base change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod data;
pub mod dirty;
pub mod error;
pub mod naming;
pub mod overrides;
pub mod scene;
pub mod trace;
pub mod view;

pub use scene::Database;
