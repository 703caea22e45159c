// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON snapshots for strata diagnostics.
//!
//! This crate provides development tooling around `strata_core`:
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](strata_core::trace::TraceSink)
//!   with human-readable one-line-per-event output.
//! - [`snapshot::export`]: writes a view's layer tree and base registry as
//!   JSON.

pub mod pretty;
pub mod snapshot;
