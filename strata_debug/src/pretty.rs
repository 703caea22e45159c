// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    ApplyOutcome, BaseChange, BaseChangeKind, CachesInvalidatedEvent, NodeChange, NodeChangeKind,
    OverrideApplyEvent, SyncBeginEvent, SyncSummary, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            verbose: false,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also prints one line per node and base change, not just the counts.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn outcome_name(outcome: ApplyOutcome) -> &'static str {
    match outcome {
        ApplyOutcome::Applied => "applied",
        ApplyOutcome::Skipped => "skipped",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_sync_begin(&mut self, e: &SyncBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[sync:begin] sync={} nodes={} bases={}",
            e.sync_index, e.nodes, e.bases,
        );
    }

    fn on_sync_end(&mut self, s: &SyncSummary) {
        let _ = writeln!(
            self.writer,
            "[sync:end] sync={} nodes={} (+{} -{}) bases={} (+{} -{})",
            s.sync_index,
            s.nodes,
            s.nodes_created,
            s.nodes_pruned,
            s.bases,
            s.bases_added,
            s.bases_removed,
        );
    }

    fn on_caches_invalidated(&mut self, e: &CachesInvalidatedEvent) {
        let _ = writeln!(
            self.writer,
            "[caches] dropped array={} index={}",
            e.array, e.index,
        );
    }

    fn on_override_apply(&mut self, e: &OverrideApplyEvent) {
        let _ = writeln!(
            self.writer,
            "[override] target={:?} set={:?} property={:?} {}",
            e.target,
            e.set,
            e.property,
            outcome_name(e.outcome),
        );
    }

    fn on_base_changes(&mut self, sync_index: u64, changes: &[BaseChange]) {
        let _ = writeln!(
            self.writer,
            "[bases] sync={sync_index} changes={}",
            changes.len(),
        );
        if self.verbose {
            for c in changes {
                let sign = match c.kind {
                    BaseChangeKind::Added => '+',
                    BaseChangeKind::Removed => '-',
                };
                let _ = writeln!(self.writer, "  {sign} {:?} {:?}", c.base, c.object);
            }
        }
    }

    fn on_node_changes(&mut self, sync_index: u64, changes: &[NodeChange]) {
        let _ = writeln!(
            self.writer,
            "[nodes] sync={sync_index} changes={}",
            changes.len(),
        );
        if self.verbose {
            for c in changes {
                let sign = match c.kind {
                    NodeChangeKind::Created => '+',
                    NodeChangeKind::Pruned => '-',
                };
                let _ = writeln!(self.writer, "  {sign} {:?} {:?}", c.node, c.collection);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Database;
    use strata_core::data::{ObjectData, ObjectType};
    use strata_core::trace::Tracer;

    #[test]
    fn pretty_print_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_sync_end(&SyncSummary {
            sync_index: 4,
            nodes: 2,
            nodes_created: 1,
            bases: 3,
            bases_added: 3,
            ..SyncSummary::default()
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[sync:end]"), "got: {output}");
        assert!(output.contains("sync=4"), "got: {output}");
        assert!(output.contains("bases=3 (+3 -0)"), "got: {output}");
    }

    #[test]
    fn verbose_sync_lists_changes() {
        let mut db = Database::new();
        let scene = db.add_scene("Scene");
        let master = db.scene(scene).unwrap().master();
        let a = db.collections.create("A");
        db.collections.link_child(master, a).unwrap();
        db.add_object(a, "Cube", ObjectData::new(ObjectType::Mesh));

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).verbose(true);
        db.sync_scene(scene, &mut Tracer::new(&mut sink));
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[sync:begin]"), "got: {output}");
        assert!(output.contains("[nodes] sync=2 changes=1"), "got: {output}");
        assert!(output.contains("+ BaseId("), "got: {output}");
    }
}
