// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::node::NodeArena;
use crate::data::NodeId;

/// A depth-first, pre-order iterator over a view's layer nodes.
///
/// Created by [`View::nodes`](super::View::nodes).
#[derive(Debug)]
pub struct Nodes<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(arena: &'a NodeArena, roots: &[NodeId]) -> Self {
        Self {
            arena,
            stack: roots.iter().rev().copied().collect(),
        }
    }
}

impl Iterator for Nodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let id = self.stack.pop()?;
            // Stale entries only appear between a collection being destroyed
            // and the next sync.
            if let Some(node) = self.arena.get(id) {
                self.stack.extend(node.children.iter().rev());
                return Some(id);
            }
        }
    }
}
