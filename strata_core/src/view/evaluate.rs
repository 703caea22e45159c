// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-evaluation visibility resolution.
//!
//! Sync records viewport and render visibility separately. Evaluation picks
//! one of them as the effective [`VISIBLE`](BaseFlags::VISIBLE) bit for the
//! requested [`EvalMode`], drops selection from bases that can no longer be
//! selected, and rebuilds the dense array that evaluation code indexes into.

use super::View;
use super::base::BaseFlags;

/// Which visibility drives [`BaseFlags::VISIBLE`] during evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Interactive viewport drawing.
    #[default]
    Viewport,
    /// Final render.
    Render,
}

impl EvalMode {
    /// The synced bit that decides visibility in this mode.
    #[must_use]
    pub const fn visibility_bit(self) -> BaseFlags {
        match self {
            Self::Viewport => BaseFlags::VISIBLE_VIEWPORT,
            Self::Render => BaseFlags::VISIBLE_RENDER,
        }
    }
}

impl View {
    /// Resolves effective visibility for `mode` and rebuilds the array cache.
    pub fn evaluate(&mut self, mode: EvalMode) {
        let bit = mode.visibility_bit();
        for base in self.bases.iter_mut() {
            let visible = base.flags.contains(bit);
            base.flags.set(BaseFlags::VISIBLE, visible);
            if !base.flags.contains(BaseFlags::SELECTABLE) {
                base.flags.remove(BaseFlags::SELECTED);
            }
        }
        self.bases.build_array_cache();
    }
}
