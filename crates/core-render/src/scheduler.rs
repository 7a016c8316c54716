//! Render scheduler.
//!
//! Producers report invalidation intents (`RenderDelta`) via `mark`. On
//! `consume` queued deltas collapse into a single semantic shape plus the
//! strategy the engine should actually execute.
//!
//! Merge semantics:
//! - Any `Full` in the queue makes the semantic decision `Full`.
//! - Otherwise `Selection` outranks `CursorOnly`.
//! - `CursorOnly` survives only when it is the sole kind queued.
//!
//! Effective strategy:
//! - `CursorOnly` executes as a cursor move without repainting text.
//! - `Selection` and `Full` both repaint the whole frame; the highlight
//!   crosses line boundaries so there is no cheaper path for it.

use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

/// Render invalidation intents produced by editor state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDelta {
    /// Text changed or the terminal was resized.
    Full,
    /// Only the highlighted selection changed.
    Selection,
    /// Only the cursor moved.
    CursorOnly,
}

/// Decision handed to the engine.
///
/// - `semantic`: the merged minimal damage kind for this frame.
/// - `effective`: the strategy to execute now. May be wider than `semantic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub semantic: RenderDelta,
    pub effective: RenderDelta,
}

impl Decision {
    /// Decision used for the very first frame and after resizes.
    pub fn full() -> Self {
        Self {
            semantic: RenderDelta::Full,
            effective: RenderDelta::Full,
        }
    }
}

/// Counters per collapsed semantic kind.
#[derive(Debug, Default)]
pub struct RenderDeltaMetrics {
    full: AtomicU64,
    selection: AtomicU64,
    cursor_only: AtomicU64,
    /// Marks absorbed into an earlier mark of the same frame.
    coalesced: AtomicU64,
    semantic_frames: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDeltaMetricsSnapshot {
    pub full: u64,
    pub selection: u64,
    pub cursor_only: u64,
    pub coalesced: u64,
    pub semantic_frames: u64,
}

impl RenderDeltaMetrics {
    pub fn snapshot(&self) -> RenderDeltaMetricsSnapshot {
        RenderDeltaMetricsSnapshot {
            full: self.full.load(Relaxed),
            selection: self.selection.load(Relaxed),
            cursor_only: self.cursor_only.load(Relaxed),
            coalesced: self.coalesced.load(Relaxed),
            semantic_frames: self.semantic_frames.load(Relaxed),
        }
    }

    fn incr_semantic(&self, delta: RenderDelta) {
        let counter = match delta {
            RenderDelta::Full => &self.full,
            RenderDelta::Selection => &self.selection,
            RenderDelta::CursorOnly => &self.cursor_only,
        };
        counter.fetch_add(1, Relaxed);
        self.semantic_frames.fetch_add(1, Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    /// Deltas recorded since the last `consume`.
    pending: Vec<RenderDelta>,
    metrics: RenderDeltaMetrics,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics_snapshot(&self) -> RenderDeltaMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Record a new delta. Multiple calls accumulate until `consume()`.
    pub fn mark(&mut self, delta: RenderDelta) {
        tracing::trace!(target: "render.scheduler", ?delta, "render_mark");
        self.pending.push(delta);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Collapse queued deltas and return a `Decision`, or `None` when
    /// nothing was marked since the previous call.
    pub fn consume(&mut self) -> Option<Decision> {
        if self.pending.is_empty() {
            return None;
        }
        let merged = self.collapse();
        let absorbed = self.pending.len() as u64 - 1;
        self.metrics.coalesced.fetch_add(absorbed, Relaxed);
        self.pending.clear();
        self.metrics.incr_semantic(merged);
        let effective = match merged {
            RenderDelta::CursorOnly => RenderDelta::CursorOnly,
            RenderDelta::Selection | RenderDelta::Full => RenderDelta::Full,
        };
        tracing::trace!(target: "render.scheduler", ?merged, ?effective, "render_delta_collapse");
        Some(Decision {
            semantic: merged,
            effective,
        })
    }

    fn collapse(&self) -> RenderDelta {
        let mut merged = RenderDelta::CursorOnly;
        for delta in &self.pending {
            match delta {
                RenderDelta::Full => return RenderDelta::Full,
                RenderDelta::Selection => merged = RenderDelta::Selection,
                RenderDelta::CursorOnly => {}
            }
        }
        merged
    }
}
