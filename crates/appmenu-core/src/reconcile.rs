use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{EntryId, EntrySlot, WindowKey};

/// Mutation failure reported by a display surface. Entries can be
/// invalidated by the host between enumeration and mutation, so every
/// failure is tolerated as a no-op by `apply_plan`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("entry {0} no longer exists")]
    EntryGone(EntryId),

    #[error("insert index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Displayed list structure owned by the host environment.
///
/// The engine only ever enumerates rows, removes a row by id, and
/// inserts a window row at a display index. Structural rows are created
/// and owned by the surface itself.
pub trait MenuSurface {
    /// Current rows in display order.
    fn entries(&self) -> Vec<EntrySlot>;

    /// Remove the row with the given id.
    fn remove_entry(&mut self, id: EntryId) -> Result<(), SurfaceError>;

    /// Insert a window row bound to `key` at `index`, returning the new
    /// row's id.
    fn insert_window(&mut self, index: usize, key: WindowKey) -> Result<EntryId, SurfaceError>;
}

/// One insertion step. `index` is the display index at application
/// time, assuming all removals and all earlier insertions of the same
/// plan have been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insertion {
    pub index: usize,
    pub key: WindowKey,
}

/// Minimal edit bringing a displayed list in line with a target window
/// sequence: removals first (stale and displaced rows), then insertions
/// in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilePlan {
    pub removals: Vec<EntryId>,
    pub insertions: Vec<Insertion>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.insertions.is_empty()
    }
}

/// Counters from driving a plan into a surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyStats {
    pub removed: usize,
    pub inserted: usize,
    /// Mutations the surface refused (entry already gone etc.).
    pub failed: usize,
}

impl ApplyStats {
    /// True when the surface was actually touched.
    pub fn mutated(&self) -> bool {
        self.removed > 0 || self.inserted > 0
    }
}

// ─── Planning ─────────────────────────────────────────────────────

/// Post-removal display slot used to compute insertion indices.
enum SimSlot {
    /// A kept window row.
    Kept(EntryId),
    /// A structural row, or a window row outside the managed section.
    Fixed,
    /// A row this plan inserts.
    New,
}

/// Compute the edit bringing the window rows after `anchor` in line
/// with `target` order.
///
/// Rows at or before the anchor are never touched. Structural rows keep
/// their relative positions. A window row is kept only when it can take
/// its place in `target` order without moving (greedy in-order match);
/// stale and displaced rows are removed, and missing keys are inserted
/// directly after their predecessor in target order.
///
/// Planning twice against an unchanged window set yields an empty
/// second plan, so refreshes are idempotent.
pub fn plan_reconcile(
    entries: &[EntrySlot],
    target: &[WindowKey],
    anchor: Option<EntryId>,
) -> ReconcilePlan {
    // An anchor that is no longer displayed degrades to "top of list".
    let section_start = anchor
        .and_then(|a| entries.iter().position(|e| e.id == a))
        .map_or(0, |p| p + 1);

    // Greedy in-order match of section window rows against the target.
    let mut removals: Vec<EntryId> = Vec::new();
    let mut matched: Vec<Option<EntryId>> = vec![None; target.len()];
    let mut cursor = 0usize;
    for entry in entries.iter().skip(section_start) {
        let Some(key) = &entry.window else { continue };
        match target[cursor..].iter().position(|t| t == key) {
            Some(offset) => {
                let slot = cursor + offset;
                matched[slot] = Some(entry.id);
                cursor = slot + 1;
            }
            None => removals.push(entry.id),
        }
    }

    // Simulate the post-removal list to compute insertion indices.
    let removed: HashSet<EntryId> = removals.iter().copied().collect();
    let mut sim: Vec<SimSlot> = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if removed.contains(&entry.id) {
            continue;
        }
        if entry.window.is_some() && i >= section_start {
            sim.push(SimSlot::Kept(entry.id));
        } else {
            sim.push(SimSlot::Fixed);
        }
    }

    let mut insertions: Vec<Insertion> = Vec::new();
    let mut prev_pos: Option<usize> = None;
    for (slot, key) in target.iter().enumerate() {
        match matched[slot] {
            Some(id) => {
                let pos = sim
                    .iter()
                    .position(|s| matches!(s, SimSlot::Kept(k) if *k == id))
                    .expect("kept row present in simulation");
                prev_pos = Some(pos);
            }
            None => {
                let at = prev_pos.map_or(section_start, |p| p + 1);
                sim.insert(at, SimSlot::New);
                insertions.push(Insertion {
                    index: at,
                    key: key.clone(),
                });
                prev_pos = Some(at);
            }
        }
    }

    ReconcilePlan {
        removals,
        insertions,
    }
}

/// Drive a plan into a surface, tolerating individual mutation
/// failures: a refused removal or insertion is counted and skipped,
/// never propagated.
pub fn apply_plan<S: MenuSurface + ?Sized>(surface: &mut S, plan: &ReconcilePlan) -> ApplyStats {
    let mut stats = ApplyStats::default();

    for id in &plan.removals {
        match surface.remove_entry(*id) {
            Ok(()) => stats.removed += 1,
            Err(_) => stats.failed += 1,
        }
    }

    for insertion in &plan.insertions {
        match surface.insert_window(insertion.index, insertion.key.clone()) {
            Ok(_) => stats.inserted += 1,
            Err(_) => stats.failed += 1,
        }
    }

    stats
}
