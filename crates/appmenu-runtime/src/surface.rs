//! Terminal-backed menu surface.
//!
//! Owns one structural header row (the anchor the engine inserts
//! behind) and the window rows the engine manages. Row ids are
//! monotonic and never reused, so a stale id from a previous refresh
//! can never alias a new row.

use appmenu_core::reconcile::{MenuSurface, SurfaceError};
use appmenu_core::types::{EntryId, EntrySlot, WindowKey};

use crate::context::Placement;

#[derive(Debug, Clone, PartialEq, Eq)]
enum RowKind {
    Header,
    Window(WindowKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    id: EntryId,
    kind: RowKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMenu {
    label: String,
    rows: Vec<Row>,
    next_id: u64,
}

const HEADER_WIDTH: usize = 40;

impl TermMenu {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rows: vec![Row {
                id: EntryId(0),
                kind: RowKind::Header,
            }],
            next_id: 1,
        }
    }

    /// The header row the engine anchors window rows behind.
    /// Row 0 is always the header: it is created with the menu and
    /// `remove_entry` only removes window rows.
    pub fn anchor(&self) -> EntryId {
        self.rows[0].id
    }

    /// Update the header label (structural rows are surface-owned).
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn window_keys(&self) -> Vec<&WindowKey> {
        self.rows
            .iter()
            .filter_map(|r| match &r.kind {
                RowKind::Window(key) => Some(key),
                RowKind::Header => None,
            })
            .collect()
    }

    /// Render the menu for the terminal.
    pub fn render(&self, placement: Placement, use_color: bool) -> String {
        let mut out = String::new();
        for row in &self.rows {
            match &row.kind {
                RowKind::Header => {
                    let line = match placement {
                        Placement::Left => format!("\u{25b8} {}", self.label),
                        Placement::Right => {
                            let tail = format!("{} \u{25c2}", self.label);
                            format!("{tail:>HEADER_WIDTH$}")
                        }
                    };
                    if use_color {
                        out.push_str(&format!("\x1b[1m{line}\x1b[0m\n"));
                    } else {
                        out.push_str(&line);
                        out.push('\n');
                    }
                }
                RowKind::Window(key) => {
                    out.push_str("  ");
                    out.push_str(&key.title);
                    out.push('\n');
                }
            }
        }
        out
    }
}

impl MenuSurface for TermMenu {
    fn entries(&self) -> Vec<EntrySlot> {
        self.rows
            .iter()
            .map(|r| match &r.kind {
                RowKind::Header => EntrySlot::structural(r.id),
                RowKind::Window(key) => EntrySlot::window(r.id, key.clone()),
            })
            .collect()
    }

    fn remove_entry(&mut self, id: EntryId) -> Result<(), SurfaceError> {
        let pos = self
            .rows
            .iter()
            .position(|r| r.id == id && matches!(r.kind, RowKind::Window(_)))
            .ok_or(SurfaceError::EntryGone(id))?;
        self.rows.remove(pos);
        Ok(())
    }

    fn insert_window(&mut self, index: usize, key: WindowKey) -> Result<EntryId, SurfaceError> {
        if index > self.rows.len() {
            return Err(SurfaceError::IndexOutOfBounds {
                index,
                len: self.rows.len(),
            });
        }
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.rows.insert(
            index,
            Row {
                id,
                kind: RowKind::Window(key),
            },
        );
        Ok(id)
    }
}
