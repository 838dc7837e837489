use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Application Identity ─────────────────────────────────────────

/// Identity of the focused application, as reported by the host.
///
/// The id is a dotted identifier (reverse-DNS style for desktop apps,
/// e.g. `org.gnome.TextEditor`), used only for window matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppIdentity {
    pub id: String,
}

impl AppIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Trailing dotted segment of the id (`org.example.App` → `App`).
    /// Undotted ids are their own base name.
    pub fn base_name(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

// ─── Windows ──────────────────────────────────────────────────────

/// One open window as probed from the host this refresh.
///
/// Candidates are transient: the host can destroy the underlying window
/// at any moment, so they are re-probed on every trigger and never held
/// across refreshes. A `None` field means the corresponding property
/// query failed or the property was absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateWindow {
    /// Opaque host window handle token (e.g. an X11 window id).
    pub id: String,
    /// Class-like application-grouping identifier. `None` excludes the
    /// window from resolution without error.
    pub class: Option<String>,
    /// Window title. `None` degrades to an empty title at sort time.
    pub title: Option<String>,
    /// Host user-time counter; opaque, only compared for recency.
    pub last_focus: Option<u64>,
}

/// Value identity of a window row: the (title, class) snapshot taken
/// when the row was created. Menu entries bind to this value, never to
/// a live window handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowKey {
    pub title: String,
    pub class: String,
}

impl WindowKey {
    pub fn new(title: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            class: class.into(),
        }
    }
}

/// A window that passed resolution for the current pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub id: String,
    pub key: WindowKey,
    pub last_focus: Option<u64>,
}

// ─── Display Entries ──────────────────────────────────────────────

/// Identifier of a displayed menu row, allocated by the surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A displayed row as enumerated from the surface.
///
/// Rows with `window: None` are structural (headers, separators) and
/// must never be removed or reordered by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySlot {
    pub id: EntryId,
    pub window: Option<WindowKey>,
}

impl EntrySlot {
    pub fn structural(id: EntryId) -> Self {
        Self { id, window: None }
    }

    pub fn window(id: EntryId, key: WindowKey) -> Self {
        Self {
            id,
            window: Some(key),
        }
    }
}
