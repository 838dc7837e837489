use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::{OrderPolicy, sort_windows};
use crate::reconcile::{ApplyStats, MenuSurface, apply_plan, plan_reconcile};
use crate::resolver::resolve;
use crate::types::{AppIdentity, CandidateWindow, EntryId, WindowKey, WindowSnapshot};

/// Result of one refresh pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshOutcome {
    /// No application identity could be resolved; the displayed state
    /// was left untouched.
    Skipped { refreshed_at: DateTime<Utc> },
    /// The pass ran to completion (possibly without mutating anything).
    Applied {
        /// Windows admitted by the resolver, in final display order.
        windows: Vec<WindowSnapshot>,
        /// Candidates excluded because their class was unavailable.
        skipped_unavailable: usize,
        /// Candidates matching no rule.
        rejected: usize,
        stats: ApplyStats,
        refreshed_at: DateTime<Utc>,
    },
}

impl RefreshOutcome {
    /// True when the pass touched the displayed structure.
    pub fn mutated(&self) -> bool {
        match self {
            Self::Skipped { .. } => false,
            Self::Applied { stats, .. } => stats.mutated(),
        }
    }
}

/// Run one full refresh: resolve the focused application's windows,
/// sort them, and patch the surface. Runs to completion synchronously;
/// a missing identity is a no-op that preserves the previous display
/// state.
pub fn refresh_menu<S: MenuSurface + ?Sized>(
    surface: &mut S,
    identity: Option<&AppIdentity>,
    candidates: &[CandidateWindow],
    policy: &OrderPolicy,
    anchor: Option<EntryId>,
    now: DateTime<Utc>,
) -> RefreshOutcome {
    let Some(identity) = identity else {
        return RefreshOutcome::Skipped { refreshed_at: now };
    };

    let resolved = resolve(identity, candidates, now);
    let skipped_unavailable = resolved.skipped_unavailable;
    let rejected = resolved.rejected;

    let mut windows: Vec<WindowSnapshot> =
        resolved.windows.into_iter().map(|w| w.snapshot).collect();
    sort_windows(&mut windows, policy);

    let target: Vec<WindowKey> = windows.iter().map(|w| w.key.clone()).collect();
    let plan = plan_reconcile(&surface.entries(), &target, anchor);
    let stats = apply_plan(surface, &plan);

    RefreshOutcome::Applied {
        windows,
        skipped_unavailable,
        rejected,
        stats,
        refreshed_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::SurfaceError;
    use crate::types::EntrySlot;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid")
            .with_timezone(&Utc)
    }

    struct TestSurface {
        rows: Vec<EntrySlot>,
        next_id: u64,
    }

    impl TestSurface {
        fn with_header() -> Self {
            Self {
                rows: vec![EntrySlot::structural(EntryId(0))],
                next_id: 1,
            }
        }

        fn window_titles(&self) -> Vec<&str> {
            self.rows
                .iter()
                .filter_map(|r| r.window.as_ref())
                .map(|k| k.title.as_str())
                .collect()
        }
    }

    impl MenuSurface for TestSurface {
        fn entries(&self) -> Vec<EntrySlot> {
            self.rows.clone()
        }

        fn remove_entry(&mut self, id: EntryId) -> Result<(), SurfaceError> {
            let pos = self
                .rows
                .iter()
                .position(|r| r.id == id)
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
            self.rows.insert(index, EntrySlot::window(id, key));
            Ok(id)
        }
    }

    fn candidate(id: &str, class: &str, title: &str) -> CandidateWindow {
        CandidateWindow {
            id: id.into(),
            class: Some(class.into()),
            title: Some(title.into()),
            last_focus: None,
        }
    }

    const ANCHOR: Option<EntryId> = Some(EntryId(0));

    #[test]
    fn full_pass_sorts_and_populates() {
        let mut surface = TestSurface::with_header();
        let identity = AppIdentity::new("org.example.App");
        let candidates = vec![
            candidate("0x1", "App", "10 Notes"),
            candidate("0x2", "App", "2 Notes"),
            candidate("0x3", "Gimp", "image"),
        ];

        let outcome = refresh_menu(
            &mut surface,
            Some(&identity),
            &candidates,
            &OrderPolicy::default(),
            ANCHOR,
            ts("2026-03-01T10:00:00Z"),
        );

        assert!(outcome.mutated());
        assert_eq!(surface.window_titles(), vec!["2 Notes", "10 Notes"]);
        match outcome {
            RefreshOutcome::Applied {
                windows, rejected, ..
            } => {
                assert_eq!(windows.len(), 2);
                assert_eq!(rejected, 1);
            }
            RefreshOutcome::Skipped { .. } => panic!("expected an applied pass"),
        }
    }

    #[test]
    fn missing_identity_preserves_display() {
        let mut surface = TestSurface::with_header();
        surface
            .insert_window(1, WindowKey::new("kept", "App"))
            .expect("seed row");

        let outcome = refresh_menu(
            &mut surface,
            None,
            &[candidate("0x1", "App", "new")],
            &OrderPolicy::default(),
            ANCHOR,
            ts("2026-03-01T10:00:00Z"),
        );

        assert!(matches!(outcome, RefreshOutcome::Skipped { .. }));
        assert!(!outcome.mutated());
        assert_eq!(surface.window_titles(), vec!["kept"]);
    }

    #[test]
    fn repeated_pass_does_not_mutate() {
        let mut surface = TestSurface::with_header();
        let identity = AppIdentity::new("org.example.App");
        let candidates = vec![
            candidate("0x1", "App", "beta"),
            candidate("0x2", "App", "alpha"),
        ];
        let policy = OrderPolicy::default();

        let first = refresh_menu(
            &mut surface,
            Some(&identity),
            &candidates,
            &policy,
            ANCHOR,
            ts("2026-03-01T10:00:00Z"),
        );
        assert!(first.mutated());

        let second = refresh_menu(
            &mut surface,
            Some(&identity),
            &candidates,
            &policy,
            ANCHOR,
            ts("2026-03-01T10:00:05Z"),
        );
        assert!(!second.mutated());
        assert_eq!(surface.window_titles(), vec!["alpha", "beta"]);
    }

    #[test]
    fn closing_all_windows_empties_the_section() {
        let mut surface = TestSurface::with_header();
        let identity = AppIdentity::new("org.example.App");
        let policy = OrderPolicy::default();

        refresh_menu(
            &mut surface,
            Some(&identity),
            &[candidate("0x1", "App", "one"), candidate("0x2", "App", "two")],
            &policy,
            ANCHOR,
            ts("2026-03-01T10:00:00Z"),
        );
        assert_eq!(surface.window_titles().len(), 2);

        let outcome = refresh_menu(
            &mut surface,
            Some(&identity),
            &[],
            &policy,
            ANCHOR,
            ts("2026-03-01T10:00:05Z"),
        );
        assert!(outcome.mutated());
        assert!(surface.window_titles().is_empty());
        assert_eq!(surface.rows.len(), 1, "header survives");
    }

    #[test]
    fn unavailable_candidates_reported() {
        let mut surface = TestSurface::with_header();
        let identity = AppIdentity::new("org.example.App");
        let broken = CandidateWindow {
            id: "0x9".into(),
            class: None,
            title: None,
            last_focus: None,
        };

        let outcome = refresh_menu(
            &mut surface,
            Some(&identity),
            &[broken, candidate("0x1", "App", "ok")],
            &OrderPolicy::default(),
            ANCHOR,
            ts("2026-03-01T10:00:00Z"),
        );

        match outcome {
            RefreshOutcome::Applied {
                skipped_unavailable,
                windows,
                ..
            } => {
                assert_eq!(skipped_unavailable, 1);
                assert_eq!(windows.len(), 1);
            }
            RefreshOutcome::Skipped { .. } => panic!("expected an applied pass"),
        }
    }
}
