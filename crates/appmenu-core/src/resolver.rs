use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AppIdentity, CandidateWindow, WindowKey, WindowSnapshot};

/// Matching rule that admitted a window into the resolved set.
/// Rules are tried in declaration order; first success wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Window class equals the full application id.
    ExactId,
    /// Window class equals the identity base name, case-insensitive.
    BaseName,
    /// The id contains the class, or the class contains the base name.
    Substring,
}

impl MatchRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactId => "exact_id",
            Self::BaseName => "base_name",
            Self::Substring => "substring",
        }
    }
}

/// A window admitted by the resolver, with rule attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWindow {
    pub snapshot: WindowSnapshot,
    pub rule: MatchRule,
}

/// Full output of a resolve pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutput {
    /// Admitted windows, in candidate order (sorting happens later).
    pub windows: Vec<ResolvedWindow>,
    /// Candidates excluded because their class was unavailable.
    pub skipped_unavailable: usize,
    /// Candidates whose class matched no rule.
    pub rejected: usize,
    /// Wall-clock time of the pass, supplied by the caller.
    pub resolved_at: DateTime<Utc>,
}

/// Apply the ordered matching rules to a single window class.
pub fn match_window(identity: &AppIdentity, class: &str) -> Option<MatchRule> {
    // 1. Exact match on the full id.
    if class == identity.id {
        return Some(MatchRule::ExactId);
    }

    // 2. Case-insensitive equality with the base name.
    let base = identity.base_name();
    if class.eq_ignore_ascii_case(base) {
        return Some(MatchRule::BaseName);
    }

    // 3. Substring relation, case-insensitive in both directions.
    let id_lower = identity.id.to_lowercase();
    let class_lower = class.to_lowercase();
    let base_lower = base.to_lowercase();
    if id_lower.contains(&class_lower) || class_lower.contains(&base_lower) {
        return Some(MatchRule::Substring);
    }

    None
}

/// Resolve the subset of `candidates` belonging to `identity`.
///
/// This is a pure function over probed values: fallible host queries have
/// already been degraded to `None` fields by the probe step. A candidate
/// without a class is excluded without error and counted; it never aborts
/// resolution of the rest. A candidate without a title is admitted with an
/// empty title.
pub fn resolve(
    identity: &AppIdentity,
    candidates: &[CandidateWindow],
    now: DateTime<Utc>,
) -> ResolveOutput {
    let mut windows = Vec::new();
    let mut skipped_unavailable = 0usize;
    let mut rejected = 0usize;

    for candidate in candidates {
        let Some(class) = candidate.class.as_deref() else {
            skipped_unavailable += 1;
            continue;
        };

        match match_window(identity, class) {
            Some(rule) => {
                let title = candidate.title.clone().unwrap_or_default();
                windows.push(ResolvedWindow {
                    snapshot: WindowSnapshot {
                        id: candidate.id.clone(),
                        key: WindowKey::new(title, class),
                        last_focus: candidate.last_focus,
                    },
                    rule,
                });
            }
            None => rejected += 1,
        }
    }

    ResolveOutput {
        windows,
        skipped_unavailable,
        rejected,
        resolved_at: now,
    }
}
