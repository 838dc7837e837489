use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::WindowSnapshot;

/// Ordering configuration.
///
/// `pinned` holds exact raw titles that sort before all other entries,
/// in list order — typically the bare application title with no
/// window-specific suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderPolicy {
    pub pinned: Vec<String>,
}

impl OrderPolicy {
    pub fn new(pinned: Vec<String>) -> Self {
        Self { pinned }
    }

    fn pin_rank(&self, title: &str) -> Option<usize> {
        self.pinned.iter().position(|p| p == title)
    }
}

// ─── Title Normalization ──────────────────────────────────────────

/// Characters kept by the normalization pass: letters, digits,
/// whitespace, and basic punctuation. Pictographs and other symbols
/// outside that range are dropped.
fn is_plain(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || c.is_ascii_punctuation()
}

/// Normalize a title for comparison: drop symbol/pictograph characters,
/// strip leading characters until the first letter or digit, trim
/// surrounding whitespace.
pub fn normalize_title(raw: &str) -> String {
    let plain: String = raw.chars().filter(|c| is_plain(*c)).collect();
    plain
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .to_string()
}

/// Leading run of decimal digits of a normalized title, empty if none.
pub fn leading_digit_run(title: &str) -> &str {
    let end = title
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(title.len(), |(i, _)| i);
    &title[..end]
}

/// Compare two digit runs by numeric value without parsing into a fixed
/// width integer: strip leading zeros, then shorter run is smaller, then
/// lexical on equal lengths.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Case- and punctuation-insensitive form: ASCII letters and digits
/// only, lowercased. After this folding, locale collation coincides
/// with lexicographic order.
fn clean_title(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ─── Comparator ───────────────────────────────────────────────────

/// Total order over resolved windows.
///
/// Rules, first decisive wins:
/// 1. Pinned exact titles first, in pinned-list order.
/// 2. Both normalized titles lead with digits → numeric compare.
/// 3. A digit-leading title sorts before a non-digit-leading one.
/// 4. Cleaned (ASCII-alphanumeric, lowercased) lexical compare.
/// 5. Equal titles: more recently focused first, else input order
///    (callers sort stably).
pub fn compare_windows(a: &WindowSnapshot, b: &WindowSnapshot, policy: &OrderPolicy) -> Ordering {
    match (policy.pin_rank(&a.key.title), policy.pin_rank(&b.key.title)) {
        (Some(ra), Some(rb)) => return ra.cmp(&rb),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => {}
    }

    let norm_a = normalize_title(&a.key.title);
    let norm_b = normalize_title(&b.key.title);
    let digits_a = leading_digit_run(&norm_a);
    let digits_b = leading_digit_run(&norm_b);

    let numeric = match (digits_a.is_empty(), digits_b.is_empty()) {
        (false, false) => cmp_digit_runs(digits_a, digits_b),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    };
    if numeric != Ordering::Equal {
        return numeric;
    }

    let lexical = clean_title(&norm_a).cmp(&clean_title(&norm_b));
    if lexical != Ordering::Equal {
        return lexical;
    }

    // Equal titles: prefer the more recently focused window when both
    // sides report a focus time; otherwise leave input order intact.
    match (a.last_focus, b.last_focus) {
        (Some(fa), Some(fb)) => fb.cmp(&fa),
        _ => Ordering::Equal,
    }
}

/// Stable sort of resolved windows under `compare_windows`.
pub fn sort_windows(windows: &mut [WindowSnapshot], policy: &OrderPolicy) {
    windows.sort_by(|a, b| compare_windows(a, b, policy));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WindowKey;

    fn win(title: &str) -> WindowSnapshot {
        WindowSnapshot {
            id: format!("win-{title}"),
            key: WindowKey::new(title, "App"),
            last_focus: None,
        }
    }

    fn win_focus(title: &str, focus: u64) -> WindowSnapshot {
        WindowSnapshot {
            last_focus: Some(focus),
            ..win(title)
        }
    }

    fn titles(windows: &[WindowSnapshot]) -> Vec<&str> {
        windows.iter().map(|w| w.key.title.as_str()).collect()
    }

    // ── Normalization ────────────────────────────────────────────

    #[test]
    fn normalize_drops_pictographs() {
        assert_eq!(normalize_title("\u{2728} Inbox"), "Inbox");
    }

    #[test]
    fn normalize_strips_leading_nonalnum() {
        assert_eq!(normalize_title("-- 3 drafts"), "3 drafts");
        assert_eq!(normalize_title("(draft) notes"), "draft) notes");
    }

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(normalize_title("  hello  "), "hello");
    }

    #[test]
    fn normalize_keeps_accented_letters() {
        assert_eq!(normalize_title("\u{00e9}diteur"), "\u{00e9}diteur");
    }

    #[test]
    fn normalize_all_symbols_is_empty() {
        assert_eq!(normalize_title("\u{2728}\u{1f600}"), "");
    }

    #[test]
    fn digit_run_extraction() {
        assert_eq!(leading_digit_run("10 Profile"), "10");
        assert_eq!(leading_digit_run("Profile 10"), "");
        assert_eq!(leading_digit_run(""), "");
        assert_eq!(leading_digit_run("42"), "42");
    }

    // ── Numeric rule ─────────────────────────────────────────────

    #[test]
    fn numeric_prefix_compares_as_integer() {
        let mut windows = vec![win("10 Profile"), win("2 Profile")];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(titles(&windows), vec!["2 Profile", "10 Profile"]);
    }

    #[test]
    fn digit_leading_sorts_before_plain() {
        let mut windows = vec![win("Alpha"), win("7 Beta")];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(titles(&windows), vec!["7 Beta", "Alpha"]);
    }

    #[test]
    fn equal_numeric_prefix_falls_to_lexical() {
        let mut windows = vec![win("2 Todo"), win("2 Notes")];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(titles(&windows), vec!["2 Notes", "2 Todo"]);
    }

    #[test]
    fn leading_zeros_ignored_numerically() {
        let mut windows = vec![win("010 a"), win("2 a")];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(titles(&windows), vec!["2 a", "010 a"]);
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let big = format!("{} x", "9".repeat(40));
        let bigger = format!("1{} x", "0".repeat(40));
        let mut windows = vec![win(&bigger), win(&big)];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(titles(&windows), vec![big.as_str(), bigger.as_str()]);
    }

    // ── Lexical rule ─────────────────────────────────────────────

    #[test]
    fn lexical_ignores_case_and_punctuation() {
        let mut windows = vec![win("z-end"), win("A_start"), win("m.iddle")];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(titles(&windows), vec!["A_start", "m.iddle", "z-end"]);
    }

    #[test]
    fn symbol_prefix_does_not_affect_order() {
        let mut windows = vec![win("Notes"), win("\u{2728} Inbox")];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(titles(&windows), vec!["\u{2728} Inbox", "Notes"]);
    }

    // ── Pinned rule ──────────────────────────────────────────────

    #[test]
    fn pinned_titles_sort_first_in_list_order() {
        let policy = OrderPolicy::new(vec!["Files".into(), "Editor".into()]);
        let mut windows = vec![win("Another"), win("Editor"), win("Files")];
        sort_windows(&mut windows, &policy);
        assert_eq!(titles(&windows), vec!["Files", "Editor", "Another"]);
    }

    #[test]
    fn pinned_match_is_exact_on_raw_title() {
        // Pinned matching happens before normalization: the decorated
        // title is not the pinned bare title.
        let policy = OrderPolicy::new(vec!["Notes".into()]);
        let mut windows = vec![win("\u{2728} Notes"), win("Notes")];
        sort_windows(&mut windows, &policy);
        assert_eq!(titles(&windows), vec!["Notes", "\u{2728} Notes"]);
    }

    #[test]
    fn pinned_beats_numeric_rule() {
        let policy = OrderPolicy::new(vec!["Zebra".into()]);
        let mut windows = vec![win("1 Alpha"), win("Zebra")];
        sort_windows(&mut windows, &policy);
        assert_eq!(titles(&windows), vec!["Zebra", "1 Alpha"]);
    }

    // ── Ties ─────────────────────────────────────────────────────

    #[test]
    fn equal_titles_prefer_recent_focus() {
        let mut windows = vec![win_focus("Notes", 100), win_focus("Notes", 900)];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(windows[0].last_focus, Some(900));
        assert_eq!(windows[1].last_focus, Some(100));
    }

    #[test]
    fn equal_titles_without_focus_keep_input_order() {
        let mut a = win("Notes");
        a.id = "0xfirst".into();
        let mut b = win("Notes");
        b.id = "0xsecond".into();
        let mut windows = vec![a, b];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(windows[0].id, "0xfirst");
        assert_eq!(windows[1].id, "0xsecond");
    }

    #[test]
    fn comparator_is_consistent_with_clean_order() {
        // Titles without digit runs order exactly like their cleaned forms.
        let pairs = [("Hello, world", "hello~World!"), ("abc", "ABD")];
        for (ta, tb) in pairs {
            let expected = clean_title(&normalize_title(ta)).cmp(&clean_title(&normalize_title(tb)));
            assert_eq!(
                compare_windows(&win(ta), &win(tb), &OrderPolicy::default()),
                expected,
                "{ta:?} vs {tb:?}"
            );
        }
    }

    // ── Mixed scenarios ──────────────────────────────────────────

    #[test]
    fn mixed_scenario_order() {
        let mut windows = vec![
            win("10 Notes"),
            win("2 Notes"),
            win("Notes"),
            win("\u{2728} Inbox"),
        ];
        sort_windows(&mut windows, &OrderPolicy::default());
        assert_eq!(
            titles(&windows),
            vec!["2 Notes", "10 Notes", "\u{2728} Inbox", "Notes"]
        );
    }

    #[test]
    fn mixed_scenario_with_pinned_bare_title() {
        let policy = OrderPolicy::new(vec!["Notes".into()]);
        let mut windows = vec![
            win("10 Notes"),
            win("2 Notes"),
            win("Notes"),
            win("\u{2728} Inbox"),
        ];
        sort_windows(&mut windows, &policy);
        assert_eq!(
            titles(&windows),
            vec!["Notes", "2 Notes", "10 Notes", "\u{2728} Inbox"]
        );
    }

    #[test]
    fn policy_config_roundtrip() {
        let policy = OrderPolicy::new(vec!["Files".into()]);
        let json = serde_json::to_string(&policy).expect("serialize");
        let back: OrderPolicy = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(policy, back);
    }

    #[test]
    fn policy_config_rejects_unknown_keys() {
        let err = serde_json::from_str::<OrderPolicy>(r#"{"pined": ["x"]}"#);
        assert!(err.is_err());
    }
}
