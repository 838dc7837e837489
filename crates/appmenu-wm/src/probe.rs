//! Per-window property probing and activation.
//!
//! Every window can be destroyed between listing and probing, so a
//! failed `xprop` query degrades the affected fields to `None` instead
//! of failing the pass — the resolver excludes such windows on its own.

use std::fmt;

use appmenu_core::types::{AppIdentity, CandidateWindow};
use tracing::debug;

use crate::error::WmError;
use crate::executor::{WmCommandRunner, WmTool};
use crate::listing::{active_desktop, list_windows};

/// Opaque activation timestamp supplied by the trigger source. Carried
/// through to the window manager, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationToken(pub u64);

impl fmt::Display for ActivationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const WINDOW_PROPS: [&str; 3] = ["WM_CLASS", "_NET_WM_NAME", "_NET_WM_USER_TIME"];

/// Probe one window's properties. A failed query yields a candidate
/// with all fields unavailable; a missing property degrades only that
/// field.
pub fn probe_window(runner: &impl WmCommandRunner, id: &str) -> CandidateWindow {
    let args = [
        "-id",
        id,
        "-notype",
        WINDOW_PROPS[0],
        WINDOW_PROPS[1],
        WINDOW_PROPS[2],
    ];
    match runner.run(WmTool::Xprop, &args) {
        Ok(output) => CandidateWindow {
            id: id.to_string(),
            class: parse_wm_class(&output),
            title: parse_title(&output),
            last_focus: parse_user_time(&output),
        },
        Err(e) => {
            debug!(window = id, error = %e, "window probe failed, excluding");
            CandidateWindow {
                id: id.to_string(),
                class: None,
                title: None,
                last_focus: None,
            }
        }
    }
}

/// List and probe every window on the active desktop (sticky windows
/// included). Fails only when the listing itself cannot be obtained.
pub fn snapshot_candidates(runner: &impl WmCommandRunner) -> Result<Vec<CandidateWindow>, WmError> {
    let windows = list_windows(runner)?;
    let desktop = active_desktop(runner)?;

    let mut candidates = Vec::with_capacity(windows.len());
    for window in windows {
        if let Some(active) = desktop
            && window.desktop >= 0
            && window.desktop != active
        {
            continue;
        }
        candidates.push(probe_window(runner, &window.id));
    }
    Ok(candidates)
}

/// Identity of the currently focused application: the active window's
/// `_GTK_APPLICATION_ID` (reverse-DNS) when set, its `WM_CLASS` class
/// segment otherwise. `None` when no window is active or the active
/// window vanished before it could be queried.
pub fn active_app_identity(runner: &impl WmCommandRunner) -> Result<Option<AppIdentity>, WmError> {
    let root = runner.run(WmTool::Xprop, &["-root", "-notype", "_NET_ACTIVE_WINDOW"])?;
    let Some(id) = parse_active_window(&root) else {
        return Ok(None);
    };

    let props = match runner.run(
        WmTool::Xprop,
        &["-id", &id, "-notype", "_GTK_APPLICATION_ID", "WM_CLASS"],
    ) {
        Ok(output) => output,
        Err(e) => {
            debug!(window = %id, error = %e, "active window probe failed");
            return Ok(None);
        }
    };

    Ok(parse_gtk_app_id(&props)
        .or_else(|| parse_wm_class(&props))
        .map(AppIdentity::new))
}

/// Bring a window to focus via `wmctrl -i -a`. The activation token is
/// recorded for tracing; the window manager derives its own X
/// timestamp for the switch.
pub fn activate_window(
    runner: &impl WmCommandRunner,
    id: &str,
    token: ActivationToken,
) -> Result<(), WmError> {
    debug!(window = id, token = %token, "activating window");
    runner.run(WmTool::Wmctrl, &["-i", "-a", id])?;
    Ok(())
}

// ─── xprop Output Parsing ─────────────────────────────────────────

/// Value part of an xprop line. Most properties print as
/// `NAME = value`; WINDOW-typed ones as `NAME: window id # 0x...`;
/// absent properties as `NAME:  not found.` — mapped to `None`.
fn prop_value<'a>(output: &'a str, name: &str) -> Option<&'a str> {
    for line in output.lines() {
        let Some(rest) = line.strip_prefix(name) else {
            continue;
        };
        // Guard against prefix collisions (_NET_WM_NAME vs _NET_WM_NAME_2).
        if !rest.starts_with([' ', '=', ':']) {
            continue;
        }
        let Some((_, value)) = rest.split_once(['=', ':']) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() || value.ends_with("not found.") {
            return None;
        }
        return Some(value);
    }
    None
}

/// Extract quoted strings from an xprop value, honoring `\"` and `\\`
/// escapes.
fn quoted_strings(value: &str) -> Vec<String> {
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut inside = false;
    let mut escaped = false;

    for c in value.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if inside && c == '\\' {
            escaped = true;
        } else if c == '"' {
            if inside {
                strings.push(std::mem::take(&mut current));
            }
            inside = !inside;
        } else if inside {
            current.push(c);
        }
    }
    strings
}

/// `WM_CLASS = "instance", "Class"` — the class (second) segment is the
/// application-grouping identifier; degenerate single-value properties
/// fall back to that value.
fn parse_wm_class(output: &str) -> Option<String> {
    let strings = quoted_strings(prop_value(output, "WM_CLASS")?);
    strings.get(1).or_else(|| strings.first()).cloned()
}

fn parse_title(output: &str) -> Option<String> {
    quoted_strings(prop_value(output, "_NET_WM_NAME")?)
        .into_iter()
        .next()
}

fn parse_user_time(output: &str) -> Option<u64> {
    prop_value(output, "_NET_WM_USER_TIME")?.parse().ok()
}

fn parse_gtk_app_id(output: &str) -> Option<String> {
    quoted_strings(prop_value(output, "_GTK_APPLICATION_ID")?)
        .into_iter()
        .next()
}

/// `_NET_ACTIVE_WINDOW: window id # 0x2400002` — `0x0` means no
/// active window.
fn parse_active_window(output: &str) -> Option<String> {
    let value = prop_value(output, "_NET_ACTIVE_WINDOW")?;
    let id = value.rsplit(['#', ' ']).next()?.trim();
    if id.is_empty() || id == "0x0" {
        return None;
    }
    Some(id.to_string())
}
