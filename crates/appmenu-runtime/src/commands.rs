//! `appmenu menu` / `appmenu json` / `appmenu pick` implementations.

use std::io::Write;
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use serde::Serialize;

use appmenu_core::engine::{RefreshOutcome, refresh_menu};
use appmenu_core::order::compare_windows;
use appmenu_core::resolver::{MatchRule, ResolvedWindow, resolve};
use appmenu_core::types::{AppIdentity, CandidateWindow};
use appmenu_wm::{
    ActivationToken, WmCommandRunner, activate_window, active_app_identity, snapshot_candidates,
};

use crate::context::{SessionContext, resolve_color};
use crate::surface::TermMenu;

/// One synchronous refresh pass against a terminal menu: identity,
/// candidate snapshot, resolve/sort/reconcile.
pub fn refresh_once(
    runner: &impl WmCommandRunner,
    menu: &mut TermMenu,
    ctx: &SessionContext,
) -> anyhow::Result<RefreshOutcome> {
    let identity = active_app_identity(runner)?;

    // Without an identity the engine is a guaranteed no-op; skip the
    // per-window probing entirely.
    let candidates = if identity.is_some() {
        snapshot_candidates(runner)?
    } else {
        Vec::new()
    };

    if let Some(ref id) = identity {
        menu.set_label(id.base_name().to_string());
    }

    let anchor = Some(menu.anchor());
    Ok(refresh_menu(
        menu,
        identity.as_ref(),
        &candidates,
        &ctx.policy,
        anchor,
        Utc::now(),
    ))
}

/// Entry point for `appmenu menu`.
pub fn cmd_menu(
    runner: &impl WmCommandRunner,
    ctx: &SessionContext,
    color: &str,
) -> anyhow::Result<()> {
    let use_color = resolve_color(color);
    let mut menu = TermMenu::new("(no application)");

    let outcome = refresh_once(runner, &mut menu, ctx)?;
    if matches!(outcome, RefreshOutcome::Skipped { .. }) {
        eprintln!("no focused application");
        return Ok(());
    }

    print!("{}", menu.render(ctx.placement, use_color));
    Ok(())
}

// ─── JSON Output ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct JsonWindow {
    pub id: String,
    pub title: String,
    pub class: String,
    pub rule: MatchRule,
    pub last_focus: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonReport {
    pub identity: Option<String>,
    pub windows: Vec<JsonWindow>,
    pub skipped_unavailable: usize,
    pub rejected: usize,
    pub refreshed_at: DateTime<Utc>,
}

pub(crate) fn build_report(
    identity: Option<&AppIdentity>,
    candidates: &[CandidateWindow],
    ctx: &SessionContext,
    now: DateTime<Utc>,
) -> JsonReport {
    let Some(identity) = identity else {
        return JsonReport {
            identity: None,
            windows: Vec::new(),
            skipped_unavailable: 0,
            rejected: 0,
            refreshed_at: now,
        };
    };

    let mut resolved = resolve(identity, candidates, now);
    resolved
        .windows
        .sort_by(|a, b| compare_windows(&a.snapshot, &b.snapshot, &ctx.policy));

    JsonReport {
        identity: Some(identity.id.clone()),
        windows: resolved
            .windows
            .into_iter()
            .map(|w| JsonWindow {
                id: w.snapshot.id,
                title: w.snapshot.key.title,
                class: w.snapshot.key.class,
                rule: w.rule,
                last_focus: w.snapshot.last_focus,
            })
            .collect(),
        skipped_unavailable: resolved.skipped_unavailable,
        rejected: resolved.rejected,
        refreshed_at: resolved.resolved_at,
    }
}

/// Entry point for `appmenu json`.
pub fn cmd_json(runner: &impl WmCommandRunner, ctx: &SessionContext) -> anyhow::Result<()> {
    let identity = active_app_identity(runner)?;
    let candidates = if identity.is_some() {
        snapshot_candidates(runner)?
    } else {
        Vec::new()
    };

    let report = build_report(identity.as_ref(), &candidates, ctx, Utc::now());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ─── Pick ─────────────────────────────────────────────────────────

/// Candidate lines for fzf: `<window-id>  <title>  [class]`. The id
/// leads so the selection can be parsed back from the first token.
pub(crate) fn format_pick_candidates(windows: &[ResolvedWindow]) -> Vec<String> {
    windows
        .iter()
        .map(|w| {
            format!(
                "{}  {}  [{}]",
                w.snapshot.id, w.snapshot.key.title, w.snapshot.key.class
            )
        })
        .collect()
}

/// Entry point for `appmenu pick`.
pub fn cmd_pick(
    runner: &impl WmCommandRunner,
    ctx: &SessionContext,
    dry_run: bool,
) -> anyhow::Result<()> {
    let Some(identity) = active_app_identity(runner)? else {
        eprintln!("no focused application");
        return Ok(());
    };

    let candidates = snapshot_candidates(runner)?;
    let mut resolved = resolve(&identity, &candidates, Utc::now());
    resolved
        .windows
        .sort_by(|a, b| compare_windows(&a.snapshot, &b.snapshot, &ctx.policy));

    let lines = format_pick_candidates(&resolved.windows);
    if lines.is_empty() {
        eprintln!("no windows for {identity}");
        return Ok(());
    }

    let candidate_text = lines.join("\n");
    if dry_run {
        println!("{candidate_text}");
        return Ok(());
    }

    // Check if fzf is available
    let fzf_available = Command::new("which")
        .arg("fzf")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);

    if !fzf_available {
        eprintln!("error: fzf not found; install fzf or use --dry-run");
        std::process::exit(1);
    }

    // Spawn fzf
    let mut child = Command::new("fzf")
        .args(["--color=never", "--no-multi"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to spawn fzf: {e}"))?;

    if let Some(ref mut stdin) = child.stdin {
        stdin
            .write_all(candidate_text.as_bytes())
            .map_err(|e| anyhow::anyhow!("failed to write to fzf stdin: {e}"))?;
    }
    drop(child.stdin.take());

    let output = child
        .wait_with_output()
        .map_err(|e| anyhow::anyhow!("fzf failed: {e}"))?;

    if !output.status.success() {
        // User pressed Escape or Ctrl-C in fzf
        return Ok(());
    }

    let selected = String::from_utf8_lossy(&output.stdout);
    let Some(target) = selected.trim().split_whitespace().next() else {
        return Ok(());
    };

    // The activation token is the trigger timestamp; the backend
    // forwards it opaquely.
    let token = ActivationToken(Utc::now().timestamp_millis() as u64);
    activate_window(runner, target, token)?;

    Ok(())
}
