//! `appmenu watch` — keep the menu on screen, refreshing on an
//! interval. Each refresh runs synchronously inside its tick, so a
//! second trigger can never interleave with a running reconciliation.

use std::io::Write;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

use appmenu_core::engine::RefreshOutcome;
use appmenu_wm::WmCommandRunner;

use crate::cli::WatchOpts;
use crate::commands::refresh_once;
use crate::context::{SessionContext, resolve_color};
use crate::surface::TermMenu;

/// Delay before the one-shot warm-up rescan. Right after startup the
/// compositor may still report the previous focus, so the first tick
/// can render a stale application; the warm-up catches up without
/// waiting a full interval.
const WARMUP_DELAY_MS: u64 = 500;

/// Floor for --interval-ms; refreshes shell out per window.
const MIN_INTERVAL_MS: u64 = 100;

/// Schedule the deferred warm-up rescan. The returned handle must be
/// aborted on teardown if the task has not fired.
fn spawn_warmup(delay_ms: u64) -> (JoinHandle<()>, mpsc::Receiver<()>) {
    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        let _ = tx.send(()).await;
    });
    (handle, rx)
}

/// Redraw policy: skipped passes never redraw (previous state stays on
/// screen), applied passes redraw when they mutated the menu or when
/// nothing has been drawn yet.
fn should_redraw(outcome: &RefreshOutcome, drawn_once: bool) -> bool {
    match outcome {
        RefreshOutcome::Skipped { .. } => false,
        RefreshOutcome::Applied { stats, .. } => stats.mutated() || !drawn_once,
    }
}

fn refresh_and_draw(
    runner: &impl WmCommandRunner,
    menu: &mut TermMenu,
    ctx: &SessionContext,
    use_color: bool,
    drawn_once: &mut bool,
) {
    let label_before = menu.label().to_string();
    match refresh_once(runner, menu, ctx) {
        Ok(outcome) => {
            let label_changed = menu.label() != label_before;
            if should_redraw(&outcome, *drawn_once) || label_changed {
                *drawn_once = true;
                if use_color {
                    print!("\x1b[2J\x1b[H");
                }
                print!("{}", menu.render(ctx.placement, use_color));
                let _ = std::io::stdout().flush();
            }
        }
        Err(e) => tracing::warn!("refresh failed: {e}"),
    }
}

/// Entry point for `appmenu watch`.
pub async fn run_watch(
    runner: &impl WmCommandRunner,
    ctx: &SessionContext,
    opts: &WatchOpts,
) -> anyhow::Result<()> {
    let use_color = resolve_color(&opts.color);
    let mut menu = TermMenu::new("(no application)");
    let mut drawn_once = false;

    let mut ticker = interval(Duration::from_millis(opts.interval_ms.max(MIN_INTERVAL_MS)));
    let (warmup, mut warmup_rx) = spawn_warmup(WARMUP_DELAY_MS);
    let mut warmup_spent = false;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresh_and_draw(runner, &mut menu, ctx, use_color, &mut drawn_once);
            }
            _ = warmup_rx.recv(), if !warmup_spent => {
                warmup_spent = true;
                refresh_and_draw(runner, &mut menu, ctx, use_color, &mut drawn_once);
            }
            () = &mut shutdown => break,
        }
    }

    // Teardown: revoke the warm-up rescan if it is still pending.
    if !warmup.is_finished() {
        warmup.abort();
        tracing::debug!("cancelled pending warm-up rescan");
    }

    Ok(())
}

/// Wait for ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("received ctrl-c, shutting down");
    }
}
