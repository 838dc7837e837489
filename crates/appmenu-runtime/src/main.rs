//! appmenu: focused-application window menu binary.
//! Thin dispatch over the core engine and the wm backend; all state is
//! recomputed from live windows on every refresh.

use clap::Parser;

use appmenu_wm::WmCtlExecutor;

mod cli;
mod commands;
mod context;
mod surface;
mod watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = std::env::var("APPMENU_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    let ctx = context::build_context(&args)?;
    let runner = build_executor(&args);

    let command = args
        .command
        .unwrap_or(cli::Command::Menu(cli::MenuOpts::default()));

    match command {
        cli::Command::Menu(opts) => commands::cmd_menu(&runner, &ctx, &opts.color)?,
        cli::Command::Json => commands::cmd_json(&runner, &ctx)?,
        cli::Command::Pick(opts) => commands::cmd_pick(&runner, &ctx, opts.dry_run)?,
        cli::Command::Watch(opts) => watch::run_watch(&runner, &ctx, &opts).await?,
    }

    Ok(())
}

fn build_executor(args: &cli::Cli) -> WmCtlExecutor {
    let mut executor = WmCtlExecutor::default();
    if let Some(ref bin) = args.wmctrl_bin {
        executor = executor.with_wmctrl_bin(bin.clone());
    }
    if let Some(ref bin) = args.xprop_bin {
        executor = executor.with_xprop_bin(bin.clone());
    }
    executor
}
