//! CLI definition using clap derive.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "appmenu", about = "focused-application window menu for the panel")]
pub struct Cli {
    /// Title pinned to the top of the menu (repeatable)
    #[arg(long = "pin", global = true, value_name = "TITLE")]
    pub pinned: Vec<String>,

    /// Config file path (default: $XDG_CONFIG_HOME/appmenu/config.json)
    #[arg(long, global = true, env = "APPMENU_CONFIG")]
    pub config: Option<String>,

    /// wmctrl binary override
    #[arg(long, global = true, env = "APPMENU_WMCTRL_BIN")]
    pub wmctrl_bin: Option<String>,

    /// xprop binary override
    #[arg(long, global = true, env = "APPMENU_XPROP_BIN")]
    pub xprop_bin: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the focused application's window menu once
    Menu(MenuOpts),
    /// One refresh pass, machine-readable JSON output
    Json,
    /// Pick one of the focused application's windows via fzf and focus it
    Pick(PickOpts),
    /// Keep the menu on screen, refreshing on an interval
    Watch(WatchOpts),
}

#[derive(clap::Args, Default)]
pub struct MenuOpts {
    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: String,
}

#[derive(clap::Args, Default)]
pub struct PickOpts {
    /// Print candidate lines instead of spawning fzf
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct WatchOpts {
    /// Refresh interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: String,
}

/// Default config path using XDG conventions.
pub fn default_config_path() -> String {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        return format!("{dir}/appmenu/config.json");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.config/appmenu/config.json")
}
