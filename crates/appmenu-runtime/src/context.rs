//! Session context: injectable configuration for a run, merged from
//! CLI flags and the optional config file. Nothing in here is global —
//! the context is built once in `main` and passed into the commands.

use serde::{Deserialize, Serialize};

use appmenu_core::order::OrderPolicy;

use crate::cli::{Cli, default_config_path};

/// Where the menu title sits on the panel line. The original indicator
/// lived in the panel's left box; `Right` is the opt-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Left,
    Right,
}

/// On-disk configuration (JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Titles pinned to the top of the menu, in order.
    pub pinned: Vec<String>,
    pub placement: Placement,
}

/// Everything a command needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub policy: OrderPolicy,
    pub placement: Placement,
}

impl SessionContext {
    /// Merge CLI pins with the config file. CLI pins rank first.
    pub fn from_parts(cli_pins: &[String], config: ConfigFile) -> Self {
        let mut pinned: Vec<String> = cli_pins.to_vec();
        for pin in config.pinned {
            if !pinned.contains(&pin) {
                pinned.push(pin);
            }
        }
        Self {
            policy: OrderPolicy::new(pinned),
            placement: config.placement,
        }
    }
}

/// Build the session context from the CLI invocation.
///
/// An explicitly named config file must exist and parse; the default
/// path is best-effort and silently absent on fresh setups.
pub fn build_context(cli: &Cli) -> anyhow::Result<SessionContext> {
    let config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read config {path}: {e}"))?;
            serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("cannot parse config {path}: {e}"))?
        }
        None => {
            let path = default_config_path();
            match std::fs::read_to_string(&path) {
                Ok(raw) => serde_json::from_str(&raw)
                    .map_err(|e| anyhow::anyhow!("cannot parse config {path}: {e}"))?,
                Err(_) => ConfigFile::default(),
            }
        }
    };
    Ok(SessionContext::from_parts(&cli.pinned, config))
}

/// Resolve a --color flag to bool.
pub fn resolve_color(color: &str) -> bool {
    use std::io::IsTerminal;
    match color {
        "always" => true,
        "never" => false,
        _ => std::io::stdout().is_terminal(),
    }
}
