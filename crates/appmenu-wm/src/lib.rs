//! appmenu-wm: window-manager IO boundary.
//! Provides subprocess execution of the EWMH command-line tools,
//! window listing, per-window property probing, and activation.
//! No ordering or reconciliation logic — pure IO boundary.

pub mod error;
pub mod executor;
pub mod listing;
pub mod probe;

pub use error::WmError;
pub use executor::{WmCommandRunner, WmCtlExecutor, WmTool};
pub use listing::{WindowListing, active_desktop, list_windows, parse_desktop_list, parse_window_list};
pub use probe::{
    ActivationToken, activate_window, active_app_identity, probe_window, snapshot_candidates,
};
