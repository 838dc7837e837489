//! Error types for the window-manager backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WmError {
    #[error("{tool} command failed: {detail}")]
    CommandFailed { tool: &'static str, detail: String },

    #[error("failed to parse {source_cmd} line {line_num}: {detail}")]
    ParseError {
        source_cmd: &'static str,
        line_num: usize,
        detail: String,
    },

    #[error("wm io error: {0}")]
    Io(#[from] std::io::Error),
}
