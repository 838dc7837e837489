//! WmCommandRunner trait and WmCtlExecutor (sync subprocess wrapper).
//! Mock-injectable so listing/probe logic is testable without an X
//! session.

use crate::error::WmError;

/// Which external tool a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmTool {
    Wmctrl,
    Xprop,
}

impl WmTool {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wmctrl => "wmctrl",
            Self::Xprop => "xprop",
        }
    }
}

/// Trait for executing window-manager queries. Enables mock injection
/// for testing.
pub trait WmCommandRunner {
    fn run(&self, tool: WmTool, args: &[&str]) -> Result<String, WmError>;
}

impl<T: WmCommandRunner + ?Sized> WmCommandRunner for &T {
    fn run(&self, tool: WmTool, args: &[&str]) -> Result<String, WmError> {
        (**self).run(tool, args)
    }
}

/// Real executor using `std::process::Command`.
pub struct WmCtlExecutor {
    wmctrl_bin: String,
    xprop_bin: String,
}

impl WmCtlExecutor {
    pub fn new() -> Self {
        Self {
            wmctrl_bin: "wmctrl".to_string(),
            xprop_bin: "xprop".to_string(),
        }
    }

    #[must_use]
    pub fn with_wmctrl_bin(mut self, bin: impl Into<String>) -> Self {
        self.wmctrl_bin = bin.into();
        self
    }

    #[must_use]
    pub fn with_xprop_bin(mut self, bin: impl Into<String>) -> Self {
        self.xprop_bin = bin.into();
        self
    }

    fn bin(&self, tool: WmTool) -> &str {
        match tool {
            WmTool::Wmctrl => &self.wmctrl_bin,
            WmTool::Xprop => &self.xprop_bin,
        }
    }
}

impl Default for WmCtlExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl WmCommandRunner for WmCtlExecutor {
    fn run(&self, tool: WmTool, args: &[&str]) -> Result<String, WmError> {
        let output = std::process::Command::new(self.bin(tool))
            .args(args)
            .output()
            .map_err(WmError::Io)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WmError::CommandFailed {
                tool: tool.as_str(),
                detail: format!(
                    "exit code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
