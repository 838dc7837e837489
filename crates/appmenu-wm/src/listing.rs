//! Open-window listing via `wmctrl -l` and `wmctrl -d`.

use crate::error::WmError;
use crate::executor::{WmCommandRunner, WmTool};

/// One row of `wmctrl -l`: window id and the desktop it lives on
/// (`-1` marks sticky windows visible on every desktop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowListing {
    pub id: String,
    pub desktop: i64,
}

/// Execute `wmctrl -l` and parse the output.
pub fn list_windows(runner: &impl WmCommandRunner) -> Result<Vec<WindowListing>, WmError> {
    let output = runner.run(WmTool::Wmctrl, &["-l"])?;
    parse_window_list(&output)
}

/// Parse the raw output of `wmctrl -l`.
///
/// Line shape: `<id> <desktop> <client-host> <title...>` — only the
/// first two columns matter here; titles come from the per-window
/// probe.
pub fn parse_window_list(output: &str) -> Result<Vec<WindowListing>, WmError> {
    let mut windows = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let id = fields.next();
        let desktop = fields.next().and_then(|d| d.parse::<i64>().ok());
        match (id, desktop) {
            (Some(id), Some(desktop)) => windows.push(WindowListing {
                id: id.to_string(),
                desktop,
            }),
            _ => {
                return Err(WmError::ParseError {
                    source_cmd: "wmctrl -l",
                    line_num: idx + 1,
                    detail: "expected `<id> <desktop> ...`".to_string(),
                });
            }
        }
    }
    Ok(windows)
}

/// Execute `wmctrl -d` and return the active desktop, if any.
pub fn active_desktop(runner: &impl WmCommandRunner) -> Result<Option<i64>, WmError> {
    let output = runner.run(WmTool::Wmctrl, &["-d"])?;
    Ok(parse_desktop_list(&output))
}

/// Parse `wmctrl -d` output; the active desktop carries a `*` in the
/// second column.
pub fn parse_desktop_list(output: &str) -> Option<i64> {
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let num = fields.next()?.parse::<i64>().ok()?;
        if fields.next() == Some("*") {
            return Some(num);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_window_lines() {
        let output = "\
0x04a00007  0 host notes.md \u{2014} Text Editor
0x05200003  1 host Downloads
0x01c00021 -1 host xfce4-panel
";
        let windows = parse_window_list(output).expect("should parse");
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].id, "0x04a00007");
        assert_eq!(windows[0].desktop, 0);
        assert_eq!(windows[2].desktop, -1);
    }

    #[test]
    fn parse_empty_output() {
        let windows = parse_window_list("").expect("should parse");
        assert!(windows.is_empty());
    }

    #[test]
    fn parse_blank_lines_skipped() {
        let windows = parse_window_list("\n\n0x1 0 host t\n\n").expect("should parse");
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn parse_malformed_line_errors() {
        let err = parse_window_list("0x04a00007").expect_err("missing desktop column");
        match err {
            WmError::ParseError { line_num, .. } => assert_eq!(line_num, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_non_numeric_desktop_errors() {
        assert!(parse_window_list("0x1 abc host title").is_err());
    }

    #[test]
    fn active_desktop_marker() {
        let output = "\
0  - DG: 3840x1080  VP: N/A  WA: 0,25 3840x1055  Workspace 1
1  * DG: 3840x1080  VP: 0,0  WA: 0,25 3840x1055  Workspace 2
";
        assert_eq!(parse_desktop_list(output), Some(1));
    }

    #[test]
    fn no_active_desktop() {
        assert_eq!(parse_desktop_list("0  - DG: 1x1\n"), None);
        assert_eq!(parse_desktop_list(""), None);
    }

    #[test]
    fn mock_runner_list() {
        struct MockRunner;
        impl WmCommandRunner for MockRunner {
            fn run(&self, tool: WmTool, args: &[&str]) -> Result<String, WmError> {
                assert_eq!(tool, WmTool::Wmctrl);
                assert_eq!(args, ["-l"]);
                Ok("0x1 0 host a\n0x2 0 host b\n".to_string())
            }
        }
        let windows = list_windows(&MockRunner).expect("should list");
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].id, "0x2");
    }
}
