//! Static configuration of the upjet command line.

use std::env;

use upjet_core::config::HelpOptions;

pub const APP_NAME: &str = "upjet";

pub const HELP_DESCRIPTION: &str = "The Upjet CLI.

Please report issues and feature requests at https://github.com/crossplane/upjet.";

pub const HELP_OPTIONS: HelpOptions = HelpOptions {
    flags_last: true,
    compact: true,
    wrap_upper_bound: 80,
};

/// Environment variable overriding the packaging executable used by `batch`.
pub const XPKG_TOOL_VAR: &str = "UPJET_XPKG_TOOL";
/// Default packaging executable
pub const DEFAULT_XPKG_TOOL: &str = "crossplane";

/// Resolves the packaging executable from the environment.
pub fn get_xpkg_tool() -> String {
    resolve_xpkg_tool(env::var(XPKG_TOOL_VAR).ok())
}

/// Uses `value` unless it is missing or blank, falling back to [`DEFAULT_XPKG_TOOL`].
///
/// # Examples
///
/// ```
/// use upjet_cli::config::resolve_xpkg_tool;
///
/// assert_eq!(resolve_xpkg_tool(None), "crossplane");
/// assert_eq!(resolve_xpkg_tool(Some("/usr/local/bin/crank".to_string())), "/usr/local/bin/crank");
/// ```
pub fn resolve_xpkg_tool(value: Option<String>) -> String {
    match value {
        Some(tool) if !tool.trim().is_empty() => tool,
        _ => DEFAULT_XPKG_TOOL.to_string(),
    }
}
