//! Opening pages in an external browser

use std::path::PathBuf;
use std::process::Command;

/// Something the browser should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserTarget {
    /// A page the server renders at this URL
    Url(String),
    /// HTML written locally from a payload
    File(PathBuf),
}

impl BrowserTarget {
    pub fn as_arg(&self) -> String {
        match self {
            BrowserTarget::Url(url) => url.clone(),
            BrowserTarget::File(path) => path.to_string_lossy().to_string(),
        }
    }
}

/// Program and arguments used to open `target`.
///
/// Order: configured command, then `$BROWSER`, then the platform opener.
/// A configured command may carry its own arguments (`"firefox --new-tab"`).
pub fn build_command(
    configured: Option<&str>,
    env_browser: Option<&str>,
    target: &BrowserTarget,
) -> (String, Vec<String>) {
    let chosen = configured
        .or(env_browser)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(cmd) = chosen {
        let mut parts = cmd.split_whitespace().map(str::to_string);
        if let Some(program) = parts.next() {
            let mut args: Vec<String> = parts.collect();
            args.push(target.as_arg());
            return (program, args);
        }
    }

    platform_opener(target)
}

#[cfg(target_os = "macos")]
fn platform_opener(target: &BrowserTarget) -> (String, Vec<String>) {
    ("open".to_string(), vec![target.as_arg()])
}

#[cfg(target_os = "windows")]
fn platform_opener(target: &BrowserTarget) -> (String, Vec<String>) {
    (
        "cmd".to_string(),
        vec!["/C".to_string(), "start".to_string(), String::new(), target.as_arg()],
    )
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_opener(target: &BrowserTarget) -> (String, Vec<String>) {
    ("xdg-open".to_string(), vec![target.as_arg()])
}

/// Run the browser command and wait for it to exit
pub fn open(configured: Option<&str>, target: &BrowserTarget) -> anyhow::Result<()> {
    let env_browser = std::env::var("BROWSER").ok();
    let (program, args) = build_command(configured, env_browser.as_deref(), target);

    tracing::info!(%program, target = %target.as_arg(), "opening in browser");

    let status = Command::new(&program)
        .args(&args)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch '{}': {}", program, e))?;

    if !status.success() {
        anyhow::bail!("'{}' exited with status: {}", program, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_command_wins() {
        let target = BrowserTarget::Url("http://x/".to_string());
        let (program, args) = build_command(Some("firefox --new-tab"), Some("lynx"), &target);
        assert_eq!(program, "firefox");
        assert_eq!(args, vec!["--new-tab", "http://x/"]);
    }

    #[test]
    fn test_env_browser_used_when_not_configured() {
        let target = BrowserTarget::File(PathBuf::from("/tmp/map.html"));
        let (program, args) = build_command(None, Some("w3m"), &target);
        assert_eq!(program, "w3m");
        assert_eq!(args, vec!["/tmp/map.html"]);
    }

    #[test]
    fn test_blank_values_fall_back_to_platform() {
        let target = BrowserTarget::Url("http://x/".to_string());
        let (_, args) = build_command(Some("  "), None, &target);
        assert_eq!(args.last().map(String::as_str), Some("http://x/"));
    }
}
