//! gw-dash - a terminal dashboard for groundwater analysis
//!
//! This is the main entry point for the gw-dash application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::{Config, API_URL_ENV};
use crate::model::ViewId;
use crate::services::{browser, BrowserTarget};
use crate::tui::{Tui, DEFAULT_TICK_RATE};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gw-dash", version, about = "Groundwater analysis dashboard for the terminal")]
struct Args {
    /// Base URL of the analytics API
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Read settings from this file instead of ~/.gw-dash/config.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// View to open at startup
    #[arg(long)]
    view: Option<ViewId>,

    /// Write logs here (default ~/.gw-dash/gw-dash.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_RATE.as_millis() as u64)]
    tick_rate_ms: u64,

    /// Persist the effective settings and exit
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.clone())?;

    let config = resolve_config(&args, Config::config_path().as_deref())?;
    let initial = args.view.unwrap_or(config.default_view);

    if args.save_config {
        let path = config.save()?;
        println!("Saved settings to {}", path.display());
        return Ok(());
    }

    // Create app state before touching the terminal so setup errors print normally
    let mut app = App::new(config, initial)?;

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(args.tick_rate_ms.max(10)));
    tui.enter()?;
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!(error = ?err, "dashboard stopped");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("dashboard closed");
    Ok(())
}

/// Defaults, then the settings file, then the CLI/environment URL.
///
/// An explicit `--config` must be readable; the default file is optional.
fn resolve_config(args: &Args, default_path: Option<&Path>) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => default_path
            .and_then(Config::load_optional)
            .unwrap_or_default(),
    };
    Ok(config.with_env_url(args.api_url.clone()))
}

fn init_logging(log_file: Option<PathBuf>) -> Result<()> {
    let path = match log_file.or_else(|| Config::config_dir().map(|d| d.join("gw-dash.log"))) {
        Some(path) => path,
        // Nowhere to write; the terminal belongs to the UI
        None => return Ok(()),
    };
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gw_dash=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        // Pages open with the terminal handed back to the shell
        if let Some(target) = app.pending_browser.take() {
            launch_browser(tui, app, &target)?;
            continue;
        }

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - tick drains finished requests and animates spinners
            let mut current_action = Some(Action::Tick);
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        }
    }

    Ok(())
}

/// Open a page or generated file in the user's browser
fn launch_browser(tui: &mut Tui, app: &mut App, target: &BrowserTarget) -> Result<()> {
    tui.suspend()?;
    let result = browser::open(app.config.browser.as_deref(), target);
    tui.resume()?;

    match result {
        Ok(()) => {
            tracing::info!(page = %target.as_arg(), "opened in browser");
            app.status_message = Some(format!("Opened {}", target.as_arg()));
        }
        Err(e) => {
            tracing::warn!(page = %target.as_arg(), error = %e, "browser launch failed");
            app.error = Some(format!("Failed to open browser: {}", e));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn args(extra: &[&str]) -> Args {
        let argv: Vec<OsString> = std::iter::once("gw-dash")
            .chain(extra.iter().copied())
            .map(OsString::from)
            .collect();
        Args::try_parse_from(argv).unwrap()
    }

    fn write_config(dir: &Path, url: &str) -> PathBuf {
        let path = dir.join("config.json");
        let config = Config {
            api_base_url: url.to_string(),
            default_view: ViewId::Population,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        path
    }

    // One test owns the environment variable so parallel tests never see it
    #[test]
    fn test_config_layering() {
        let dir = tempfile::tempdir().unwrap();
        std::env::remove_var(API_URL_ENV);

        // Defaults when the default file is absent
        let missing = dir.path().join("absent.json");
        let config = resolve_config(&args(&[]), Some(&missing)).unwrap();
        assert_eq!(config, Config::default());
        let config = resolve_config(&args(&[]), None).unwrap();
        assert_eq!(config, Config::default());

        // Default file over defaults
        let file = write_config(dir.path(), "http://file:5000");
        let config = resolve_config(&args(&[]), Some(&file)).unwrap();
        assert_eq!(config.api_base_url, "http://file:5000");
        assert_eq!(config.default_view, ViewId::Population);

        // --config replaces the default file
        let other_dir = tempfile::tempdir().unwrap();
        let explicit = write_config(other_dir.path(), "http://explicit:5000");
        let path = explicit.to_string_lossy().to_string();
        let config = resolve_config(&args(&["--config", &path]), Some(&file)).unwrap();
        assert_eq!(config.api_base_url, "http://explicit:5000");

        // Environment over the file
        std::env::set_var(API_URL_ENV, "http://env:5000");
        let config = resolve_config(&args(&[]), Some(&file)).unwrap();
        assert_eq!(config.api_base_url, "http://env:5000");
        assert_eq!(config.default_view, ViewId::Population);

        // Flag over the environment
        let config =
            resolve_config(&args(&["--api-url", "http://flag:5000"]), Some(&file)).unwrap();
        assert_eq!(config.api_base_url, "http://flag:5000");
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json").to_string_lossy().to_string();
        let err = resolve_config(&args(&["--config", &path]), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_view_flag_parses() {
        let parsed = args(&["--view", "elevation", "--tick-rate-ms", "250"]);
        assert_eq!(parsed.view, Some(ViewId::Elevation));
        assert_eq!(parsed.tick_rate_ms, 250);
        assert!(Args::try_parse_from(["gw-dash", "--view", "Weather"]).is_err());
    }
}
