//! inkview - a markdown viewer for files, dropped files, and URLs.
//!
//! # Usage
//!
//! ```bash
//! inkview README.md
//! inkview https://github.com/user/repo/blob/main/README.md
//! inkview --html notes.md > notes.html
//! ```

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use inkview::acquire::{AcquisitionRequest, HttpFetcher, validate};
use inkview::app::App;
use inkview::config::{
    ConfigFlags, Theme, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, prefs_path, resolve_theme, save_config_flags,
};
use inkview::document::{page, render};
use inkview::host::{JsonPrefs, PrefsStore, detect_ambient_theme};

/// A markdown viewer: files, dropped files, or URLs rendered to sanitized HTML
#[derive(Parser, Debug)]
#[command(name = "inkview", version, about, long_about = None)]
struct Cli {
    /// Markdown file or http(s) URL to open
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// URL to open at startup (deep link)
    #[arg(long, value_name = "URL", conflicts_with = "source")]
    url: Option<String>,

    /// Colour theme; auto uses the saved choice, then the terminal background
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the sanitized HTML of SOURCE and exit
    #[arg(long, conflicts_with = "page")]
    html: bool,

    /// Print a standalone HTML page of SOURCE and exit
    #[arg(long)]
    page: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn request(&self) -> Option<AcquisitionRequest> {
        match (&self.url, &self.source) {
            (Some(url), _) => Some(AcquisitionRequest::RemoteUrl(url.clone())),
            (None, Some(source)) => AcquisitionRequest::from_input(source),
            (None, None) => None,
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Load `request` synchronously and write its HTML to stdout.
fn print_rendered(request: AcquisitionRequest, theme: Theme, standalone: bool) -> Result<()> {
    let job = validate(request)?.context("Nothing to render")?;
    let label = job.label().to_string();
    let document = job
        .run(&HttpFetcher::new())
        .with_context(|| format!("Failed to load {label}"))?;
    let html = render(&document.content);
    let output = if standalone {
        page::standalone_page(&document.name, &html, theme, false)
    } else {
        html
    };
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(cli.log_file.as_deref().or(effective.log_file.as_deref()))?;

    let stored = JsonPrefs::new(prefs_path()).load_theme();
    let theme = resolve_theme(cli.theme.or(effective.theme), stored, detect_ambient_theme);
    tracing::debug!(theme = theme.as_str(), "starting");

    let request = cli.request();
    if cli.html || cli.page {
        let request = request.context("--html and --page need a SOURCE or --url")?;
        return print_rendered(request, theme, cli.page);
    }

    App::new(theme)
        .with_initial_request(request)
        .run()
        .context("Application error")
}
