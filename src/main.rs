use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use profile_widget::utils::config;
use profile_widget::{MemorySurface, ProfileWidget, RefreshOutcome, WidgetSettings};

/// Render a live profile page for one user.
#[derive(Debug, Parser)]
#[command(name = "profile-widget", version, about)]
struct Cli {
    /// Username whose profile is fetched
    username: String,

    /// JSON settings file (camelCase keys: apiUrl, authToken, refreshIntervalMs, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fetch once, write the page, and exit
    #[arg(long)]
    once: bool,

    /// Write the page here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Enable diagnostic logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();

    let mut settings = config::load_settings(cli.config.as_deref())
        .with_context(|| format!("loading settings from {:?}", cli.config))?;
    settings.debug |= cli.debug;
    init_logging(&settings);

    if settings.auth_token.is_empty() {
        log::warn!("no auth token configured; requests are sent without Authorization");
    }

    let surface = MemorySurface::full();
    let widget = ProfileWidget::new(&cli.username, &settings, surface.clone())
        .context("building profile widget")?;

    if cli.once {
        let outcome = widget.refresh().await;
        write_page(&surface, widget.username(), cli.out.as_deref())?;
        if outcome == RefreshOutcome::Offline {
            anyhow::bail!("profile for {} could not be fetched", widget.username());
        }
        return Ok(());
    }

    let mut renders = widget.renders();
    widget.init()?;
    loop {
        tokio::select! {
            changed = renders.changed() => {
                if changed.is_err() {
                    break;
                }
                write_page(&surface, widget.username(), cli.out.as_deref())?;
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("shutting down");
                break;
            }
        }
    }
    widget.stop_auto_refresh();
    Ok(())
}

fn init_logging(settings: &WidgetSettings) {
    let default_filter = if settings.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn write_page(surface: &MemorySurface, username: &str, out: Option<&Path>) -> Result<()> {
    let document = surface.to_document(&format!("{} · profile", username));
    match out {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("writing page to {}", path.display())),
        None => {
            println!("{}", document);
            Ok(())
        }
    }
}
