mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use pet_core::{config::Config, platform, AdoptedListPolicy, ExplorerScreen, PetCatalog};

use crate::app_state::CatalogSource;

#[derive(Parser, Debug)]
#[command(name = "pet-explorer", version, about = "Browse adoptable pets and adopt a few")]
struct Cli {
    /// TOML catalog to browse instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Keep one Adopted row per pet when a pet is adopted again
    #[arg(long = "dedupe-adopted")]
    dedupe_adopted: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so it can be tailed right away.
    eprintln!("pet-explorer log: {}", log_path.display());
    tracing::info!("pet-explorer starting");

    let mut warnings = Vec::new();

    // ── Load config ──────────────────────────────────────────────────────────
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {:#}", e);
        warnings.push("config unreadable, using defaults".to_string());
        Config::default()
    });
    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
    }
    if cli.dedupe_adopted {
        config.explorer.dedupe_adopted = true;
    }

    // ── Load catalog ─────────────────────────────────────────────────────────
    let (catalog, source) = match &config.catalog.path {
        Some(path) => match PetCatalog::load(path) {
            Ok(catalog) => (catalog, CatalogSource::File(path.clone())),
            Err(e) => {
                tracing::warn!("catalog {} failed to load: {}", path.display(), e);
                warnings.push(format!("{}: {e}; using built-in catalog", path.display()));
                (PetCatalog::default(), CatalogSource::BuiltIn)
            }
        },
        None => (PetCatalog::default(), CatalogSource::BuiltIn),
    };

    let policy: AdoptedListPolicy = config.explorer.policy();
    let (screen, initial_patch) = ExplorerScreen::load(&catalog, config.explorer.layout(), policy);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let mut app = app::App::new(
        screen,
        initial_patch,
        source,
        log_path,
        &config.ui,
        config.explorer.start_collapsed,
    );
    for warning in warnings {
        app.warn(warning);
    }
    app.run().await?;

    Ok(())
}
