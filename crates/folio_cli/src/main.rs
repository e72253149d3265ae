use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_core::{AssetSource, FolioConfig, config};
use miette::Result;
use tracing::info;

mod commands;
mod console_repl;
mod log_route;
mod output;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Terminal front-end for the folio portfolio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding experience.json and about.json
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console session (default)
    Console {
        /// Viewport width in pixels; below the breakpoint the panel is hidden
        #[arg(long, default_value_t = 1280)]
        width: u32,
    },
    /// Play the typed role line
    Hero {
        /// Number of full role cycles to play
        #[arg(long, default_value_t = 1)]
        cycles: usize,
    },
    /// Print the experience timeline and total years
    Experience,
    /// Print the about cards
    About,
    /// Load and list public repositories
    Projects {
        /// List every repository instead of the first page
        #[arg(long)]
        all: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Save current configuration to file
    Save {
        /// Path to save configuration
        #[arg(default_value = "folio.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .rgb_colors(miette::RgbColors::Preferred)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))?;
    miette::set_panic_hook();
    let cli = Cli::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    let log_route = log_route::LogRoute::new();

    let filter = if cli.debug {
        EnvFilter::new("folio_core=debug,folio_cli=debug,warn")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("folio_core=info,folio_cli=info,warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339())
        .compact()
        .with_writer(log_route.clone())
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from: {:?}", path);
            config::load_config(path).await?
        }
        None => {
            info!("Loading config from standard locations");
            config::load_config_from_standard_locations().await?
        }
    };
    apply_overrides(&mut config, &cli);

    match cli.command {
        None => console_repl::run(config, 1280, &log_route).await?,
        Some(Commands::Console { width }) => {
            console_repl::run(config, width, &log_route).await?
        }
        Some(Commands::Hero { cycles }) => commands::hero::play(&config, cycles).await?,
        Some(Commands::Experience) => commands::experience::show(&config).await?,
        Some(Commands::About) => commands::about::show(&config).await?,
        Some(Commands::Projects { all }) => commands::projects::list(&config, all).await?,
        Some(Commands::Config { cmd }) => match cmd {
            ConfigCommands::Show => commands::config::show(&config).await?,
            ConfigCommands::Save { path } => commands::config::save(&config, &path).await?,
        },
    }

    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut FolioConfig, cli: &Cli) {
    if let Some(assets) = &cli.assets {
        config.site.assets = AssetSource::Directory {
            path: assets.clone(),
        };
    }
}
