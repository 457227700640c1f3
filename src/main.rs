//! CLI entry point for the Pearls AQI Predictor.
//!
//! Renders the air quality dashboard for a city, lists the covered cities,
//! suggests completions, or runs an interactive session on stdin.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use aqi_predictor::AppConfig;
use aqi_predictor::data_access::{AqiDataService, DataOptions};
use aqi_predictor::recommendations::RecommendationGateway;
use aqi_predictor::store::CuratedStore;
use aqi_predictor::view::{
    Dashboard, PanelStatus, RenderOptions, Screen, ViewState, render_header,
    render_recommendations, render_screen,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aqi_predictor", version)]
#[command(about = "Pearls AQI Predictor - air quality forecasts and health recommendations", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard for a city
    Show {
        /// City name; defaults to the configured default city
        #[arg(short = 'C', long)]
        city: Option<String>,
    },
    /// List the cities with curated data
    Cities,
    /// Suggest known cities starting with a prefix
    Suggest {
        #[arg(value_name = "PREFIX")]
        prefix: String,
    },
    /// Read city names from stdin and redraw the dashboard for each
    Interactive,
}

fn init_logging(config: &AppConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aqi_predictor={level},warn")));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn build_dashboard(config: &AppConfig) -> Result<Dashboard> {
    let store = CuratedStore::bundled().context("Failed to load bundled city data")?;
    let service = AqiDataService::new(Arc::new(store), DataOptions::from(&config.data))
        .context("Failed to create data access service")?;
    let gateway = RecommendationGateway::from_config(&config.recommendations)
        .context("Failed to create recommendation gateway")?;
    Ok(Dashboard::new(service, gateway))
}

fn print_loading(city: &str, options: RenderOptions) {
    let screen = Screen {
        view: ViewState::Loading {
            city: city.to_string(),
        },
        recommendations: PanelStatus::Idle,
    };
    print!("{}", render_screen(&screen, options));
}

/// Print the current screen, then the recommendations once the gateway answers
async fn print_screen(dashboard: &Dashboard, options: RenderOptions) {
    print!("{}", render_screen(&dashboard.screen(), options));
    if dashboard.load_recommendations().await {
        println!();
        print!("{}", render_recommendations(&dashboard.recommendations()));
    }
}

async fn show(dashboard: &Dashboard, city: &str, options: RenderOptions) {
    print_loading(city, options);
    dashboard.select_city(city).await;
    println!();
    print_screen(dashboard, options).await;
}

async fn interactive(
    dashboard: &Dashboard,
    default_city: &str,
    options: RenderOptions,
) -> Result<()> {
    show(dashboard, default_city, options).await;
    println!("\nEnter a city, '?prefix' for suggestions, 'refresh' or 'quit'.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let input = line.trim();
        match input {
            "quit" | "exit" => break,
            "refresh" => {
                dashboard.refresh().await;
                print_screen(dashboard, options).await;
            }
            _ if input.starts_with('?') => {
                let suggestions = dashboard.selector().suggestions(&input[1..]);
                if suggestions.is_empty() {
                    println!("No matching cities");
                } else {
                    println!("{}", suggestions.join(", "));
                }
            }
            _ => {
                if let Some(city) = dashboard.selector().submit(input) {
                    show(dashboard, &city, options).await;
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = AppConfig::load_from_path(cli.config.clone())?;
    init_logging(&config, cli.verbose);
    debug!("Loaded configuration: {:?}", config.data);

    let options = RenderOptions {
        color: !cli.no_color && std::io::stdout().is_terminal(),
    };
    let dashboard = build_dashboard(&config)?;

    match cli.command {
        Some(Commands::Cities) => {
            for city in dashboard.selector().cities() {
                println!("{city}");
            }
        }
        Some(Commands::Suggest { prefix }) => {
            for city in dashboard.selector().suggestions(&prefix) {
                println!("{city}");
            }
        }
        Some(Commands::Interactive) => {
            print!("{}", render_header());
            interactive(&dashboard, &config.data.default_city, options).await?;
        }
        Some(Commands::Show { city }) => {
            print!("{}", render_header());
            let city = city
                .and_then(|c| dashboard.selector().submit(&c))
                .unwrap_or_else(|| config.data.default_city.clone());
            info!("Showing dashboard for {}", city);
            show(&dashboard, &city, options).await;
        }
        None => {
            print!("{}", render_header());
            dashboard.mount().await;
            print_screen(&dashboard, options).await;
        }
    }

    Ok(())
}
