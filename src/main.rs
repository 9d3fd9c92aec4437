//! Weather Data Analysis Tool
//!
//! Asks for a city, downloads its forecast, saves it as CSV and opens the
//! analysis menu.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use weather_analysis::analysis::RollingDetector;
use weather_analysis::api::{download, OpenWeatherClient};
use weather_analysis::chart::TerminalRenderer;
use weather_analysis::data::store;
use weather_analysis::menu::Session;
use weather_analysis::utils::{setup_logging, AppConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch a weather forecast and analyse it interactively")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// City to fetch (prompted for when omitted)
    #[arg(long)]
    city: Option<String>,

    /// Log filter, e.g. "info" or "weather_analysis=debug"
    #[arg(long)]
    log_level: Option<String>,

    /// Analyse the existing CSV without fetching
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.validate()?;

    setup_logging(cli.log_level.as_deref().unwrap_or(&config.logging.level));

    println!("{}", "Welcome to the Weather Data Analysis Tool!".bold());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let data_path = &config.data.path;

    if !cli.offline {
        let city = match cli.city {
            Some(city) => city,
            None => prompt_city(&mut input)?,
        };
        let api_key = config.api.resolve_api_key()?;
        let client = OpenWeatherClient::from_settings(&config.api)?;

        download(&client, &city, &api_key, data_path)
            .with_context(|| format!("could not download the forecast for {city}"))?;
        println!("Weather data saved to {}", data_path);
    }

    let table = store::load(data_path)
        .with_context(|| format!("failed to load weather data from {data_path}"))?;
    info!(rows = table.len(), path = %data_path, "Loaded weather data");

    let detector = RollingDetector::new(config.analysis.window, config.analysis.threshold);
    let mut session = Session::new(table, TerminalRenderer::stdout()).with_detector(detector);

    let mut out = io::stdout();
    session.run(input, &mut out)?;
    Ok(())
}

fn prompt_city<R: BufRead>(input: &mut R) -> Result<String> {
    print!("Enter the city name: ");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let city = line.trim();
    if city.is_empty() {
        bail!("no city given");
    }
    Ok(city.to_string())
}
