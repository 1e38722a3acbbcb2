mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use tomatillos::check::check_page;
use tomatillos::config::SAMPLE_CONFIG;
use tomatillos::page::Capabilities;
use tomatillos::settings::Settings;
use tomatillos::{open_in_browser, Tomatillos};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TOMATILLOS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load();

    match cli.command {
        Commands::Build { config, output, no_open } => {
            let app = Tomatillos::load(config.as_deref(), settings).await?;
            let path = app.write_page(output.as_deref()).await?;
            println!("Opening webpage for:");
            for movie in app.movies() {
                println!("{movie}");
            }
            if !no_open && app.settings().open_browser {
                open_in_browser(&path);
            } else {
                println!("{}", path.display());
            }
        }
        Commands::List { config, json } => {
            let app = Tomatillos::load(config.as_deref(), settings).await?;
            if json {
                let out = serde_json::to_string_pretty(app.movies()).context("serializing movies")?;
                println!("{out}");
            } else {
                for movie in app.movies() {
                    println!("{movie}\t{}", movie.youtube_url());
                }
            }
        }
        Commands::Check { config, legacy, json } => {
            let app = Tomatillos::load(config.as_deref(), settings).await?;
            let caps = if legacy { Capabilities::legacy() } else { Capabilities::modern() };
            let report = check_page(app.movies(), caps);
            if json {
                let out = serde_json::to_string_pretty(&report).context("serializing check report")?;
                println!("{out}");
            } else {
                println!("strategy: {:?}", report.strategy);
                println!("tiles: {}", report.tiles);
                println!("revealed in order: {}", report.revealed_in_order);
                println!("trailers opened: {}", report.trailers_opened);
                println!("navigations: {}", report.navigations.len());
                for violation in &report.violations {
                    println!("violation: {violation}");
                }
            }
            if !report.is_ok() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Sample => print!("{SAMPLE_CONFIG}"),
    }
    Ok(ExitCode::SUCCESS)
}
