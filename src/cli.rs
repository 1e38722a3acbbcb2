use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build a movie trailer page from a movie config file
#[derive(Parser)]
#[command(name = "tomatillos", version)]
#[command(about = "Generate a static movie trailer web page", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the page, write it and open it in a browser
    Build {
        /// Movie config file; the bundled sample when omitted
        config: Option<PathBuf>,
        /// Where to write the page
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Print the validated movies
    List {
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Exercise the page headlessly and report broken behavior
    Check {
        config: Option<PathBuf>,
        /// Probe as a browser without the modal capability
        #[arg(long)]
        legacy: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print the bundled sample config
    Sample,
}
