//! FARS - accident data command line
//!
//! Summarize yearly fatality counts and map accident locations from the
//! `accident_<year>.csv.bz2` files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fars::{
    resolve_filename, Config, DataLoader, DataProcessor, MapOutcome, StateCode, StateMapPlotter,
    Year,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fars", version, about = "FARS accident summaries and state maps")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the accident_<year>.csv.bz2 files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the data file name for a year
    Filename { year: Year },
    /// Load one year and print its shape
    Load { year: Year },
    /// Count fatal accidents per month for each year
    Summarize {
        #[arg(required = true)]
        years: Vec<Year>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Plot a state's accident locations for one year
    Map {
        state: StateCode,
        year: Year,
        /// Output PNG (defaults to accident_map_<state>_<year>.png in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip caption and axis labels
        #[arg(long)]
        no_labels: bool,
        /// Open the rendered map with the system viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let loader = DataLoader::new(&config.data_dir);

    match cli.command {
        Command::Filename { year } => {
            println!("{}", resolve_filename(year));
        }
        Command::Load { year } => {
            let table = loader
                .load_year(year)
                .with_context(|| format!("loading year {year}"))?;
            info!(rows = table.height(), "loaded {}", table.source().display());
            println!("{}", table.dataframe().head(Some(10)));
        }
        Command::Summarize { years, format } => {
            let summary = DataProcessor::summarize(&loader, years)?;
            match format {
                Format::Table => print!("{summary}"),
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }
        Command::Map {
            state,
            year,
            output,
            no_labels,
            open,
        } => {
            let mut style = config.map.clone();
            if no_labels {
                style.labels = false;
            }
            let plotter = StateMapPlotter::new(loader, style, &config.output_dir);
            let output = output.unwrap_or_else(|| plotter.output_path(state, year));

            let outcome = plotter
                .map_state_to(state, year, &output)
                .with_context(|| format!("mapping state {state} in {year}"))?;
            match outcome {
                MapOutcome::Rendered { path, points } => {
                    println!("{} ({points} accidents)", path.display());
                    if open {
                        open::that(&path)
                            .with_context(|| format!("opening {}", path.display()))?;
                    }
                }
                MapOutcome::NoAccidents => println!("no accidents to plot"),
            }
        }
    }

    Ok(())
}
