//! FARS Toolkit - command line front end
//!
//! Summarizes yearly accident files and renders state accident maps.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fars_toolkit::charts::MapOutcome;
use fars_toolkit::config::Settings;
use fars_toolkit::{fars_read, make_filename, FarsReader};
use polars::prelude::{CsvWriter, SerWriter};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "fars")]
#[command(about = "Summarize and map FARS accident files", long_about = None)]
struct Cli {
    /// Directory holding accident_<year>.csv.bz2 files (overrides the config file)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the file name expected for a year
    Filename {
        #[arg(value_name = "YEAR")]
        year: String,
    },
    /// Load one accident file and print its shape and first rows
    Read {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Count accidents per month for each year
    Summarize {
        #[arg(value_name = "YEAR", required = true)]
        years: Vec<String>,

        /// Also write the summary table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Plot accident locations for a state and year
    Map {
        #[arg(value_name = "STATE")]
        state: String,

        #[arg(value_name = "YEAR")]
        year: String,

        /// Image to write; .svg writes SVG, anything else PNG
        #[arg(short, long, default_value = "fars_map.svg")]
        output: PathBuf,

        /// CSV outline with group,long,lat columns
        #[arg(long)]
        outline: Option<PathBuf>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Open the image with the system viewer
        #[arg(long = "open", default_value_t = false)]
        open_viewer: bool,
    },
}

fn main() -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        );
    tracing_subscriber::registry().with(stderr_layer).init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    let reader = FarsReader::new(settings.data_dir.clone());

    match cli.command {
        Commands::Filename { year } => {
            println!("{}", make_filename(&year)?);
        }
        Commands::Read { path } => {
            let df = fars_read(&path)?;
            println!("{} rows x {} columns", df.height(), df.width());
            println!("{}", df.head(Some(10)));
        }
        Commands::Summarize { years, output } => {
            let mut summary = reader.summarize_years(&years)?;
            println!("{summary}");
            if let Some(path) = output {
                let mut file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .finish(&mut summary)?;
                info!(path = %path.display(), "summary written");
            }
        }
        Commands::Map {
            state,
            year,
            output,
            outline,
            width,
            height,
            open_viewer,
        } => {
            let mut map_settings = settings.map.clone();
            if outline.is_some() {
                map_settings.outline = outline;
            }
            if let Some(w) = width {
                map_settings.width = w;
            }
            if let Some(h) = height {
                map_settings.height = h;
            }
            let options = map_settings.to_options(output);

            match reader.map_state(state.as_str(), year.as_str(), &options)? {
                MapOutcome::Rendered { path, points } => {
                    println!("{points} accidents plotted to {}", path.display());
                    if open_viewer {
                        open::that(&path)
                            .with_context(|| format!("opening {}", path.display()))?;
                    }
                }
                MapOutcome::NoAccidents { .. } => {
                    println!("no accidents to plot");
                }
            }
        }
    }

    Ok(())
}
