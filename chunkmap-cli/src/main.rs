//! chunkmap CLI - Command-line interface
//!
//! Stitches chunk tile renders into a base map and draws areas on it.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "chunkmap")]
#[command(version, about = "Stitch chunk tile renders into one map and draw areas on it", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to chunkmap.log in this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the configuration file and the map workspace
    Init {
        /// Map workspace directory
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Assemble tile renders into a base map
    Assemble {
        /// Directory holding zoom-<n>/ tile folders
        #[arg(long, value_name = "DIR")]
        tiles: Option<PathBuf>,

        /// Map workspace directory
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Zoom level of the tiles (0-4)
        #[arg(long)]
        zoom: Option<u8>,

        /// Pixel width and height of one tile image
        #[arg(long)]
        resolution: Option<u32>,

        /// Outline each tile (red, blue for tile 0_0)
        #[arg(long)]
        debug_grid: bool,
    },

    /// Draw areas from a JSON file onto the base map
    Render {
        /// JSON array of areas
        #[arg(long, value_name = "FILE")]
        areas: PathBuf,

        /// Map workspace directory
        #[arg(long, value_name = "DIR")]
        map: Option<PathBuf>,
    },

    /// Show the map's metadata and renders
    Info {
        /// Map workspace directory
        #[arg(long, value_name = "DIR")]
        map: Option<PathBuf>,
    },

    /// Convert a world coordinate to a map pixel
    Locate {
        #[arg(allow_hyphen_values = true)]
        x: i32,

        #[arg(allow_hyphen_values = true)]
        y: i32,

        /// Treat X Y as a pixel and print the world coordinate
        #[arg(long)]
        pixel: bool,

        /// Map workspace directory
        #[arg(long, value_name = "DIR")]
        map: Option<PathBuf>,
    },

    /// View or edit configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let _guard = match chunkmap::logging::init_logging(cli.log_dir.as_deref(), cli.verbose) {
        Ok(guard) => guard,
        Err(e) => exit_with(CliError::from(e)),
    };

    if let Err(e) = run(cli.command) {
        tracing::debug!(error = ?e, "Command failed");
        exit_with(e);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Init { output } => commands::init::run(output),
        Commands::Assemble {
            tiles,
            output,
            zoom,
            resolution,
            debug_grid,
        } => commands::assemble::run(commands::assemble::AssembleArgs {
            tiles,
            output,
            zoom,
            resolution,
            debug_grid,
        }),
        Commands::Render { areas, map } => commands::render::run(&areas, map),
        Commands::Info { map } => commands::info::run(map),
        Commands::Locate { x, y, pixel, map } => commands::locate::run(x, y, pixel, map),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn exit_with(error: CliError) -> ! {
    eprintln!("Error: {}", error);
    process::exit(error.exit_code());
}
