use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "snowops",
    version,
    about = "Airport pavement snow and ice advisory engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a weather reading (JSON) and print the advisories
    Evaluate {
        /// Reading file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Read runway surface channels from this station file
        #[arg(long, conflicts_with = "no_sensor")]
        sensor_file: Option<PathBuf>,

        /// Ignore any configured runway sensor
        #[arg(long)]
        no_sensor: bool,

        /// Print the maintenance-notification payload instead of the raw result
        #[arg(long)]
        payload: bool,

        /// Include the audit trail on stderr
        #[arg(long)]
        audit: bool,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Run a built-in scenario through the engine
    Simulate {
        /// snow, rain, threshold, clear or no-runway
        scenario: String,

        /// Print the maintenance-notification payload instead of the raw result
        #[arg(long)]
        payload: bool,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// List the supported advisory kinds, or the task list for one kind
    Tasks {
        /// snow_alert, rain_alert or threshold_alert
        kind: Option<String>,
    },
    /// Fetch the configured station once and print its channels
    Station {
        /// Also write the channels to this file for later `--sensor-file` use
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Validate config and test the sensor connection
    Check,
    /// Run interactive setup
    Init,
}
