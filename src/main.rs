mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod notification;

use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, SensorSource};
use datasources::{FileSensorFeed, MarwisClient, NoSensor, RunwaySensor, SensorSnapshot};
use error::{Result, SnowOpsError};
use logic::audit::Tee;
use logic::scenarios::Scenario;
use logic::{AdvisoryEngine, AuditLog, TracingSink};
use models::{AdvisoryKind, AdvisoryOutput, RawReading, SensorChannel};
use notification::NotificationPayload;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            input,
            sensor_file,
            no_sensor,
            payload,
            audit,
            pretty,
        } => {
            let config = load_optional(cli.config)?;
            let raw = read_reading(&input)?;

            // One read per evaluation; the payload reports the same channels the engine saw.
            let sensor = if no_sensor {
                SensorSnapshot::capture(&NoSensor)
            } else if let Some(path) = sensor_file {
                SensorSnapshot::capture(&FileSensorFeed::new(path))
            } else {
                configured_sensor(&config).await?
            };
            if !no_sensor && !sensor.is_available() {
                tracing::warn!("Runway sensor unavailable ({})", sensor.describe());
            }

            let engine = AdvisoryEngine::new().with_exclusions(config.exclusion_map());
            let mut log = AuditLog::new();
            let mut tracing_sink = TracingSink;
            let output = {
                let mut sink = Tee::new(&mut log, &mut tracing_sink);
                engine.evaluate(&raw, &sensor, &mut sink)
            };

            if output.is_invalid_input() {
                tracing::warn!("Reading rejected: {}", output.error.as_deref().unwrap_or(""));
            } else {
                tracing::info!("Advisories: {:?}", output.kinds());
            }

            if audit {
                for event in log.events() {
                    eprintln!("[{}] {}", event.level, event.message);
                }
            }

            let station = if payload { sensor.channels() } else { None };
            emit(&output, payload, station.as_deref(), pretty)
        }
        Commands::Simulate {
            scenario,
            payload,
            pretty,
        } => {
            let scenario = Scenario::from_str(&scenario).ok_or_else(|| {
                SnowOpsError::InvalidData(format!(
                    "unknown scenario '{}' (expected one of: {})",
                    scenario,
                    Scenario::ALL
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            let config = load_optional(cli.config)?;
            tracing::info!("Simulating {}: {}", scenario, scenario.description());

            let engine = AdvisoryEngine::new().with_exclusions(config.exclusion_map());
            let output = engine.evaluate(&scenario.reading(), &NoSensor, &mut TracingSink);
            emit(&output, payload, None, pretty)
        }
        Commands::Tasks { kind } => {
            match kind {
                Some(kind) => {
                    let kind = parse_kind(&kind)?;
                    let meta = kind.metadata();
                    println!("{} ({}, priority {})", meta.name, kind.id(), kind.priority());
                    for (i, task) in meta.tasks.iter().enumerate() {
                        println!("  {}. {}", i + 1, task);
                    }
                }
                None => {
                    for (kind, name) in AdvisoryEngine::new().list_rules() {
                        println!("{:<16} {} (priority {})", kind.id(), name, kind.priority());
                    }
                }
            }
            Ok(())
        }
        Commands::Station { save } => {
            let config = load_optional(cli.config)?;
            let channels = fetch_station(&config).await?;

            if let Some(path) = save {
                FileSensorFeed::new(&path).write(&channels)?;
                tracing::info!("Saved {} channels to {}", channels.len(), path.display());
            }

            let surface = models::find_surface_temperature(&channels);
            for channel in &channels {
                println!(
                    "{:<32} {:>10} {}",
                    channel.name.as_deref().unwrap_or("?"),
                    channel
                        .numeric_value()
                        .map(|v| format!("{:.1}", v))
                        .unwrap_or_else(|| "-".into()),
                    channel.unit.as_deref().unwrap_or("")
                );
            }
            match surface {
                Some(t) => println!("\nRunway surface temperature: {:.1} °C", t),
                None => println!("\nNo runway surface temperature channel found"),
            }
            Ok(())
        }
        Commands::Check => {
            let config = Config::load(cli.config)?;
            println!("Config: OK");
            println!("Sensor source: {}", config.sensor.source);

            match config.sensor.source {
                SensorSource::None => {}
                SensorSource::File => match fetch_station(&config).await {
                    Ok(channels) => println!("Station file: OK ({} channels)", channels.len()),
                    Err(e) => println!("Station file: FAILED ({})", e),
                },
                SensorSource::Marwis => {
                    let client = marwis_client(&config)?;
                    match client.test_connection().await {
                        Ok(_) => println!("MARWIS: OK"),
                        Err(e) => println!("MARWIS: OFFLINE ({})", e),
                    }
                }
            }

            let engine = AdvisoryEngine::new().with_exclusions(config.exclusion_map());
            for kind in AdvisoryKind::ALL {
                let targets: Vec<&str> = engine
                    .exclusions()
                    .suppresses(kind)
                    .map(|k| k.id())
                    .collect();
                println!("{} suppresses [{}]", kind.id(), targets.join(", "));
            }
            Ok(())
        }
        Commands::Init => {
            let (_, path) = Config::setup_interactive(cli.config)?;
            println!("Run `snowops check --config {}` to verify.", path.display());
            Ok(())
        }
    }
}

/// Load config when one can be found; otherwise run with defaults.
fn load_optional(config_override: Option<PathBuf>) -> Result<Config> {
    if Config::exists(config_override.as_ref()) {
        Config::load(config_override)
    } else if let Some(path) = config_override {
        Err(SnowOpsError::Config(format!(
            "Config file not found at {:?}",
            path
        )))
    } else {
        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }
}

fn read_reading(input: &str) -> Result<RawReading> {
    let content = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| SnowOpsError::NotFound(format!("{}: {}", input, e)))?
    };

    let value: serde_json::Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(SnowOpsError::InvalidData(
            "reading must be a JSON object".into(),
        ));
    }
    Ok(RawReading::from_json(value)?)
}

fn parse_kind(s: &str) -> Result<AdvisoryKind> {
    AdvisoryKind::from_str(s)
        .ok_or_else(|| SnowOpsError::InvalidData(format!("unknown advisory kind '{}'", s)))
}

fn marwis_client(config: &Config) -> Result<MarwisClient> {
    let marwis = config
        .sensor
        .marwis
        .clone()
        .ok_or_else(|| SnowOpsError::Config("sensor.marwis section is missing".into()))?;
    MarwisClient::new(marwis)
}

/// Snapshot the runway sensor named by config. MARWIS is fetched once up
/// front so the evaluation itself never waits on the network.
async fn configured_sensor(config: &Config) -> Result<SensorSnapshot> {
    Ok(match config.sensor.source {
        SensorSource::None => SensorSnapshot::capture(&NoSensor),
        SensorSource::File => {
            let path = config.sensor.file_path.clone().ok_or_else(|| {
                SnowOpsError::Config("sensor.file_path is not set".into())
            })?;
            SensorSnapshot::capture(&FileSensorFeed::new(path))
        }
        SensorSource::Marwis => marwis_client(config)?.snapshot().await,
    })
}

async fn fetch_station(config: &Config) -> Result<Vec<SensorChannel>> {
    match config.sensor.source {
        SensorSource::None => Err(SnowOpsError::DataSourceUnavailable(
            "no sensor source configured".into(),
        )),
        SensorSource::File => {
            let path = config.sensor.file_path.clone().ok_or_else(|| {
                SnowOpsError::Config("sensor.file_path is not set".into())
            })?;
            FileSensorFeed::new(path).read()
        }
        SensorSource::Marwis => marwis_client(config)?.fetch_channels().await,
    }
}

fn emit(
    output: &AdvisoryOutput,
    payload: bool,
    station: Option<&[SensorChannel]>,
    pretty: bool,
) -> Result<()> {
    if payload {
        print_json(&NotificationPayload::from_output(output, station), pretty)
    } else {
        print_json(output, pretty)
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("snowops-main-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reading_must_be_an_object() {
        for (name, content) in [("array.json", "[1, 2]"), ("number.json", "4.5")] {
            let path = temp_file(name, content);
            let err = read_reading(path.to_str().unwrap()).unwrap_err();
            assert!(matches!(err, SnowOpsError::InvalidData(_)), "{}", err);
            std::fs::remove_file(&path).ok();
        }
    }

    #[test]
    fn reading_file_parses_legacy_fields() {
        let path = temp_file("reading.json", r#"{"temperatura_actual": -1.0, "humedad": 70}"#);
        let raw = read_reading(path.to_str().unwrap()).unwrap();
        assert_eq!(raw.ambient_temp_c, Some(serde_json::json!(-1.0)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_reading_file_is_not_found() {
        let err = read_reading("/nonexistent/snowops/reading.json").unwrap_err();
        assert!(matches!(err, SnowOpsError::NotFound(_)));
    }

    #[test]
    fn malformed_reading_is_json_error() {
        let path = temp_file("broken.json", "{ not json");
        let err = read_reading(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, SnowOpsError::Json(_)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_optional(Some(PathBuf::from("/nonexistent/snowops/config.yaml")))
            .unwrap_err();
        assert!(matches!(err, SnowOpsError::Config(_)));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let path = temp_file("config.yaml", "exclusions:\n  snow_alert: []\n");
        let config = load_optional(Some(path.clone())).unwrap();
        assert_eq!(
            config.exclusion_map().suppresses(AdvisoryKind::SnowAlert).count(),
            0
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn kind_names_parse() {
        assert_eq!(parse_kind("snow_alert").unwrap(), AdvisoryKind::SnowAlert);
        assert_eq!(parse_kind("Threshold").unwrap(), AdvisoryKind::ThresholdAlert);
        assert!(matches!(parse_kind("hail"), Err(SnowOpsError::InvalidData(_))));
    }
}
