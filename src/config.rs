use crate::error::{Result, SnowOpsError};
use crate::logic::rules::ExclusionMap;
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,
    /// Overrides the standard suppression relationships when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<ExclusionMap>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub source: SensorSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marwis: Option<MarwisConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorSource {
    #[default]
    None,
    File,
    Marwis,
}

impl SensorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorSource::None => "none",
            SensorSource::File => "file",
            SensorSource::Marwis => "marwis",
        }
    }
}

impl std::fmt::Display for SensorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct MarwisConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub station_id: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://viewmondo.com".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for MarwisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarwisConfig")
            .field("base_url", &self.base_url)
            .field("station_id", &self.station_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MarwisConfig {
    /// Reject settings that would make every fetch fail.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(SnowOpsError::Config(
                "sensor.marwis.timeout_secs must be greater than 0".into(),
            ));
        }
        for (field, value) in [
            ("station_id", &self.station_id),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.contains("${") {
                return Err(SnowOpsError::Config(format!(
                    "sensor.marwis.{} has an unresolved environment variable",
                    field
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(SnowOpsError::Config(format!(
                "Config file not found at {:?}. Run `snowops init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SnowOpsError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution, validating sensor and exclusion settings.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| SnowOpsError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.sensor.source {
            SensorSource::File if self.sensor.file_path.is_none() => {
                return Err(SnowOpsError::Config(
                    "sensor.source is 'file' but sensor.file_path is not set".into(),
                ));
            }
            SensorSource::Marwis => match &self.sensor.marwis {
                Some(marwis) => marwis.validate()?,
                None => {
                    return Err(SnowOpsError::Config(
                        "sensor.source is 'marwis' but the sensor.marwis section is missing"
                            .into(),
                    ));
                }
            },
            _ => {}
        }

        if let Some(map) = &self.exclusions {
            map.validate()?;
        }
        Ok(())
    }

    /// The configured exclusion map, or the standard one.
    pub fn exclusion_map(&self) -> ExclusionMap {
        self.exclusions.clone().unwrap_or_default()
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("snowops").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/snowops/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SnowOpsError::Config("Cannot determine config directory".into()))?
            .join("snowops");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive(target: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up SnowOps!");
        println!();

        println!("Runway surface sensor");
        let sources = [SensorSource::None, SensorSource::File, SensorSource::Marwis];
        let labels = [
            "none (use supplied runway temperature or the default)",
            "file (JSON station export)",
            "marwis (Lufft ViewMondo API)",
        ];
        let choice = Select::new()
            .with_prompt("  Sensor source")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| SnowOpsError::Config(format!("Input error: {}", e)))?;
        let source = sources[choice];

        let mut sensor = SensorConfig {
            source,
            ..SensorConfig::default()
        };

        match source {
            SensorSource::None => {}
            SensorSource::File => {
                let path: String = Input::new()
                    .with_prompt("  Station file path")
                    .default("data/station.json".into())
                    .interact_text()
                    .map_err(|e| SnowOpsError::Config(format!("Input error: {}", e)))?;
                sensor.file_path = Some(PathBuf::from(path));
            }
            SensorSource::Marwis => {
                let base_url: String = Input::new()
                    .with_prompt("  API base URL")
                    .default(default_base_url())
                    .interact_text()
                    .map_err(|e| SnowOpsError::Config(format!("Input error: {}", e)))?;

                let station_id: String = Input::new()
                    .with_prompt("  Station ID")
                    .interact_text()
                    .map_err(|e| SnowOpsError::Config(format!("Input error: {}", e)))?;

                let username: String = Input::new()
                    .with_prompt("  Username")
                    .default("${MARWIS_USERNAME}".into())
                    .interact_text()
                    .map_err(|e| SnowOpsError::Config(format!("Input error: {}", e)))?;

                let password: String = Password::new()
                    .with_prompt("  Password (blank to use ${MARWIS_PASSWORD})")
                    .allow_empty_password(true)
                    .interact()
                    .map_err(|e| SnowOpsError::Config(format!("Input error: {}", e)))?;

                let timeout_secs: u64 = Input::new()
                    .with_prompt("  Timeout (seconds)")
                    .default(default_timeout_secs())
                    .interact_text()
                    .map_err(|e| SnowOpsError::Config(format!("Input error: {}", e)))?;

                sensor.marwis = Some(MarwisConfig {
                    base_url,
                    station_id,
                    username,
                    password: if password.is_empty() {
                        "${MARWIS_PASSWORD}".into()
                    } else {
                        password
                    },
                    timeout_secs,
                });
            }
        }

        println!();

        let config = Config {
            sensor,
            exclusions: None,
        };

        let config_path = match target {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        config.save(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| SnowOpsError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# SnowOps Configuration\n# Generated by `snowops init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| SnowOpsError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}
