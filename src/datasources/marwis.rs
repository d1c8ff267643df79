use super::{RunwaySensor, SensorSnapshot};
use crate::config::MarwisConfig;
use crate::error::{Result, SnowOpsError};
use crate::models::{SensorChannel, StationPayload};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Station feed stored as a JSON file (a bare channel list or an object
/// with a `measurements` list). Re-read on every call.
#[derive(Debug, Clone)]
pub struct FileSensorFeed {
    path: PathBuf,
}

impl FileSensorFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read(&self) -> Result<Vec<SensorChannel>> {
        if !self.path.exists() {
            return Err(SnowOpsError::NotFound(format!(
                "station file {}",
                self.path.display()
            )));
        }
        let content = std::fs::read_to_string(&self.path)?;
        let payload: StationPayload = serde_json::from_str(&content)?;
        Ok(payload.into_channels())
    }

    pub fn write(&self, channels: &[SensorChannel]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(channels)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl RunwaySensor for FileSensorFeed {
    fn channels(&self) -> Option<Vec<SensorChannel>> {
        match self.read() {
            Ok(channels) => Some(channels),
            Err(e) => {
                tracing::warn!("Station file unavailable: {}", e);
                None
            }
        }
    }

    fn describe(&self) -> String {
        format!("station file {}", self.path.display())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(rename = "accessToken")]
    access_token_camel: Option<String>,
    token: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Option<String> {
        self.access_token
            .or(self.access_token_camel)
            .or(self.token)
            .filter(|t| !t.is_empty())
    }
}

/// HTTP client for the MARWIS road weather station (ViewMondo API).
pub struct MarwisClient {
    client: reqwest::Client,
    config: MarwisConfig,
}

impl MarwisClient {
    pub fn new(config: MarwisConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn token_url(&self) -> String {
        format!("{}/Token", self.config.base_url.trim_end_matches('/'))
    }

    fn sensors_url(&self) -> String {
        format!(
            "{}/api/v1/GetStationSensors",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_token(&self) -> Result<String> {
        let response = self
            .client
            .post(self.token_url())
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "password"),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SnowOpsError::DataSourceUnavailable(format!("MARWIS token: {}", e)))?;

        if !response.status().is_success() {
            return Err(SnowOpsError::DataSourceUnavailable(format!(
                "MARWIS token endpoint returned {}",
                response.status()
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            SnowOpsError::DataSourceUnavailable(format!(
                "Failed to parse MARWIS token response: {}",
                e
            ))
        })?;

        body.into_token().ok_or_else(|| {
            SnowOpsError::DataSourceUnavailable("MARWIS token response had no token".into())
        })
    }

    pub async fn fetch_channels(&self) -> Result<Vec<SensorChannel>> {
        if self.config.username.is_empty() || self.config.password.is_empty() {
            return Err(SnowOpsError::Config(
                "MARWIS username and password must be set".into(),
            ));
        }

        let token = self.fetch_token().await?;

        let response = self
            .client
            .get(self.sensors_url())
            .query(&[("station_id", self.config.station_id.as_str())])
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| SnowOpsError::DataSourceUnavailable(format!("MARWIS: {}", e)))?;

        if !response.status().is_success() {
            return Err(SnowOpsError::DataSourceUnavailable(format!(
                "MARWIS returned {}",
                response.status()
            )));
        }

        let payload: StationPayload = response.json().await.map_err(|e| {
            SnowOpsError::DataSourceUnavailable(format!(
                "MARWIS did not return a sensor list: {}",
                e
            ))
        })?;

        Ok(payload.into_channels())
    }

    /// Fetch once, bounded by the configured timeout. Any failure becomes an
    /// unavailable snapshot.
    pub async fn snapshot(&self) -> SensorSnapshot {
        let limit = Duration::from_secs(self.config.timeout_secs);
        match tokio::time::timeout(limit, self.fetch_channels()).await {
            Ok(Ok(channels)) => {
                tracing::info!("Fetched {} MARWIS channels", channels.len());
                SensorSnapshot::new(channels).with_origin("MARWIS station")
            }
            Ok(Err(e)) => {
                tracing::warn!("MARWIS feed unavailable: {}", e);
                SensorSnapshot::unavailable("MARWIS station (unavailable)")
            }
            Err(_) => {
                tracing::warn!("MARWIS feed timed out after {:?}", limit);
                SensorSnapshot::unavailable("MARWIS station (timeout)")
            }
        }
    }

    pub async fn test_connection(&self) -> Result<bool> {
        self.fetch_channels().await.map(|_| true)
    }
}
