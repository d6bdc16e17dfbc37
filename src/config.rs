use crate::model::ViewId;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "GW_DASH_API_URL";

/// Endpoint paths relative to the API base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub elevation: String,
    pub geospatial_plot: String,
    pub refresh_rate: String,
    pub hydrogeology: String,
    pub population: String,
    pub rainfall_trend: String,
    pub tidal_analysis: String,
    pub tidal_prediction: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            elevation: "/api/elevation/".to_string(),
            geospatial_plot: "/api/geospatial_analysis/plot".to_string(),
            refresh_rate: "/api/rainfall/refresh_rate/".to_string(),
            hydrogeology: "/api/hydrogeology/".to_string(),
            population: "/api/population/".to_string(),
            rainfall_trend: "/api/rainfall/trend_analysis/".to_string(),
            tidal_analysis: "/api/tidal_cycle/analysis/".to_string(),
            tidal_prediction: "/api/tidal_cycle/predict/".to_string(),
        }
    }
}

impl Endpoints {
    /// Path serving the main payload of `view`
    pub fn path_for(&self, view: ViewId) -> &str {
        match view {
            ViewId::GeospatialAnalysis => &self.geospatial_plot,
            ViewId::Hydrogeology => &self.hydrogeology,
            ViewId::RainfallTrendAnalysis => &self.rainfall_trend,
            ViewId::RefreshRatePredictor => &self.refresh_rate,
            ViewId::Population => &self.population,
            ViewId::Elevation => &self.elevation,
            ViewId::TidalCycleAnalysis => &self.tidal_analysis,
            ViewId::TidalCycleImpactPrediction => &self.tidal_prediction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// View shown at startup
    pub default_view: ViewId,
    /// Command used to open pages; falls back to $BROWSER, then the platform opener
    pub browser: Option<String>,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 5,
            default_view: ViewId::default(),
            browser: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".gw-dash"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the config at `path` if the file exists; an unreadable file is
    /// logged and ignored
    pub fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::load_from(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Config> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the config to the default location
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply an API URL taken from the environment, if set and non-empty
    pub fn with_env_url(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }
}
