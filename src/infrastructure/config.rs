use crate::domain::advisory::AdvisoryBook;
use crate::domain::aqi::{AqiScale, Palette};
use crate::domain::guideline::{GuidelineLimit, GuidelineTable};
use crate::domain::pollutant::ConcentrationUnit;
use crate::domain::rules::Rules;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data_gov: DataGovSettings,
    #[serde(default)]
    pub waqi: WaqiSettings,
    /// Per-pollutant overrides of the WHO defaults
    #[serde(default)]
    pub guidelines: BTreeMap<String, GuidelineLimit>,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub advisories: AdvisorySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataGovSettings {
    pub base_url: String,
    pub resource_id: String,
    pub api_key: String,
    pub limit: u32,
    /// Unit the portal reports CO in. Not converted, only tagged.
    pub co_unit: ConcentrationUnit,
    pub timeout_secs: u64,
}

impl Default for DataGovSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.data.gov.in/resource".to_string(),
            resource_id: "3b01bcb8-0b14-4abf-b6f2-c1bfd384ba69".to_string(),
            api_key: String::new(),
            limit: 100,
            co_unit: ConcentrationUnit::MilligramsPerCubicMetre,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WaqiSettings {
    pub base_url: String,
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for WaqiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.waqi.info".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdvisorySettings {
    #[serde(default)]
    pub fallback: Option<Vec<String>>,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Load `config/advisor.{toml,...}` (optional) overlaid with `ADVISOR__*`
/// environment variables, e.g. `ADVISOR__DATA_GOV__API_KEY`.
pub fn load_advisor_config() -> anyhow::Result<AdvisorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/advisor").required(false))
        .add_source(
            config::Environment::with_prefix("ADVISOR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

impl AdvisorConfig {
    /// Build the classification tables once for the whole process.
    pub fn rules(&self) -> anyhow::Result<Rules> {
        let limits = GuidelineTable::with_overrides(&self.guidelines).context("invalid [guidelines] section")?;

        let mut advisories = AdvisoryBook::default();
        if let Some(fallback) = &self.advisories.fallback {
            advisories = advisories
                .with_fallback(fallback.clone())
                .context("invalid [advisories] section")?;
        }

        Ok(Rules {
            scale: AqiScale::new(self.palette.clone()),
            limits,
            advisories,
        })
    }
}
