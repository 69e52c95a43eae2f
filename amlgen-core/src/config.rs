//! Campaign configuration.
//!
//! A campaign file is a TOML document made of sections (`[general]`,
//! `[feature_selection]`, `[data_preparation]`, one section per regression
//! technique) mapping option names to values. Loading uses `figment`:
//! campaign file -> environment (`AMLGEN_GENERAL__RUN_NUM=3`, ...).
//!
//! The loaded [`CampaignConfiguration`] is immutable and is shared by
//! `Arc` across every generator and experiment configuration of a run.

use crate::error::{AmlError, Result};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Section holding options shared by the whole campaign.
pub const GENERAL_SECTION: &str = "general";
/// Section holding the feature-selection options.
pub const FEATURE_SELECTION_SECTION: &str = "feature_selection";
/// Section describing the input dataset.
pub const DATA_PREPARATION_SECTION: &str = "data_preparation";

/// User-supplied campaign options, grouped by section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignConfiguration {
    sections: BTreeMap<String, toml::Table>,
}

impl CampaignConfiguration {
    pub fn new(sections: BTreeMap<String, toml::Table>) -> Self {
        Self { sections }
    }

    /// Parse a campaign from TOML text, without environment overrides.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn section(&self, name: &str) -> Option<&toml::Table> {
        self.sections.get(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&toml::Value> {
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Deserialize a section into a typed view. A missing section is
    /// treated as empty so that serde defaults apply.
    pub fn section_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let table = self.section(name).cloned().unwrap_or_default();
        toml::Value::Table(table).try_into().map_err(|e| {
            AmlError::configuration(format!("invalid [{name}] section: {e}"))
        })
    }

    pub fn general(&self) -> Result<GeneralSettings> {
        self.section_as(GENERAL_SECTION)
    }

    pub fn feature_selection(&self) -> Result<FeatureSelectionSettings> {
        self.section_as(FEATURE_SELECTION_SECTION)
    }

    pub fn data_preparation(&self) -> Result<DataPreparationSettings> {
        self.section_as(DATA_PREPARATION_SECTION)
    }
}

/// `[general]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Regression techniques to explore, by campaign name (`LRRidge`, ...).
    #[serde(default)]
    pub techniques: Vec<String>,
    /// Hyperparameter tuning method; only `Hyperopt` is understood.
    #[serde(default)]
    pub hyperparameter_tuning: Option<String>,
    /// Number of independent repetitions of the whole exploration.
    #[serde(default = "default_run_num")]
    pub run_num: usize,
    /// Seed of the generator tree.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Maximum number of hyperopt evaluations per configuration.
    #[serde(default = "default_hyperopt_max_evals")]
    pub hyperopt_max_evals: usize,
    /// Evaluations between hyperopt checkpoints (0 disables them).
    #[serde(default)]
    pub hyperopt_save_interval: usize,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            techniques: Vec::new(),
            hyperparameter_tuning: None,
            run_num: default_run_num(),
            seed: None,
            hyperopt_max_evals: default_hyperopt_max_evals(),
            hyperopt_save_interval: 0,
        }
    }
}

fn default_run_num() -> usize {
    1
}

fn default_hyperopt_max_evals() -> usize {
    10
}

/// `[feature_selection]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSelectionSettings {
    /// Feature selection method; only `SFS` is understood.
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default = "default_min_features")]
    pub min_features: usize,
    /// Upper bound on the selected subset; defaults to every feature.
    #[serde(default)]
    pub max_features: Option<usize>,
    #[serde(default = "default_folds")]
    pub folds: usize,
}

impl Default for FeatureSelectionSettings {
    fn default() -> Self {
        Self {
            method: None,
            min_features: default_min_features(),
            max_features: None,
            folds: default_folds(),
        }
    }
}

fn default_min_features() -> usize {
    1
}

fn default_folds() -> usize {
    5
}

/// `[data_preparation]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPreparationSettings {
    #[serde(default)]
    pub input_path: Option<PathBuf>,
    /// Target column.
    #[serde(default)]
    pub y: Option<String>,
    /// Feature columns; every other column when absent.
    #[serde(default)]
    pub x_columns: Option<Vec<String>>,
}

/// Load a campaign file, layering `AMLGEN_`-prefixed environment variables
/// on top of it. Only `AMLGEN_<SECTION>__<KEY>` variables are read; a
/// variable without a section (`AMLGEN_SEED`) is ignored.
pub fn load_campaign(path: &Path) -> Result<CampaignConfiguration> {
    if !path.exists() {
        return Err(AmlError::not_found(format!(
            "campaign file {}",
            path.display()
        )));
    }

    let figment = Figment::new()
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("AMLGEN_")
                .split("__")
                .filter(|key| key.as_str().contains('.')),
        );

    let campaign: CampaignConfiguration = figment.extract()?;
    tracing::debug!(
        path = %path.display(),
        sections = campaign.sections.len(),
        "Loaded campaign configuration"
    );
    Ok(campaign)
}
