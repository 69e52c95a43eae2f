//! Decorated experiment configurations.
//!
//! Each type wraps a base point and records the search it layers on top:
//! - [`SfsExperimentConfiguration`]: sequential feature selection
//! - [`HyperoptExperimentConfiguration`]: hyperparameter search
//! - [`HyperoptSfsExperimentConfiguration`]: both, explored jointly
//!
//! The searches themselves run elsewhere; these types only carry validated
//! settings, the search dimensions, and a private copy of the dataset the
//! search is free to mutate.

use super::{ExperimentConfiguration, Hyperparameters, SearchDimension, Technique};
use crate::config::CampaignConfiguration;
use crate::error::{AmlError, Result};
use crate::inputs::RegressionInputs;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Validated sequential feature selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfsSettings {
    pub min_features: usize,
    pub max_features: usize,
    pub folds: usize,
}

impl SfsSettings {
    /// Read `[feature_selection]`; the feature bounds are checked against
    /// the columns of `inputs`.
    pub fn from_campaign(
        campaign: &CampaignConfiguration,
        inputs: &RegressionInputs,
    ) -> Result<Self> {
        let section = campaign.feature_selection()?;
        let available = inputs.x_columns().len();
        let settings = Self {
            min_features: section.min_features,
            max_features: section.max_features.unwrap_or(available),
            folds: section.folds,
        };

        if settings.min_features == 0 {
            return Err(AmlError::configuration("min_features must be at least 1"));
        }
        if settings.min_features > settings.max_features {
            return Err(AmlError::configuration(format!(
                "min_features ({}) exceeds max_features ({})",
                settings.min_features, settings.max_features
            )));
        }
        if settings.max_features > available {
            return Err(AmlError::configuration(format!(
                "max_features ({}) exceeds the {available} available features",
                settings.max_features
            )));
        }
        if settings.folds < 2 {
            return Err(AmlError::configuration("folds must be at least 2"));
        }
        Ok(settings)
    }
}

/// Validated hyperparameter search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperoptSettings {
    pub max_evals: usize,
    /// 0 disables intermediate checkpoints.
    pub save_interval: usize,
}

impl HyperoptSettings {
    pub fn from_campaign(campaign: &CampaignConfiguration) -> Result<Self> {
        let general = campaign.general()?;
        if general.hyperopt_max_evals == 0 {
            return Err(AmlError::configuration(
                "hyperopt_max_evals must be at least 1",
            ));
        }
        Ok(Self {
            max_evals: general.hyperopt_max_evals,
            save_interval: general.hyperopt_save_interval,
        })
    }
}

/// State shared by every decorated configuration.
#[derive(Debug)]
struct DecoratedPoint {
    campaign: Arc<CampaignConfiguration>,
    inputs: RegressionInputs,
    prefix: Vec<String>,
    signature: Vec<String>,
    wrapped: Box<dyn ExperimentConfiguration>,
}

impl DecoratedPoint {
    fn new(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
        marker: &str,
    ) -> Self {
        let mut signature = wrapped.signature().to_vec();
        signature.push(marker.to_string());
        Self {
            campaign,
            inputs,
            prefix: prefix.to_vec(),
            signature,
            wrapped,
        }
    }
}

macro_rules! delegate_experiment_configuration {
    ($ty:ty, [$($dim:expr),*]) => {
        impl ExperimentConfiguration for $ty {
            fn technique(&self) -> Technique {
                self.point.wrapped.technique()
            }

            fn prefix(&self) -> &[String] {
                &self.point.prefix
            }

            fn signature(&self) -> &[String] {
                &self.point.signature
            }

            fn hyperparameters(&self) -> &Hyperparameters {
                self.point.wrapped.hyperparameters()
            }

            fn regression_inputs(&self) -> &RegressionInputs {
                &self.point.inputs
            }

            fn regression_inputs_mut(&mut self) -> &mut RegressionInputs {
                &mut self.point.inputs
            }

            fn campaign_configuration(&self) -> &Arc<CampaignConfiguration> {
                &self.point.campaign
            }

            fn search_dimensions(&self) -> Vec<SearchDimension> {
                vec![$($dim),*]
            }

            fn wrapped(&self) -> Option<&dyn ExperimentConfiguration> {
                Some(self.point.wrapped.as_ref())
            }
        }
    };
}

/// A base point with sequential feature selection layered on top.
#[derive(Debug)]
pub struct SfsExperimentConfiguration {
    point: DecoratedPoint,
    settings: SfsSettings,
}

impl SfsExperimentConfiguration {
    pub fn new(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
    ) -> Result<Self> {
        let settings = SfsSettings::from_campaign(&campaign, &inputs)?;
        Ok(Self {
            point: DecoratedPoint::new(campaign, inputs, prefix, wrapped, "sfs"),
            settings,
        })
    }

    pub fn settings(&self) -> &SfsSettings {
        &self.settings
    }
}

delegate_experiment_configuration!(SfsExperimentConfiguration, [SearchDimension::FeatureSubset]);

/// A base point whose hyperparameters are searched by hyperopt.
#[derive(Debug)]
pub struct HyperoptExperimentConfiguration {
    point: DecoratedPoint,
    settings: HyperoptSettings,
}

impl HyperoptExperimentConfiguration {
    pub fn new(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
    ) -> Result<Self> {
        let settings = HyperoptSettings::from_campaign(&campaign)?;
        Ok(Self {
            point: DecoratedPoint::new(campaign, inputs, prefix, wrapped, "hyperopt"),
            settings,
        })
    }

    pub fn settings(&self) -> &HyperoptSettings {
        &self.settings
    }
}

delegate_experiment_configuration!(
    HyperoptExperimentConfiguration,
    [SearchDimension::Hyperparameters]
);

/// A base point whose feature subset and hyperparameters are searched
/// jointly: each hyperopt evaluation runs its own feature selection.
///
/// Not equivalent to stacking an SFS decorator over a hyperopt one, which
/// fixes the hyperparameters before selecting features.
#[derive(Debug)]
pub struct HyperoptSfsExperimentConfiguration {
    point: DecoratedPoint,
    hyperopt: HyperoptSettings,
    sfs: SfsSettings,
}

impl HyperoptSfsExperimentConfiguration {
    pub fn new(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
    ) -> Result<Self> {
        let hyperopt = HyperoptSettings::from_campaign(&campaign)?;
        let sfs = SfsSettings::from_campaign(&campaign, &inputs)?;
        Ok(Self {
            point: DecoratedPoint::new(campaign, inputs, prefix, wrapped, "hyperoptsfs"),
            hyperopt,
            sfs,
        })
    }

    pub fn hyperopt_settings(&self) -> &HyperoptSettings {
        &self.hyperopt
    }

    pub fn sfs_settings(&self) -> &SfsSettings {
        &self.sfs
    }
}

delegate_experiment_configuration!(
    HyperoptSfsExperimentConfiguration,
    [SearchDimension::FeatureSubset, SearchDimension::Hyperparameters]
);
