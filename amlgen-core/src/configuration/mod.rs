//! Experiment configurations: one fully specified candidate each.
//!
//! A [`TechniqueExperimentConfiguration`] is a base point (technique plus
//! hyperparameters). The decorated configurations in [`decorated`] wrap
//! a base point and layer feature selection and/or hyperparameter search
//! settings on top of it.

pub mod decorated;
pub mod technique;

pub use decorated::{
    HyperoptExperimentConfiguration, HyperoptSettings, HyperoptSfsExperimentConfiguration,
    SfsExperimentConfiguration, SfsSettings,
};
pub use technique::TechniqueExperimentConfiguration;

use crate::config::CampaignConfiguration;
use crate::error::AmlError;
use crate::inputs::RegressionInputs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Hyperparameter name to value, iterated in name order.
pub type Hyperparameters = BTreeMap<String, serde_json::Value>;

/// Regression techniques understood by the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Technique {
    LrRidge,
    DecisionTree,
    RandomForest,
    XGBoost,
    Svr,
    NeuralNetwork,
}

impl Technique {
    pub const ALL: [Technique; 6] = [
        Technique::LrRidge,
        Technique::DecisionTree,
        Technique::RandomForest,
        Technique::XGBoost,
        Technique::Svr,
        Technique::NeuralNetwork,
    ];

    /// Name used in campaign files and signatures.
    pub fn campaign_name(&self) -> &'static str {
        match self {
            Self::LrRidge => "LRRidge",
            Self::DecisionTree => "DecisionTree",
            Self::RandomForest => "RandomForest",
            Self::XGBoost => "XGBoost",
            Self::Svr => "SVR",
            Self::NeuralNetwork => "NeuralNetwork",
        }
    }

    /// Campaign section holding this technique's hyperparameter grid.
    pub fn section(&self) -> &'static str {
        match self {
            Self::LrRidge => "lr_ridge",
            Self::DecisionTree => "decision_tree",
            Self::RandomForest => "random_forest",
            Self::XGBoost => "xgboost",
            Self::Svr => "svr",
            Self::NeuralNetwork => "neural_network",
        }
    }

    /// Hyperparameters used when the campaign does not set them.
    pub fn default_parameters(&self) -> Hyperparameters {
        let value = match self {
            Self::LrRidge => serde_json::json!({ "alpha": 1.0 }),
            Self::DecisionTree => serde_json::json!({
                "max_depth": 3,
                "min_samples_split": 2,
                "min_samples_leaf": 1,
            }),
            Self::RandomForest => serde_json::json!({
                "n_estimators": 10,
                "max_depth": 3,
                "min_samples_split": 2,
                "min_samples_leaf": 1,
            }),
            Self::XGBoost => serde_json::json!({
                "min_child_weight": 1,
                "gamma": 0.0,
                "n_estimators": 100,
                "learning_rate": 0.1,
                "max_depth": 3,
            }),
            Self::Svr => serde_json::json!({
                "C": 1.0,
                "epsilon": 0.1,
                "gamma": "scale",
                "kernel": "rbf",
                "degree": 3,
            }),
            Self::NeuralNetwork => serde_json::json!({
                "n_features": [20, 10],
                "dropouts": [0.2, 0.2],
                "activation": "relu",
                "optimizer": "adam",
                "learning_rate": 0.001,
                "loss": "mse",
                "batch_size": 10,
                "epochs": 5,
            }),
        };
        match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => Hyperparameters::new(),
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.campaign_name())
    }
}

impl FromStr for Technique {
    type Err = AmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.campaign_name().eq_ignore_ascii_case(s) || t.section() == s)
            .ok_or_else(|| AmlError::configuration(format!("unknown technique '{s}'")))
    }
}

/// A dimension explored by the (external) search attached to a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDimension {
    FeatureSubset,
    Hyperparameters,
}

/// A candidate experiment, ready for downstream evaluation.
pub trait ExperimentConfiguration: fmt::Debug + Send + Sync {
    fn technique(&self) -> Technique;

    /// Naming prefix this configuration was generated under.
    fn prefix(&self) -> &[String];

    /// Univocal identifier of the experiment.
    fn signature(&self) -> &[String];

    fn hyperparameters(&self) -> &Hyperparameters;

    /// The dataset this configuration exclusively owns.
    fn regression_inputs(&self) -> &RegressionInputs;

    fn regression_inputs_mut(&mut self) -> &mut RegressionInputs;

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration>;

    fn search_dimensions(&self) -> Vec<SearchDimension> {
        Vec::new()
    }

    /// The inner point a decorated configuration delegates to.
    fn wrapped(&self) -> Option<&dyn ExperimentConfiguration> {
        None
    }

    fn signature_string(&self) -> String {
        self.signature().join("_")
    }

    fn summary(&self) -> ConfigurationSummary {
        ConfigurationSummary {
            signature: self.signature_string(),
            technique: self.technique(),
            prefix: self.prefix().to_vec(),
            hyperparameters: self.hyperparameters().clone(),
            search_dimensions: self.search_dimensions(),
            x_columns: self.regression_inputs().x_columns().to_vec(),
        }
    }
}

/// Serializable view of a configuration, as emitted by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSummary {
    pub signature: String,
    pub technique: Technique,
    pub prefix: Vec<String>,
    pub hyperparameters: Hyperparameters,
    pub search_dimensions: Vec<SearchDimension>,
    pub x_columns: Vec<String>,
}

/// Render a hyperparameter value as a signature token fragment; list
/// values are concatenated.
pub fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items.iter().map(render_value).collect(),
        serde_json::Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technique_round_trip_names() {
        for technique in Technique::ALL {
            assert_eq!(
                technique.campaign_name().parse::<Technique>().unwrap(),
                technique
            );
            assert_eq!(technique.section().parse::<Technique>().unwrap(), technique);
        }
        assert!("Perceptron".parse::<Technique>().is_err());
    }

    #[test]
    fn test_neural_network_defaults() {
        let params = Technique::NeuralNetwork.default_parameters();
        assert_eq!(params["n_features"], serde_json::json!([20, 10]));
        assert_eq!(params["learning_rate"], serde_json::json!(0.001));
        assert_eq!(params["epochs"], serde_json::json!(5));
        assert_eq!(params.len(), 8);
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&serde_json::json!("relu")), "relu");
        assert_eq!(render_value(&serde_json::json!([20, 10])), "2010");
        assert_eq!(render_value(&serde_json::json!(0.001)), "0.001");
        assert_eq!(render_value(&serde_json::json!(true)), "true");
        assert_eq!(render_value(&serde_json::Value::Null), "None");
    }
}
