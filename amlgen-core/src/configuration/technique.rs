//! Base experiment configuration: one technique with one hyperparameter point.

use super::{ExperimentConfiguration, Hyperparameters, Technique, render_value};
use crate::config::CampaignConfiguration;
use crate::error::{AmlError, Result};
use crate::inputs::RegressionInputs;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TechniqueExperimentConfiguration {
    technique: Technique,
    hyperparameters: Hyperparameters,
    campaign: Arc<CampaignConfiguration>,
    inputs: RegressionInputs,
    prefix: Vec<String>,
    signature: Vec<String>,
}

impl TechniqueExperimentConfiguration {
    /// `prefix` must not be empty: it is the root of the signature.
    pub fn new(
        campaign: Arc<CampaignConfiguration>,
        technique: Technique,
        hyperparameters: Hyperparameters,
        inputs: RegressionInputs,
        prefix: &[String],
    ) -> Result<Self> {
        if prefix.is_empty() {
            return Err(AmlError::invalid_input(format!(
                "{technique} configuration requires a non-empty prefix"
            )));
        }
        let signature = compute_signature(prefix, &hyperparameters);
        Ok(Self {
            technique,
            hyperparameters,
            campaign,
            inputs,
            prefix: prefix.to_vec(),
            signature,
        })
    }
}

fn compute_signature(prefix: &[String], hyperparameters: &Hyperparameters) -> Vec<String> {
    let mut signature = prefix.to_vec();
    signature.extend(
        hyperparameters
            .iter()
            .map(|(name, value)| format!("{name}{}", render_value(value))),
    );
    signature
}

impl ExperimentConfiguration for TechniqueExperimentConfiguration {
    fn technique(&self) -> Technique {
        self.technique
    }

    fn prefix(&self) -> &[String] {
        &self.prefix
    }

    fn signature(&self) -> &[String] {
        &self.signature
    }

    fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    fn regression_inputs(&self) -> &RegressionInputs {
        &self.inputs
    }

    fn regression_inputs_mut(&mut self) -> &mut RegressionInputs {
        &mut self.inputs
    }

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration> {
        &self.campaign
    }
}
