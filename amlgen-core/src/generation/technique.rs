//! Leaf generator: every point of one technique's hyperparameter grid.

use super::{ExpConfsGenerator, ExperimentConfigurations};
use crate::config::CampaignConfiguration;
use crate::configuration::{
    ExperimentConfiguration, Hyperparameters, Technique, TechniqueExperimentConfiguration,
};
use crate::error::{AmlError, Result};
use crate::inputs::RegressionInputs;
use crate::random::RandomStream;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Candidate values per hyperparameter.
pub type HyperparameterGrid = BTreeMap<String, Vec<serde_json::Value>>;

#[derive(Debug)]
pub struct TechniqueExpConfsGenerator {
    name: String,
    technique: Technique,
    grid: HyperparameterGrid,
    campaign: Arc<CampaignConfiguration>,
    stream: RandomStream,
}

impl TechniqueExpConfsGenerator {
    /// Build the grid from the technique's campaign section. Each key maps
    /// to a list of candidates (a scalar is a single candidate, so list
    /// valued hyperparameters are written as lists of lists). Keys missing
    /// from the section keep their default value.
    pub fn new(
        campaign: Arc<CampaignConfiguration>,
        technique: Technique,
        seed: u64,
    ) -> Result<Self> {
        let mut grid: HyperparameterGrid = technique
            .default_parameters()
            .into_iter()
            .map(|(name, value)| (name, vec![value]))
            .collect();

        if let Some(section) = campaign.section(technique.section()) {
            for (name, value) in section {
                let candidates = match serde_json::to_value(value)? {
                    serde_json::Value::Array(items) => items,
                    scalar => vec![scalar],
                };
                grid.insert(name.clone(), candidates);
            }
        }

        Self::with_grid(campaign, technique, grid, seed)
    }

    pub fn with_grid(
        campaign: Arc<CampaignConfiguration>,
        technique: Technique,
        grid: HyperparameterGrid,
        seed: u64,
    ) -> Result<Self> {
        if let Some((name, _)) = grid.iter().find(|(_, candidates)| candidates.is_empty()) {
            return Err(AmlError::configuration(format!(
                "{technique}: no candidate values for '{name}'"
            )));
        }
        Ok(Self {
            name: format!("TechniqueExpConfsGenerator({technique})"),
            technique,
            grid,
            campaign,
            stream: RandomStream::new(seed),
        })
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn grid(&self) -> &HyperparameterGrid {
        &self.grid
    }

    /// Cartesian product of the grid; the last key varies fastest.
    pub fn points(&self) -> Vec<Hyperparameters> {
        let mut points = vec![Hyperparameters::new()];
        for (key, values) in &self.grid {
            let mut expanded = Vec::with_capacity(points.len() * values.len());
            for point in &points {
                for value in values {
                    let mut p = point.clone();
                    p.insert(key.clone(), value.clone());
                    expanded.push(p);
                }
            }
            points = expanded;
        }
        points
    }
}

impl ExpConfsGenerator for TechniqueExpConfsGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(
        &self,
        prefix: &[String],
        inputs: &RegressionInputs,
    ) -> Result<ExperimentConfigurations> {
        info!("-->Generating experiments by {}", self.name);
        let mut technique_prefix = prefix.to_vec();
        technique_prefix.push(self.technique.campaign_name().to_string());

        let mut configurations: ExperimentConfigurations = Vec::new();
        for point in self.points() {
            let conf = TechniqueExperimentConfiguration::new(
                Arc::clone(&self.campaign),
                self.technique,
                point,
                inputs.clone(),
                &technique_prefix,
            )?;
            debug!(signature = %conf.signature_string(), "Built base configuration");
            configurations.push(Box::new(conf));
        }
        info!("<--");
        Ok(configurations)
    }

    fn duplicate(&mut self) -> Result<Box<dyn ExpConfsGenerator>> {
        let seed = self.stream.next_seed();
        debug!(generator = %self.name, seed, "Duplicating generator");
        Ok(Box::new(Self {
            name: self.name.clone(),
            technique: self.technique,
            grid: self.grid.clone(),
            campaign: Arc::clone(&self.campaign),
            stream: RandomStream::new(seed),
        }))
    }

    fn seed(&self) -> u64 {
        self.stream.seed()
    }

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration> {
        &self.campaign
    }
}
