//! Composite generator concatenating the output of several generators.

use super::{ExpConfsGenerator, ExperimentConfigurations};
use crate::config::CampaignConfiguration;
use crate::error::Result;
use crate::inputs::RegressionInputs;
use crate::random::RandomStream;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs each child in insertion order and concatenates their output,
/// typically one child per regression technique.
#[derive(Debug)]
pub struct MultiTechniquesExpConfsGenerator {
    generators: Vec<Box<dyn ExpConfsGenerator>>,
    campaign: Arc<CampaignConfiguration>,
    stream: RandomStream,
}

impl MultiTechniquesExpConfsGenerator {
    pub fn new(
        generators: Vec<Box<dyn ExpConfsGenerator>>,
        campaign: Arc<CampaignConfiguration>,
        seed: u64,
    ) -> Self {
        Self {
            generators,
            campaign,
            stream: RandomStream::new(seed),
        }
    }

    pub fn generators(&self) -> &[Box<dyn ExpConfsGenerator>] {
        &self.generators
    }
}

impl ExpConfsGenerator for MultiTechniquesExpConfsGenerator {
    fn name(&self) -> &str {
        "MultiTechniquesExpConfsGenerator"
    }

    fn generate(
        &self,
        prefix: &[String],
        inputs: &RegressionInputs,
    ) -> Result<ExperimentConfigurations> {
        info!("-->Generating experiments by {}", self.name());
        let mut configurations = Vec::new();
        for generator in &self.generators {
            configurations.extend(generator.generate(prefix, inputs)?);
        }
        info!("<--");
        Ok(configurations)
    }

    fn duplicate(&mut self) -> Result<Box<dyn ExpConfsGenerator>> {
        let generators = self
            .generators
            .iter_mut()
            .map(|g| g.duplicate())
            .collect::<Result<Vec<_>>>()?;
        let seed = self.stream.next_seed();
        debug!(generator = self.name(), seed, "Duplicating generator");
        Ok(Box::new(Self::new(
            generators,
            Arc::clone(&self.campaign),
            seed,
        )))
    }

    fn seed(&self) -> u64 {
        self.stream.seed()
    }

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration> {
        &self.campaign
    }
}
