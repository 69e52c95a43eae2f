//! Repeats an exploration over independent copies of a generator.

use super::{ExpConfsGenerator, ExperimentConfigurations};
use crate::config::CampaignConfiguration;
use crate::error::{AmlError, Result};
use crate::inputs::RegressionInputs;
use crate::random::RandomStream;
use std::sync::Arc;
use tracing::{debug, info};

/// Holds one duplicate of the wrapped generator per run. Run `i` generates
/// under `prefix + ["run_i"]`.
#[derive(Debug)]
pub struct RepeatedExpConfsGenerator {
    runs: Vec<Box<dyn ExpConfsGenerator>>,
    campaign: Arc<CampaignConfiguration>,
    stream: RandomStream,
}

impl RepeatedExpConfsGenerator {
    pub fn new(
        mut wrapped: Box<dyn ExpConfsGenerator>,
        campaign: Arc<CampaignConfiguration>,
        seed: u64,
        repetitions: usize,
    ) -> Result<Self> {
        if repetitions == 0 {
            return Err(AmlError::configuration("run_num must be at least 1"));
        }
        let runs = (0..repetitions)
            .map(|_| wrapped.duplicate())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            runs,
            campaign,
            stream: RandomStream::new(seed),
        })
    }

    pub fn repetitions(&self) -> usize {
        self.runs.len()
    }

    pub fn runs(&self) -> &[Box<dyn ExpConfsGenerator>] {
        &self.runs
    }
}

impl ExpConfsGenerator for RepeatedExpConfsGenerator {
    fn name(&self) -> &str {
        "RepeatedExpConfsGenerator"
    }

    fn generate(
        &self,
        prefix: &[String],
        inputs: &RegressionInputs,
    ) -> Result<ExperimentConfigurations> {
        info!("-->Generating experiments by {}", self.name());
        let mut configurations = Vec::new();
        for (run, generator) in self.runs.iter().enumerate() {
            let mut run_prefix = prefix.to_vec();
            run_prefix.push(format!("run_{run}"));
            configurations.extend(generator.generate(&run_prefix, inputs)?);
        }
        info!("<--");
        Ok(configurations)
    }

    fn duplicate(&mut self) -> Result<Box<dyn ExpConfsGenerator>> {
        let runs = self
            .runs
            .iter_mut()
            .map(|g| g.duplicate())
            .collect::<Result<Vec<_>>>()?;
        let seed = self.stream.next_seed();
        debug!(generator = self.name(), seed, "Duplicating generator");
        Ok(Box::new(Self {
            runs,
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
