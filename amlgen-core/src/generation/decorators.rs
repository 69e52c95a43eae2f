//! Decorator generators: feature selection, hyperparameter search, or both.
//!
//! A decorator owns exactly one inner generator. `generate` delegates to it
//! and maps every base configuration, in order, to a decorated
//! configuration holding a fresh copy of the dataset. The three decorators
//! differ only in the [`Decoration`] they apply.

use super::{ExpConfsGenerator, ExperimentConfigurations};
use crate::config::CampaignConfiguration;
use crate::configuration::{
    ExperimentConfiguration, HyperoptExperimentConfiguration, HyperoptSfsExperimentConfiguration,
    SfsExperimentConfiguration,
};
use crate::error::Result;
use crate::inputs::RegressionInputs;
use crate::random::RandomStream;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

/// How a decorator re-wraps each configuration of its inner generator.
pub trait Decoration: fmt::Debug + Send + Sync + 'static {
    /// Name of the decorating generator, used in logs.
    const GENERATOR_NAME: &'static str;

    fn decorate(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
    ) -> Result<Box<dyn ExperimentConfiguration>>;
}

/// Sequential feature selection.
#[derive(Debug, Clone, Copy)]
pub struct SfsDecoration;

impl Decoration for SfsDecoration {
    const GENERATOR_NAME: &'static str = "SfsExpConfsGenerator";

    fn decorate(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
    ) -> Result<Box<dyn ExperimentConfiguration>> {
        Ok(Box::new(SfsExperimentConfiguration::new(
            campaign, inputs, prefix, wrapped,
        )?))
    }
}

/// Hyperparameter search.
#[derive(Debug, Clone, Copy)]
pub struct HyperoptDecoration;

impl Decoration for HyperoptDecoration {
    const GENERATOR_NAME: &'static str = "HyperoptExpConfsGenerator";

    fn decorate(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
    ) -> Result<Box<dyn ExperimentConfiguration>> {
        Ok(Box::new(HyperoptExperimentConfiguration::new(
            campaign, inputs, prefix, wrapped,
        )?))
    }
}

/// Joint hyperparameter search and feature selection in one configuration.
#[derive(Debug, Clone, Copy)]
pub struct HyperoptSfsDecoration;

impl Decoration for HyperoptSfsDecoration {
    const GENERATOR_NAME: &'static str = "HyperoptSfsExpConfsGenerator";

    fn decorate(
        campaign: Arc<CampaignConfiguration>,
        inputs: RegressionInputs,
        prefix: &[String],
        wrapped: Box<dyn ExperimentConfiguration>,
    ) -> Result<Box<dyn ExperimentConfiguration>> {
        Ok(Box::new(HyperoptSfsExperimentConfiguration::new(
            campaign, inputs, prefix, wrapped,
        )?))
    }
}

/// Wraps a generator and decorates each configuration it produces with `D`.
pub struct DecoratingGenerator<D: Decoration> {
    wrapped: Box<dyn ExpConfsGenerator>,
    campaign: Arc<CampaignConfiguration>,
    stream: RandomStream,
    _decoration: PhantomData<fn() -> D>,
}

/// Applies sequential feature selection to every inner configuration.
pub type SfsExpConfsGenerator = DecoratingGenerator<SfsDecoration>;
/// Applies hyperparameter search to every inner configuration.
pub type HyperoptExpConfsGenerator = DecoratingGenerator<HyperoptDecoration>;
/// Applies joint hyperparameter search and feature selection to every inner
/// configuration. Not the same as nesting the two decorators above.
pub type HyperoptSfsExpConfsGenerator = DecoratingGenerator<HyperoptSfsDecoration>;

impl<D: Decoration> DecoratingGenerator<D> {
    pub fn new(
        wrapped: Box<dyn ExpConfsGenerator>,
        campaign: Arc<CampaignConfiguration>,
        seed: u64,
    ) -> Self {
        Self {
            wrapped,
            campaign,
            stream: RandomStream::new(seed),
            _decoration: PhantomData,
        }
    }

    pub fn wrapped(&self) -> &dyn ExpConfsGenerator {
        self.wrapped.as_ref()
    }
}

impl<D: Decoration> fmt::Debug for DecoratingGenerator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(D::GENERATOR_NAME)
            .field("wrapped", &self.wrapped)
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}

impl<D: Decoration> ExpConfsGenerator for DecoratingGenerator<D> {
    fn name(&self) -> &str {
        D::GENERATOR_NAME
    }

    fn generate(
        &self,
        prefix: &[String],
        inputs: &RegressionInputs,
    ) -> Result<ExperimentConfigurations> {
        info!("-->Generating experiments by {}", D::GENERATOR_NAME);
        let internal = self.wrapped.generate(prefix, inputs)?;

        let mut configurations: ExperimentConfigurations = Vec::with_capacity(internal.len());
        for wrapped_point in internal {
            let conf = D::decorate(
                Arc::clone(&self.campaign),
                inputs.clone(),
                prefix,
                wrapped_point,
            )?;
            debug!(signature = %conf.signature_string(), "Decorated configuration");
            configurations.push(conf);
        }
        info!("<--");
        Ok(configurations)
    }

    fn duplicate(&mut self) -> Result<Box<dyn ExpConfsGenerator>> {
        let wrapped = self.wrapped.duplicate()?;
        let seed = self.stream.next_seed();
        debug!(generator = D::GENERATOR_NAME, seed, "Duplicating generator");
        Ok(Box::new(Self::new(wrapped, Arc::clone(&self.campaign), seed)))
    }

    fn seed(&self) -> u64 {
        self.stream.seed()
    }

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration> {
        &self.campaign
    }

    fn inner(&self) -> Option<&dyn ExpConfsGenerator> {
        Some(self.wrapped.as_ref())
    }
}
