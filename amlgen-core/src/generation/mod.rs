//! Experiment-configuration generators.
//!
//! Every generator implements [`ExpConfsGenerator`]. Leaf generators build
//! base configurations from a hyperparameter grid; structural generators
//! combine or repeat other generators; decorators wrap one inner generator
//! and re-wrap each configuration it produces:
//!
//! ```text
//! Repeated(run_num)
//!   └── MultiTechniques
//!         ├── Sfs(Technique(LRRidge))
//!         └── HyperoptSfs(Technique(XGBoost))
//! ```
//!
//! Generators own their children; nothing mutable is shared between them.
//! The campaign configuration is shared read-only through an `Arc`.

pub mod decorators;
pub mod factory;
pub mod multi;
pub mod repeated;
pub mod technique;

pub use decorators::{
    Decoration, DecoratingGenerator, HyperoptDecoration, HyperoptExpConfsGenerator,
    HyperoptSfsDecoration, HyperoptSfsExpConfsGenerator, SfsDecoration, SfsExpConfsGenerator,
};
pub use factory::build_generator;
pub use multi::MultiTechniquesExpConfsGenerator;
pub use repeated::RepeatedExpConfsGenerator;
pub use technique::TechniqueExpConfsGenerator;

use crate::config::CampaignConfiguration;
use crate::configuration::ExperimentConfiguration;
use crate::error::Result;
use crate::inputs::RegressionInputs;
use std::fmt;
use std::sync::Arc;

/// Ordered output of a generator.
pub type ExperimentConfigurations = Vec<Box<dyn ExperimentConfiguration>>;

/// Produces an ordered sequence of experiment configurations.
pub trait ExpConfsGenerator: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Generate the configurations for `inputs`, identified under `prefix`.
    ///
    /// The output order is part of each experiment's identity and must be
    /// stable. `inputs` is never modified; every configuration gets its
    /// own copy.
    fn generate(
        &self,
        prefix: &[String],
        inputs: &RegressionInputs,
    ) -> Result<ExperimentConfigurations>;

    /// Produce an independent clone of this generator tree. The clone is
    /// seeded with one draw from this generator's random stream, which is
    /// therefore advanced.
    fn duplicate(&mut self) -> Result<Box<dyn ExpConfsGenerator>>;

    /// Seed this generator was created with.
    fn seed(&self) -> u64;

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration>;

    /// The generator a decorator wraps, if any.
    fn inner(&self) -> Option<&dyn ExpConfsGenerator> {
        None
    }
}
