//! # amlgen-core: experiment-configuration generation
//!
//! Builds the candidate experiments of a regression campaign. Leaf
//! generators enumerate technique/hyperparameter points; decorator
//! generators wrap them so that every candidate additionally runs
//! sequential feature selection (SFS), hyperparameter search (hyperopt),
//! or both jointly.
//!
//! ```text
//! campaign.toml ──> CampaignConfiguration ──> build_generator(seed)
//!                                                   │
//!                    RegressionInputs ──> generate(prefix, inputs)
//!                                                   │
//!                                  Vec<Box<dyn ExperimentConfiguration>>
//! ```
//!
//! Guarantees carried by every generator:
//! - output order mirrors the wrapped generator's order
//! - each configuration owns a private copy of the dataset
//! - the campaign configuration is shared read-only
//! - duplicating a generator seeds the clone from the original's stream

pub mod config;
pub mod configuration;
pub mod error;
pub mod generation;
pub mod inputs;
pub mod random;

// Re-exports
pub use config::{CampaignConfiguration, load_campaign};
pub use configuration::{
    ConfigurationSummary, ExperimentConfiguration, HyperoptExperimentConfiguration,
    HyperoptSfsExperimentConfiguration, SearchDimension, SfsExperimentConfiguration, Technique,
    TechniqueExperimentConfiguration,
};
pub use error::{AmlError, Result};
pub use generation::{
    ExpConfsGenerator, ExperimentConfigurations, HyperoptExpConfsGenerator,
    HyperoptSfsExpConfsGenerator, MultiTechniquesExpConfsGenerator, RepeatedExpConfsGenerator,
    SfsExpConfsGenerator, TechniqueExpConfsGenerator, build_generator,
};
pub use inputs::RegressionInputs;
pub use random::RandomStream;
