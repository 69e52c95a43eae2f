//! Builds the generator tree described by a campaign configuration.

use super::{
    ExpConfsGenerator, HyperoptExpConfsGenerator, HyperoptSfsExpConfsGenerator,
    MultiTechniquesExpConfsGenerator, RepeatedExpConfsGenerator, SfsExpConfsGenerator,
    TechniqueExpConfsGenerator,
};
use crate::config::CampaignConfiguration;
use crate::configuration::Technique;
use crate::error::{AmlError, Result};
use crate::random::RandomStream;
use std::sync::Arc;
use tracing::info;

/// Build `Repeated(MultiTechniques([decorated(Technique(t)) for t in techniques]))`.
///
/// Each technique generator is wrapped according to
/// `[general].hyperparameter_tuning` and `[feature_selection].method`:
/// both set gives the joint decorator, otherwise the single one that is
/// set, otherwise none. Every seed in the tree is drawn from a stream
/// seeded with `seed`.
pub fn build_generator(
    campaign: Arc<CampaignConfiguration>,
    seed: u64,
) -> Result<Box<dyn ExpConfsGenerator>> {
    let general = campaign.general()?;
    let feature_selection = campaign.feature_selection()?;

    let hyperopt = match general.hyperparameter_tuning.as_deref() {
        None => false,
        Some(m) if m.eq_ignore_ascii_case("hyperopt") => true,
        Some(other) => {
            return Err(AmlError::configuration(format!(
                "unknown hyperparameter tuning method '{other}'"
            )));
        }
    };
    let sfs = match feature_selection.method.as_deref() {
        None => false,
        Some(m) if m.eq_ignore_ascii_case("sfs") => true,
        Some(other) => {
            return Err(AmlError::configuration(format!(
                "unknown feature selection method '{other}'"
            )));
        }
    };

    if general.techniques.is_empty() {
        return Err(AmlError::configuration("no techniques selected"));
    }

    let mut stream = RandomStream::new(seed);
    let mut generators: Vec<Box<dyn ExpConfsGenerator>> = Vec::new();
    for name in &general.techniques {
        let technique: Technique = name.parse()?;
        let leaf: Box<dyn ExpConfsGenerator> = Box::new(TechniqueExpConfsGenerator::new(
            Arc::clone(&campaign),
            technique,
            stream.next_seed(),
        )?);
        let generator: Box<dyn ExpConfsGenerator> = match (hyperopt, sfs) {
            (true, true) => Box::new(HyperoptSfsExpConfsGenerator::new(
                leaf,
                Arc::clone(&campaign),
                stream.next_seed(),
            )),
            (false, true) => Box::new(SfsExpConfsGenerator::new(
                leaf,
                Arc::clone(&campaign),
                stream.next_seed(),
            )),
            (true, false) => Box::new(HyperoptExpConfsGenerator::new(
                leaf,
                Arc::clone(&campaign),
                stream.next_seed(),
            )),
            (false, false) => leaf,
        };
        generators.push(generator);
    }

    let multi = Box::new(MultiTechniquesExpConfsGenerator::new(
        generators,
        Arc::clone(&campaign),
        stream.next_seed(),
    ));
    let repeated = RepeatedExpConfsGenerator::new(
        multi,
        Arc::clone(&campaign),
        stream.next_seed(),
        general.run_num,
    )?;

    info!(
        techniques = general.techniques.len(),
        hyperopt,
        sfs,
        runs = general.run_num,
        "Built generator tree"
    );
    Ok(Box::new(repeated))
}
