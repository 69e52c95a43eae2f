//! End-to-end behaviour of the decorator generators.

use amlgen_core::configuration::Hyperparameters;
use amlgen_core::{
    AmlError, CampaignConfiguration, ExpConfsGenerator, ExperimentConfigurations,
    HyperoptExpConfsGenerator, HyperoptSfsExpConfsGenerator, RandomStream, RegressionInputs,
    SfsExpConfsGenerator, Technique, TechniqueExperimentConfiguration,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn dataset() -> RegressionInputs {
    RegressionInputs::from_csv_str("x1,x2,x3,y\n1,2,3,6\n2,3,4,9\n3,4,5,12\n", "y", None).unwrap()
}

fn root() -> Vec<String> {
    vec!["root".to_string()]
}

/// Generator returning one fixed base configuration per label, in order.
#[derive(Debug)]
struct FixedGenerator {
    labels: Vec<&'static str>,
    campaign: Arc<CampaignConfiguration>,
    stream: RandomStream,
}

impl FixedGenerator {
    fn boxed(
        labels: &[&'static str],
        campaign: &Arc<CampaignConfiguration>,
        seed: u64,
    ) -> Box<Self> {
        Box::new(Self {
            labels: labels.to_vec(),
            campaign: Arc::clone(campaign),
            stream: RandomStream::new(seed),
        })
    }
}

impl ExpConfsGenerator for FixedGenerator {
    fn name(&self) -> &str {
        "FixedGenerator"
    }

    fn generate(
        &self,
        prefix: &[String],
        inputs: &RegressionInputs,
    ) -> amlgen_core::Result<ExperimentConfigurations> {
        let mut out: ExperimentConfigurations = Vec::new();
        for label in &self.labels {
            let mut params = Hyperparameters::new();
            params.insert("point".into(), serde_json::json!(label));
            out.push(Box::new(TechniqueExperimentConfiguration::new(
                Arc::clone(&self.campaign),
                Technique::LrRidge,
                params,
                inputs.clone(),
                prefix,
            )?));
        }
        Ok(out)
    }

    fn duplicate(&mut self) -> amlgen_core::Result<Box<dyn ExpConfsGenerator>> {
        let seed = self.stream.next_seed();
        Ok(FixedGenerator::boxed(&self.labels, &self.campaign, seed))
    }

    fn seed(&self) -> u64 {
        self.stream.seed()
    }

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration> {
        &self.campaign
    }
}

/// Generator that always fails.
#[derive(Debug)]
struct FailingGenerator {
    campaign: Arc<CampaignConfiguration>,
}

impl ExpConfsGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "FailingGenerator"
    }

    fn generate(
        &self,
        _prefix: &[String],
        _inputs: &RegressionInputs,
    ) -> amlgen_core::Result<ExperimentConfigurations> {
        Err(AmlError::dataset("invalid dataset shape"))
    }

    fn duplicate(&mut self) -> amlgen_core::Result<Box<dyn ExpConfsGenerator>> {
        Err(AmlError::generation("cannot duplicate"))
    }

    fn seed(&self) -> u64 {
        0
    }

    fn campaign_configuration(&self) -> &Arc<CampaignConfiguration> {
        &self.campaign
    }
}

#[test]
fn sfs_wraps_a_and_b_with_private_datasets() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let leaf = FixedGenerator::boxed(&["A", "B"], &campaign, 1);
    let generator = SfsExpConfsGenerator::new(leaf, Arc::clone(&campaign), 2);
    let dataset = dataset();

    let mut confs = generator.generate(&root(), &dataset).unwrap();

    assert_eq!(confs.len(), 2);
    let wrapped: Vec<String> = confs
        .iter()
        .map(|c| c.wrapped().unwrap().signature_string())
        .collect();
    assert_eq!(wrapped, vec!["root_pointA", "root_pointB"]);
    for conf in &confs {
        assert_eq!(conf.prefix(), root().as_slice());
        assert!(Arc::ptr_eq(conf.campaign_configuration(), &campaign));
    }

    // Feature selection on one configuration is invisible everywhere else.
    confs[0]
        .regression_inputs_mut()
        .select_features(&["x2".to_string()])
        .unwrap();
    assert_eq!(confs[0].regression_inputs().x_columns(), ["x2"]);
    assert_eq!(confs[1].regression_inputs().x_columns(), ["x1", "x2", "x3"]);
    assert_eq!(dataset.x_columns(), ["x1", "x2", "x3"]);
}

#[test]
fn every_decorator_preserves_order_and_prefix() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let labels = ["p0", "p1", "p2", "p3"];
    let generators: Vec<Box<dyn ExpConfsGenerator>> = vec![
        Box::new(SfsExpConfsGenerator::new(
            FixedGenerator::boxed(&labels, &campaign, 0),
            Arc::clone(&campaign),
            0,
        )),
        Box::new(HyperoptExpConfsGenerator::new(
            FixedGenerator::boxed(&labels, &campaign, 0),
            Arc::clone(&campaign),
            0,
        )),
        Box::new(HyperoptSfsExpConfsGenerator::new(
            FixedGenerator::boxed(&labels, &campaign, 0),
            Arc::clone(&campaign),
            0,
        )),
    ];
    let prefix = vec!["campaign".to_string(), "fold_1".to_string()];

    for generator in &generators {
        let confs = generator.generate(&prefix, &dataset()).unwrap();
        assert_eq!(confs.len(), labels.len());
        for (conf, label) in confs.iter().zip(labels) {
            assert_eq!(conf.prefix(), prefix.as_slice());
            assert_eq!(
                conf.wrapped().unwrap().hyperparameters()["point"],
                serde_json::json!(label)
            );
            assert!(conf.signature().starts_with(&prefix));
        }
    }
}

#[test]
fn empty_input_yields_empty_output() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let leaf = FixedGenerator::boxed(&[], &campaign, 0);
    let generator = HyperoptSfsExpConfsGenerator::new(leaf, Arc::clone(&campaign), 0);
    assert!(generator.generate(&root(), &dataset()).unwrap().is_empty());
}

#[test]
fn empty_prefix_is_passed_through() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let leaf = FixedGenerator::boxed(&["A"], &campaign, 0);
    let generator = HyperoptExpConfsGenerator::new(leaf, Arc::clone(&campaign), 0);
    // The fixed base configurations need a prefix; the decorator adds nothing of its own.
    let err = generator.generate(&[], &dataset()).unwrap_err();
    assert!(matches!(err, AmlError::InvalidInput(_)));
}

#[test]
fn upstream_failure_propagates_verbatim() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let generator = SfsExpConfsGenerator::new(
        Box::new(FailingGenerator {
            campaign: Arc::clone(&campaign),
        }),
        Arc::clone(&campaign),
        0,
    );
    let err = generator.generate(&root(), &dataset()).unwrap_err();
    assert_eq!(err.to_string(), "Dataset error: invalid dataset shape");
}

#[test]
fn duplication_failure_propagates() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let mut generator = HyperoptSfsExpConfsGenerator::new(
        Box::new(FailingGenerator {
            campaign: Arc::clone(&campaign),
        }),
        Arc::clone(&campaign),
        7,
    );
    assert!(matches!(
        generator.duplicate(),
        Err(AmlError::Generation(_))
    ));
}

#[test]
fn construction_failure_returns_no_partial_list() {
    let campaign = Arc::new(
        CampaignConfiguration::from_toml_str("[feature_selection]\nmin_features = 4\n").unwrap(),
    );
    let generator = SfsExpConfsGenerator::new(
        FixedGenerator::boxed(&["A", "B"], &campaign, 0),
        Arc::clone(&campaign),
        0,
    );
    assert!(matches!(
        generator.generate(&root(), &dataset()),
        Err(AmlError::Configuration(_))
    ));
}

#[test]
fn duplicating_hyperopt_sfs_seeded_with_seven() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let mut generator = HyperoptSfsExpConfsGenerator::new(
        FixedGenerator::boxed(&["A"], &campaign, 3),
        Arc::clone(&campaign),
        7,
    );

    let clone = generator.duplicate().unwrap();

    let mut seven = RandomStream::new(7);
    assert_eq!(clone.seed(), seven.next_seed());
    assert_ne!(clone.seed(), 7);
    assert!(Arc::ptr_eq(clone.campaign_configuration(), &campaign));

    // G was duplicated as well, seeded with the first draw of its own stream.
    let mut g_stream = RandomStream::new(3);
    assert_eq!(clone.inner().unwrap().seed(), g_stream.next_seed());
    assert_eq!(generator.inner().unwrap().seed(), 3);
    assert_eq!(clone.generate(&root(), &dataset()).unwrap().len(), 1);
}

#[test]
fn consecutive_duplicates_are_independent() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let leaf = FixedGenerator::boxed(&["A"], &campaign, 0);
    let mut generator = SfsExpConfsGenerator::new(leaf, Arc::clone(&campaign), 11);
    let first = generator.duplicate().unwrap();
    let second = generator.duplicate().unwrap();
    assert_ne!(first.seed(), second.seed());
    assert_ne!(first.seed(), generator.seed());
    assert_ne!(second.seed(), generator.seed());
}

#[test]
fn generate_leaves_decorator_stream_untouched() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let leaf = FixedGenerator::boxed(&["A", "B"], &campaign, 4);
    let mut generator = HyperoptSfsExpConfsGenerator::new(leaf, Arc::clone(&campaign), 19);
    for _ in 0..3 {
        generator.generate(&root(), &dataset()).unwrap();
    }

    let clone = generator.duplicate().unwrap();
    assert_eq!(clone.seed(), RandomStream::new(19).next_seed());
    assert_eq!(clone.inner().unwrap().seed(), RandomStream::new(4).next_seed());
}

#[test]
fn duplication_is_deterministic() {
    let run = || {
        let campaign = Arc::new(CampaignConfiguration::default());
        let mut generator = HyperoptExpConfsGenerator::new(
            FixedGenerator::boxed(&["A", "B"], &campaign, 5),
            Arc::clone(&campaign),
            42,
        );
        generator.generate(&root(), &dataset()).unwrap();
        let mut first = generator.duplicate().unwrap();
        let grandchild = first.duplicate().unwrap();
        let second = generator.duplicate().unwrap();
        vec![first.seed(), grandchild.seed(), second.seed()]
    };
    assert_eq!(run(), run());
}

#[test]
fn nested_decorators_are_sequential_not_joint() {
    let campaign = Arc::new(CampaignConfiguration::default());
    let nested = SfsExpConfsGenerator::new(
        Box::new(HyperoptExpConfsGenerator::new(
            FixedGenerator::boxed(&["A"], &campaign, 0),
            Arc::clone(&campaign),
            0,
        )),
        Arc::clone(&campaign),
        0,
    );
    let joint = HyperoptSfsExpConfsGenerator::new(
        FixedGenerator::boxed(&["A"], &campaign, 0),
        Arc::clone(&campaign),
        0,
    );

    let nested_confs = nested.generate(&root(), &dataset()).unwrap();
    let joint_confs = joint.generate(&root(), &dataset()).unwrap();
    let (nested_conf, joint_conf) = (&nested_confs[0], &joint_confs[0]);

    assert_eq!(nested_conf.signature_string(), "root_pointA_hyperopt_sfs");
    assert_eq!(joint_conf.signature_string(), "root_pointA_hyperoptsfs");
    assert!(nested_conf.wrapped().unwrap().wrapped().is_some());
    assert!(joint_conf.wrapped().unwrap().wrapped().is_none());
}
