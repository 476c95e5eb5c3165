//! Network intrusion detection pipeline
//!
//! Corpus generation, z-score normalization, a forest/boost pair combined
//! by probability averaging, and the post-classifier sub-typing rules.

pub mod generator;
pub mod rules;

pub use generator::{GeneratorConfig, CONNECTION_SCHEMA, LABEL_ATTACK, LABEL_NORMAL};

use crate::error::PipelineError;
use crate::ml::{
    BoostConfig, Classifier, ForestConfig, GradientBoost, Normalizer, RandomForest,
    SoftVoteEnsemble, TreeConfig,
};
use crate::models::{ConnectionMetrics, TrafficLabel, TrafficVerdict};
use tracing::info;

/// Everything needed to build the detector.
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    pub generator: GeneratorConfig,
}

/// Fitted intrusion detector: normalizer plus two-model soft vote.
///
/// Built once per process, immutable afterwards; assessment is a pure read.
pub struct IntrusionDetector {
    normalizer: Normalizer,
    ensemble: SoftVoteEnsemble,
    trained_on: usize,
}

impl IntrusionDetector {
    /// Generate the corpus, fit the normalizer, then train both ensemble
    /// members on the same normalized rows.
    pub fn train(config: &DetectorConfig) -> Result<Self, PipelineError> {
        let corpus = generator::generate(&config.generator);
        corpus.validate()?;

        let normalizer = Normalizer::fit(&corpus)?;
        let normalized = normalizer.transform_corpus(&corpus)?;

        let forest = RandomForest::fit(
            &normalized,
            &ForestConfig {
                n_trees: 50,
                tree: TreeConfig {
                    max_depth: 10,
                    min_samples_split: 4,
                    max_features: Some(3),
                },
                seed: config.generator.seed,
            },
        )?;
        let boost = GradientBoost::fit(
            &normalized,
            &BoostConfig {
                seed: config.generator.seed,
                ..Default::default()
            },
        )?;

        let ensemble = SoftVoteEnsemble::new(vec![Box::new(forest), Box::new(boost)])?;
        info!(
            samples = corpus.len(),
            members = ensemble.n_members(),
            "intrusion detector trained"
        );

        Ok(Self {
            normalizer,
            ensemble,
            trained_on: corpus.len(),
        })
    }

    /// Assess one connection: normalize, average the two probability
    /// vectors, then sub-type attacks from the raw inputs.
    pub fn assess(&self, metrics: &ConnectionMetrics) -> Result<TrafficVerdict, PipelineError> {
        let normalized = self.normalizer.transform(&metrics.to_features())?;
        let proba = self.ensemble.predict_proba(&normalized)?;

        let p_attack = proba[LABEL_ATTACK];
        let label = if p_attack > 0.5 {
            TrafficLabel::Attack
        } else {
            TrafficLabel::Normal
        };
        let attack_kind = match label {
            TrafficLabel::Attack => Some(rules::classify_attack(metrics)),
            TrafficLabel::Normal => None,
        };

        Ok(TrafficVerdict {
            label,
            attack_kind,
            confidence: proba[LABEL_NORMAL].max(p_attack) * 100.0,
            probabilities: [proba[LABEL_NORMAL], p_attack],
            generated_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Per-member probability vectors for one connection, in member order
    /// (forest, boost). Diagnostic surface for the averaging contract.
    pub fn member_probabilities(
        &self,
        metrics: &ConnectionMetrics,
    ) -> Result<Vec<Vec<f32>>, PipelineError> {
        let normalized = self.normalizer.transform(&metrics.to_features())?;
        self.ensemble.member_probabilities(&normalized)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn trained_on(&self) -> usize {
        self.trained_on
    }
}
