//! Symptom triage pipeline
//!
//! Single bagged forest trained on raw binary flags with rule-derived
//! labels; no normalization on this domain. A report with zero positive
//! symptoms is rejected before any classifier call.

pub mod advice;
pub mod generator;
pub mod rules;

pub use generator::{GeneratorConfig, SYMPTOM_SCHEMA};

use crate::error::PipelineError;
use crate::ml::{argmax, Classifier, ForestConfig, RandomForest, TreeConfig};
use crate::models::{Condition, Diagnosis, SymptomReport};
use tracing::info;

/// Everything needed to build the triage engine.
#[derive(Debug, Clone, Default)]
pub struct TriageConfig {
    pub generator: GeneratorConfig,
}

/// Fitted triage engine. Built once per process, immutable afterwards.
pub struct TriageEngine {
    forest: RandomForest,
    trained_on: usize,
}

impl TriageEngine {
    pub fn train(config: &TriageConfig) -> Result<Self, PipelineError> {
        let corpus = generator::generate(&config.generator);
        corpus.validate()?;

        // Pure bagging: with fourteen binary features every tree can see
        // the full rule conjunctions, so no per-split feature subsetting.
        let forest = RandomForest::fit(
            &corpus,
            &ForestConfig {
                n_trees: 50,
                tree: TreeConfig {
                    max_depth: 12,
                    min_samples_split: 2,
                    max_features: None,
                },
                seed: config.generator.seed,
            },
        )?;
        info!(samples = corpus.len(), "triage engine trained");

        Ok(Self {
            forest,
            trained_on: corpus.len(),
        })
    }

    /// Diagnose one report.
    ///
    /// The no-symptom precondition is checked before the model is touched;
    /// the urgency flag comes from the isolated policy in [`rules`].
    pub fn diagnose(&self, report: &SymptomReport) -> Result<Diagnosis, PipelineError> {
        if report.active_count() == 0 {
            return Err(PipelineError::DegenerateInput);
        }

        let proba = self.forest.predict_proba(&report.to_features())?;
        let class = argmax(&proba);
        let condition = Condition::from_class_index(class).unwrap_or(Condition::NonSpecific);
        let confidence = proba[class] * 100.0;

        Ok(Diagnosis {
            condition,
            urgent: rules::is_urgent(condition, confidence),
            confidence,
            probabilities: proba,
            generated_at: chrono::Utc::now().timestamp(),
        })
    }

    pub fn trained_on(&self) -> usize {
        self.trained_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_engine() -> TriageEngine {
        TriageEngine::train(&TriageConfig {
            generator: GeneratorConfig {
                samples: 800,
                seed: 99,
            },
        })
        .unwrap()
    }

    #[test]
    fn test_covid_pattern_scenario() {
        let engine = small_engine();
        let report = SymptomReport {
            fever: true,
            cough: true,
            loss_of_smell: true,
            ..Default::default()
        };
        let diagnosis = engine.diagnose(&report).unwrap();
        assert_eq!(diagnosis.condition, Condition::Covid19);
        assert!(diagnosis.urgent);
        assert_eq!(diagnosis.probabilities.len(), 8);
    }

    #[test]
    fn test_cardiac_pattern_is_urgent() {
        let engine = small_engine();
        let report = SymptomReport {
            chest_pain: true,
            shortness_of_breath: true,
            ..Default::default()
        };
        let diagnosis = engine.diagnose(&report).unwrap();
        assert_eq!(diagnosis.condition, Condition::Cardiac);
        assert!(diagnosis.urgent);
    }

    #[test]
    fn test_empty_report_rejected_before_inference() {
        let engine = small_engine();
        assert!(matches!(
            engine.diagnose(&SymptomReport::default()),
            Err(PipelineError::DegenerateInput)
        ));
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let engine = small_engine();
        let report = SymptomReport {
            nausea: true,
            diarrhea: true,
            ..Default::default()
        };
        let diagnosis = engine.diagnose(&report).unwrap();
        let sum: f32 = diagnosis.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_forest_matches_rule_table_on_clear_patterns() {
        let engine = small_engine();
        let cases = [
            (
                SymptomReport {
                    fever: true,
                    cough: true,
                    fatigue: true,
                    ..Default::default()
                },
                Condition::Flu,
            ),
            (
                SymptomReport {
                    nausea: true,
                    diarrhea: true,
                    ..Default::default()
                },
                Condition::Gastroenteritis,
            ),
            (
                SymptomReport {
                    headache: true,
                    fatigue: true,
                    ..Default::default()
                },
                Condition::Migraine,
            ),
        ];
        for (report, expected) in cases {
            let diagnosis = engine.diagnose(&report).unwrap();
            assert_eq!(diagnosis.condition, expected, "report {:?}", report);
        }
    }

    #[test]
    fn test_retrain_is_deterministic() {
        let a = small_engine();
        let b = small_engine();
        let report = SymptomReport {
            sore_throat: true,
            fever: true,
            ..Default::default()
        };
        assert_eq!(
            a.diagnose(&report).unwrap().probabilities,
            b.diagnose(&report).unwrap().probabilities
        );
    }
}
