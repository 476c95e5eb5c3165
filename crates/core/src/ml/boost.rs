//! Boosted-stump binary classifier
//!
//! Squared-loss gradient boosting over single-split regression stumps.
//! Predictions start at the label mean and each round fits a stump to the
//! current residuals on a seeded subsample; the summed score is clamped to
//! [0, 1] and read as the positive-class probability.

use super::{schema_check, Classifier, Corpus};
use crate::error::PipelineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

/// Boosting parameters.
#[derive(Debug, Clone)]
pub struct BoostConfig {
    /// Number of boosting rounds (one stump per round).
    pub n_rounds: usize,
    /// Shrinkage applied to every stump's contribution.
    pub learning_rate: f32,
    /// Fraction of rows each stump is fit on.
    pub subsample: f32,
    pub seed: u64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            n_rounds: 80,
            learning_rate: 0.15,
            subsample: 0.8,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
struct StumpSplit {
    feature: usize,
    threshold: f32,
    left: f32,
    right: f32,
}

#[derive(Debug, Clone)]
struct Stump {
    split: Option<StumpSplit>,
    /// Mean residual when no usable split exists.
    value: f32,
}

impl Stump {
    fn predict(&self, features: &[f32]) -> f32 {
        match &self.split {
            Some(s) => {
                if features[s.feature] <= s.threshold {
                    s.left
                } else {
                    s.right
                }
            }
            None => self.value,
        }
    }
}

/// A fitted boosted-stump classifier. Binary only.
pub struct GradientBoost {
    base_score: f32,
    stumps: Vec<Stump>,
    learning_rate: f32,
    n_features: usize,
}

impl GradientBoost {
    pub fn fit(corpus: &Corpus, config: &BoostConfig) -> Result<Self, PipelineError> {
        corpus.validate()?;
        if corpus.n_classes != 2 {
            return Err(PipelineError::MalformedCorpus(format!(
                "boosted stumps are binary, corpus has {} classes",
                corpus.n_classes
            )));
        }

        let n = corpus.rows.len();
        let targets: Vec<f32> = corpus.labels.iter().map(|&l| l as f32).collect();
        let base_score = targets.iter().sum::<f32>() / n as f32;
        let mut predictions = vec![base_score; n];
        let mut stumps = Vec::with_capacity(config.n_rounds);

        for round in 0..config.n_rounds {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(round as u64));
            let sampled: Vec<usize> = (0..n)
                .filter(|_| rng.gen::<f32>() < config.subsample)
                .collect();
            if sampled.is_empty() {
                continue;
            }

            let residuals: Vec<f32> = targets
                .iter()
                .zip(predictions.iter())
                .map(|(y, p)| y - p)
                .collect();

            let stump = fit_stump(&corpus.rows, &residuals, &sampled);
            for (i, row) in corpus.rows.iter().enumerate() {
                predictions[i] += config.learning_rate * stump.predict(row);
            }
            stumps.push(stump);
        }

        Ok(Self {
            base_score,
            stumps,
            learning_rate: config.learning_rate,
            n_features: corpus.schema.len(),
        })
    }

    /// Positive-class score, clamped to [0, 1].
    pub fn score(&self, features: &[f32]) -> Result<f32, PipelineError> {
        schema_check(self.n_features, features)?;
        let mut score = self.base_score;
        for stump in &self.stumps {
            score += self.learning_rate * stump.predict(features);
        }
        Ok(score.clamp(0.0, 1.0))
    }

    pub fn n_rounds(&self) -> usize {
        self.stumps.len()
    }
}

impl Classifier for GradientBoost {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError> {
        let s = self.score(features)?;
        Ok(vec![1.0 - s, s])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        2
    }
}

/// Least-squares stump over the sampled rows: the split maximizing
/// sum(residual)^2 / count on each side, found by a sorted sweep.
fn fit_stump(rows: &[Vec<f32>], residuals: &[f32], sampled: &[usize]) -> Stump {
    let total_sum: f32 = sampled.iter().map(|&i| residuals[i]).sum();
    let mean = total_sum / sampled.len() as f32;
    let n_features = rows[sampled[0]].len();

    let mut best: Option<(f64, StumpSplit)> = None;
    for feature in 0..n_features {
        let mut pairs: Vec<(f32, f32)> = sampled
            .iter()
            .map(|&i| (rows[i][feature], residuals[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let total = pairs.len();
        let mut left_sum = 0.0f64;
        for i in 0..total - 1 {
            left_sum += pairs[i].1 as f64;
            if pairs[i].0 == pairs[i + 1].0 {
                continue;
            }
            let n_left = (i + 1) as f64;
            let n_right = (total - i - 1) as f64;
            let right_sum = total_sum as f64 - left_sum;
            let score = left_sum * left_sum / n_left + right_sum * right_sum / n_right;
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((
                    score,
                    StumpSplit {
                        feature,
                        threshold: (pairs[i].0 + pairs[i + 1].0) / 2.0,
                        left: (left_sum / n_left) as f32,
                        right: (right_sum / n_right) as f32,
                    },
                ));
            }
        }
    }

    Stump {
        split: best.map(|(_, s)| s),
        value: mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[&str] = &["x", "flag"];

    fn separable_corpus() -> Corpus {
        let mut corpus = Corpus::new(SCHEMA, 2);
        for i in 0..100 {
            corpus.push(vec![i as f32, 0.0], 0);
            corpus.push(vec![500.0 + i as f32, 1.0], 1);
        }
        corpus
    }

    #[test]
    fn test_boost_separates_classes() {
        let boost = GradientBoost::fit(&separable_corpus(), &BoostConfig::default()).unwrap();
        assert!(boost.score(&[10.0, 0.0]).unwrap() < 0.2);
        assert!(boost.score(&[550.0, 1.0]).unwrap() > 0.8);
    }

    #[test]
    fn test_proba_is_complementary() {
        let boost = GradientBoost::fit(&separable_corpus(), &BoostConfig::default()).unwrap();
        let p = boost.predict_proba(&[550.0, 1.0]).unwrap();
        assert!((p[0] + p[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_model() {
        let corpus = separable_corpus();
        let config = BoostConfig::default();
        let a = GradientBoost::fit(&corpus, &config).unwrap();
        let b = GradientBoost::fit(&corpus, &config).unwrap();
        for x in [0.0f32, 250.0, 999.0] {
            assert_eq!(a.score(&[x, 0.5]).unwrap(), b.score(&[x, 0.5]).unwrap());
        }
    }

    #[test]
    fn test_multiclass_corpus_rejected() {
        let mut corpus = Corpus::new(SCHEMA, 3);
        corpus.push(vec![1.0, 0.0], 0);
        corpus.push(vec![2.0, 0.0], 1);
        corpus.push(vec![3.0, 0.0], 2);
        assert!(matches!(
            GradientBoost::fit(&corpus, &BoostConfig::default()),
            Err(PipelineError::MalformedCorpus(_))
        ));
    }

    #[test]
    fn test_score_stays_in_unit_interval() {
        let boost = GradientBoost::fit(&separable_corpus(), &BoostConfig::default()).unwrap();
        for x in [-1e6f32, 0.0, 1e6] {
            let s = boost.score(&[x, x]).unwrap();
            assert!((0.0..=1.0).contains(&s));
        }
    }
}
