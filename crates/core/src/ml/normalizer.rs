//! Per-field z-score standardization
//!
//! Fit once from a corpus, applied identically to training rows and to
//! every inference vector. Skipping the transform at either end silently
//! degrades classifier accuracy, so the detector owns the fitted
//! normalizer and routes all rows through it.

use super::{schema_check, Corpus};
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Fitted per-field (mean, scale) pairs.
///
/// A field with zero variance in the corpus gets scale 1, so transforming
/// never divides by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalizer {
    means: Vec<f32>,
    scales: Vec<f32>,
}

impl Normalizer {
    /// Fit population mean and standard deviation per field.
    pub fn fit(corpus: &Corpus) -> Result<Self, PipelineError> {
        corpus.validate()?;
        let width = corpus.schema.len();
        let n = corpus.rows.len() as f64;

        let mut means = vec![0.0f64; width];
        for row in &corpus.rows {
            for (i, &v) in row.iter().enumerate() {
                means[i] += v as f64;
            }
        }
        for m in means.iter_mut() {
            *m /= n;
        }

        let mut variances = vec![0.0f64; width];
        for row in &corpus.rows {
            for (i, &v) in row.iter().enumerate() {
                let d = v as f64 - means[i];
                variances[i] += d * d;
            }
        }

        let scales = variances
            .iter()
            .map(|&var| {
                let std = (var / n).sqrt();
                if std > 0.0 {
                    std as f32
                } else {
                    1.0
                }
            })
            .collect();

        Ok(Self {
            means: means.iter().map(|&m| m as f32).collect(),
            scales,
        })
    }

    /// Standardize one feature row.
    pub fn transform(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError> {
        schema_check(self.means.len(), features)?;
        Ok(features
            .iter()
            .enumerate()
            .map(|(i, &v)| (v - self.means[i]) / self.scales[i])
            .collect())
    }

    /// Standardize every row of a corpus, preserving labels and schema.
    pub fn transform_corpus(&self, corpus: &Corpus) -> Result<Corpus, PipelineError> {
        let mut out = Corpus::new(corpus.schema, corpus.n_classes);
        for (row, &label) in corpus.rows.iter().zip(corpus.labels.iter()) {
            out.push(self.transform(row)?, label);
        }
        Ok(out)
    }

    pub fn means(&self) -> &[f32] {
        &self.means
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[&str] = &["x", "y", "constant"];

    fn sample_corpus() -> Corpus {
        let mut corpus = Corpus::new(SCHEMA, 2);
        for i in 0..100 {
            let v = i as f32;
            corpus.push(vec![v, v * 2.0 + 5.0, 3.0], (i % 2) as usize);
        }
        corpus
    }

    #[test]
    fn test_transformed_corpus_has_zero_mean_unit_variance() {
        let corpus = sample_corpus();
        let normalizer = Normalizer::fit(&corpus).unwrap();
        let transformed = normalizer.transform_corpus(&corpus).unwrap();

        for field in 0..2 {
            let n = transformed.rows.len() as f32;
            let mean: f32 = transformed.rows.iter().map(|r| r[field]).sum::<f32>() / n;
            let var: f32 = transformed
                .rows
                .iter()
                .map(|r| (r[field] - mean).powi(2))
                .sum::<f32>()
                / n;
            assert!(mean.abs() < 1e-3, "field {} mean was {}", field, mean);
            assert!((var - 1.0).abs() < 1e-2, "field {} variance was {}", field, var);
        }
    }

    #[test]
    fn test_zero_variance_field_uses_unit_scale() {
        let corpus = sample_corpus();
        let normalizer = Normalizer::fit(&corpus).unwrap();

        assert_eq!(normalizer.scales()[2], 1.0);
        let row = normalizer.transform(&[0.0, 0.0, 3.0]).unwrap();
        assert!(row[2].is_finite());
        assert_eq!(row[2], 0.0);
    }

    #[test]
    fn test_refit_is_deterministic() {
        let corpus = sample_corpus();
        let a = Normalizer::fit(&corpus).unwrap();
        let b = Normalizer::fit(&corpus).unwrap();
        assert_eq!(a.means(), b.means());
        assert_eq!(a.scales(), b.scales());
    }

    #[test]
    fn test_wrong_width_is_schema_mismatch() {
        let normalizer = Normalizer::fit(&sample_corpus()).unwrap();
        assert!(matches!(
            normalizer.transform(&[1.0, 2.0]),
            Err(PipelineError::SchemaMismatch { expected: 3, got: 2 })
        ));
    }
}
