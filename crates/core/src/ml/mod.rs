//! Native tree-ensemble training and inference
//!
//! Both prediction domains share this module: a labeled in-memory corpus,
//! a z-score normalizer, a bagged forest, a boosted-stump classifier and
//! a soft-vote combiner. Models are trained once per process on synthetic
//! corpora and are immutable afterwards.

mod boost;
mod ensemble;
mod forest;
mod normalizer;
mod tree;

pub use boost::{BoostConfig, GradientBoost};
pub use ensemble::SoftVoteEnsemble;
pub use forest::{ForestConfig, RandomForest};
pub use normalizer::Normalizer;
pub use tree::{DecisionTree, TreeConfig};

use crate::error::PipelineError;

/// A labeled training corpus.
///
/// Built once per process by a domain generator, validated before fitting,
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Feature names, fixed at build time.
    pub schema: &'static [&'static str],
    /// One row per sample, each `schema.len()` wide.
    pub rows: Vec<Vec<f32>>,
    /// One class index per row.
    pub labels: Vec<usize>,
    /// Number of distinct classes.
    pub n_classes: usize,
}

impl Corpus {
    pub fn new(schema: &'static [&'static str], n_classes: usize) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            labels: Vec::new(),
            n_classes,
        }
    }

    pub fn push(&mut self, row: Vec<f32>, label: usize) {
        self.rows.push(row);
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-class sample counts.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &label in &self.labels {
            if label < self.n_classes {
                counts[label] += 1;
            }
        }
        counts
    }

    /// Reject corpora a classifier cannot be fit on.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.rows.is_empty() {
            return Err(PipelineError::MalformedCorpus("no samples".to_string()));
        }
        if self.rows.len() != self.labels.len() {
            return Err(PipelineError::MalformedCorpus(format!(
                "{} rows but {} labels",
                self.rows.len(),
                self.labels.len()
            )));
        }
        let width = self.schema.len();
        if let Some(row) = self.rows.iter().find(|r| r.len() != width) {
            return Err(PipelineError::MalformedCorpus(format!(
                "row of width {} in a corpus of width {}",
                row.len(),
                width
            )));
        }
        if let Some(&label) = self.labels.iter().find(|&&l| l >= self.n_classes) {
            return Err(PipelineError::MalformedCorpus(format!(
                "label {} outside {} classes",
                label, self.n_classes
            )));
        }
        Ok(())
    }
}

/// A trained classifier exposing per-class probabilities.
pub trait Classifier: Send + Sync {
    /// Per-class probability vector for one feature row.
    ///
    /// Fails with `SchemaMismatch` if the row width differs from the
    /// width seen at fit time.
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError>;

    /// Predicted class index (argmax of probabilities).
    fn predict(&self, features: &[f32]) -> Result<usize, PipelineError> {
        Ok(argmax(&self.predict_proba(features)?))
    }

    fn n_features(&self) -> usize;

    fn n_classes(&self) -> usize;
}

/// Index of the largest value; ties resolve to the lowest index.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Guard shared by all classifiers before touching a feature row.
pub(crate) fn schema_check(expected: usize, features: &[f32]) -> Result<(), PipelineError> {
    if features.len() != expected {
        return Err(PipelineError::SchemaMismatch {
            expected,
            got: features.len(),
        });
    }
    Ok(())
}
