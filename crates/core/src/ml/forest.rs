//! Bagged forest of decision trees
//!
//! Each tree is grown on a bootstrap resample of the corpus; inference
//! averages the leaf class distributions across trees. Seeding is explicit
//! so a rebuild with the same corpus and config is identical.

use super::tree::{DecisionTree, TreeConfig};
use super::{schema_check, Classifier, Corpus};
use crate::error::PipelineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Forest construction parameters.
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub tree: TreeConfig,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 50,
            tree: TreeConfig::default(),
            seed: 42,
        }
    }
}

/// A fitted bagged ensemble.
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Train `n_trees` trees, each on its own bootstrap resample.
    pub fn fit(corpus: &Corpus, config: &ForestConfig) -> Result<Self, PipelineError> {
        corpus.validate()?;
        let n = corpus.rows.len();
        let n_features = corpus.schema.len();

        let mut trees = Vec::with_capacity(config.n_trees);
        for t in 0..config.n_trees {
            // Per-tree stream keyed off the forest seed keeps rebuilds
            // identical regardless of tree count changes elsewhere.
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
            let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(DecisionTree::fit(
                &corpus.rows,
                &corpus.labels,
                &indices,
                corpus.n_classes,
                &config.tree,
                &mut rng,
            ));
        }

        Ok(Self {
            trees,
            n_features,
            n_classes: corpus.n_classes,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError> {
        schema_check(self.n_features, features)?;
        let mut sum = vec![0.0f32; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)?) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f32;
        for p in sum.iter_mut() {
            *p /= n;
        }
        Ok(sum)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }
}
