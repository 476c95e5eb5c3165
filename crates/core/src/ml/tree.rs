//! Single CART decision tree
//!
//! Axis-aligned threshold splits chosen by Gini impurity reduction, found
//! with a single sorted sweep per candidate feature. Leaves store the
//! training class distribution so the forest can average probabilities
//! rather than hard votes.

use crate::error::PipelineError;
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::Ordering;

/// Tree growth limits.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Maximum depth before forcing a leaf.
    pub max_depth: usize,
    /// Minimum samples required to attempt a split.
    pub min_samples_split: usize,
    /// Random feature candidates per split; `None` tries every feature.
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_samples_split: 4,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        dist: Vec<f32>,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted decision tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
    n_features: usize,
    n_classes: usize,
}

impl DecisionTree {
    /// Fit on the rows selected by `indices` (callers pass bootstrap
    /// samples; duplicates are expected).
    pub fn fit(
        rows: &[Vec<f32>],
        labels: &[usize],
        indices: &[usize],
        n_classes: usize,
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
        let root = build(rows, labels, indices, n_classes, config, rng, 0);
        Self {
            root,
            n_features,
            n_classes,
        }
    }

    /// Class distribution of the leaf this row lands in.
    pub fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError> {
        super::schema_check(self.n_features, features)?;
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { dist } => return Ok(dist.clone()),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

fn class_counts(labels: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    counts
}

fn leaf(counts: &[usize], total: usize) -> Node {
    let dist = if total == 0 {
        vec![1.0 / counts.len() as f32; counts.len()]
    } else {
        counts.iter().map(|&c| c as f32 / total as f32).collect()
    };
    Node::Leaf { dist }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let mut sum_sq = 0.0;
    for &c in counts {
        let p = c as f64 / total as f64;
        sum_sq += p * p;
    }
    1.0 - sum_sq
}

fn build(
    rows: &[Vec<f32>],
    labels: &[usize],
    indices: &[usize],
    n_classes: usize,
    config: &TreeConfig,
    rng: &mut StdRng,
    depth: usize,
) -> Node {
    let counts = class_counts(labels, indices, n_classes);
    let total = indices.len();

    let is_pure = counts.iter().any(|&c| c == total && total > 0);
    if depth >= config.max_depth || total < config.min_samples_split || is_pure {
        return leaf(&counts, total);
    }

    let n_features = rows[indices[0]].len();
    let parent_gini = gini(&counts, total);

    let mut best: Option<(usize, f32, f64)> = None;
    for feature in candidate_features(n_features, config.max_features, rng) {
        if let Some((threshold, gain)) =
            best_threshold(rows, labels, indices, feature, n_classes, parent_gini)
        {
            if best.map_or(true, |(_, _, g)| gain > g) {
                best = Some((feature, threshold, gain));
            }
        }
    }

    let (feature, threshold) = match best {
        Some((f, t, gain)) if gain > 1e-9 => (f, t),
        _ => return leaf(&counts, total),
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| rows[i][feature] <= threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return leaf(&counts, total);
    }

    Node::Split {
        feature,
        threshold,
        left: Box::new(build(
            rows, labels, &left_idx, n_classes, config, rng, depth + 1,
        )),
        right: Box::new(build(
            rows, labels, &right_idx, n_classes, config, rng, depth + 1,
        )),
    }
}

/// Best threshold on one feature via a sorted sweep with running counts.
fn best_threshold(
    rows: &[Vec<f32>],
    labels: &[usize],
    indices: &[usize],
    feature: usize,
    n_classes: usize,
    parent_gini: f64,
) -> Option<(f32, f64)> {
    let mut pairs: Vec<(f32, usize)> = indices
        .iter()
        .map(|&i| (rows[i][feature], labels[i]))
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let total = pairs.len();
    let mut left = vec![0usize; n_classes];
    let mut right = class_counts(labels, indices, n_classes);

    let mut best: Option<(f32, f64)> = None;
    for i in 0..total - 1 {
        left[pairs[i].1] += 1;
        right[pairs[i].1] -= 1;

        // Splitting between equal values is not representable.
        if pairs[i].0 == pairs[i + 1].0 {
            continue;
        }

        let n_left = i + 1;
        let n_right = total - n_left;
        let weighted = (n_left as f64 * gini(&left, n_left)
            + n_right as f64 * gini(&right, n_right))
            / total as f64;
        let gain = parent_gini - weighted;
        if best.map_or(true, |(_, g)| gain > g) {
            best = Some(((pairs[i].0 + pairs[i + 1].0) / 2.0, gain));
        }
    }
    best
}

fn candidate_features(n: usize, max: Option<usize>, rng: &mut StdRng) -> Vec<usize> {
    let mut all: Vec<usize> = (0..n).collect();
    match max {
        Some(k) if k < n => {
            for i in 0..k {
                let j = rng.gen_range(i..n);
                all.swap(i, j);
            }
            all.truncate(k);
            all
        }
        _ => all,
    }
}
