//! Soft-vote combination of trained classifiers
//!
//! The combined probability vector is the element-wise arithmetic mean of
//! every member's vector, not a majority vote of hard labels. The two
//! differ near the decision boundary, and the mean is the contract.

use super::{schema_check, Classifier};
use crate::error::PipelineError;

/// Averages the probability outputs of its members.
pub struct SoftVoteEnsemble {
    members: Vec<Box<dyn Classifier>>,
    n_features: usize,
    n_classes: usize,
}

impl SoftVoteEnsemble {
    /// Members must agree on feature width and class count.
    pub fn new(members: Vec<Box<dyn Classifier>>) -> Result<Self, PipelineError> {
        let first = members
            .first()
            .ok_or_else(|| PipelineError::MalformedCorpus("ensemble with no members".into()))?;
        let n_features = first.n_features();
        let n_classes = first.n_classes();
        for member in &members {
            if member.n_features() != n_features {
                return Err(PipelineError::SchemaMismatch {
                    expected: n_features,
                    got: member.n_features(),
                });
            }
            if member.n_classes() != n_classes {
                return Err(PipelineError::MalformedCorpus(format!(
                    "member class counts disagree: {} vs {}",
                    n_classes,
                    member.n_classes()
                )));
            }
        }
        Ok(Self {
            members,
            n_features,
            n_classes,
        })
    }

    /// Each member's probability vector, in membership order.
    pub fn member_probabilities(&self, features: &[f32]) -> Result<Vec<Vec<f32>>, PipelineError> {
        self.members
            .iter()
            .map(|m| m.predict_proba(features))
            .collect()
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }
}

impl Classifier for SoftVoteEnsemble {
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError> {
        schema_check(self.n_features, features)?;
        let mut sum = vec![0.0f32; self.n_classes];
        for member in &self.members {
            for (acc, p) in sum.iter_mut().zip(member.predict_proba(features)?) {
                *acc += p;
            }
        }
        let n = self.members.len() as f32;
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
