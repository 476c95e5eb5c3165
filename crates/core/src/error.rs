//! Error types for the prediction pipelines

use thiserror::Error;

/// Errors surfaced by corpus construction, model fitting and inference.
///
/// All variants are recoverable by the caller: reject the input, retry
/// after warm-up, or surface the message. None should abort the process.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input vector width does not match the schema the model was trained on.
    #[error("feature vector has {got} fields, trained schema expects {expected}")]
    SchemaMismatch { expected: usize, got: usize },

    /// Symptom report with no positive flags; no diagnosis is attempted.
    #[error("no symptoms reported, at least one flag must be set")]
    DegenerateInput,

    /// Inference requested before the one-time corpus/fit step completed.
    #[error("models are still being built, retry shortly")]
    ModelNotReady,

    /// Feature and label columns disagree, or the corpus is empty.
    #[error("malformed corpus: {0}")]
    MalformedCorpus(String),
}

impl PipelineError {
    /// Whether the condition is caused by the caller's input rather than
    /// the service's own state.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::SchemaMismatch { .. } | PipelineError::DegenerateInput
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        assert!(PipelineError::DegenerateInput.is_input_error());
        assert!(PipelineError::SchemaMismatch { expected: 6, got: 5 }.is_input_error());
        assert!(!PipelineError::ModelNotReady.is_input_error());
        assert!(!PipelineError::MalformedCorpus("empty".into()).is_input_error());
    }

    #[test]
    fn test_schema_mismatch_message_names_both_widths() {
        let err = PipelineError::SchemaMismatch { expected: 6, got: 4 };
        let msg = err.to_string();
        assert!(msg.contains('6') && msg.contains('4'));
    }
}
