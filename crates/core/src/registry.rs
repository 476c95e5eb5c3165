//! Process-wide model registry
//!
//! The corpus/fit step runs exactly once per domain and the result is
//! shared read-only. `get_or_build` blocks concurrent callers until the
//! single build completes, so a partially built model is never observable;
//! the `try_*` accessors report `ModelNotReady` instead of blocking and
//! back the readiness probe.

use crate::error::PipelineError;
use crate::intrusion::{DetectorConfig, IntrusionDetector};
use crate::triage::{TriageConfig, TriageEngine};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Build parameters for both domains.
#[derive(Debug, Clone, Default)]
pub struct RegistrySettings {
    pub intrusion: DetectorConfig,
    pub triage: TriageConfig,
}

/// Lazily built, immutable pair of domain models.
pub struct ModelRegistry {
    settings: RegistrySettings,
    intrusion: OnceCell<Arc<IntrusionDetector>>,
    triage: OnceCell<Arc<TriageEngine>>,
}

impl ModelRegistry {
    pub fn new(settings: RegistrySettings) -> Self {
        Self {
            settings,
            intrusion: OnceCell::new(),
            triage: OnceCell::new(),
        }
    }

    /// Shared detector, building it on first call.
    pub fn intrusion(&self) -> Result<Arc<IntrusionDetector>, PipelineError> {
        self.intrusion
            .get_or_try_init(|| {
                let started = Instant::now();
                let detector = IntrusionDetector::train(&self.settings.intrusion)?;
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "intrusion model ready"
                );
                Ok(Arc::new(detector))
            })
            .cloned()
    }

    /// Shared triage engine, building it on first call.
    pub fn triage(&self) -> Result<Arc<TriageEngine>, PipelineError> {
        self.triage
            .get_or_try_init(|| {
                let started = Instant::now();
                let engine = TriageEngine::train(&self.settings.triage)?;
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "triage model ready"
                );
                Ok(Arc::new(engine))
            })
            .cloned()
    }

    /// Non-blocking access; fails until the build has completed.
    pub fn try_intrusion(&self) -> Result<Arc<IntrusionDetector>, PipelineError> {
        self.intrusion
            .get()
            .cloned()
            .ok_or(PipelineError::ModelNotReady)
    }

    /// Non-blocking access; fails until the build has completed.
    pub fn try_triage(&self) -> Result<Arc<TriageEngine>, PipelineError> {
        self.triage.get().cloned().ok_or(PipelineError::ModelNotReady)
    }

    /// Build both models now; idempotent.
    pub fn warm(&self) -> Result<(), PipelineError> {
        self.intrusion()?;
        self.triage()?;
        Ok(())
    }

    /// True once both models are built.
    pub fn ready(&self) -> bool {
        self.intrusion.get().is_some() && self.triage.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrusion;
    use crate::triage;

    fn small_settings() -> RegistrySettings {
        RegistrySettings {
            intrusion: DetectorConfig {
                generator: intrusion::GeneratorConfig {
                    samples: 400,
                    seed: 42,
                },
            },
            triage: TriageConfig {
                generator: triage::GeneratorConfig {
                    samples: 400,
                    seed: 99,
                },
            },
        }
    }

    #[test]
    fn test_not_ready_before_first_access() {
        let registry = ModelRegistry::new(small_settings());
        assert!(!registry.ready());
        assert!(matches!(
            registry.try_intrusion(),
            Err(PipelineError::ModelNotReady)
        ));
        assert!(matches!(
            registry.try_triage(),
            Err(PipelineError::ModelNotReady)
        ));
    }

    #[test]
    fn test_warm_builds_both_once() {
        let registry = ModelRegistry::new(small_settings());
        registry.warm().unwrap();
        assert!(registry.ready());
        assert!(registry.try_intrusion().is_ok());
        assert!(registry.try_triage().is_ok());
    }

    #[test]
    fn test_repeated_access_shares_one_model() {
        let registry = ModelRegistry::new(small_settings());
        let a = registry.intrusion().unwrap();
        let b = registry.intrusion().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_first_access_builds_once() {
        let registry = Arc::new(ModelRegistry::new(small_settings()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.intrusion().unwrap())
            })
            .collect();
        let models: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for model in &models[1..] {
            assert!(Arc::ptr_eq(&models[0], model));
        }
    }
}
