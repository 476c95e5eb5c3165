//! Service configuration

use anyhow::Result;
use serde::Deserialize;
use twinguard_core::{intrusion, triage, RegistrySettings};

/// Service configuration, overridable via `TWINGUARD_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP port for the prediction API
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Synthetic corpus size for the intrusion domain
    #[serde(default = "default_cyber_samples")]
    pub cyber_samples: usize,

    /// Seed for the intrusion corpus and both its ensemble members
    #[serde(default = "default_cyber_seed")]
    pub cyber_seed: u64,

    /// Synthetic corpus size for the triage domain
    #[serde(default = "default_triage_samples")]
    pub triage_samples: usize,

    /// Seed for the triage corpus and its forest
    #[serde(default = "default_triage_seed")]
    pub triage_seed: u64,
}

fn default_api_port() -> u16 {
    8080
}

fn default_cyber_samples() -> usize {
    3000
}

fn default_cyber_seed() -> u64 {
    42
}

fn default_triage_samples() -> usize {
    2000
}

fn default_triage_seed() -> u64 {
    99
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            cyber_samples: default_cyber_samples(),
            cyber_seed: default_cyber_seed(),
            triage_samples: default_triage_samples(),
            triage_seed: default_triage_seed(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("TWINGUARD"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    /// Model-build parameters derived from this configuration.
    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            intrusion: intrusion::DetectorConfig {
                generator: intrusion::GeneratorConfig {
                    samples: self.cyber_samples,
                    seed: self.cyber_seed,
                },
            },
            triage: triage::TriageConfig {
                generator: triage::GeneratorConfig {
                    samples: self.triage_samples,
                    seed: self.triage_seed,
                },
            },
        }
    }
}
