//! Twinguard core library
//!
//! This crate provides the core functionality for:
//! - Synthetic corpus generation for both prediction domains
//! - Native tree-ensemble training and inference
//! - Rule-overlay labeling on top of classifier output
//! - The one-time, process-wide model registry
//! - Credential store, health checks and observability

pub mod auth;
pub mod error;
pub mod health;
pub mod intrusion;
pub mod ml;
pub mod models;
pub mod observability;
pub mod registry;
pub mod triage;

pub use error::PipelineError;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use registry::{ModelRegistry, RegistrySettings};
