//! Observability infrastructure
//!
//! Prometheus metrics registered once per process, plus a structured
//! logger for the significant service events.

use prometheus::{
    register_gauge_vec, register_histogram_vec, register_int_gauge, GaugeVec, HistogramVec,
    IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for inference latency (seconds).
const LATENCY_BUCKETS: &[f64] = &[
    0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    prediction_latency_seconds: HistogramVec,
    model_build_seconds: GaugeVec,
    assessments_total: IntGauge,
    attacks_flagged_total: IntGauge,
    diagnoses_total: IntGauge,
    urgent_diagnoses_total: IntGauge,
    rejected_inputs_total: IntGauge,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram_vec!(
                "twinguard_prediction_latency_seconds",
                "Time spent running one inference call",
                &["domain"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            model_build_seconds: register_gauge_vec!(
                "twinguard_model_build_seconds",
                "Wall time of the one-time corpus/fit step",
                &["domain"]
            )
            .expect("Failed to register model_build_seconds"),

            assessments_total: register_int_gauge!(
                "twinguard_assessments_total",
                "Total number of intrusion assessments produced"
            )
            .expect("Failed to register assessments_total"),

            attacks_flagged_total: register_int_gauge!(
                "twinguard_attacks_flagged_total",
                "Total number of connections flagged as attacks"
            )
            .expect("Failed to register attacks_flagged_total"),

            diagnoses_total: register_int_gauge!(
                "twinguard_diagnoses_total",
                "Total number of diagnoses produced"
            )
            .expect("Failed to register diagnoses_total"),

            urgent_diagnoses_total: register_int_gauge!(
                "twinguard_urgent_diagnoses_total",
                "Total number of diagnoses flagged urgent"
            )
            .expect("Failed to register urgent_diagnoses_total"),

            rejected_inputs_total: register_int_gauge!(
                "twinguard_rejected_inputs_total",
                "Inputs rejected before inference (schema or precondition)"
            )
            .expect("Failed to register rejected_inputs_total"),
        }
    }
}

/// Lightweight handle to the process-global metric set.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, domain: &str, duration_secs: f64) {
        self.inner()
            .prediction_latency_seconds
            .with_label_values(&[domain])
            .observe(duration_secs);
    }

    pub fn set_model_build_time(&self, domain: &str, duration_secs: f64) {
        self.inner()
            .model_build_seconds
            .with_label_values(&[domain])
            .set(duration_secs);
    }

    pub fn inc_assessments(&self) {
        self.inner().assessments_total.inc();
    }

    pub fn inc_attacks_flagged(&self) {
        self.inner().attacks_flagged_total.inc();
    }

    pub fn inc_diagnoses(&self) {
        self.inner().diagnoses_total.inc();
    }

    pub fn inc_urgent_diagnoses(&self) {
        self.inner().urgent_diagnoses_total.inc();
    }

    pub fn inc_rejected_inputs(&self) {
        self.inner().rejected_inputs_total.inc();
    }
}

/// Structured logger for service events.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "service_started",
            instance = %self.instance,
            version = %version,
            "Twinguard service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Twinguard service shutting down"
        );
    }

    pub fn log_model_built(&self, domain: &str, samples: usize, elapsed_ms: u64) {
        info!(
            event = "model_built",
            instance = %self.instance,
            domain = %domain,
            samples = samples,
            elapsed_ms = elapsed_ms,
            "Model trained"
        );
    }

    pub fn log_assessment(&self, verdict: &str, attack_kind: Option<&str>, confidence: f32) {
        match attack_kind {
            Some(kind) => warn!(
                event = "intrusion_assessment",
                instance = %self.instance,
                verdict = %verdict,
                attack_kind = %kind,
                confidence = confidence,
                "Attack flagged"
            ),
            None => info!(
                event = "intrusion_assessment",
                instance = %self.instance,
                verdict = %verdict,
                confidence = confidence,
                "Connection assessed"
            ),
        }
    }

    pub fn log_diagnosis(&self, condition: &str, urgent: bool, confidence: f32) {
        if urgent {
            warn!(
                event = "diagnosis",
                instance = %self.instance,
                condition = %condition,
                urgent = true,
                confidence = confidence,
                "Urgent diagnosis"
            );
        } else {
            info!(
                event = "diagnosis",
                instance = %self.instance,
                condition = %condition,
                urgent = false,
                confidence = confidence,
                "Diagnosis produced"
            );
        }
    }

    pub fn log_rejected_input(&self, domain: &str, reason: &str) {
        info!(
            event = "input_rejected",
            instance = %self.instance,
            domain = %domain,
            reason = %reason,
            "Input rejected before inference"
        );
    }
}
