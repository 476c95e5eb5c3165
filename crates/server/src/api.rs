//! HTTP API: prediction endpoints, login, health checks and metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use twinguard_core::{
    auth::{CredentialStore, Module, Role},
    triage::advice,
    ComponentStatus, ConnectionMetrics, HealthRegistry, ModelRegistry, PipelineError,
    ServiceMetrics, StructuredLogger, SymptomReport, TrafficLabel,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub store: Arc<dyn CredentialStore>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

/// Error envelope returned to clients.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let status = match &err {
            PipelineError::SchemaMismatch { .. } | PipelineError::DegenerateInput => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PipelineError::ModelNotReady => StatusCode::SERVICE_UNAVAILABLE,
            PipelineError::MalformedCorpus(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct LivenessResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Liveness marker.
async fn home() -> impl IntoResponse {
    Json(LivenessResponse {
        status: "online",
        service: "twinguard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CyberPrediction {
    /// Class index: 0 = normal, 1 = attack.
    pub prediction: u8,
    pub verdict: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_kind: Option<String>,
    /// Winning-class probability in percent (uncalibrated).
    pub confidence: f32,
    /// Averaged class probabilities, [normal, attack].
    pub probabilities: [f32; 2],
}

async fn predict_cyber(
    State(state): State<Arc<AppState>>,
    Json(metrics): Json<ConnectionMetrics>,
) -> Result<Json<CyberPrediction>, ApiError> {
    let detector = state.registry.try_intrusion()?;

    let started = Instant::now();
    let verdict = detector.assess(&metrics).inspect_err(|e| {
        if e.is_input_error() {
            state.metrics.inc_rejected_inputs();
            state.logger.log_rejected_input("intrusion", &e.to_string());
        }
    })?;
    state
        .metrics
        .observe_prediction_latency("intrusion", started.elapsed().as_secs_f64());

    state.metrics.inc_assessments();
    let attack_kind = verdict.attack_kind.map(|k| k.name().to_string());
    if verdict.label == TrafficLabel::Attack {
        state.metrics.inc_attacks_flagged();
    }
    let verdict_name = match verdict.label {
        TrafficLabel::Normal => "Normal",
        TrafficLabel::Attack => "Attack",
    };
    state
        .logger
        .log_assessment(verdict_name, attack_kind.as_deref(), verdict.confidence);

    Ok(Json(CyberPrediction {
        prediction: match verdict.label {
            TrafficLabel::Normal => 0,
            TrafficLabel::Attack => 1,
        },
        verdict: verdict_name.to_string(),
        attack_kind,
        confidence: round2(verdict.confidence),
        probabilities: verdict.probabilities,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TriagePrediction {
    /// Class index of the diagnosed condition.
    pub prediction_id: usize,
    pub diagnosis: String,
    pub urgent: bool,
    /// Winning-class probability in percent (uncalibrated).
    pub confidence: f32,
    /// Condition name to probability percent.
    pub probabilities: BTreeMap<String, f32>,
    pub advice: Vec<String>,
}

async fn predict_sante(
    State(state): State<Arc<AppState>>,
    Json(report): Json<SymptomReport>,
) -> Result<Json<TriagePrediction>, ApiError> {
    let engine = state.registry.try_triage()?;

    let started = Instant::now();
    let diagnosis = engine.diagnose(&report).inspect_err(|e| {
        if e.is_input_error() {
            state.metrics.inc_rejected_inputs();
            state.logger.log_rejected_input("triage", &e.to_string());
        }
    })?;
    state
        .metrics
        .observe_prediction_latency("triage", started.elapsed().as_secs_f64());

    state.metrics.inc_diagnoses();
    if diagnosis.urgent {
        state.metrics.inc_urgent_diagnoses();
    }
    state.logger.log_diagnosis(
        diagnosis.condition.name(),
        diagnosis.urgent,
        diagnosis.confidence,
    );

    let probabilities = diagnosis
        .probabilities
        .iter()
        .enumerate()
        .filter_map(|(i, &p)| {
            twinguard_core::Condition::from_class_index(i)
                .map(|c| (c.name().to_string(), round2(p * 100.0)))
        })
        .collect();

    Ok(Json(TriagePrediction {
        prediction_id: diagnosis.condition.class_index(),
        diagnosis: diagnosis.condition.name().to_string(),
        urgent: diagnosis.urgent,
        confidence: round2(diagnosis.confidence),
        probabilities,
        advice: advice::advice_for(diagnosis.condition)
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub login: String,
    pub display_name: String,
    pub role: Role,
    pub modules: Vec<Module>,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match state.store.verify(&request.login, &request.password) {
        Some(user) => Ok(Json(LoginResponse {
            login: user.login,
            display_name: user.display_name,
            role: user.role,
            modules: user.role.modules().to_vec(),
        })),
        None => Err(ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "invalid login or password".to_string(),
        }),
    }
}

/// Health check - 200 while operational, 503 once a component fails.
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

/// Readiness check - 200 only after the models are trained.
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict/cyber", post(predict_cyber))
        .route("/predict/sante", post(predict_sante))
        .route("/auth/login", post(login))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
