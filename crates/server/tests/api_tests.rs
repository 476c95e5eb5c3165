//! Integration tests for the prediction API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;
use twinguard_core::{
    auth::MemoryCredentialStore, health::components, intrusion, triage, HealthRegistry,
    ModelRegistry, RegistrySettings, ServiceMetrics, StructuredLogger,
};
use twinguard_server::api::{AppState, CyberPrediction, TriagePrediction};

fn small_settings() -> RegistrySettings {
    RegistrySettings {
        intrusion: intrusion::DetectorConfig {
            generator: intrusion::GeneratorConfig {
                samples: 400,
                seed: 42,
            },
        },
        triage: triage::TriageConfig {
            generator: triage::GeneratorConfig {
                samples: 400,
                seed: 99,
            },
        },
    }
}

async fn setup_app(warm: bool) -> (Router, Arc<AppState>) {
    let registry = Arc::new(ModelRegistry::new(small_settings()));
    if warm {
        registry.warm().unwrap();
    }

    let health_registry = HealthRegistry::new();
    health_registry.register(components::INTRUSION_MODEL).await;
    health_registry.register(components::TRIAGE_MODEL).await;
    health_registry.set_ready(warm).await;

    let state = Arc::new(AppState {
        registry,
        store: Arc::new(MemoryCredentialStore::with_default_accounts()),
        health_registry,
        metrics: ServiceMetrics::new(),
        logger: StructuredLogger::new("test-server"),
    });
    let router = twinguard_server::api::create_router(state.clone());
    (router, state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn normal_connection() -> serde_json::Value {
    serde_json::json!({
        "requests_per_min": 150,
        "duration_secs": 45,
        "bytes_transferred": 2500,
        "ports_scanned": 2,
        "error_rate": 0.02,
        "suspect_flag": false
    })
}

fn ddos_connection() -> serde_json::Value {
    serde_json::json!({
        "requests_per_min": 5000,
        "duration_secs": 2,
        "bytes_transferred": 150,
        "ports_scanned": 5,
        "error_rate": 0.9,
        "suspect_flag": true
    })
}

#[tokio::test]
async fn test_liveness_marker() {
    let (app, _) = setup_app(true).await;
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["status"], "online");
    assert_eq!(body["service"], "twinguard");
}

#[tokio::test]
async fn test_predict_cyber_normal_traffic() {
    let (app, _) = setup_app(true).await;
    let response = app
        .oneshot(post_json("/predict/cyber", normal_connection()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let prediction: CyberPrediction = read_json(response).await;
    assert_eq!(prediction.prediction, 0);
    assert_eq!(prediction.verdict, "Normal");
    assert!(prediction.attack_kind.is_none());
    assert!(prediction.probabilities[1] < 0.5);
}

#[tokio::test]
async fn test_predict_cyber_ddos() {
    let (app, _) = setup_app(true).await;
    let response = app
        .oneshot(post_json("/predict/cyber", ddos_connection()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let prediction: CyberPrediction = read_json(response).await;
    assert_eq!(prediction.prediction, 1);
    assert_eq!(prediction.verdict, "Attack");
    assert_eq!(prediction.attack_kind.as_deref(), Some("DoS/DDoS"));
    assert!(prediction.probabilities[1] > 0.5);
}

#[tokio::test]
async fn test_predict_cyber_rejects_unknown_fields() {
    let (app, _) = setup_app(true).await;
    let mut body = normal_connection();
    body["surprise"] = serde_json::json!(1);
    let response = app
        .oneshot(post_json("/predict/cyber", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_sante_covid_pattern() {
    let (app, _) = setup_app(true).await;
    let body = serde_json::json!({
        "fever": true, "cough": true, "fatigue": false, "headache": false,
        "sore_throat": false, "nausea": false, "chest_pain": false,
        "shortness_of_breath": false, "diarrhea": false, "chills": false,
        "loss_of_smell": true, "muscle_aches": false, "palpitations": false,
        "dizziness": false
    });
    let response = app.oneshot(post_json("/predict/sante", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let prediction: TriagePrediction = read_json(response).await;
    assert_eq!(prediction.prediction_id, 0);
    assert_eq!(prediction.diagnosis, "COVID-19");
    assert!(prediction.urgent);
    assert_eq!(prediction.probabilities.len(), 8);
    assert!(!prediction.advice.is_empty());
}

#[tokio::test]
async fn test_predict_sante_rejects_empty_report() {
    let (app, _) = setup_app(true).await;
    let body = serde_json::json!({
        "fever": false, "cough": false, "fatigue": false, "headache": false,
        "sore_throat": false, "nausea": false, "chest_pain": false,
        "shortness_of_breath": false, "diarrhea": false, "chills": false,
        "loss_of_smell": false, "muscle_aches": false, "palpitations": false,
        "dizziness": false
    });
    let response = app.oneshot(post_json("/predict/sante", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: serde_json::Value = read_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("symptom"));
}

#[tokio::test]
async fn test_predict_before_warmup_returns_503() {
    let (app, _) = setup_app(false).await;
    let response = app
        .oneshot(post_json("/predict/cyber", normal_connection()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_readyz_tracks_warmup() {
    let (cold, _) = setup_app(false).await;
    let response = cold.oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let (warm, _) = setup_app(true).await;
    let response = warm.oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_healthz_reports_components() {
    let (app, _) = setup_app(true).await;
    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: serde_json::Value = read_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["intrusion_model"].is_object());
    assert!(health["components"]["triage_model"].is_object());
}

#[tokio::test]
async fn test_login_round_trip() {
    let (app, _) = setup_app(true).await;
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            serde_json::json!({"login": "analyst", "password": "analysis123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["role"], "security_analyst");
    let modules = body["modules"].as_array().unwrap();
    assert!(modules.iter().any(|m| m == "intrusion"));
    assert!(!modules.iter().any(|m| m == "triage"));

    let response = app
        .oneshot(post_json(
            "/auth/login",
            serde_json::json!({"login": "analyst", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_service_metrics() {
    let (app, state) = setup_app(true).await;
    state.metrics.observe_prediction_latency("intrusion", 0.0002);
    state.metrics.set_model_build_time("triage", 0.5);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("twinguard_prediction_latency_seconds"));
    assert!(text.contains("twinguard_model_build_seconds"));
}
