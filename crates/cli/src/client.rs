//! API client for the Twinguard prediction service

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// HTTP client wrapper with the service's base URL.
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

// Request/response types mirroring the service's wire schema

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionRequest {
    pub requests_per_min: u32,
    pub duration_secs: u32,
    pub bytes_transferred: u64,
    pub ports_scanned: u32,
    pub error_rate: f32,
    pub suspect_flag: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SymptomRequest {
    pub fever: bool,
    pub cough: bool,
    pub fatigue: bool,
    pub headache: bool,
    pub sore_throat: bool,
    pub nausea: bool,
    pub chest_pain: bool,
    pub shortness_of_breath: bool,
    pub diarrhea: bool,
    pub chills: bool,
    pub loss_of_smell: bool,
    pub muscle_aches: bool,
    pub palpitations: bool,
    pub dizziness: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CyberPrediction {
    pub prediction: u8,
    pub verdict: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_kind: Option<String>,
    pub confidence: f32,
    pub probabilities: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriagePrediction {
    pub prediction_id: usize,
    pub diagnosis: String,
    pub urgent: bool,
    pub confidence: f32,
    pub probabilities: BTreeMap<String, f32>,
    pub advice: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liveness {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Readiness {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
