//! Twinguard CLI
//!
//! A command-line client for the Twinguard prediction service: submit
//! network connections and symptom reports, check service status.

mod client;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::{ApiClient, ConnectionRequest, SymptomRequest};

/// Twinguard prediction service CLI
#[derive(Parser)]
#[command(name = "twg")]
#[command(author, version, about = "CLI for the Twinguard prediction service", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via TWG_API_URL env var)
    #[arg(long, env = "TWG_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assess one network connection
    Cyber {
        /// Requests per minute
        #[arg(long)]
        requests: u32,

        /// Connection duration in seconds
        #[arg(long)]
        duration: u32,

        /// Bytes transferred
        #[arg(long)]
        bytes: u64,

        /// Distinct ports scanned
        #[arg(long)]
        ports: u32,

        /// Error rate between 0 and 1
        #[arg(long)]
        error_rate: f32,

        /// Suspect protocol flag observed
        #[arg(long)]
        suspect: bool,
    },

    /// Diagnose from symptom flags
    Triage {
        #[arg(long)]
        fever: bool,
        #[arg(long)]
        cough: bool,
        #[arg(long)]
        fatigue: bool,
        #[arg(long)]
        headache: bool,
        #[arg(long)]
        sore_throat: bool,
        #[arg(long)]
        nausea: bool,
        #[arg(long)]
        chest_pain: bool,
        #[arg(long)]
        shortness_of_breath: bool,
        #[arg(long)]
        diarrhea: bool,
        #[arg(long)]
        chills: bool,
        #[arg(long)]
        loss_of_smell: bool,
        #[arg(long)]
        muscle_aches: bool,
        #[arg(long)]
        palpitations: bool,
        #[arg(long)]
        dizziness: bool,
    },

    /// Service liveness and readiness
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Cyber {
            requests,
            duration,
            bytes,
            ports,
            error_rate,
            suspect,
        } => {
            let request = ConnectionRequest {
                requests_per_min: requests,
                duration_secs: duration,
                bytes_transferred: bytes,
                ports_scanned: ports,
                error_rate,
                suspect_flag: suspect,
            };
            let prediction: client::CyberPrediction =
                client.post("/predict/cyber", &request).await?;

            if prediction.prediction == 1 {
                let kind = prediction.attack_kind.as_deref().unwrap_or("Unknown");
                output::print_error(&format!(
                    "ATTACK — {} (confidence {})",
                    kind,
                    output::format_confidence(prediction.confidence)
                ));
            } else {
                output::print_success(&format!(
                    "Normal connection (confidence {})",
                    output::format_confidence(prediction.confidence)
                ));
            }
            output::print_probabilities(
                vec![
                    ("Normal".to_string(), prediction.probabilities[0] * 100.0),
                    ("Attack".to_string(), prediction.probabilities[1] * 100.0),
                ],
                cli.format,
            );
        }

        Commands::Triage {
            fever,
            cough,
            fatigue,
            headache,
            sore_throat,
            nausea,
            chest_pain,
            shortness_of_breath,
            diarrhea,
            chills,
            loss_of_smell,
            muscle_aches,
            palpitations,
            dizziness,
        } => {
            let request = SymptomRequest {
                fever,
                cough,
                fatigue,
                headache,
                sore_throat,
                nausea,
                chest_pain,
                shortness_of_breath,
                diarrhea,
                chills,
                loss_of_smell,
                muscle_aches,
                palpitations,
                dizziness,
            };
            let prediction: client::TriagePrediction =
                client.post("/predict/sante", &request).await?;

            if prediction.urgent {
                output::print_warning(&format!(
                    "URGENT — probable diagnosis: {} (confidence {})",
                    prediction.diagnosis,
                    output::format_confidence(prediction.confidence)
                ));
            } else {
                output::print_success(&format!(
                    "Probable diagnosis: {} (confidence {})",
                    prediction.diagnosis,
                    output::format_confidence(prediction.confidence)
                ));
            }
            output::print_probabilities(prediction.probabilities.into_iter().collect(), cli.format);

            println!();
            for advice in &prediction.advice {
                output::print_info(advice);
            }
        }

        Commands::Status => {
            let liveness: client::Liveness = client.get("/").await?;
            output::print_success(&format!(
                "{} v{} is {}",
                liveness.service, liveness.version, liveness.status
            ));

            let readiness: client::Readiness = client.get("/readyz").await?;
            if readiness.ready {
                output::print_success("models trained and ready");
            } else {
                output::print_warning(
                    readiness.reason.as_deref().unwrap_or("service not ready"),
                );
            }
        }
    }

    Ok(())
}
