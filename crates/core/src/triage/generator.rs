//! Synthetic patient corpus
//!
//! Fourteen independent Bernoulli(0.5) symptom flags per sample, labeled
//! by the deterministic diagnosis rule table. The classifier downstream is
//! therefore approximating a rule table, not learning from noise.

use super::rules;
use crate::ml::Corpus;
use crate::models::{SymptomReport, CONDITIONS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Feature names in trained order; mirrors `SymptomReport::flags`.
pub const SYMPTOM_SCHEMA: &[&str] = &[
    "fever",
    "cough",
    "fatigue",
    "headache",
    "sore_throat",
    "nausea",
    "chest_pain",
    "shortness_of_breath",
    "diarrhea",
    "chills",
    "loss_of_smell",
    "muscle_aches",
    "palpitations",
    "dizziness",
];

/// Generation parameters.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub samples: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 2000,
            seed: 99,
        }
    }
}

fn draw_report(rng: &mut StdRng) -> SymptomReport {
    SymptomReport {
        fever: rng.gen_bool(0.5),
        cough: rng.gen_bool(0.5),
        fatigue: rng.gen_bool(0.5),
        headache: rng.gen_bool(0.5),
        sore_throat: rng.gen_bool(0.5),
        nausea: rng.gen_bool(0.5),
        chest_pain: rng.gen_bool(0.5),
        shortness_of_breath: rng.gen_bool(0.5),
        diarrhea: rng.gen_bool(0.5),
        chills: rng.gen_bool(0.5),
        loss_of_smell: rng.gen_bool(0.5),
        muscle_aches: rng.gen_bool(0.5),
        palpitations: rng.gen_bool(0.5),
        dizziness: rng.gen_bool(0.5),
    }
}

/// Build the labeled corpus; the label is the rule table's verdict on the
/// drawn flags.
pub fn generate(config: &GeneratorConfig) -> Corpus {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut corpus = Corpus::new(SYMPTOM_SCHEMA, CONDITIONS.len());
    for _ in 0..config.samples {
        let report = draw_report(&mut rng);
        let label = rules::diagnose_by_rule(&report).class_index();
        corpus.push(report.to_features(), label);
    }
    corpus
}
