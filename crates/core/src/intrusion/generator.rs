//! Synthetic network-traffic corpus
//!
//! Two classes drawn from fixed uniform ranges, one parameter profile per
//! class. Regenerating with the same seed and sample count yields an
//! identical corpus, which the determinism tests rely on.

use crate::ml::Corpus;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Feature names in trained order.
pub const CONNECTION_SCHEMA: &[&str] = &[
    "requests_per_min",
    "duration_secs",
    "bytes_transferred",
    "ports_scanned",
    "error_rate",
    "suspect_flag",
];

pub const LABEL_NORMAL: usize = 0;
pub const LABEL_ATTACK: usize = 1;

/// Uniform draw ranges for one traffic class.
#[derive(Debug, Clone)]
pub struct TrafficProfile {
    pub requests_per_min: Range<u32>,
    pub duration_secs: Range<u32>,
    pub bytes_transferred: Range<u32>,
    pub ports_scanned: Range<u32>,
    pub error_rate: Range<f32>,
    pub suspect_flag: f32,
}

/// Benign traffic: steady request rates, long connections, few ports.
pub fn normal_profile() -> TrafficProfile {
    TrafficProfile {
        requests_per_min: 5..300,
        duration_secs: 10..120,
        bytes_transferred: 500..10_000,
        ports_scanned: 1..4,
        error_rate: 0.0..0.1,
        suspect_flag: 0.0,
    }
}

/// Attack traffic: floods of short connections, wide port sweeps, errors.
pub fn attack_profile() -> TrafficProfile {
    TrafficProfile {
        requests_per_min: 500..8000,
        duration_secs: 0..5,
        bytes_transferred: 10..300,
        ports_scanned: 20..200,
        error_rate: 0.5..1.0,
        suspect_flag: 1.0,
    }
}

/// Generation parameters.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Total samples; split evenly between the two classes.
    pub samples: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 3000,
            seed: 42,
        }
    }
}

fn draw(profile: &TrafficProfile, rng: &mut StdRng) -> Vec<f32> {
    vec![
        rng.gen_range(profile.requests_per_min.clone()) as f32,
        rng.gen_range(profile.duration_secs.clone()) as f32,
        rng.gen_range(profile.bytes_transferred.clone()) as f32,
        rng.gen_range(profile.ports_scanned.clone()) as f32,
        rng.gen_range(profile.error_rate.clone()),
        profile.suspect_flag,
    ]
}

/// Build the labeled corpus: N/2 normal then N/2 attack rows, shuffled
/// with the same seeded stream.
pub fn generate(config: &GeneratorConfig) -> Corpus {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let per_class = config.samples / 2;

    let normal = normal_profile();
    let attack = attack_profile();

    let mut samples: Vec<(Vec<f32>, usize)> = Vec::with_capacity(per_class * 2);
    for _ in 0..per_class {
        samples.push((draw(&normal, &mut rng), LABEL_NORMAL));
    }
    for _ in 0..per_class {
        samples.push((draw(&attack, &mut rng), LABEL_ATTACK));
    }
    samples.shuffle(&mut rng);

    let mut corpus = Corpus::new(CONNECTION_SCHEMA, 2);
    for (row, label) in samples {
        corpus.push(row, label);
    }
    corpus
}
