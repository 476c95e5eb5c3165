//! Core data models shared by both prediction domains

use serde::{Deserialize, Serialize};

/// One observed network connection, as supplied by the presentation layer.
///
/// Field set and order are fixed at model-build time; requests with unknown
/// or missing fields are rejected at the serde boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionMetrics {
    pub requests_per_min: u32,
    pub duration_secs: u32,
    pub bytes_transferred: u64,
    pub ports_scanned: u32,
    pub error_rate: f32,
    pub suspect_flag: bool,
}

impl ConnectionMetrics {
    /// Flatten into the trained feature order.
    pub fn to_features(&self) -> Vec<f32> {
        vec![
            self.requests_per_min as f32,
            self.duration_secs as f32,
            self.bytes_transferred as f32,
            self.ports_scanned as f32,
            self.error_rate,
            if self.suspect_flag { 1.0 } else { 0.0 },
        ]
    }
}

/// Binary verdict over a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLabel {
    Normal,
    Attack,
}

/// Attack sub-type assigned by the rule overlay, not by the classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    DosDdos,
    PortScan,
    BruteForce,
    Suspicious,
}

impl AttackKind {
    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::DosDdos => "DoS/DDoS",
            AttackKind::PortScan => "Port scan",
            AttackKind::BruteForce => "Brute force",
            AttackKind::Suspicious => "Suspicious activity",
        }
    }
}

/// Result of one intrusion assessment.
///
/// `confidence` is the winning-class probability scaled to percent. It is
/// not a calibrated interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficVerdict {
    pub label: TrafficLabel,
    pub attack_kind: Option<AttackKind>,
    pub confidence: f32,
    /// Averaged class probabilities, [normal, attack].
    pub probabilities: [f32; 2],
    pub generated_at: i64,
}

/// One patient's symptom flags, as supplied by the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymptomReport {
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

impl SymptomReport {
    /// Flatten into the trained feature order.
    pub fn to_features(&self) -> Vec<f32> {
        self.flags().iter().map(|&f| if f { 1.0 } else { 0.0 }).collect()
    }

    /// All fourteen flags in schema order.
    pub fn flags(&self) -> [bool; 14] {
        [
            self.fever,
            self.cough,
            self.fatigue,
            self.headache,
            self.sore_throat,
            self.nausea,
            self.chest_pain,
            self.shortness_of_breath,
            self.diarrhea,
            self.chills,
            self.loss_of_smell,
            self.muscle_aches,
            self.palpitations,
            self.dizziness,
        ]
    }

    /// Number of symptoms set.
    pub fn active_count(&self) -> usize {
        self.flags().iter().filter(|&&f| f).count()
    }
}

/// The eight diagnosable conditions, in rule-priority (= class index) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Covid19,
    Flu,
    Cardiac,
    Gastroenteritis,
    Migraine,
    StrepThroat,
    AsthmaAnxiety,
    NonSpecific,
}

/// All conditions in class-index order.
pub const CONDITIONS: [Condition; 8] = [
    Condition::Covid19,
    Condition::Flu,
    Condition::Cardiac,
    Condition::Gastroenteritis,
    Condition::Migraine,
    Condition::StrepThroat,
    Condition::AsthmaAnxiety,
    Condition::NonSpecific,
];

impl Condition {
    pub fn name(&self) -> &'static str {
        match self {
            Condition::Covid19 => "COVID-19",
            Condition::Flu => "Flu",
            Condition::Cardiac => "Cardiac condition",
            Condition::Gastroenteritis => "Gastroenteritis",
            Condition::Migraine => "Migraine",
            Condition::StrepThroat => "Strep throat",
            Condition::AsthmaAnxiety => "Asthma/Anxiety",
            Condition::NonSpecific => "Non-specific symptoms",
        }
    }

    pub fn class_index(&self) -> usize {
        CONDITIONS.iter().position(|c| c == self).unwrap_or(CONDITIONS.len() - 1)
    }

    pub fn from_class_index(index: usize) -> Option<Condition> {
        CONDITIONS.get(index).copied()
    }
}

/// Result of one triage run.
///
/// `confidence` is the winning-class probability scaled to percent, not a
/// calibrated interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub condition: Condition,
    pub urgent: bool,
    pub confidence: f32,
    /// Per-condition probabilities, in class-index order.
    pub probabilities: Vec<f32>,
    pub generated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_feature_order() {
        let metrics = ConnectionMetrics {
            requests_per_min: 150,
            duration_secs: 45,
            bytes_transferred: 2500,
            ports_scanned: 2,
            error_rate: 0.02,
            suspect_flag: false,
        };
        let features = metrics.to_features();
        assert_eq!(features.len(), 6);
        assert_eq!(features[0], 150.0);
        assert_eq!(features[3], 2.0);
        assert_eq!(features[5], 0.0);
    }

    #[test]
    fn test_symptom_report_counts_active_flags() {
        let report = SymptomReport {
            fever: true,
            cough: true,
            loss_of_smell: true,
            ..Default::default()
        };
        assert_eq!(report.active_count(), 3);
        assert_eq!(report.to_features().len(), 14);
        assert_eq!(SymptomReport::default().active_count(), 0);
    }

    #[test]
    fn test_condition_index_round_trip() {
        for (i, condition) in CONDITIONS.iter().enumerate() {
            assert_eq!(condition.class_index(), i);
            assert_eq!(Condition::from_class_index(i), Some(*condition));
        }
        assert_eq!(Condition::from_class_index(8), None);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let body = r#"{"requests_per_min":1,"duration_secs":1,"bytes_transferred":1,
                       "ports_scanned":1,"error_rate":0.1,"suspect_flag":false,"extra":1}"#;
        assert!(serde_json::from_str::<ConnectionMetrics>(body).is_err());
    }
}
