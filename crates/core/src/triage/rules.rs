//! Diagnosis rule table and urgency policy
//!
//! The label a generated sample carries is a closed-form function of its
//! symptom flags: an ordered (predicate, condition) table evaluated first
//! match wins, with a default when nothing matches. The same table labels
//! the training corpus and backs the rule-agreement tests, so ordering and
//! exhaustiveness are testable on their own.

use crate::models::{Condition, SymptomReport};

/// One ordered diagnosis rule.
pub struct DiagnosisRule {
    pub condition: Condition,
    pub matches: fn(&SymptomReport) -> bool,
}

fn covid_pattern(r: &SymptomReport) -> bool {
    r.fever && r.cough && r.loss_of_smell
}

fn flu_pattern(r: &SymptomReport) -> bool {
    r.fever && r.cough && r.fatigue
}

fn cardiac_pattern(r: &SymptomReport) -> bool {
    r.chest_pain && r.shortness_of_breath
}

fn gastro_pattern(r: &SymptomReport) -> bool {
    r.nausea && r.diarrhea
}

fn migraine_pattern(r: &SymptomReport) -> bool {
    r.headache && r.fatigue
}

fn strep_pattern(r: &SymptomReport) -> bool {
    r.sore_throat && r.fever
}

fn asthma_anxiety_pattern(r: &SymptomReport) -> bool {
    r.palpitations && (r.shortness_of_breath || r.dizziness)
}

/// Table order is evaluation priority and class-index order.
pub static DIAGNOSIS_RULES: &[DiagnosisRule] = &[
    DiagnosisRule {
        condition: Condition::Covid19,
        matches: covid_pattern,
    },
    DiagnosisRule {
        condition: Condition::Flu,
        matches: flu_pattern,
    },
    DiagnosisRule {
        condition: Condition::Cardiac,
        matches: cardiac_pattern,
    },
    DiagnosisRule {
        condition: Condition::Gastroenteritis,
        matches: gastro_pattern,
    },
    DiagnosisRule {
        condition: Condition::Migraine,
        matches: migraine_pattern,
    },
    DiagnosisRule {
        condition: Condition::StrepThroat,
        matches: strep_pattern,
    },
    DiagnosisRule {
        condition: Condition::AsthmaAnxiety,
        matches: asthma_anxiety_pattern,
    },
];

/// First matching rule wins; a report matching nothing is non-specific.
pub fn diagnose_by_rule(report: &SymptomReport) -> Condition {
    DIAGNOSIS_RULES
        .iter()
        .find(|rule| (rule.matches)(report))
        .map(|rule| rule.condition)
        .unwrap_or(Condition::NonSpecific)
}

/// Confidence below this is flagged urgent regardless of condition.
pub const LOW_CONFIDENCE_URGENCY_PCT: f32 = 60.0;

/// Urgency policy: condition-name marker match, or low model confidence.
///
/// The confidence clause couples model uncertainty to clinical urgency;
/// it is preserved observed behavior, isolated here so it can be removed
/// without touching the rest of the pipeline.
pub fn is_urgent(condition: Condition, confidence_pct: f32) -> bool {
    let name = condition.name().to_lowercase();
    name.contains("cardiac")
        || name.contains("covid")
        || confidence_pct < LOW_CONFIDENCE_URGENCY_PCT
}
