//! Static advisory lookup
//!
//! One entry per diagnosable condition, attached to responses by the
//! presentation layer. External to the model; never fed back into it.

use crate::models::Condition;

/// Advisory strings for a diagnosed condition.
pub fn advice_for(condition: Condition) -> &'static [&'static str] {
    match condition {
        Condition::Covid19 => &[
            "Isolate immediately and take an antigen test",
            "Monitor oxygen saturation twice a day",
            "Stay hydrated and rest",
            "Seek care if breathing worsens",
        ],
        Condition::Flu => &[
            "Rest and drink plenty of fluids",
            "Take your temperature every 4 hours",
            "Stay home until fever-free for 24 hours",
        ],
        Condition::Cardiac => &[
            "Call emergency services now",
            "Do not drive yourself to the hospital",
            "Sit down, stay calm, loosen tight clothing",
        ],
        Condition::Gastroenteritis => &[
            "Small sips of oral rehydration solution",
            "Avoid solid food for a few hours",
            "Seek care if symptoms persist beyond 48 hours",
        ],
        Condition::Migraine => &[
            "Rest in a dark, quiet room",
            "Apply a cold compress to the forehead",
            "Note triggers for your next consultation",
        ],
        Condition::StrepThroat => &[
            "See a doctor for a throat swab",
            "Warm salt-water gargles can ease pain",
            "Avoid sharing utensils or glasses",
        ],
        Condition::AsthmaAnxiety => &[
            "Sit upright and practice slow breathing",
            "Use your inhaler if one is prescribed",
            "Seek care if breathing does not settle",
        ],
        Condition::NonSpecific => &[
            "Monitor symptoms for the next 24-48 hours",
            "Stay hydrated and rest",
            "Consult a doctor if anything worsens",
        ],
    }
}
