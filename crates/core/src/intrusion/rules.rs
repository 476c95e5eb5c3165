//! Attack sub-typing rules
//!
//! Applied only after the ensemble flags a connection as an attack, and
//! always against the raw (un-normalized) inputs. Ordered first-match-wins
//! table; the request-rate rule outranks the port-sweep rule by design.

use crate::models::{AttackKind, ConnectionMetrics};

/// One ordered overlay rule.
pub struct AttackRule {
    pub kind: AttackKind,
    pub matches: fn(&ConnectionMetrics) -> bool,
}

fn flood_pattern(m: &ConnectionMetrics) -> bool {
    m.requests_per_min > 2000
}

fn port_sweep_pattern(m: &ConnectionMetrics) -> bool {
    m.ports_scanned > 30
}

fn brute_force_pattern(m: &ConnectionMetrics) -> bool {
    m.error_rate > 0.7
}

/// Evaluation order is the table order.
pub static ATTACK_RULES: &[AttackRule] = &[
    AttackRule {
        kind: AttackKind::DosDdos,
        matches: flood_pattern,
    },
    AttackRule {
        kind: AttackKind::PortScan,
        matches: port_sweep_pattern,
    },
    AttackRule {
        kind: AttackKind::BruteForce,
        matches: brute_force_pattern,
    },
];

/// First matching rule wins; anything else is generic suspicious activity.
pub fn classify_attack(metrics: &ConnectionMetrics) -> AttackKind {
    ATTACK_RULES
        .iter()
        .find(|rule| (rule.matches)(metrics))
        .map(|rule| rule.kind)
        .unwrap_or(AttackKind::Suspicious)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(requests: u32, ports: u32, error_rate: f32) -> ConnectionMetrics {
        ConnectionMetrics {
            requests_per_min: requests,
            duration_secs: 2,
            bytes_transferred: 150,
            ports_scanned: ports,
            error_rate,
            suspect_flag: true,
        }
    }

    #[test]
    fn test_flood_outranks_port_sweep() {
        // Both thresholds exceeded: the request-rate rule has priority.
        assert_eq!(
            classify_attack(&metrics(3000, 50, 0.1)),
            AttackKind::DosDdos
        );
    }

    #[test]
    fn test_port_sweep_when_rate_is_low() {
        assert_eq!(
            classify_attack(&metrics(100, 50, 0.1)),
            AttackKind::PortScan
        );
    }

    #[test]
    fn test_brute_force_on_error_rate() {
        assert_eq!(
            classify_attack(&metrics(100, 5, 0.9)),
            AttackKind::BruteForce
        );
    }

    #[test]
    fn test_default_is_suspicious() {
        assert_eq!(
            classify_attack(&metrics(100, 5, 0.1)),
            AttackKind::Suspicious
        );
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        // Exactly at a threshold does not trigger that rule.
        assert_eq!(
            classify_attack(&metrics(2000, 30, 0.7)),
            AttackKind::Suspicious
        );
    }
}
