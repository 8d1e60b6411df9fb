//! Discrete risk classification.

use stalwart_types::{MetricStatus, RiskLevel};

/// Count of each status among the classified metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub safe: usize,
    pub warning: usize,
    pub caution: usize,
    pub critical: usize,
}

impl StatusCounts {
    /// Tally statuses, skipping unclassified metrics.
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Option<MetricStatus>>,
    {
        statuses
            .into_iter()
            .flatten()
            .fold(Self::default(), |mut counts, status| {
                match status {
                    MetricStatus::Safe => counts.safe += 1,
                    MetricStatus::Warning => counts.warning += 1,
                    MetricStatus::Caution => counts.caution += 1,
                    MetricStatus::Critical => counts.critical += 1,
                }
                counts
            })
    }
}

/// Map metric statuses plus the health score to a risk level.
///
/// Rules are evaluated in order and the first match wins, so discrete
/// statuses always dominate the continuous score:
///
/// 1. two or more CRITICAL: EMERGENCY
/// 2. one CRITICAL: CRITICAL
/// 3. three or more CAUTION: CAUTION
/// 4. any CAUTION: WARNING
/// 5. two or more WARNING: WARNING
/// 6. one WARNING: MONITOR
/// 7. health below 60: WARNING
/// 8. health below 75: MONITOR
/// 9. otherwise SAFE
pub fn classify_risk(counts: StatusCounts, health: f64) -> RiskLevel {
    match counts {
        StatusCounts { critical: 2.., .. } => RiskLevel::Emergency,
        StatusCounts { critical: 1, .. } => RiskLevel::Critical,
        StatusCounts { caution: 3.., .. } => RiskLevel::Caution,
        StatusCounts { caution: 1.., .. } => RiskLevel::Warning,
        StatusCounts { warning: 2.., .. } => RiskLevel::Warning,
        StatusCounts { warning: 1, .. } => RiskLevel::Monitor,
        _ if health < 60.0 => RiskLevel::Warning,
        _ if health < 75.0 => RiskLevel::Monitor,
        _ => RiskLevel::Safe,
    }
}
