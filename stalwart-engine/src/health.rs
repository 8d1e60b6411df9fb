//! Overall health score.

use std::collections::BTreeMap;

use stalwart_types::{Parameter, ThresholdTable};

/// Score returned when no parameter is present.
pub const NEUTRAL_HEALTH: f64 = 50.0;

/// Health contribution of one parameter value.
///
/// Inverted parameters contribute `value * 100`. Others contribute
/// `max(0, 100 - value / max * 100)`, where `max` comes from the parameter's
/// spec (1.0 without one). There is no upper bound, so a negative drift
/// scores above 100.
pub fn contribution(parameter: Parameter, value: f64, thresholds: &ThresholdTable) -> f64 {
    let (inverted, max) = thresholds
        .get(parameter)
        .map(|spec| (spec.inverted, spec.max))
        .unwrap_or((false, 1.0));

    if inverted {
        value * 100.0
    } else if max != 0.0 {
        (100.0 - value / max * 100.0).max(0.0)
    } else {
        0.0
    }
}

/// Weighted health percentage over the parameters present.
///
/// The sum is normalized by the weights actually present, so an absent
/// parameter does not drag the score toward zero. The average itself is
/// bounded to `[0, 100]`.
pub fn overall_health(values: &BTreeMap<Parameter, f64>, thresholds: &ThresholdTable) -> f64 {
    let (weighted, total_weight) = values.iter().fold((0.0, 0.0), |(sum, total), (p, v)| {
        let weight = p.health_weight();
        (sum + weight * contribution(*p, *v, thresholds), total + weight)
    });

    if total_weight > 0.0 {
        (weighted / total_weight).clamp(0.0, 100.0)
    } else {
        NEUTRAL_HEALTH
    }
}
