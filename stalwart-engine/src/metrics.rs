//! The nine structural-condition metric calculators.
//!
//! Each calculator is a pure function of its domain inputs and the threshold
//! table. Missing or degenerate inputs never fail a calculation: the result
//! falls back to a documented default and carries a reduced confidence.
//! When the table has no spec for a parameter the result is left
//! unclassified (`status == None`).

use stalwart_types::{MetricResult, MetricStatus, Parameter, ThresholdTable};

use crate::rainflow;
use crate::specs::{BridgeType, MaterialProperties};

/// Confidence assigned when a calculator had to substitute a default.
pub const DEGRADED_CONFIDENCE: f64 = 0.5;

/// Flutter results are inflated by this factor as a safety margin.
const FLUTTER_SAFETY_MARGIN: f64 = 1.1;

/// Elastic modulus used to convert fatigue strain to stress (Pa).
const FATIGUE_ELASTIC_MODULUS: f64 = 200e9;
/// S-N curve constant for the inverse-cube fatigue law (MPa³).
const SN_CURVE_CONSTANT: f64 = 2e12;

/// Fraction of wires whose loss makes a cable critical.
const CRITICAL_WIRE_FRACTION: f64 = 0.02;

/// Linear frequency correction per degree of temperature difference.
const FREQUENCY_TEMPERATURE_COEFFICIENT: f64 = 0.0002;

/// Chloride concentration at which reinforcement corrosion initiates (% by
/// mass of cement).
const CHLORIDE_LIMIT: f64 = 0.4;

const TVR_BOUNDS: (f64, f64) = (0.1, 1.0);

const STRAIN_ENERGY_SCALE: f64 = 50.0;

fn classify(thresholds: &ThresholdTable, parameter: Parameter, value: f64) -> Option<MetricStatus> {
    thresholds.get(parameter).map(|spec| spec.classify(value))
}

/// Inputs to the aeroelastic flutter coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlutterInput {
    /// Mean wind speed (m/s).
    pub wind_speed: f64,
    /// Vertical deck amplitude (m).
    pub vertical_amplitude: f64,
    pub damping_ratio: f64,
    /// Dominant frequency (Hz).
    pub frequency: f64,
    /// Wind speed at flutter onset (m/s).
    pub critical_flutter_speed: f64,
    pub design_amplitude: f64,
    pub design_damping: f64,
    pub design_frequency: f64,
}

/// AFC: closeness to aeroelastic flutter.
///
/// `VR * AR * (1 + DR) * (1 + FR) * 1.1` where VR is wind over critical
/// speed, AR the square-root amplitude ratio, DR the damping reduction and
/// FR the relative frequency shift. Ratios with a non-positive design
/// denominator contribute zero.
pub fn calculate_afc(input: &FlutterInput, thresholds: &ThresholdTable) -> MetricResult {
    let mut confidence = 0.9;

    let velocity_ratio = if input.critical_flutter_speed > 0.0 {
        input.wind_speed / input.critical_flutter_speed
    } else {
        confidence = DEGRADED_CONFIDENCE;
        0.0
    };
    let amplitude_ratio = if input.design_amplitude > 0.0 {
        (input.vertical_amplitude.max(0.0) / input.design_amplitude).sqrt()
    } else {
        0.0
    };
    let damping_reduction = if input.design_damping > 0.0 {
        1.0 - input.damping_ratio / input.design_damping
    } else {
        0.0
    };
    let frequency_shift = if input.design_frequency > 0.0 {
        (input.frequency - input.design_frequency).abs() / input.design_frequency
    } else {
        0.0
    };

    let afc = velocity_ratio
        * amplitude_ratio
        * (1.0 + damping_reduction)
        * (1.0 + frequency_shift)
        * FLUTTER_SAFETY_MARGIN;

    MetricResult::new(afc, classify(thresholds, Parameter::Afc, afc), confidence)
        .detail("velocity_ratio", velocity_ratio)
        .detail("amplitude_ratio", amplitude_ratio)
        .detail("damping_reduction", damping_reduction)
        .detail("frequency_shift", frequency_shift)
}

/// ALSA: accumulated fatigue damage from a strain history (µε).
///
/// Strain is converted to stress (MPa), rainflow-counted, and each cycle
/// adds `count * range³ / 2e12` to the Miner damage sum. The sum is scaled
/// by `design_cycles / samples`.
///
/// A history too short to hold a cycle falls back to mean strain over yield
/// strain at degraded confidence.
pub fn calculate_alsa(
    strain: &[f64],
    yield_strain: f64,
    design_cycles: f64,
    thresholds: &ThresholdTable,
) -> MetricResult {
    if strain.len() < 2 {
        let mean = crate::estimators::mean(strain).unwrap_or(0.0);
        let alsa = if yield_strain > 0.0 { mean / yield_strain } else { 0.0 };
        return MetricResult::new(alsa, classify(thresholds, Parameter::Alsa, alsa), DEGRADED_CONFIDENCE)
            .detail("simplified", 1.0);
    }

    let stress: Vec<f64> = strain
        .iter()
        .map(|s| s * 1e-6 * FATIGUE_ELASTIC_MODULUS / 1e6)
        .collect();
    let cycles = rainflow::count_cycles(&stress);

    let damage: f64 = cycles
        .iter()
        .filter(|c| c.range > 0.0)
        .map(|c| c.count * c.range.powi(3) / SN_CURVE_CONSTANT)
        .sum();

    let alsa = damage * design_cycles / strain.len() as f64;

    MetricResult::new(alsa, classify(thresholds, Parameter::Alsa, alsa), 0.9)
        .detail("damage_total", damage)
        .detail("cycles_counted", cycles.len() as f64)
}

/// CPII: remaining cable integrity, `1 - breaks / (2% of wires)`.
///
/// Only meaningful for cable-supported bridges; other types score a perfect
/// 1.0. A cable-supported bridge without wire counts also scores 1.0, at
/// degraded confidence. The value never drops below zero.
pub fn calculate_cpii(
    bridge_type: BridgeType,
    wire_breaks: Option<u32>,
    total_wires: Option<u32>,
    thresholds: &ThresholdTable,
) -> MetricResult {
    let (cpii, confidence) = match (bridge_type.is_cable_supported(), wire_breaks, total_wires) {
        (false, _, _) => (1.0, 0.85),
        (true, Some(breaks), Some(total)) if total > 0 => {
            let critical_breaks = ((CRITICAL_WIRE_FRACTION * total as f64) as u32).max(1);
            let cpii = 1.0 - breaks as f64 / critical_breaks as f64;
            (cpii.max(0.0), 0.85)
        }
        (true, _, _) => (1.0, DEGRADED_CONFIDENCE),
    };

    MetricResult::new(cpii, classify(thresholds, Parameter::Cpii, cpii), confidence)
}

/// FFD: drift of the fundamental frequency from its baseline, in percent.
///
/// When both temperatures are known the current frequency is first corrected
/// by 0.02% per degree. Status is classified on the magnitude of the drift.
pub fn calculate_ffd(
    current_frequency: f64,
    baseline_frequency: f64,
    temperature: Option<f64>,
    reference_temperature: Option<f64>,
    thresholds: &ThresholdTable,
) -> MetricResult {
    let corrected = match (temperature, reference_temperature) {
        (Some(t), Some(reference)) => {
            current_frequency * (1.0 + FREQUENCY_TEMPERATURE_COEFFICIENT * (t - reference))
        }
        _ => current_frequency,
    };

    if baseline_frequency <= 0.0 {
        return MetricResult::new(0.0, classify(thresholds, Parameter::Ffd, 0.0), DEGRADED_CONFIDENCE)
            .detail("corrected_frequency", corrected);
    }

    let ffd = (corrected - baseline_frequency) / baseline_frequency * 100.0;

    MetricResult::new(ffd, classify(thresholds, Parameter::Ffd, ffd.abs()), 0.95)
        .detail("corrected_frequency", corrected)
        .detail("baseline_frequency", baseline_frequency)
}

/// LTS: thermal stress locked in by inefficient expansion joints, as a
/// percentage of the material strength.
///
/// `E * α * ΔT * (1 - measured/expected) / strength * 100`. A non-positive
/// expected expansion is treated as a fully efficient joint.
pub fn calculate_lts(
    temperature_delta: f64,
    measured_expansion: f64,
    expected_expansion: f64,
    material: &MaterialProperties,
    thresholds: &ThresholdTable,
) -> MetricResult {
    let joint_efficiency = if expected_expansion > 0.0 {
        measured_expansion / expected_expansion
    } else {
        1.0
    };
    let stress = material.elastic_modulus
        * material.thermal_expansion
        * temperature_delta
        * (1.0 - joint_efficiency);
    let lts = stress / material.strength * 100.0;

    MetricResult::new(lts, classify(thresholds, Parameter::Lts, lts), 0.9)
        .detail("joint_efficiency", joint_efficiency)
        .detail("thermal_stress_mpa", stress / 1e6)
}

/// CCF: corrosion initiation risk, in percent.
///
/// The larger of chloride concentration over its 0.4 limit and carbonation
/// depth over concrete cover. Zero at degraded confidence when neither
/// ratio can be formed.
pub fn calculate_ccf(
    chloride_concentration: Option<f64>,
    carbonation_depth: Option<f64>,
    concrete_cover: Option<f64>,
    thresholds: &ThresholdTable,
) -> MetricResult {
    let chloride_ratio = chloride_concentration.map(|c| c / CHLORIDE_LIMIT * 100.0);
    let carbonation_ratio = match (carbonation_depth, concrete_cover) {
        (Some(depth), Some(cover)) if cover > 0.0 => Some(depth / cover * 100.0),
        _ => None,
    };

    let (ccf, confidence) = match (chloride_ratio, carbonation_ratio) {
        (None, None) => (0.0, DEGRADED_CONFIDENCE),
        (a, b) => (a.unwrap_or(f64::MIN).max(b.unwrap_or(f64::MIN)), 0.85),
    };

    let mut result = MetricResult::new(ccf, classify(thresholds, Parameter::Ccf, ccf), confidence);
    if let Some(ratio) = chloride_ratio {
        result = result.detail("chloride_ratio", ratio);
    }
    if let Some(ratio) = carbonation_ratio {
        result = result.detail("carbonation_ratio", ratio);
    }
    result
}

/// TVR: transient response health, higher is better.
///
/// `(current/baseline damping) * (baseline/current decay time)`, clamped to
/// `[0.1, 1.0]`. Non-positive denominators give 1.0 at degraded confidence.
pub fn calculate_tvr(
    current_damping: f64,
    baseline_damping: f64,
    current_decay_time: f64,
    baseline_decay_time: f64,
    thresholds: &ThresholdTable,
) -> MetricResult {
    if baseline_damping <= 0.0 || current_decay_time <= 0.0 {
        return MetricResult::new(1.0, classify(thresholds, Parameter::Tvr, 1.0), DEGRADED_CONFIDENCE);
    }

    let damping_ratio = current_damping / baseline_damping;
    let decay_ratio = baseline_decay_time / current_decay_time;
    let tvr = (damping_ratio * decay_ratio).clamp(TVR_BOUNDS.0, TVR_BOUNDS.1);

    MetricResult::new(tvr, classify(thresholds, Parameter::Tvr, tvr), 0.9)
        .detail("damping_ratio", damping_ratio)
        .detail("decay_ratio", decay_ratio)
}

/// BD: bearing displacement as a percentage of its rated capacity.
pub fn calculate_bd(displacement: f64, capacity: f64, thresholds: &ThresholdTable) -> MetricResult {
    let (bd, confidence) = if capacity > 0.0 {
        (displacement.abs() / capacity * 100.0, 0.95)
    } else {
        (0.0, DEGRADED_CONFIDENCE)
    };

    MetricResult::new(bd, classify(thresholds, Parameter::Bd, bd), confidence)
}

/// SED: local strain energy concentration, `(local/global)² * 50`.
pub fn calculate_sed(local_strain: f64, global_strain: f64, thresholds: &ThresholdTable) -> MetricResult {
    let (energy_ratio, confidence) = if global_strain > 0.0 {
        ((local_strain / global_strain).powi(2), 0.85)
    } else {
        (1.0, DEGRADED_CONFIDENCE)
    };
    let sed = energy_ratio * STRAIN_ENERGY_SCALE;

    MetricResult::new(sed, classify(thresholds, Parameter::Sed, sed), confidence)
        .detail("energy_ratio", energy_ratio)
}

/// Domain inputs for one parameter, tagged by parameter.
///
/// The parameter set is closed, so dispatch is a match rather than a trait
/// object per calculator.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricInput<'a> {
    Afc(FlutterInput),
    Alsa {
        strain: &'a [f64],
        yield_strain: f64,
        design_cycles: f64,
    },
    Cpii {
        bridge_type: BridgeType,
        wire_breaks: Option<u32>,
        total_wires: Option<u32>,
    },
    Ffd {
        current_frequency: f64,
        baseline_frequency: f64,
        temperature: Option<f64>,
        reference_temperature: Option<f64>,
    },
    Lts {
        temperature_delta: f64,
        measured_expansion: f64,
        expected_expansion: f64,
        material: MaterialProperties,
    },
    Ccf {
        chloride_concentration: Option<f64>,
        carbonation_depth: Option<f64>,
        concrete_cover: Option<f64>,
    },
    Tvr {
        current_damping: f64,
        baseline_damping: f64,
        current_decay_time: f64,
        baseline_decay_time: f64,
    },
    Bd {
        displacement: f64,
        capacity: f64,
    },
    Sed {
        local_strain: f64,
        global_strain: f64,
    },
}

impl MetricInput<'_> {
    pub fn parameter(&self) -> Parameter {
        match self {
            MetricInput::Afc(_) => Parameter::Afc,
            MetricInput::Alsa { .. } => Parameter::Alsa,
            MetricInput::Cpii { .. } => Parameter::Cpii,
            MetricInput::Ffd { .. } => Parameter::Ffd,
            MetricInput::Lts { .. } => Parameter::Lts,
            MetricInput::Ccf { .. } => Parameter::Ccf,
            MetricInput::Tvr { .. } => Parameter::Tvr,
            MetricInput::Bd { .. } => Parameter::Bd,
            MetricInput::Sed { .. } => Parameter::Sed,
        }
    }

    /// Run the calculator for this parameter.
    pub fn calculate(&self, thresholds: &ThresholdTable) -> MetricResult {
        match *self {
            MetricInput::Afc(ref input) => calculate_afc(input, thresholds),
            MetricInput::Alsa {
                strain,
                yield_strain,
                design_cycles,
            } => calculate_alsa(strain, yield_strain, design_cycles, thresholds),
            MetricInput::Cpii {
                bridge_type,
                wire_breaks,
                total_wires,
            } => calculate_cpii(bridge_type, wire_breaks, total_wires, thresholds),
            MetricInput::Ffd {
                current_frequency,
                baseline_frequency,
                temperature,
                reference_temperature,
            } => calculate_ffd(
                current_frequency,
                baseline_frequency,
                temperature,
                reference_temperature,
                thresholds,
            ),
            MetricInput::Lts {
                temperature_delta,
                measured_expansion,
                expected_expansion,
                ref material,
            } => calculate_lts(
                temperature_delta,
                measured_expansion,
                expected_expansion,
                material,
                thresholds,
            ),
            MetricInput::Ccf {
                chloride_concentration,
                carbonation_depth,
                concrete_cover,
            } => calculate_ccf(
                chloride_concentration,
                carbonation_depth,
                concrete_cover,
                thresholds,
            ),
            MetricInput::Tvr {
                current_damping,
                baseline_damping,
                current_decay_time,
                baseline_decay_time,
            } => calculate_tvr(
                current_damping,
                baseline_damping,
                current_decay_time,
                baseline_decay_time,
                thresholds,
            ),
            MetricInput::Bd {
                displacement,
                capacity,
            } => calculate_bd(displacement, capacity, thresholds),
            MetricInput::Sed {
                local_strain,
                global_strain,
            } => calculate_sed(local_strain, global_strain, thresholds),
        }
    }
}
