//! The nine structural-condition parameters.

use core::fmt;
use core::str::FromStr;

use crate::ParseError;

/// One of the nine fixed structural-condition indicators.
///
/// The set is closed by domain definition. Declaration order is the canonical
/// reporting order and is what `Ord` follows, so a `BTreeMap<Parameter, _>`
/// iterates AFC first and SED last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parameter {
    /// Aeroelastic Flutter Coefficient.
    #[cfg_attr(feature = "serde", serde(rename = "AFC", alias = "afc"))]
    Afc,
    /// Axle Load Strain Accumulation.
    #[cfg_attr(feature = "serde", serde(rename = "ALSA", alias = "alsa"))]
    Alsa,
    /// Cable/Pier Integrity Index.
    #[cfg_attr(feature = "serde", serde(rename = "CPII", alias = "cpii"))]
    Cpii,
    /// Fundamental Frequency Drift (%).
    #[cfg_attr(feature = "serde", serde(rename = "FFD", alias = "ffd"))]
    Ffd,
    /// Locked-in Thermal Stress (% of yield).
    #[cfg_attr(feature = "serde", serde(rename = "LTS", alias = "lts"))]
    Lts,
    /// Chloride/Carbonation Flux (%).
    #[cfg_attr(feature = "serde", serde(rename = "CCF", alias = "ccf"))]
    Ccf,
    /// Transient Vibration Response.
    #[cfg_attr(feature = "serde", serde(rename = "TVR", alias = "tvr"))]
    Tvr,
    /// Bearing Displacement.
    #[cfg_attr(feature = "serde", serde(rename = "BD", alias = "bd"))]
    Bd,
    /// Strain Energy Density (%).
    #[cfg_attr(feature = "serde", serde(rename = "SED", alias = "sed"))]
    Sed,
}

impl Parameter {
    /// All parameters in canonical order.
    pub const ALL: [Parameter; 9] = [
        Parameter::Afc,
        Parameter::Alsa,
        Parameter::Cpii,
        Parameter::Ffd,
        Parameter::Lts,
        Parameter::Ccf,
        Parameter::Tvr,
        Parameter::Bd,
        Parameter::Sed,
    ];

    /// Short code used in reports and alert messages (e.g. "AFC").
    pub const fn code(&self) -> &'static str {
        match self {
            Parameter::Afc => "AFC",
            Parameter::Alsa => "ALSA",
            Parameter::Cpii => "CPII",
            Parameter::Ffd => "FFD",
            Parameter::Lts => "LTS",
            Parameter::Ccf => "CCF",
            Parameter::Tvr => "TVR",
            Parameter::Bd => "BD",
            Parameter::Sed => "SED",
        }
    }

    /// Human-readable name.
    pub const fn full_name(&self) -> &'static str {
        match self {
            Parameter::Afc => "Aeroelastic Flutter Coefficient",
            Parameter::Alsa => "Axle Load Strain Accumulation",
            Parameter::Cpii => "Cable/Pier Integrity Index",
            Parameter::Ffd => "Fundamental Frequency Drift",
            Parameter::Lts => "Locked-in Thermal Stress",
            Parameter::Ccf => "Chloride/Carbonation Flux",
            Parameter::Tvr => "Transient Vibration Response",
            Parameter::Bd => "Bearing Displacement",
            Parameter::Sed => "Strain Energy Density",
        }
    }

    /// Weight of this parameter in the overall health score.
    ///
    /// The weights of all nine parameters sum to 1.0.
    pub const fn health_weight(&self) -> f64 {
        match self {
            Parameter::Afc => 0.10,
            Parameter::Alsa => 0.15,
            Parameter::Cpii => 0.15,
            Parameter::Ffd => 0.15,
            Parameter::Lts => 0.10,
            Parameter::Ccf => 0.10,
            Parameter::Tvr => 0.10,
            Parameter::Bd => 0.05,
            Parameter::Sed => 0.10,
        }
    }

    /// Look up a parameter by its code, ignoring ASCII case.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Parameter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or_else(|| ParseError::UnknownParameter(s.to_string()))
    }
}
