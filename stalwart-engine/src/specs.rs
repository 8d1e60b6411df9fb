//! Design specifications of a monitored structure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural system of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeType {
    Suspension,
    #[serde(alias = "cable-stayed")]
    CableStayed,
    Truss,
    Arch,
    #[default]
    Girder,
    #[serde(alias = "box-girder")]
    BoxGirder,
    Cantilever,
    Movable,
}

impl BridgeType {
    /// Whether the deck hangs from cables, making wire-break counts meaningful.
    pub fn is_cable_supported(self) -> bool {
        matches!(self, BridgeType::Suspension | BridgeType::CableStayed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BridgeType::Suspension => "suspension",
            BridgeType::CableStayed => "cable_stayed",
            BridgeType::Truss => "truss",
            BridgeType::Arch => "arch",
            BridgeType::Girder => "girder",
            BridgeType::BoxGirder => "box_girder",
            BridgeType::Cantilever => "cantilever",
            BridgeType::Movable => "movable",
        }
    }
}

impl fmt::Display for BridgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary structural material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Steel,
    Concrete,
    Composite,
}

/// Mechanical and thermal constants of a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Young's modulus (Pa).
    pub elastic_modulus: f64,
    /// Yield strength, or compressive strength for concrete (Pa).
    pub strength: f64,
    /// Linear thermal expansion coefficient (1/°C).
    pub thermal_expansion: f64,
    /// Density (kg/m³).
    pub density: f64,
    pub poisson_ratio: f64,
}

impl Material {
    pub fn properties(self) -> MaterialProperties {
        match self {
            Material::Steel => MaterialProperties {
                elastic_modulus: 200e9,
                strength: 350e6,
                thermal_expansion: 12e-6,
                density: 7850.0,
                poisson_ratio: 0.3,
            },
            Material::Concrete => MaterialProperties {
                elastic_modulus: 30e9,
                strength: 35e6,
                thermal_expansion: 10e-6,
                density: 2400.0,
                poisson_ratio: 0.2,
            },
            Material::Composite => MaterialProperties {
                elastic_modulus: 150e9,
                strength: 400e6,
                thermal_expansion: 11e-6,
                density: 5000.0,
                poisson_ratio: 0.25,
            },
        }
    }
}

/// Design data for one bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeSpecs {
    #[serde(default)]
    pub name: String,

    #[serde(alias = "bridge_id")]
    pub id: String,

    #[serde(default)]
    pub bridge_type: BridgeType,

    /// Main span length (m).
    #[serde(default)]
    pub span_length: f64,

    #[serde(default)]
    pub year_built: u32,

    /// Design life (years).
    #[serde(default = "default_design_life")]
    pub design_life: u32,

    /// Wind speed at the onset of flutter (m/s), when known from design.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_flutter_speed: Option<f64>,

    #[serde(default)]
    pub material: Material,

    #[serde(default)]
    pub location: String,

    /// Average daily traffic (vehicles).
    #[serde(default)]
    pub daily_traffic: u32,

    /// Share of trucks in daily traffic, in percent.
    #[serde(default)]
    pub truck_percentage: f64,
}

fn default_design_life() -> u32 {
    75
}

impl BridgeSpecs {
    /// Specs with only an identifier, name and type set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, bridge_type: BridgeType) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            bridge_type,
            span_length: 0.0,
            year_built: 0,
            design_life: default_design_life(),
            critical_flutter_speed: None,
            material: Material::default(),
            location: String::new(),
            daily_traffic: 0,
            truck_percentage: 0.0,
        }
    }

    pub fn span_length(mut self, meters: f64) -> Self {
        self.span_length = meters;
        self
    }

    pub fn year_built(mut self, year: u32) -> Self {
        self.year_built = year;
        self
    }

    pub fn daily_traffic(mut self, vehicles: u32) -> Self {
        self.daily_traffic = vehicles;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn critical_flutter_speed(mut self, speed: f64) -> Self {
        self.critical_flutter_speed = Some(speed);
        self
    }
}
