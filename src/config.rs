use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub jets: JetCuts,
    pub dijet: DiJetCuts,
    pub higgs: HiggsHypothesis,
    pub tie_break: TieBreak,
    pub m4j_axis: Axis,
}

impl Config {
    /// Load from a TOML file, writing the defaults there first if it does not exist yet
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        confy::load_path(path)
            .with_context(|| format!("Failed to load config from {path:?}"))
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct JetCuts {
    pub min_pt: f64,
    pub max_abs_eta: f64,
    /// Minimum number of selected jets
    pub n_jets: usize,
}

impl Default for JetCuts {
    fn default() -> Self {
        Self {
            min_pt: 40.,
            max_abs_eta: 2.4,
            n_jets: 4,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(from = "DiJetOverrides")]
pub struct DiJetCuts {
    pub lead: RoleCuts,
    pub subl: RoleCuts,
}

impl Default for DiJetCuts {
    fn default() -> Self {
        Self {
            lead: RoleCuts {
                min_mass: 52.,
                max_mass: 180.,
                min_m4j_scale: 360.,
                min_dr_offset: -0.5,
                max_m4j_scale: 650.,
                max_dr_offset: 0.5,
                max_dr: 1.5,
                mass_bias: 1.02,
            },
            subl: RoleCuts {
                min_mass: 50.,
                max_mass: 173.,
                min_m4j_scale: 235.,
                min_dr_offset: 0.0,
                max_m4j_scale: 650.,
                max_dr_offset: 0.7,
                max_dr: 1.5,
                mass_bias: 0.98,
            },
        }
    }
}

/// Thresholds for the leading or subleading dijet of a pairing
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct RoleCuts {
    pub min_mass: f64,
    pub max_mass: f64,
    pub min_m4j_scale: f64,
    pub min_dr_offset: f64,
    pub max_m4j_scale: f64,
    pub max_dr_offset: f64,
    /// Floor for the upper end of the ΔR window
    pub max_dr: f64,
    /// Multiplies the Higgs mass to get the expected dijet mass
    pub mass_bias: f64,
}

impl RoleCuts {
    pub fn mass_ok(&self, mass: f64) -> bool {
        self.min_mass < mass && mass < self.max_mass
    }

    /// Sliding ΔR window, open at both ends
    pub fn dr_window(&self, m4j: f64) -> (f64, f64) {
        let min = self.min_m4j_scale / m4j + self.min_dr_offset;
        let max = (self.max_m4j_scale / m4j + self.max_dr_offset)
            .max(self.max_dr);
        (min, max)
    }

    pub fn dr_ok(&self, dr: f64, m4j: f64) -> bool {
        let (min, max) = self.dr_window(m4j);
        min < dr && dr < max
    }
}

/// Dijet thresholds as read from a file
///
/// Fields missing from a role section keep the default of that role.
#[derive(Copy, Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
struct DiJetOverrides {
    lead: RoleOverrides,
    subl: RoleOverrides,
}

impl From<DiJetOverrides> for DiJetCuts {
    fn from(overrides: DiJetOverrides) -> Self {
        let DiJetCuts { lead, subl } = DiJetCuts::default();
        Self {
            lead: overrides.lead.apply(lead),
            subl: overrides.subl.apply(subl),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
struct RoleOverrides {
    min_mass: Option<f64>,
    max_mass: Option<f64>,
    min_m4j_scale: Option<f64>,
    min_dr_offset: Option<f64>,
    max_m4j_scale: Option<f64>,
    max_dr_offset: Option<f64>,
    max_dr: Option<f64>,
    mass_bias: Option<f64>,
}

impl RoleOverrides {
    fn apply(self, base: RoleCuts) -> RoleCuts {
        RoleCuts {
            min_mass: self.min_mass.unwrap_or(base.min_mass),
            max_mass: self.max_mass.unwrap_or(base.max_mass),
            min_m4j_scale: self.min_m4j_scale.unwrap_or(base.min_m4j_scale),
            min_dr_offset: self.min_dr_offset.unwrap_or(base.min_dr_offset),
            max_m4j_scale: self.max_m4j_scale.unwrap_or(base.max_m4j_scale),
            max_dr_offset: self.max_dr_offset.unwrap_or(base.max_dr_offset),
            max_dr: self.max_dr.unwrap_or(base.max_dr),
            mass_bias: self.mass_bias.unwrap_or(base.mass_bias),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HiggsHypothesis {
    pub mass: f64,
    /// Relative dijet mass resolution
    pub resolution: f64,
    /// Signal region boundary in xHH
    pub max_xhh: f64,
}

impl Default for HiggsHypothesis {
    fn default() -> Self {
        Self {
            mass: 125.,
            resolution: 0.1,
            max_xhh: 1.9,
        }
    }
}

/// Range of the uniform tie-break draws
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TieBreak {
    pub low: f64,
    pub high: f64,
}

impl Default for TieBreak {
    fn default() -> Self {
        Self { low: 0.1, high: 0.9 }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Axis {
    pub n_bins: usize,
    pub min: f64,
    pub max: f64,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            n_bins: 300,
            min: 0.,
            max: 1500.,
        }
    }
}
