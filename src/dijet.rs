//! Jet pairing and per-dijet classification
//!
//! The four leading selected jets are split into two pairs in each of
//! the three possible ways. Within a pairing slot the two dijets are
//! ordered by their scalar transverse momentum sum, so every slot has a
//! leading and a subleading dijet, each with its own set of cuts.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::{DiJetCuts, HiggsHypothesis, RoleCuts};
use crate::error::{ensure_finite, KinematicsError};
use crate::event::Jet;
use crate::momentum::FourMomentum;

pub const N_PAIRINGS: usize = 3;

/// Jet indices of the two pairs in each pairing slot
pub const PAIRINGS: [[[usize; 2]; 2]; N_PAIRINGS] = [
    [[0, 1], [2, 3]],
    [[0, 2], [1, 3]],
    [[0, 3], [1, 2]],
];

#[derive(
    Display,
    EnumIter,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Deserialize,
    Serialize,
)]
pub enum Role {
    #[strum(to_string = "lead")]
    Lead,
    #[strum(to_string = "subl")]
    Subl,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DiJet {
    /// Constituent with the higher transverse momentum
    pub lead: Jet,
    pub subl: Jet,
    pub p: FourMomentum,
    pub mass: f64,
    /// Scalar sum of the constituent transverse momenta
    pub st: f64,
    /// ΔR between the constituents
    pub dr: f64,
}

impl DiJet {
    pub fn new(a: Jet, b: Jet) -> Self {
        let (lead, subl) = if b.pt > a.pt { (b, a) } else { (a, b) };
        let (p_lead, p_subl) = (lead.p(), subl.p());
        let p = p_lead + p_subl;
        Self {
            lead,
            subl,
            p,
            mass: p.mass(),
            st: lead.pt + subl.pt,
            dr: p_lead.delta_r(&p_subl),
        }
    }
}

/// The two complementary dijets of one pairing slot
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Pairing<T = DiJet> {
    pub lead: T,
    pub subl: T,
}

impl<T> Pairing<T> {
    pub fn map<U>(self, mut f: impl FnMut(T, Role) -> U) -> Pairing<U> {
        Pairing {
            lead: f(self.lead, Role::Lead),
            subl: f(self.subl, Role::Subl),
        }
    }

    pub fn get(&self, role: Role) -> &T {
        match role {
            Role::Lead => &self.lead,
            Role::Subl => &self.subl,
        }
    }
}

impl Pairing {
    /// Combine the jets of one slot, ordering the dijets by scalar pt sum
    pub fn new(jets: &[Jet; 4], slot: [[usize; 2]; 2]) -> Self {
        let [[a0, a1], [b0, b1]] = slot;
        let a = DiJet::new(jets[a0], jets[a1]);
        let b = DiJet::new(jets[b0], jets[b1]);
        if b.st > a.st {
            Self { lead: b, subl: a }
        } else {
            Self { lead: a, subl: b }
        }
    }
}

pub fn build_pairings(jets: &[Jet; 4]) -> [Pairing; N_PAIRINGS] {
    PAIRINGS.map(|slot| Pairing::new(jets, slot))
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ClassifiedDiJet {
    pub dijet: DiJet,
    pub role: Role,
    pub mass_ok: bool,
    /// ΔR inside the m4j-dependent window
    pub dr_ok: bool,
    /// Deviation from the expected Higgs mass in units of the mass resolution
    pub x_h: f64,
}

impl ClassifiedDiJet {
    pub fn new(
        dijet: DiJet,
        role: Role,
        m4j: f64,
        cuts: &DiJetCuts,
        higgs: &HiggsHypothesis,
    ) -> Self {
        let cuts = cuts.get(role);
        let expected = higgs.mass * cuts.mass_bias;
        Self {
            dijet,
            role,
            mass_ok: cuts.mass_ok(dijet.mass),
            dr_ok: cuts.dr_ok(dijet.dr, m4j),
            x_h: (dijet.mass - expected) / (higgs.resolution * dijet.mass),
        }
    }

    pub fn check_finite(&self) -> Result<(), KinematicsError> {
        ensure_finite("dijet mass", self.dijet.mass)?;
        ensure_finite("dijet ΔR", self.dijet.dr)?;
        ensure_finite("xH", self.x_h)?;
        Ok(())
    }
}

impl DiJetCuts {
    pub fn get(&self, role: Role) -> &RoleCuts {
        match role {
            Role::Lead => &self.lead,
            Role::Subl => &self.subl,
        }
    }
}

pub fn classify(
    pairing: Pairing,
    m4j: f64,
    cuts: &DiJetCuts,
    higgs: &HiggsHypothesis,
) -> Pairing<ClassifiedDiJet> {
    pairing.map(|dijet, role| ClassifiedDiJet::new(dijet, role, m4j, cuts, higgs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::collections::BTreeSet;
    use strum::IntoEnumIterator;

    fn jets(pts: [f64; 4]) -> [Jet; 4] {
        let phis = [0.3, 1.9, -2.5, -0.8];
        let etas = [0.2, -1.1, 0.7, 1.8];
        std::array::from_fn(|i| Jet::new(pts[i], etas[i], phis[i], 8.))
    }

    #[test]
    fn pairings_partition_four_jets() {
        let mut seen = BTreeSet::new();
        for [a, b] in PAIRINGS {
            let mut all: Vec<_> = a.iter().chain(b.iter()).copied().collect();
            all.sort();
            assert_eq!(all, [0, 1, 2, 3]);
            let mut pairs = [a, b].map(|mut p| {
                p.sort();
                p
            });
            pairs.sort();
            assert!(seen.insert(pairs), "pairing {pairs:?} repeated");
        }
        assert_eq!(seen.len(), N_PAIRINGS);
    }

    #[test]
    fn dijets_ordered_by_st() {
        let jets = jets([50., 200., 120., 45.]);
        for pairing in build_pairings(&jets) {
            assert!(pairing.lead.st >= pairing.subl.st);
            for dijet in [pairing.lead, pairing.subl] {
                assert!(dijet.lead.pt >= dijet.subl.pt);
                assert_abs_diff_eq!(dijet.st, dijet.lead.pt + dijet.subl.pt);
            }
        }
    }

    #[test]
    fn dijet_kinematics() {
        let a = Jet::new(60., 0.5, 0.1, 0.);
        let b = Jet::new(90., -0.5, 1.1, 0.);
        let dijet = DiJet::new(a, b);
        assert_eq!(dijet.lead, b);
        assert_eq!(dijet.subl, a);
        assert_abs_diff_eq!(dijet.dr, 2f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(dijet.mass, (a.p() + b.p()).mass());
    }

    #[test]
    fn x_h_vanishes_at_biased_mass() {
        let cuts = DiJetCuts::default();
        let higgs = HiggsHypothesis::default();
        for role in Role::iter() {
            let target = 125. * cuts.get(role).mass_bias;
            // two massless jets at equal η: m = 2 pt sin(Δφ/2)
            let half = (target / 200.).asin();
            let dijet = DiJet::new(
                Jet::new(100., 0., half, 0.),
                Jet::new(100., 0., -half, 0.),
            );
            let classified = ClassifiedDiJet::new(dijet, role, 500., &cuts, &higgs);
            assert_abs_diff_eq!(classified.x_h, 0., epsilon = 1e-9);
            assert!(classified.mass_ok);
        }
    }

    #[test]
    fn roles_use_their_own_windows() {
        let cuts = DiJetCuts::default();
        let higgs = HiggsHypothesis::default();
        // 51 GeV passes the subleading window only
        let half = (51. / 200f64).asin();
        let dijet = DiJet::new(
            Jet::new(100., 0., half, 0.),
            Jet::new(100., 0., -half, 0.),
        );
        let lead = ClassifiedDiJet::new(dijet, Role::Lead, 400., &cuts, &higgs);
        let subl = ClassifiedDiJet::new(dijet, Role::Subl, 400., &cuts, &higgs);
        assert!(!lead.mass_ok);
        assert!(subl.mass_ok);
        assert_abs_diff_eq!(
            lead.x_h,
            (dijet.mass - 127.5) / (0.1 * dijet.mass),
            epsilon = 1e-9
        );
    }

    #[test]
    fn zero_mass_dijet_is_not_finite() {
        let jet = Jet::new(100., 0., 0., 0.);
        let dijet = DiJet::new(jet, jet);
        let classified = ClassifiedDiJet::new(
            dijet,
            Role::Lead,
            400.,
            &DiJetCuts::default(),
            &HiggsHypothesis::default(),
        );
        assert!(classified.check_finite().is_err());
    }
}
