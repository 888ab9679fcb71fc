//! Quadjet candidates and the choice of one candidate per event
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::accumulator::Region;
use crate::config::{HiggsHypothesis, TieBreak};
use crate::dijet::{ClassifiedDiJet, Pairing, N_PAIRINGS};
use crate::error::{ensure_finite, KinematicsError};
use crate::momentum::FourMomentum;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct QuadJet {
    pub lead: ClassifiedDiJet,
    pub subl: ClassifiedDiJet,
    pub p: FourMomentum,
    /// ΔR between the two dijets
    pub dr: f64,
    pub x_hh: f64,
    /// Both dijets inside their mass windows
    pub mass_ok: bool,
    pub sr: bool,
    pub sb: bool,
    pub random: f64,
    pub rank: f64,
}

impl QuadJet {
    pub fn new(
        pairing: Pairing<ClassifiedDiJet>,
        random: f64,
        higgs: &HiggsHypothesis,
    ) -> Self {
        let Pairing { lead, subl } = pairing;
        let x_hh = lead.x_h.hypot(subl.x_h);
        let mass_ok = lead.mass_ok && subl.mass_ok;
        let sr = x_hh < higgs.max_xhh;
        let rank = 10. * f64::from(u8::from(lead.mass_ok))
            + 10. * f64::from(u8::from(subl.mass_ok))
            + f64::from(u8::from(lead.dr_ok))
            + f64::from(u8::from(subl.dr_ok))
            + random;
        Self {
            lead,
            subl,
            p: lead.dijet.p + subl.dijet.p,
            dr: lead.dijet.p.delta_r(&subl.dijet.p),
            x_hh,
            mass_ok,
            sr,
            sb: mass_ok && !sr,
            random,
            rank,
        }
    }

    pub fn m4j(&self) -> f64 {
        self.p.mass()
    }

    /// Check the quantities entering the classification
    ///
    /// The ΔR between the dijets is not used for classification and may
    /// be undefined for dijets without transverse momentum.
    pub fn check_finite(&self) -> Result<(), KinematicsError> {
        self.lead.check_finite()?;
        self.subl.check_finite()?;
        ensure_finite("xHH", self.x_hh)?;
        ensure_finite("m4j", self.m4j())?;
        Ok(())
    }
}

/// One uniform draw per pairing slot
pub fn draw_tie_breaks<R: Rng>(rng: &mut R, range: &TieBreak) -> [f64; N_PAIRINGS] {
    std::array::from_fn(|_| rng.gen_range(range.low..range.high))
}

pub fn build_quadjets(
    pairings: [Pairing<ClassifiedDiJet>; N_PAIRINGS],
    randoms: [f64; N_PAIRINGS],
    higgs: &HiggsHypothesis,
) -> [QuadJet; N_PAIRINGS] {
    std::array::from_fn(|slot| QuadJet::new(pairings[slot], randoms[slot], higgs))
}

/// Slot of the highest-ranked candidate
///
/// Exact ties are resolved in favour of the lower slot.
pub fn select(quadjets: &[QuadJet; N_PAIRINGS]) -> usize {
    let mut best = 0;
    for (slot, quadjet) in quadjets.iter().enumerate().skip(1) {
        if quadjet.rank > quadjets[best].rank {
            best = slot;
        }
    }
    best
}

/// Classification of one event, taken from its selected candidate
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Selection {
    pub slot: usize,
    pub mass_ok: bool,
    pub sr: bool,
    pub sb: bool,
    pub x_hh: f64,
    pub rank: f64,
    /// Mass of the four jets of the selected candidate
    pub m4j: f64,
}

impl Selection {
    pub fn new(quadjets: &[QuadJet; N_PAIRINGS]) -> Self {
        let slot = select(quadjets);
        let winner = &quadjets[slot];
        Self {
            slot,
            mass_ok: winner.mass_ok,
            sr: winner.sr,
            sb: winner.sb,
            x_hh: winner.x_hh,
            rank: winner.rank,
            m4j: winner.m4j(),
        }
    }

    /// Regions this event is filled into after preselection
    pub fn regions(&self) -> impl Iterator<Item = Region> {
        [
            (Region::DiJetMass, self.mass_ok),
            (Region::SB, self.sb),
            (Region::SR, self.sr),
        ]
        .into_iter()
        .filter_map(|(region, pass)| pass.then_some(region))
    }
}
