use serde::{Deserialize, Serialize};

use crate::momentum::FourMomentum;

#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Deserialize, Serialize)]
pub struct Jet {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub mass: f64,

    /// Set by the jet preselection
    #[serde(skip)]
    pub selected: bool,
}

impl Jet {
    pub fn new(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        Self { pt, eta, phi, mass, selected: false }
    }

    pub fn p(&self) -> FourMomentum {
        FourMomentum::from_pt_eta_phi_m(self.pt, self.eta, self.phi, self.mass)
    }

    pub fn is_finite(&self) -> bool {
        [self.pt, self.eta, self.phi, self.mass].iter().all(|x| x.is_finite())
    }
}

#[derive(Clone, PartialEq, PartialOrd, Debug, Default, Deserialize, Serialize)]
pub struct Event {
    pub weight: f64,
    pub jets: Vec<Jet>,

    #[serde(skip)]
    pub n_jet_selected: usize,
}

impl Event {
    pub fn new(weight: f64, jets: Vec<Jet>) -> Self {
        Self { weight, jets, n_jet_selected: 0 }
    }

    /// Sum of all jet momenta
    pub fn v4j(&self) -> FourMomentum {
        self.jets.iter().map(Jet::p).sum()
    }

    /// Selected jets in order of decreasing transverse momentum
    pub fn leading_selected_jets(&self) -> Vec<Jet> {
        let mut jets: Vec<_> = self
            .jets
            .iter()
            .filter(|jet| jet.selected)
            .copied()
            .collect();
        jets.sort_by(|a, b| b.pt.total_cmp(&a.pt));
        jets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn deserialise_without_derived_fields() {
        let ev: Event = serde_json::from_str(
            r#"{"weight": 0.5, "jets": [{"pt": 45.0, "eta": 0.1, "phi": 1.0, "mass": 5.0}]}"#
        ).unwrap();
        assert_eq!(ev.weight, 0.5);
        assert_eq!(ev.jets.len(), 1);
        assert!(!ev.jets[0].selected);
        assert_eq!(ev.n_jet_selected, 0);
    }

    #[test]
    fn v4j_of_no_jets_is_zero() {
        let ev = Event::new(1., vec![]);
        assert_eq!(ev.v4j().mass(), 0.);
    }

    #[test]
    fn v4j_sums_all_jets() {
        let jets = vec![
            Jet::new(100., 0., 0.5, 0.),
            Jet::new(100., 0., -0.5, 0.),
        ];
        let ev = Event::new(1., jets);
        assert_abs_diff_eq!(ev.v4j().mass(), 200. * 0.5f64.sin(), epsilon = 1e-9);
    }

    #[test]
    fn leading_selected_jets_are_pt_ordered() {
        let mut jets = vec![
            Jet::new(50., 0., 0., 0.),
            Jet::new(80., 0., 0., 0.),
            Jet::new(90., 0., 0., 0.),
        ];
        jets[0].selected = true;
        jets[1].selected = true;
        let ev = Event::new(1., jets);
        let pts: Vec<_> = ev.leading_selected_jets().iter().map(|j| j.pt).collect();
        assert_eq!(pts, [80., 50.]);
    }
}
