use log::trace;

use crate::config::JetCuts;
use crate::event::{Event, Jet};

impl JetCuts {
    pub fn passes(&self, jet: &Jet) -> bool {
        jet.pt >= self.min_pt && jet.eta.abs() <= self.max_abs_eta
    }
}

/// Flag selected jets and count them
pub fn flag_jets(event: &mut Event, cuts: &JetCuts) {
    for jet in &mut event.jets {
        jet.selected = cuts.passes(jet);
    }
    event.n_jet_selected = event.jets.iter().filter(|jet| jet.selected).count();
}

/// Flag jets in all events, then keep only the events with enough selected jets
pub fn preselect(mut events: Vec<Event>, cuts: &JetCuts) -> Vec<Event> {
    for event in &mut events {
        flag_jets(event, cuts);
    }
    let n_in = events.len();
    events.retain(|event| event.n_jet_selected >= cuts.n_jets);
    trace!("{}/{n_in} events pass jet preselection", events.len());
    events
}
