//! Event selection and classification for one batch of events
//!
//! Each batch goes through the following stages:
//!
//! 1. every event is filled into the "all" cutflow stage,
//! 2. jets are preselected and events with fewer than four selected
//!    jets are dropped, the rest are filled into "preselection",
//! 3. the four leading selected jets are paired in all three ways and
//!    each pairing is turned into a ranked quadjet candidate,
//! 4. the best candidate decides the regions the event is filled into.
use std::ops::Range;
use std::time::Instant;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::accumulator::{Accumulator, Cut, Output, Region};
use crate::config::Config;
use crate::dijet::{build_pairings, classify, N_PAIRINGS};
use crate::error::{ensure_finite, AnalysisError, KinematicsError};
use crate::event::{Event, Jet};
use crate::preselect::preselect;
use crate::quadjet::{build_quadjets, draw_tie_breaks, Selection};

const N_JETS: usize = 4;

/// What happened to the events of one batch
#[derive(Clone, PartialEq, Debug, Default)]
pub struct BatchSummary {
    pub n_event: usize,
    /// Classification of each event passing the preselection, in batch order
    pub selections: Vec<Result<Selection, KinematicsError>>,
}

impl BatchSummary {
    pub fn n_preselected(&self) -> usize {
        self.selections.len()
    }

    pub fn n_failed(&self) -> usize {
        self.selections.iter().filter(|s| s.is_err()).count()
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Analysis {
    config: Config,
}

impl Analysis {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classify an event from its four leading selected jets
    ///
    /// `m4j` is the mass of the sum of all jets in the event and sets the
    /// ΔR windows. `randoms` are the tie-break values for the three
    /// pairing slots.
    pub fn reconstruct(
        &self,
        jets: &[Jet; N_JETS],
        m4j: f64,
        randoms: [f64; N_PAIRINGS],
    ) -> Result<Selection, KinematicsError> {
        if !jets.iter().all(Jet::is_finite) {
            return Err(KinematicsError::NonFiniteKinematics {
                quantity: "jet momentum",
            });
        }
        let m4j = ensure_finite("m4j", m4j)?;

        let Config { dijet, higgs, .. } = &self.config;
        let pairings = build_pairings(jets)
            .map(|pairing| classify(pairing, m4j, dijet, higgs));
        let quadjets = build_quadjets(pairings, randoms, higgs);
        for quadjet in &quadjets {
            quadjet.check_finite()?;
        }
        Ok(Selection::new(&quadjets))
    }

    /// Select and classify one batch, emitting weighted fills to `acc`
    ///
    /// `rng` provides the tie-break values, three per preselected event.
    pub fn process<A: Accumulator, R: Rng>(
        &self,
        dataset: &str,
        events: Vec<Event>,
        rng: &mut R,
        acc: &mut A,
    ) -> Result<BatchSummary, AnalysisError> {
        for (index, event) in events.iter().enumerate() {
            if !(event.weight.is_finite() && event.weight >= 0.) {
                return Err(AnalysisError::InvalidWeight {
                    index,
                    weight: event.weight,
                });
            }
        }
        let n_event = events.len();

        for event in &events {
            let m4j = event.v4j().mass();
            acc.fill(dataset, Cut::All, Region::Inclusive, m4j, event.weight);
        }

        let events = preselect(events, &self.config.jets);
        for event in &events {
            let m4j = event.v4j().mass();
            acc.fill(
                dataset,
                Cut::Preselection,
                Region::Inclusive,
                m4j,
                event.weight,
            );
        }

        let mut selections = Vec::with_capacity(events.len());
        for (index, event) in events.iter().enumerate() {
            let jets = event.leading_selected_jets();
            let Some(leading) = jets.get(..N_JETS) else {
                return Err(AnalysisError::MalformedEvent {
                    index,
                    n_jets: jets.len(),
                });
            };
            if jets.len() > N_JETS {
                trace!(
                    "Event {index}: using {N_JETS} leading of {} selected jets",
                    jets.len()
                );
            }
            let mut four = [Jet::default(); N_JETS];
            four.copy_from_slice(leading);

            // draw before validating, so failures do not shift later draws
            let randoms = draw_tie_breaks(rng, &self.config.tie_break);
            let selection = self.reconstruct(&four, event.v4j().mass(), randoms);
            match &selection {
                Ok(selection) => {
                    let Selection { m4j, .. } = *selection;
                    for region in selection.regions() {
                        acc.fill(dataset, Cut::Preselection, region, m4j, event.weight);
                    }
                }
                Err(err) => warn!("Excluding event {index} from region assignment: {err}"),
            }
            selections.push(selection);
        }
        Ok(BatchSummary { n_event, selections })
    }

    /// Process one chunk of a dataset into a fresh output
    ///
    /// The tie-break generator is seeded with `seed`, so repeated runs over
    /// the same chunk give identical results.
    pub fn run(
        &self,
        dataset: &str,
        entries: Range<usize>,
        events: Vec<Event>,
        seed: u64,
    ) -> Result<Output, AnalysisError> {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut output = Output::new(self.config.m4j_axis);
        output.sumw = events.iter().map(|ev| ev.weight).sum();

        let summary = self.process(dataset, events, &mut rng, &mut output)?;
        output.n_event = summary.n_event as u64;
        output.n_failed = summary.n_failed() as u64;

        let elapsed = start.elapsed().as_secs_f64();
        debug!(
            "{dataset}::{:6}:{:6} >>> {:.0} events/s",
            entries.start,
            entries.end,
            summary.n_event as f64 / elapsed
        );
        Ok(output)
    }
}
