use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::Axis;
use crate::error::AnalysisError;
use crate::histogram::Histogram;

pub const M4J: &str = "m4j";

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
pub enum Cut {
    #[strum(to_string = "all")]
    #[serde(rename = "all")]
    All,
    #[strum(to_string = "preselection")]
    #[serde(rename = "preselection")]
    Preselection,
}

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
pub enum Region {
    #[strum(to_string = "inclusive")]
    #[serde(rename = "inclusive")]
    Inclusive,
    #[strum(to_string = "diJetMass")]
    #[serde(rename = "diJetMass")]
    DiJetMass,
    SB,
    SR,
}

/// Sink for weighted observables
pub trait Accumulator {
    fn fill(&mut self, dataset: &str, cut: Cut, region: Region, m4j: f64, weight: f64);
}

#[derive(Copy, Clone, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct WeightSum {
    pub sumw: f64,
    pub sumw2: f64,
    pub entries: u64,
}

impl WeightSum {
    pub fn add(&mut self, weight: f64) {
        self.sumw += weight;
        self.sumw2 += weight * weight;
        self.entries += 1;
    }

    pub fn merge(&mut self, other: &Self) {
        self.sumw += other.sumw;
        self.sumw2 += other.sumw2;
        self.entries += other.entries;
    }
}

/// Values per dataset, cut, and region
pub type Table<T> = BTreeMap<String, BTreeMap<Cut, BTreeMap<Region, T>>>;

fn entry<'a, T>(
    table: &'a mut Table<T>,
    dataset: &str,
    cut: Cut,
    region: Region,
    init: impl FnOnce() -> T,
) -> &'a mut T {
    table
        .entry(dataset.to_owned())
        .or_default()
        .entry(cut)
        .or_default()
        .entry(region)
        .or_insert_with(init)
}

/// Cutflow and histograms collected over one or more batches
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Output {
    pub cutflow: Table<WeightSum>,
    pub hists: BTreeMap<String, Table<Histogram>>,
    pub m4j_axis: Axis,
    /// Sum of input weights, before any selection
    pub sumw: f64,
    pub n_event: u64,
    /// Events dropped from region assignment due to non-finite kinematics
    pub n_failed: u64,
}

impl Default for Output {
    fn default() -> Self {
        Self::new(Axis::default())
    }
}

impl Output {
    pub fn new(m4j_axis: Axis) -> Self {
        Self {
            cutflow: Table::new(),
            hists: BTreeMap::new(),
            m4j_axis,
            sumw: 0.,
            n_event: 0,
            n_failed: 0,
        }
    }

    pub fn cutflow(&self, dataset: &str, cut: Cut, region: Region) -> Option<&WeightSum> {
        self.cutflow.get(dataset)?.get(&cut)?.get(&region)
    }

    pub fn m4j(&self, dataset: &str, cut: Cut, region: Region) -> Option<&Histogram> {
        self.hists.get(M4J)?.get(dataset)?.get(&cut)?.get(&region)
    }

    /// Cutflow entries in (dataset, cut, region) order
    pub fn cutflow_rows(&self) -> impl Iterator<Item = (&str, Cut, Region, &WeightSum)> {
        self.cutflow.iter().flat_map(|(dataset, cuts)| {
            cuts.iter().flat_map(move |(cut, regions)| {
                regions
                    .iter()
                    .map(move |(region, sum)| (dataset.as_str(), *cut, *region, sum))
            })
        })
    }

    pub fn merge(&mut self, other: Output) -> Result<(), AnalysisError> {
        if self.m4j_axis != other.m4j_axis {
            return Err(AnalysisError::IncompatibleBinning);
        }
        for (dataset, cuts) in other.cutflow {
            for (cut, regions) in cuts {
                for (region, sum) in regions {
                    entry(&mut self.cutflow, &dataset, cut, region, Default::default)
                        .merge(&sum);
                }
            }
        }
        for (name, table) in other.hists {
            let mine = self.hists.entry(name).or_default();
            for (dataset, cuts) in table {
                for (cut, regions) in cuts {
                    for (region, hist) in regions {
                        let axis = hist.axis;
                        entry(mine, &dataset, cut, region, || Histogram::new(axis))
                            .merge(&hist)?;
                    }
                }
            }
        }
        self.sumw += other.sumw;
        self.n_event += other.n_event;
        self.n_failed += other.n_failed;
        Ok(())
    }
}

impl Accumulator for Output {
    fn fill(&mut self, dataset: &str, cut: Cut, region: Region, m4j: f64, weight: f64) {
        entry(&mut self.cutflow, dataset, cut, region, Default::default)
            .add(weight);
        let axis = self.m4j_axis;
        let hists = self.hists.entry(M4J.to_owned()).or_default();
        entry(hists, dataset, cut, region, || Histogram::new(axis))
            .fill(m4j, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(Cut::All.to_string(), "all");
        assert_eq!(Cut::Preselection.to_string(), "preselection");
        assert_eq!(Region::Inclusive.to_string(), "inclusive");
        assert_eq!(Region::DiJetMass.to_string(), "diJetMass");
        assert_eq!(Region::SB.to_string(), "SB");
        assert_eq!(Region::SR.to_string(), "SR");
    }

    #[test]
    fn fill_updates_cutflow_and_histogram() {
        let mut out = Output::default();
        out.fill("toy", Cut::All, Region::Inclusive, 412., 2.);
        out.fill("toy", Cut::All, Region::Inclusive, 2000., 0.5);
        let sum = out.cutflow("toy", Cut::All, Region::Inclusive).unwrap();
        assert_eq!(sum.sumw, 2.5);
        assert_eq!(sum.sumw2, 4.25);
        assert_eq!(sum.entries, 2);
        let hist = out.m4j("toy", Cut::All, Region::Inclusive).unwrap();
        assert_eq!(hist.sumw[82], 2.);
        assert_eq!(hist.overflow, 0.5);
        assert!(out.cutflow("toy", Cut::Preselection, Region::Inclusive).is_none());
    }

    #[test]
    fn merge_adds_outputs() {
        let mut a = Output::default();
        a.fill("toy", Cut::All, Region::Inclusive, 412., 1.);
        a.sumw = 1.;
        a.n_event = 1;
        let mut b = Output::default();
        b.fill("toy", Cut::All, Region::Inclusive, 412., 3.);
        b.fill("other", Cut::Preselection, Region::SR, 412., 1.);
        b.sumw = 4.;
        b.n_event = 2;
        b.n_failed = 1;
        a.merge(b).unwrap();
        assert_eq!(a.cutflow("toy", Cut::All, Region::Inclusive).unwrap().sumw, 4.);
        assert_eq!(a.cutflow("other", Cut::Preselection, Region::SR).unwrap().entries, 1);
        assert_eq!(a.m4j("toy", Cut::All, Region::Inclusive).unwrap().sumw[82], 4.);
        assert_eq!(a.sumw, 5.);
        assert_eq!(a.n_event, 3);
        assert_eq!(a.n_failed, 1);
        assert_eq!(a.cutflow_rows().count(), 2);
    }

    #[test]
    fn merge_rejects_other_binning() {
        let mut a = Output::default();
        let b = Output::new(Axis { n_bins: 10, min: 0., max: 100. });
        assert!(a.merge(b).is_err());
    }

    #[test]
    fn json_keys_are_labels() {
        let mut out = Output::default();
        out.fill("toy", Cut::Preselection, Region::DiJetMass, 412., 1.);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["cutflow"]["toy"]["preselection"]["diJetMass"]["sumw"], 1.0);
        let back: Output = serde_json::from_value(json).unwrap();
        assert_eq!(back, out);
    }
}
