use serde::{Deserialize, Serialize};

use crate::config::Axis;
use crate::error::AnalysisError;

/// Regularly binned 1D histogram with weighted storage
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Histogram {
    pub axis: Axis,
    /// Sum of weights per bin
    pub sumw: Vec<f64>,
    /// Sum of weights squared per bin
    pub sumw2: Vec<f64>,
    pub underflow: f64,
    /// Also receives NaN values
    pub overflow: f64,
    pub underflow_sumw2: f64,
    pub overflow_sumw2: f64,
    pub entries: u64,
}

impl Histogram {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            sumw: vec![0.; axis.n_bins],
            sumw2: vec![0.; axis.n_bins],
            underflow: 0.,
            overflow: 0.,
            underflow_sumw2: 0.,
            overflow_sumw2: 0.,
            entries: 0,
        }
    }

    pub fn bin_edges(&self) -> Vec<f64> {
        let Axis { n_bins, min, max } = self.axis;
        (0..=n_bins)
            .map(|i| min + (max - min) * i as f64 / n_bins as f64)
            .collect()
    }

    pub fn fill(&mut self, x: f64, weight: f64) {
        self.entries += 1;
        let Axis { n_bins, min, max } = self.axis;
        if x < min {
            self.underflow += weight;
            self.underflow_sumw2 += weight * weight;
        } else if x >= max || x.is_nan() || n_bins == 0 {
            self.overflow += weight;
            self.overflow_sumw2 += weight * weight;
        } else {
            let bin = ((x - min) / (max - min) * n_bins as f64) as usize;
            let bin = bin.min(n_bins - 1);
            self.sumw[bin] += weight;
            self.sumw2[bin] += weight * weight;
        }
    }

    /// Sum of weights including under- and overflow
    pub fn total(&self) -> f64 {
        self.underflow + self.sumw.iter().sum::<f64>() + self.overflow
    }

    pub fn merge(&mut self, other: &Self) -> Result<(), AnalysisError> {
        if self.axis != other.axis {
            return Err(AnalysisError::IncompatibleBinning);
        }
        for (a, b) in self.sumw.iter_mut().zip(&other.sumw) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.underflow_sumw2 += other.underflow_sumw2;
        self.overflow_sumw2 += other.overflow_sumw2;
        self.entries += other.entries;
        Ok(())
    }
}
