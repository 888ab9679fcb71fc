//! Higgs-pair candidate reconstruction in four-jet collider events.
//!
//! Events with at least four jets passing the preselection are split
//! into two dijets in each of the three possible ways. Each of these
//! pairings is scored against the hypothesis that both dijets come from
//! Higgs boson decays, and the best-ranked pairing assigns the event to
//! the signal region, the sideband, or neither.
//!
//! ```no_run
//! use quadjet::{Analysis, Config, Event};
//!
//! let events: Vec<Event> = serde_json::from_str("[]").unwrap();
//! let output = Analysis::new(Config::default())
//!     .run("toy", 0..events.len(), events, 0)
//!     .unwrap();
//! println!("{}", output.sumw);
//! ```
#![warn(clippy::all, rust_2018_idioms)]

pub mod accumulator;
pub mod analysis;
pub mod config;
pub mod dijet;
pub mod error;
pub mod event;
pub mod histogram;
pub mod momentum;
pub mod preselect;
pub mod quadjet;

pub use accumulator::{Accumulator, Cut, Output, Region};
pub use analysis::{Analysis, BatchSummary};
pub use config::Config;
pub use error::{AnalysisError, KinematicsError};
pub use event::{Event, Jet};
pub use quadjet::Selection;
