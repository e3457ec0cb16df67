//! Cluster measurements
//!
//! Gathers measurement data from the metrics backend and packages it into
//! perf-dash summaries.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod netprog;
mod perfdata;
mod summary;

pub use netprog::{GatherError, NetProgGatherer};
pub use perfdata::{DataItem, PerfData};
pub use summary::Summary;
