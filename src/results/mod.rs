//! Results storage module
//!
//! Provides persistent storage for measurement summaries.

mod storage;

pub use storage::SummaryWriter;
