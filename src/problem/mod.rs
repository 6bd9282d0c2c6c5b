//! Problem instances.
//!
//! An instance of the unrelated parallel machine scheduling problem with
//! sequence- and machine-dependent setup times (UPMSP-SDST) is fully
//! described by a processing-time table and a setup-time tensor. Instances
//! are immutable once built and can be shared freely across threads.
//!
//! # References
//!
//! - Vallada & Ruiz (2011), "A genetic algorithm for the unrelated parallel
//!   machine scheduling problem with sequence dependent setup times"

mod error;
mod instance;
mod parse;

pub use error::InstanceError;
pub use instance::ProblemInstance;
