//! Instance construction and parsing errors.

use thiserror::Error;

/// Errors raised while building or loading a [`ProblemInstance`](super::ProblemInstance).
///
/// All of these are fatal at load time: no search may start from an
/// instance that failed validation.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The instance has no machines.
    #[error("instance must have at least one machine")]
    NoMachines,

    /// The processing-time table does not have one row per machine.
    #[error("processing table has {found} rows, expected {expected} (one per machine)")]
    ProcessingRows { expected: usize, found: usize },

    /// A processing-time row does not have one entry per job.
    #[error("processing row of machine {machine} has {found} entries, expected {expected}")]
    ProcessingColumns {
        machine: usize,
        expected: usize,
        found: usize,
    },

    /// The setup tensor does not have one matrix per machine.
    #[error("setup tensor has {found} matrices, expected {expected} (one per machine)")]
    SetupMatrices { expected: usize, found: usize },

    /// A setup matrix does not have one row per job.
    #[error("setup matrix of machine {machine} has {found} rows, expected {expected}")]
    SetupRows {
        machine: usize,
        expected: usize,
        found: usize,
    },

    /// A setup matrix row does not have one entry per job.
    #[error("setup matrix of machine {machine} row {row} has {found} entries, expected {expected}")]
    SetupShape {
        machine: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The text ended before all expected values were read.
    #[error("unexpected end of input while reading {what}")]
    UnexpectedEof { what: &'static str },

    /// A token could not be parsed as a non-negative integer.
    #[error("invalid {what}: {token:?}")]
    InvalidToken { what: &'static str, token: String },

    /// The header declares more values than the input can hold.
    #[error("header declares {jobs} jobs on {machines} machines, more than the input holds")]
    TooLarge { jobs: usize, machines: usize },

    /// The instance file could not be read.
    #[error("failed to read instance file")]
    Io(#[from] std::io::Error),
}
