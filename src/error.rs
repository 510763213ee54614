//! Error types for netlist construction and simulation

use thiserror::Error;

use crate::logic::GateKind;
use crate::sim::Transition;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the builder, the engines and the file readers
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Value symbol outside the active logic model
    #[error("logic value `{0}` is outside the active logic model")]
    BadValue(String),

    /// Reference to a net that was never declared as a primary input
    #[error("unknown primary input `{0}`")]
    UnknownNet(String),

    /// Two gates attempt to drive the same net
    #[error("net `{0}` already has a driver")]
    MultipleDrivers(String),

    /// Internal net without a driver found at freeze
    #[error("net `{0}` has no driver and is not a primary input")]
    Undriven(String),

    /// Gate constructed with the wrong number of inputs
    #[error("wrong number of inputs for {kind}: got {got}")]
    ArityMismatch {
        /// Gate type being constructed
        kind: GateKind,
        /// Number of inputs supplied
        got: usize,
    },

    /// Mutation attempted after freeze
    #[error("netlist is frozen")]
    NetlistFrozen,

    /// Engine exceeded its iteration cap
    #[error("simulation did not converge within {limit} steps")]
    NonConvergence {
        /// The iteration cap that was exceeded
        limit: usize,
        /// Transitions committed before the engine gave up
        trace: Vec<Transition>,
    },

    /// Zero-delay levelized engine refused a netlist with feedback
    #[error("netlist has combinational feedback ({0} gates)")]
    FeedbackInLevelized(usize),

    /// Underlying file error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed netlist or stimulus file
    #[error("parse error at line {line}: {msg}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        msg: String,
    },
}
