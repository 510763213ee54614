//! Results of simulating one input vector

use crate::logic::Value;
use crate::sim::hazard::Hazard;

/// One committed change of a net value
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Transition {
    /// Time at which the change was committed
    pub time: u64,
    /// Net index
    pub net: usize,
    /// Value before the change
    pub from: Value,
    /// Value after the change
    pub to: Value,
}

/// Immutable record of one vector's simulation
///
/// Holds the final primary-output values, the full trace of committed
/// transitions, the per-gate evaluation counts and the hazard report.
/// Comparing two results with `==` compares all four.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorResult {
    pub(crate) outputs: Vec<(String, Value)>,
    pub(crate) trace: Vec<Transition>,
    pub(crate) evals: Vec<u64>,
    pub(crate) hazards: Vec<(String, Hazard)>,
}

impl VectorResult {
    /// Final primary-output values, in declaration order
    pub fn outputs(&self) -> &[(String, Value)] {
        &self.outputs
    }

    /// Final value of one primary output
    pub fn output(&self, name: &str) -> Option<Value> {
        self.outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    /// Ordered trace of committed transitions
    pub fn trace(&self) -> &[Transition] {
        &self.trace
    }

    /// Number of evaluations per gate
    pub fn evals(&self) -> &[u64] {
        &self.evals
    }

    /// Total number of gate evaluations
    pub fn total_evals(&self) -> u64 {
        self.evals.iter().sum()
    }

    /// Hazard classification per non-input net, in net order
    pub fn hazards(&self) -> &[(String, Hazard)] {
        &self.hazards
    }

    /// Hazard classification of one net
    pub fn hazard(&self, name: &str) -> Option<Hazard> {
        self.hazards
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, h)| h)
    }

    /// Whether any net saw a static or dynamic hazard
    pub fn has_hazards(&self) -> bool {
        self.hazards.iter().any(|&(_, h)| h != Hazard::None)
    }
}
