//! Hazard classification of per-net transition histories
//!
//! Works purely on the trace of one vector: for each net the committed value
//! sequence is extracted and matched against the textbook definitions. The
//! initial value of the net opens the sequence but does not count as a
//! transition of its own.

use core::fmt;

use crate::logic::Value;
use crate::netlist::Netlist;
use crate::sim::result::Transition;

/// Classification of a net's activity within one vector
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Hazard {
    /// At most one transition, or no exposed glitch
    #[default]
    None,
    /// Settles at 0 after at least one intermediate 1
    Static0,
    /// Settles at 1 after at least one intermediate 0
    Static1,
    /// Reaches a different final value after three or more transitions
    Dynamic,
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazard::None => write!(f, "none"),
            Hazard::Static0 => write!(f, "static-0"),
            Hazard::Static1 => write!(f, "static-1"),
            Hazard::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Classify one net's committed value sequence
///
/// The sequence starts with the net's initial value followed by the value
/// after each transition.
pub fn classify_values(values: &[Value]) -> Hazard {
    if values.len() < 3 {
        return Hazard::None;
    }
    let nb_transitions = values.len() - 1;
    let first = values[0];
    let last = values[values.len() - 1];
    let intermediate = &values[1..values.len() - 1];
    if first == last {
        match first {
            Value::Zero if intermediate.contains(&Value::One) => Hazard::Static0,
            Value::One if intermediate.contains(&Value::Zero) => Hazard::Static1,
            _ => Hazard::None,
        }
    } else if nb_transitions >= 3 {
        Hazard::Dynamic
    } else {
        Hazard::None
    }
}

/// Classify every non-primary-input net of a netlist from a trace
///
/// Deterministic given the trace; running it twice yields identical results.
pub fn classify(trace: &[Transition], netlist: &Netlist) -> Vec<(String, Hazard)> {
    let mut sequences: Vec<Vec<Value>> = vec![Vec::new(); netlist.nb_nets()];
    for t in trace {
        if sequences[t.net].is_empty() {
            sequences[t.net].push(t.from);
        }
        sequences[t.net].push(t.to);
    }
    (0..netlist.nb_nets())
        .filter(|&n| !netlist.net(n).is_input)
        .map(|n| {
            (
                netlist.net(n).name.clone(),
                classify_values(&sequences[n]),
            )
        })
        .collect()
}
