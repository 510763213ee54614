//! Per-vector simulation state shared by the engines

use crate::error::Result;
use crate::logic::{LogicModel, Value};
use crate::netlist::Netlist;
use crate::sim::result::Transition;
use crate::sim::{InputVector, SimOptions};

/// Mutable state of one simulation episode
///
/// Everything a run mutates lives here, so the frozen netlist is only ever
/// borrowed. During a baseline warm-up `recording` is off: values move but
/// neither the trace nor the evaluation counters do.
pub(crate) struct SimState<'a> {
    pub netlist: &'a Netlist,
    pub model: LogicModel,
    pub values: Vec<Value>,
    pub evals: Vec<u64>,
    pub trace: Vec<Transition>,
    pub recording: bool,
}

impl<'a> SimState<'a> {
    /// Reset all nets to the episode's initial value
    pub fn new(netlist: &'a Netlist, options: &SimOptions) -> SimState<'a> {
        let initial = match options.model {
            LogicModel::Two => Value::Zero,
            LogicModel::Three => options.initial,
        };
        SimState {
            netlist,
            model: options.model,
            values: vec![initial; netlist.nb_nets()],
            evals: vec![0; netlist.nb_gates()],
            trace: Vec::new(),
            recording: true,
        }
    }

    /// Commit a net value; returns whether it actually changed
    pub fn commit(&mut self, time: u64, net: usize, value: Value) -> bool {
        let old = self.values[net];
        if old == value {
            return false;
        }
        self.values[net] = value;
        if self.recording {
            self.trace.push(Transition {
                time,
                net,
                from: old,
                to: value,
            });
        }
        true
    }

    /// Evaluate a gate with the current input values
    pub fn eval_gate(&mut self, gate: usize) -> Value {
        self.count_eval(gate);
        let g = self.netlist.gate(gate);
        self.model
            .eval(g.kind, g.inputs.iter().map(|&n| self.values[n]))
    }

    /// Bump the evaluation counter of a gate
    pub fn count_eval(&mut self, gate: usize) {
        if self.recording {
            self.evals[gate] += 1;
        }
    }
}

/// Resolve a stimulus against a netlist
///
/// Returns `(net, value)` pairs in primary-input declaration order. Every
/// key must name a primary input and every value must belong to the model.
/// Declared inputs absent from the stimulus keep their current value.
pub(crate) fn resolve_stimulus(
    netlist: &Netlist,
    vector: &InputVector,
    model: LogicModel,
) -> Result<Vec<(usize, Value)>> {
    for (name, &value) in vector {
        match netlist.net_index(name) {
            Some(n) if netlist.net(n).is_input => {}
            _ => return Err(crate::error::Error::UnknownNet(name.clone())),
        }
        model.check(value)?;
    }
    Ok(netlist
        .inputs()
        .iter()
        .filter_map(|&n| {
            vector
                .get(&netlist.net(n).name)
                .map(|&value| (n, value))
        })
        .collect())
}
