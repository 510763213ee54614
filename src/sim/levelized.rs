//! Zero-delay levelized engine
//!
//! Evaluates gates in ascending level order, each exactly once. Gates the
//! levelizer could not place form the feedback set; they and their forward
//! cones are re-evaluated until the values stop moving or the pass cap is
//! hit. The trace only ever holds the initial and final value of each net,
//! so this engine never reports a hazard.

use tracing::debug;

use crate::error::{Error, Result};
use crate::logic::Value;
use crate::sim::result::Transition;
use crate::sim::state::SimState;
use crate::sim::SimOptions;

pub(crate) fn run(
    state: &mut SimState,
    stim: &[(usize, Value)],
    _seed_all: bool,
    options: &SimOptions,
) -> Result<()> {
    let netlist = state.netlist;
    if options.strict_levelized && netlist.has_feedback() {
        return Err(Error::FeedbackInLevelized(netlist.feedback().len()));
    }

    // Values move silently; the trace is rebuilt at the end from the initial
    // snapshot so that intermediate flips during feedback iteration never
    // show up in it.
    let initial = state.values.clone();
    let mut order: Vec<usize> = Vec::new();
    let mut touched = vec![false; netlist.nb_nets()];
    let mut set = |values: &mut Vec<Value>, net: usize, value: Value| -> bool {
        if values[net] == value {
            return false;
        }
        values[net] = value;
        if !touched[net] {
            touched[net] = true;
            order.push(net);
        }
        true
    };

    for &(net, value) in stim {
        set(&mut state.values, net, value);
    }
    for &g in netlist.sweep() {
        let out = state.eval_gate(g);
        set(&mut state.values, netlist.gate(g).output, out);
    }

    // Iterate the feedback gates and whatever their changes reach
    let mut work: Vec<usize> = netlist.feedback().to_vec();
    let mut passes = 0;
    while !work.is_empty() {
        passes += 1;
        if passes > options.max_passes {
            emit(state, &order, &initial);
            return Err(Error::NonConvergence {
                limit: options.max_passes,
                trace: state.trace.clone(),
            });
        }
        work.sort_unstable();
        work.dedup();
        for g in std::mem::take(&mut work) {
            let out = state.eval_gate(g);
            let net = netlist.gate(g).output;
            if set(&mut state.values, net, out) {
                work.extend_from_slice(&netlist.net(net).fanouts);
            }
        }
    }
    if passes > 0 {
        debug!(passes, "feedback iteration settled");
    }

    emit(state, &order, &initial);
    Ok(())
}

/// Rebuild the initial-to-final trace in first-commit order
fn emit(state: &mut SimState, order: &[usize], initial: &[Value]) {
    if !state.recording {
        return;
    }
    for &net in order {
        if state.values[net] != initial[net] {
            state.trace.push(Transition {
                time: 0,
                net,
                from: initial[net],
                to: state.values[net],
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::logic::GateKind::*;
    use crate::logic::LogicModel;
    use crate::logic::Value::*;
    use crate::netlist::{CircuitBuilder, Netlist};
    use crate::sim::testing::vector;
    use crate::sim::{Engine, SimOptions};

    fn ring() -> Netlist {
        let mut builder = CircuitBuilder::new();
        builder.add_gate(Not, &["r3"], "r1").unwrap();
        builder.add_gate(Not, &["r1"], "r2").unwrap();
        builder.add_gate(Not, &["r2"], "r3").unwrap();
        builder.add_outputs(["r1", "r2", "r3"]).unwrap();
        builder.freeze().unwrap()
    }

    #[test]
    fn test_no_glitch_exposed() {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b", "c"]).unwrap();
        builder.add_gate(And, &["a", "b"], "n1").unwrap();
        builder.add_gate(Not, &["a"], "n2").unwrap();
        builder.add_gate(And, &["n2", "c"], "n3").unwrap();
        builder.add_gate(Or, &["n1", "n3"], "y").unwrap();
        builder.add_output("y").unwrap();
        let netlist = builder.freeze().unwrap();

        let options = SimOptions {
            baseline: Some(vector(&[("a", One), ("b", One), ("c", One)])),
            ..SimOptions::default()
        };
        let stim = vector(&[("a", Zero), ("b", One), ("c", One)]);
        let res = Engine::Levelized
            .simulate_vector(&netlist, &stim, &options)
            .unwrap();
        assert_eq!(res.output("y"), Some(One));
        assert!(!res.has_hazards());
        // y settles at its old value, so it does not even appear in the trace
        let y = netlist.net_index("y").unwrap();
        assert!(res.trace().iter().all(|t| t.net != y));
    }

    #[test]
    fn test_ring_diverges_two_valued() {
        let netlist = ring();
        let err = Engine::Levelized
            .simulate_vector(&netlist, &vector(&[]), &SimOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NonConvergence { limit: 64, .. }));
    }

    #[test]
    fn test_ring_settles_three_valued() {
        let netlist = ring();
        let options = SimOptions {
            model: LogicModel::Three,
            ..SimOptions::default()
        };
        let res = Engine::Levelized
            .simulate_vector(&netlist, &vector(&[]), &options)
            .unwrap();
        for name in ["r1", "r2", "r3"] {
            assert_eq!(res.output(name), Some(Unknown));
        }
        assert!(res.trace().is_empty());
    }

    #[test]
    fn test_strict_feedback() {
        let netlist = ring();
        let options = SimOptions {
            strict_levelized: true,
            ..SimOptions::default()
        };
        let err = Engine::Levelized
            .simulate_vector(&netlist, &vector(&[]), &options)
            .unwrap_err();
        assert!(matches!(err, Error::FeedbackInLevelized(3)));
    }
}
