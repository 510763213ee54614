//! Threaded-code engine
//!
//! Every gate was bound to a thunk at freeze time: its evaluator tag plus the
//! resolved input and output net indices. A work stack holds plain gate
//! indices; executing one reads the inputs, writes the output and pushes the
//! output's fanout thunks. An on-stack flag keeps a thunk from sitting on the
//! stack twice. Transitions are stamped with a logical time that grows by one
//! per commit.

use crate::error::{Error, Result};
use crate::logic::Value;
use crate::sim::state::SimState;
use crate::sim::SimOptions;

pub(crate) fn run(
    state: &mut SimState,
    stim: &[(usize, Value)],
    seed_all: bool,
    options: &SimOptions,
) -> Result<()> {
    let netlist = state.netlist;
    let mut stack: Vec<usize> = Vec::new();
    let mut on_stack = vec![false; netlist.nb_gates()];
    let mut ltime: u64 = 0;

    for &(net, value) in stim {
        if state.commit(ltime, net, value) {
            ltime += 1;
        }
    }
    // Pushing in reverse index order makes the initial execution run in
    // index order
    if seed_all {
        for g in (0..netlist.nb_gates()).rev() {
            on_stack[g] = true;
            stack.push(g);
        }
    } else {
        for &n in netlist.inputs().iter().rev() {
            for &g in netlist.net(n).fanouts.iter().rev() {
                if !on_stack[g] {
                    on_stack[g] = true;
                    stack.push(g);
                }
            }
        }
    }

    let mut executed: usize = 0;
    while let Some(g) = stack.pop() {
        executed += 1;
        if executed > options.max_steps {
            return Err(Error::NonConvergence {
                limit: options.max_steps,
                trace: state.trace.clone(),
            });
        }
        on_stack[g] = false;
        let thunk = &netlist.thunks()[g];
        state.count_eval(g);
        let out = state
            .model
            .eval(thunk.kind, thunk.inputs.iter().map(|&n| state.values[n]));
        if state.commit(ltime, thunk.output, out) {
            ltime += 1;
            for &f in netlist.net(thunk.output).fanouts.iter().rev() {
                if !on_stack[f] {
                    on_stack[f] = true;
                    stack.push(f);
                }
            }
        }
    }
    Ok(())
}
