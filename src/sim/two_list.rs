//! Two-list unit-delay event-driven engine
//!
//! Keeps the classical pair of structures: an event list of pending net
//! updates timestamped one unit ahead, and a gate list of gates queued for
//! evaluation at the current unit. Events apply in insertion order, gates
//! evaluate in index order.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::logic::Value;
use crate::sim::state::SimState;
use crate::sim::SimOptions;

struct Event {
    time: u64,
    net: usize,
    value: Value,
}

pub(crate) fn run(
    state: &mut SimState,
    stim: &[(usize, Value)],
    seed_all: bool,
    options: &SimOptions,
) -> Result<()> {
    let netlist = state.netlist;

    // Events are only ever scheduled one unit ahead, so a FIFO stays sorted
    let mut events: VecDeque<Event> = stim
        .iter()
        .filter(|&&(net, value)| state.values[net] != value)
        .map(|&(net, value)| Event {
            time: 0,
            net,
            value,
        })
        .collect();

    let mut gate_list: Vec<usize> = Vec::new();
    let mut on_list = vec![false; netlist.nb_gates()];
    if seed_all {
        gate_list.extend(0..netlist.nb_gates());
        on_list.fill(true);
    }

    let mut time: u64 = 0;
    while !(events.is_empty() && gate_list.is_empty()) {
        if time as usize > options.max_steps {
            return Err(Error::NonConvergence {
                limit: options.max_steps,
                trace: state.trace.clone(),
            });
        }

        // Apply the events of this unit and collect the fanout gates of the
        // nets that actually changed
        while events.front().is_some_and(|e| e.time == time) {
            let e = events.pop_front().unwrap();
            if state.commit(time, e.net, e.value) {
                for &g in &netlist.net(e.net).fanouts {
                    if !on_list[g] {
                        on_list[g] = true;
                        gate_list.push(g);
                    }
                }
            }
        }

        // Evaluate the queued gates in index order; differing outputs become
        // events one unit ahead
        gate_list.sort_unstable();
        for g in std::mem::take(&mut gate_list) {
            on_list[g] = false;
            let out = state.eval_gate(g);
            let net = netlist.gate(g).output;
            if out != state.values[net] {
                events.push_back(Event {
                    time: time + 1,
                    net,
                    value: out,
                });
            }
        }
        time += 1;
    }
    Ok(())
}
