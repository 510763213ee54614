//! Single-list gate-driven engine
//!
//! Only gates are scheduled. Within a unit every queued gate evaluates
//! exactly once against the committed values and stages its output; staged
//! values commit together at the unit boundary, which queues the fanouts of
//! the nets that changed for the next unit.

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
    let mut scheduled = vec![false; netlist.nb_gates()];
    let mut queue: Vec<usize> = Vec::new();
    if seed_all {
        queue.extend(0..netlist.nb_gates());
        scheduled.fill(true);
    }

    // The stimulus commits at time 0 and queues the readers of the changed
    // inputs
    for &(net, value) in stim {
        if state.commit(0, net, value) {
            for &g in &netlist.net(net).fanouts {
                if !scheduled[g] {
                    scheduled[g] = true;
                    queue.push(g);
                }
            }
        }
    }

    let mut time: u64 = 0;
    while !queue.is_empty() {
        if time as usize > options.max_steps {
            return Err(Error::NonConvergence {
                limit: options.max_steps,
                trace: state.trace.clone(),
            });
        }
        queue.sort_unstable();
        let mut staged: Vec<(usize, Value)> = Vec::new();
        for g in std::mem::take(&mut queue) {
            scheduled[g] = false;
            let out = state.eval_gate(g);
            let net = netlist.gate(g).output;
            if out != state.values[net] {
                staged.push((net, out));
            }
        }
        // Commit the staged values; each queues its fanouts for the next unit
        for (net, value) in staged {
            if state.commit(time + 1, net, value) {
                for &g in &netlist.net(net).fanouts {
                    if !scheduled[g] {
                        scheduled[g] = true;
                        queue.push(g);
                    }
                }
            }
        }
        time += 1;
    }
    Ok(())
}
