//! Single-list event-driven engine with cancellation
//!
//! One priority queue carries both net updates and gate evaluations. Entries
//! are keyed by (time, phase, order): the phase marker guarantees that every
//! update at time t applies before any gate evaluates at time t, updates keep
//! insertion order and evaluations gate-index order. A pending update that a
//! later evaluation reverses is invalidated through a side table instead of
//! scanning the queue.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use fxhash::FxHashSet;

use crate::error::{Error, Result};
use crate::logic::Value;
use crate::sim::state::SimState;
use crate::sim::SimOptions;

enum Action {
    Update { net: usize, value: Value },
    Eval { gate: usize },
}

struct Entry {
    time: u64,
    phase: u8,
    order: u64,
    seq: u64,
    action: Action,
}

impl Entry {
    fn key(&self) -> (u64, u8, u64, u64) {
        (self.time, self.phase, self.order, self.seq)
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

const PHASE_UPDATE: u8 = 0;
const PHASE_EVAL: u8 = 1;

struct Queue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Queue {
    fn new() -> Queue {
        Queue {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule a net update; updates at the same time keep insertion order
    fn push_update(&mut self, time: u64, net: usize, value: Value) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            time,
            phase: PHASE_UPDATE,
            order: seq,
            seq,
            action: Action::Update { net, value },
        }));
        seq
    }

    /// Schedule a gate evaluation; evaluations at the same time run in gate
    /// index order
    fn push_eval(&mut self, time: u64, gate: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            time,
            phase: PHASE_EVAL,
            order: gate as u64,
            seq,
            action: Action::Eval { gate },
        }));
    }

    fn pop(&mut self) -> Option<Entry> {
        self.heap.pop().map(|Reverse(e)| e)
    }
}

pub(crate) fn run(
    state: &mut SimState,
    stim: &[(usize, Value)],
    seed_all: bool,
    options: &SimOptions,
) -> Result<()> {
    let netlist = state.netlist;
    let mut queue = Queue::new();
    // Latest pending update per net, and the invalidated sequence numbers
    let mut pending: Vec<Option<(u64, Value)>> = vec![None; netlist.nb_nets()];
    let mut cancelled: FxHashSet<u64> = FxHashSet::default();

    for &(net, value) in stim {
        if state.values[net] != value {
            queue.push_update(0, net, value);
        }
    }
    if seed_all {
        for g in 0..netlist.nb_gates() {
            queue.push_eval(0, g);
        }
    }

    while let Some(entry) = queue.pop() {
        if entry.time as usize > options.max_steps {
            return Err(Error::NonConvergence {
                limit: options.max_steps,
                trace: state.trace.clone(),
            });
        }
        match entry.action {
            Action::Update { net, value } => {
                if cancelled.remove(&entry.seq) {
                    continue;
                }
                if pending[net].is_some_and(|(seq, _)| seq == entry.seq) {
                    pending[net] = None;
                }
                if state.commit(entry.time, net, value) {
                    for &g in &netlist.net(net).fanouts {
                        queue.push_eval(entry.time, g);
                    }
                }
            }
            Action::Eval { gate } => {
                let out = state.eval_gate(gate);
                let net = netlist.gate(gate).output;
                let current = state.values[net];
                match pending[net] {
                    Some((seq, value)) => {
                        if out == current {
                            if value != current {
                                // The earlier transition would be reversed
                                // before taking effect; drop it
                                cancelled.insert(seq);
                                pending[net] = None;
                            }
                        } else if value != out {
                            let seq = queue.push_update(entry.time + 1, net, out);
                            pending[net] = Some((seq, out));
                        }
                        // A pending event already targets this value
                    }
                    None => {
                        if out != current {
                            let seq = queue.push_update(entry.time + 1, net, out);
                            pending[net] = Some((seq, out));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
