//! Topological levelization of a netlist
//!
//! Primary inputs sit at level 0 and each gate is one level above the highest
//! of its inputs. Gates left unassigned by the Kahn sweep form the feedback
//! set; they are not an error here, only the zero-delay engine cares.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use itertools::Itertools;

use super::netlist::{Gate, Net};

/// Result of leveling the gates of a netlist
#[derive(Debug, Clone)]
pub(crate) struct Levelization {
    /// Per-gate level; `None` for gates caught in feedback
    pub levels: Vec<Option<u32>>,
    /// Leveled gates in ascending (level, index) order
    pub sweep: Vec<usize>,
    /// Unleveled gates in ascending index order
    pub feedback: Vec<usize>,
    /// Maximum assigned level
    pub depth: u32,
}

/// Assign levels by Kahn-style ordering over the driver-to-fanout DAG
///
/// Among gates whose inputs are all ready, the lowest gate index goes first,
/// so the assignment is deterministic.
pub(crate) fn levelize(nets: &[Net], gates: &[Gate]) -> Levelization {
    // Number of distinct gate-driven input nets not yet resolved
    let mut pending: Vec<usize> = gates
        .iter()
        .map(|g| {
            g.inputs
                .iter()
                .unique()
                .filter(|&&n| nets[n].driver.is_some())
                .count()
        })
        .collect();

    let mut levels: Vec<Option<u32>> = vec![None; gates.len()];
    let mut ready: BinaryHeap<Reverse<usize>> = pending
        .iter()
        .enumerate()
        .filter(|(_, &p)| p == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut sweep = Vec::with_capacity(gates.len());
    while let Some(Reverse(i)) = ready.pop() {
        let gate = &gates[i];
        let level = 1 + gate
            .inputs
            .iter()
            .map(|&n| match nets[n].driver {
                Some(d) => levels[d].expect("input of a ready gate must be leveled"),
                None => 0,
            })
            .max()
            .unwrap_or(0);
        levels[i] = Some(level);
        sweep.push(i);
        for &f in &nets[gate.output].fanouts {
            pending[f] -= 1;
            if pending[f] == 0 {
                ready.push(Reverse(f));
            }
        }
    }

    sweep.sort_by_key(|&i| (levels[i], i));
    let feedback: Vec<usize> = (0..gates.len()).filter(|&i| levels[i].is_none()).collect();
    let depth = levels.iter().flatten().copied().max().unwrap_or(0);
    Levelization {
        levels,
        sweep,
        feedback,
        depth,
    }
}
