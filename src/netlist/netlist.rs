use core::fmt;

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::logic::GateKind;

/// A named wire carrying a single logic value at any instant
#[derive(Debug, Clone)]
pub struct Net {
    /// User-supplied name
    pub name: String,
    /// Whether the net is a primary input
    pub is_input: bool,
    /// Whether the net is a primary output
    pub is_output: bool,
    /// Index of the driving gate; `None` for primary inputs
    pub driver: Option<usize>,
    /// Gates reading the net, deduplicated and in ascending order
    pub fanouts: Vec<usize>,
}

/// A boolean operator with fixed type, ordered inputs and one output net
#[derive(Debug, Clone)]
pub struct Gate {
    /// Gate type
    pub kind: GateKind,
    /// Ordered input net indices
    pub inputs: Vec<usize>,
    /// Output net index
    pub output: usize,
    /// Topological level; `None` for gates caught in feedback
    pub level: Option<u32>,
}

/// A pre-resolved execution unit for the threaded-code engine
///
/// Bound once at freeze time so the hot loop never touches the gate table.
#[derive(Debug, Clone)]
pub struct Thunk {
    /// Gate this thunk evaluates
    pub gate: usize,
    /// Evaluator tag
    pub kind: GateKind,
    /// Resolved input net indices
    pub inputs: Box<[usize]>,
    /// Resolved output net index
    pub output: usize,
}

/// An immutable gate-level netlist, ready for simulation
///
/// Built through [`CircuitBuilder`](crate::netlist::CircuitBuilder) and then
/// frozen. Engines only ever borrow it; all per-vector state lives with the
/// engine run.
#[derive(Debug, Clone)]
pub struct Netlist {
    pub(crate) nets: Vec<Net>,
    pub(crate) gates: Vec<Gate>,
    pub(crate) name_to_net: FxHashMap<String, usize>,
    pub(crate) inputs: Vec<usize>,
    pub(crate) outputs: Vec<usize>,
    pub(crate) sweep: Vec<usize>,
    pub(crate) feedback: Vec<usize>,
    pub(crate) thunks: Vec<Thunk>,
    pub(crate) depth: u32,
}

impl Netlist {
    /// Return the number of nets
    pub fn nb_nets(&self) -> usize {
        self.nets.len()
    }

    /// Return the number of gates
    pub fn nb_gates(&self) -> usize {
        self.gates.len()
    }

    /// Return the number of primary inputs
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Return the number of primary outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Get the net at index i
    pub fn net(&self, i: usize) -> &Net {
        &self.nets[i]
    }

    /// Get the gate at index i
    pub fn gate(&self, i: usize) -> &Gate {
        &self.gates[i]
    }

    /// Look a net up by name
    pub fn net_index(&self, name: &str) -> Option<usize> {
        self.name_to_net.get(name).copied()
    }

    /// Primary input net indices, in declaration order
    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    /// Primary output net indices, in declaration order
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// Leveled gates in ascending (level, index) order
    pub fn sweep(&self) -> &[usize] {
        &self.sweep
    }

    /// Gates that could not be leveled, in ascending index order
    pub fn feedback(&self) -> &[usize] {
        &self.feedback
    }

    /// Whether the netlist contains combinational feedback
    pub fn has_feedback(&self) -> bool {
        !self.feedback.is_empty()
    }

    /// Execution units bound for the threaded-code engine
    pub fn thunks(&self) -> &[Thunk] {
        &self.thunks
    }

    /// Maximum gate level; 0 for an empty or fully cyclic netlist
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        for (i, net) in self.nets.iter().enumerate() {
            if net.is_input {
                assert!(net.driver.is_none(), "input net {} has a driver", net.name);
            } else {
                assert!(net.driver.is_some(), "net {} has no driver", net.name);
            }
            if let Some(d) = net.driver {
                assert_eq!(self.gates[d].output, i, "driver of {} disagrees", net.name);
            }
            for &g in &net.fanouts {
                assert!(
                    self.gates[g].inputs.contains(&i),
                    "fanout edge of {} is not reciprocal",
                    net.name
                );
            }
        }
        for (i, gate) in self.gates.iter().enumerate() {
            assert!(gate.kind.arity_ok(gate.inputs.len()));
            for &n in &gate.inputs {
                assert!(
                    self.nets[n].fanouts.contains(&i),
                    "gate {} is missing from a fanout list",
                    i
                );
            }
            if let Some(level) = gate.level {
                let expected = 1 + gate
                    .inputs
                    .iter()
                    .map(|&n| match self.nets[n].driver {
                        Some(d) => self.gates[d].level.unwrap_or(0),
                        None => 0,
                    })
                    .max()
                    .unwrap_or(0);
                assert_eq!(level, expected, "level of gate {} is inconsistent", i);
            }
        }
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Netlist with {} inputs, {} outputs:",
            self.nb_inputs(),
            self.nb_outputs()
        )?;
        for gate in &self.gates {
            writeln!(
                f,
                "\t{} = {}({})",
                self.nets[gate.output].name,
                gate.kind,
                gate.inputs.iter().map(|&n| &self.nets[n].name).join(", ")
            )?;
        }
        for &o in &self.outputs {
            writeln!(f, "\toutput {}", self.nets[o].name)?;
        }
        Ok(())
    }
}
