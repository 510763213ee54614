//! Compute netlist statistics
//!
//! ```
//! # use hazel::CircuitBuilder;
//! # let netlist = CircuitBuilder::new().freeze().unwrap();
//! use hazel::netlist::stats::stats;
//! let stats = stats(&netlist);
//!
//! // Check that there is no Xor gate
//! assert_eq!(stats.nb_xor, 0);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::logic::GateKind;
use crate::netlist::Netlist;

/// Number of inputs, outputs and gates in a netlist
#[derive(Clone, Debug)]
pub struct NetlistStats {
    /// Number of primary inputs
    pub nb_inputs: usize,
    /// Number of primary outputs
    pub nb_outputs: usize,
    /// Number of nets
    pub nb_nets: usize,
    /// Number of And gates
    pub nb_and: usize,
    /// Number of Or gates
    pub nb_or: usize,
    /// Number of Not gates
    pub nb_not: usize,
    /// Number of Nand gates
    pub nb_nand: usize,
    /// Number of Nor gates
    pub nb_nor: usize,
    /// Number of Xor gates
    pub nb_xor: usize,
    /// Number of Xnor gates
    pub nb_xnor: usize,
    /// Maximum gate level
    pub depth: u32,
    /// Number of gates caught in combinational feedback
    pub nb_feedback: usize,
}

impl NetlistStats {
    /// Total number of gates
    pub fn nb_gates(&self) -> usize {
        self.nb_and
            + self.nb_or
            + self.nb_not
            + self.nb_nand
            + self.nb_nor
            + self.nb_xor
            + self.nb_xnor
    }
}

impl fmt::Display for NetlistStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        writeln!(f, "  Nets: {}", self.nb_nets)?;
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        let by_kind = [
            ("And", self.nb_and),
            ("Or", self.nb_or),
            ("Not", self.nb_not),
            ("Nand", self.nb_nand),
            ("Nor", self.nb_nor),
            ("Xor", self.nb_xor),
            ("Xnor", self.nb_xnor),
        ];
        for (name, nb) in by_kind {
            if nb != 0 {
                writeln!(f, "      {}: {}", name, nb)?;
            }
        }
        writeln!(f, "  Depth: {}", self.depth)?;
        if self.nb_feedback != 0 {
            writeln!(f, "  Feedback gates: {}", self.nb_feedback)?;
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the netlist
pub fn stats(netlist: &Netlist) -> NetlistStats {
    let mut ret = NetlistStats {
        nb_inputs: netlist.nb_inputs(),
        nb_outputs: netlist.nb_outputs(),
        nb_nets: netlist.nb_nets(),
        nb_and: 0,
        nb_or: 0,
        nb_not: 0,
        nb_nand: 0,
        nb_nor: 0,
        nb_xor: 0,
        nb_xnor: 0,
        depth: netlist.depth(),
        nb_feedback: netlist.feedback().len(),
    };
    for i in 0..netlist.nb_gates() {
        match netlist.gate(i).kind {
            GateKind::And => ret.nb_and += 1,
            GateKind::Or => ret.nb_or += 1,
            GateKind::Not => ret.nb_not += 1,
            GateKind::Nand => ret.nb_nand += 1,
            GateKind::Nor => ret.nb_nor += 1,
            GateKind::Xor => ret.nb_xor += 1,
            GateKind::Xnor => ret.nb_xnor += 1,
        }
    }
    ret
}
