//! Construction API for netlists

use fxhash::FxHashMap;
use tracing::debug;

use super::level::levelize;
use super::netlist::{Gate, Net, Netlist, Thunk};
use crate::error::{Error, Result};
use crate::logic::GateKind;

/// Incremental builder for a [`Netlist`]
///
/// Nets are created implicitly the first time a name is seen. Construction
/// errors are reported eagerly at the offending call; [`freeze`] runs the
/// whole-netlist checks, materializes fanouts and levels, and returns the
/// immutable netlist. After a successful freeze the builder rejects every
/// further call.
///
/// [`freeze`]: CircuitBuilder::freeze
///
/// ```
/// use hazel::{CircuitBuilder, GateKind};
///
/// let mut builder = CircuitBuilder::new();
/// builder.add_inputs(["a", "b", "c"]).unwrap();
/// builder.add_gate(GateKind::And, &["a", "b"], "x").unwrap();
/// builder.add_gate(GateKind::Or, &["x", "c"], "y").unwrap();
/// builder.add_output("y").unwrap();
/// let netlist = builder.freeze().unwrap();
/// assert_eq!(netlist.nb_gates(), 2);
/// ```
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    nets: Vec<Net>,
    gates: Vec<Gate>,
    name_to_net: FxHashMap<String, usize>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    frozen: bool,
}

impl CircuitBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of nets created so far
    pub fn nb_nets(&self) -> usize {
        self.nets.len()
    }

    /// Return the number of gates added so far
    pub fn nb_gates(&self) -> usize {
        self.gates.len()
    }

    fn check_mutable(&self) -> Result<()> {
        if self.frozen {
            Err(Error::NetlistFrozen)
        } else {
            Ok(())
        }
    }

    fn net_index(&mut self, name: &str) -> usize {
        if let Some(&i) = self.name_to_net.get(name) {
            return i;
        }
        let i = self.nets.len();
        self.nets.push(Net {
            name: name.to_string(),
            is_input: false,
            is_output: false,
            driver: None,
            fanouts: Vec::new(),
        });
        self.name_to_net.insert(name.to_string(), i);
        i
    }

    /// Declare a primary input net
    ///
    /// The name may already exist as long as nothing drives it.
    pub fn add_input(&mut self, name: impl AsRef<str>) -> Result<usize> {
        self.check_mutable()?;
        let name = name.as_ref();
        let i = self.net_index(name);
        if self.nets[i].driver.is_some() {
            return Err(Error::MultipleDrivers(name.to_string()));
        }
        if !self.nets[i].is_input {
            self.nets[i].is_input = true;
            self.inputs.push(i);
        }
        Ok(i)
    }

    /// Declare several primary inputs at once
    pub fn add_inputs<I>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            self.add_input(name)?;
        }
        Ok(())
    }

    /// Mark a net as a primary output, creating it if unknown
    pub fn add_output(&mut self, name: impl AsRef<str>) -> Result<usize> {
        self.check_mutable()?;
        let i = self.net_index(name.as_ref());
        if !self.nets[i].is_output {
            self.nets[i].is_output = true;
            self.outputs.push(i);
        }
        Ok(i)
    }

    /// Mark several nets as primary outputs at once
    pub fn add_outputs<I>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            self.add_output(name)?;
        }
        Ok(())
    }

    /// Add a gate, creating input and output nets as needed
    ///
    /// Fails with [`Error::ArityMismatch`] when the input count does not fit
    /// the gate type and with [`Error::MultipleDrivers`] when the output net
    /// is already driven or is a primary input.
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        inputs: &[impl AsRef<str>],
        output: impl AsRef<str>,
    ) -> Result<usize> {
        self.check_mutable()?;
        if !kind.arity_ok(inputs.len()) {
            return Err(Error::ArityMismatch {
                kind,
                got: inputs.len(),
            });
        }
        let output = output.as_ref();
        let out = self.net_index(output);
        if self.nets[out].driver.is_some() || self.nets[out].is_input {
            return Err(Error::MultipleDrivers(output.to_string()));
        }
        let inputs: Vec<usize> = inputs.iter().map(|n| self.net_index(n.as_ref())).collect();
        let g = self.gates.len();
        self.nets[out].driver = Some(g);
        self.gates.push(Gate {
            kind,
            inputs,
            output: out,
            level: None,
        });
        Ok(g)
    }

    /// Freeze the netlist
    ///
    /// Rejects internal nets without a driver, materializes fanout lists,
    /// levels the gates and binds the threaded-code thunks. The builder is
    /// unusable afterwards.
    pub fn freeze(&mut self) -> Result<Netlist> {
        self.check_mutable()?;
        for net in &self.nets {
            if net.driver.is_none() && !net.is_input {
                return Err(Error::Undriven(net.name.clone()));
            }
        }
        self.frozen = true;

        let mut nets = std::mem::take(&mut self.nets);
        let gates = std::mem::take(&mut self.gates);

        // Materialize fanouts by scanning each gate's inputs; gates are
        // visited in order so the lists come out sorted, and a net wired
        // twice into the same gate appears once.
        for (g, gate) in gates.iter().enumerate() {
            for &n in &gate.inputs {
                nets[n].fanouts.push(g);
            }
        }
        for net in &mut nets {
            net.fanouts.dedup();
        }

        let leveling = levelize(&nets, &gates);
        let gates: Vec<Gate> = gates
            .into_iter()
            .zip(&leveling.levels)
            .map(|(g, &level)| Gate { level, ..g })
            .collect();

        let thunks: Vec<Thunk> = gates
            .iter()
            .enumerate()
            .map(|(i, g)| Thunk {
                gate: i,
                kind: g.kind,
                inputs: g.inputs.clone().into_boxed_slice(),
                output: g.output,
            })
            .collect();

        debug!(
            nets = nets.len(),
            gates = gates.len(),
            depth = leveling.depth,
            feedback = leveling.feedback.len(),
            "netlist frozen"
        );

        Ok(Netlist {
            nets,
            gates,
            name_to_net: std::mem::take(&mut self.name_to_net),
            inputs: std::mem::take(&mut self.inputs),
            outputs: std::mem::take(&mut self.outputs),
            sweep: leveling.sweep,
            feedback: leveling.feedback,
            thunks,
            depth: leveling.depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GateKind::*;

    #[test]
    fn test_basic() {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b", "c"]).unwrap();
        builder.add_gate(And, &["a", "b"], "x").unwrap();
        builder.add_gate(Or, &["x", "c"], "y").unwrap();
        builder.add_output("y").unwrap();
        let netlist = builder.freeze().unwrap();
        netlist.check();

        assert_eq!(netlist.nb_inputs(), 3);
        assert_eq!(netlist.nb_outputs(), 1);
        assert_eq!(netlist.nb_gates(), 2);
        assert_eq!(netlist.nb_nets(), 5);
        assert!(!netlist.has_feedback());
        assert_eq!(netlist.depth(), 2);

        let x = netlist.net_index("x").unwrap();
        assert_eq!(netlist.net(x).driver, Some(0));
        assert_eq!(netlist.net(x).fanouts, vec![1]);
        assert_eq!(netlist.gate(0).level, Some(1));
        assert_eq!(netlist.gate(1).level, Some(2));
    }

    #[test]
    fn test_multiple_drivers() {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b"]).unwrap();
        builder.add_gate(And, &["a", "b"], "x").unwrap();
        let err = builder.add_gate(Or, &["a", "b"], "x").unwrap_err();
        assert!(matches!(err, Error::MultipleDrivers(_)));
        let err = builder.add_gate(Or, &["x", "b"], "a").unwrap_err();
        assert!(matches!(err, Error::MultipleDrivers(_)));
    }

    #[test]
    fn test_arity() {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b"]).unwrap();
        let err = builder.add_gate(Not, &["a", "b"], "x").unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { got: 2, .. }));
        let err = builder.add_gate(And, &["a"], "x").unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { got: 1, .. }));
    }

    #[test]
    fn test_undriven() {
        let mut builder = CircuitBuilder::new();
        builder.add_input("a").unwrap();
        builder.add_gate(And, &["a", "ghost"], "x").unwrap();
        builder.add_output("x").unwrap();
        let err = builder.freeze().unwrap_err();
        assert!(matches!(err, Error::Undriven(name) if name == "ghost"));
    }

    #[test]
    fn test_frozen() {
        let mut builder = CircuitBuilder::new();
        builder.add_input("a").unwrap();
        builder.add_gate(Not, &["a"], "x").unwrap();
        builder.add_output("x").unwrap();
        builder.freeze().unwrap();
        assert!(matches!(builder.add_input("b"), Err(Error::NetlistFrozen)));
        assert!(matches!(
            builder.add_gate(Not, &["x"], "y"),
            Err(Error::NetlistFrozen)
        ));
        assert!(matches!(builder.freeze(), Err(Error::NetlistFrozen)));
    }

    #[test]
    fn test_feedback() {
        let mut builder = CircuitBuilder::new();
        builder.add_gate(Not, &["r3"], "r1").unwrap();
        builder.add_gate(Not, &["r1"], "r2").unwrap();
        builder.add_gate(Not, &["r2"], "r3").unwrap();
        let netlist = builder.freeze().unwrap();
        assert!(netlist.has_feedback());
        assert_eq!(netlist.feedback(), &[0, 1, 2]);
        assert!(netlist.sweep().is_empty());
        for i in 0..3 {
            assert_eq!(netlist.gate(i).level, None);
        }
    }

    #[test]
    fn test_levels_diamond() {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b", "c"]).unwrap();
        builder.add_gate(Not, &["a"], "na").unwrap();
        builder.add_gate(And, &["a", "b"], "x").unwrap();
        builder.add_gate(And, &["na", "c"], "z").unwrap();
        builder.add_gate(Or, &["x", "z"], "y").unwrap();
        builder.add_output("y").unwrap();
        let netlist = builder.freeze().unwrap();
        netlist.check();
        assert_eq!(netlist.gate(0).level, Some(1));
        assert_eq!(netlist.gate(1).level, Some(1));
        assert_eq!(netlist.gate(2).level, Some(2));
        assert_eq!(netlist.gate(3).level, Some(3));
        assert_eq!(netlist.sweep(), &[0, 1, 2, 3]);
        assert_eq!(netlist.depth(), 3);
    }
}
