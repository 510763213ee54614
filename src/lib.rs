//! Gate-level logic simulation with hazard analysis
//!
//! This crate provides a netlist representation for combinational circuits
//! and five interchangeable simulation engines drawn from classical VLSI CAD
//! literature: two-list unit-delay, single-list event-driven with
//! cancellation, single-list gate-driven, zero-delay levelized, and
//! threaded-code execution. On race-free circuits all engines agree on the
//! final output values; their traces, hazard reports and per-gate evaluation
//! counts differ and can be compared against each other.
//!
//! Circuits are built by name through [`CircuitBuilder`], frozen into an
//! immutable [`Netlist`], then simulated any number of times:
//!
//! ```
//! use hazel::{CircuitBuilder, Engine, GateKind, SimOptions, Value};
//!
//! let mut builder = CircuitBuilder::new();
//! builder.add_inputs(["a", "b", "c"]).unwrap();
//! builder.add_gate(GateKind::And, &["a", "b"], "x").unwrap();
//! builder.add_gate(GateKind::Or, &["x", "c"], "y").unwrap();
//! builder.add_output("y").unwrap();
//! let netlist = builder.freeze().unwrap();
//!
//! let vector = [("a", Value::One), ("b", Value::One), ("c", Value::Zero)]
//!     .iter()
//!     .map(|&(n, v)| (n.to_string(), v))
//!     .collect();
//! let res = Engine::TwoList
//!     .simulate_vector(&netlist, &vector, &SimOptions::default())
//!     .unwrap();
//! assert_eq!(res.output("y"), Some(Value::One));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod io;
pub mod logic;
pub mod netlist;
pub mod sim;

pub use error::{Error, Result};
pub use logic::{GateKind, LogicModel, Value};
pub use netlist::{CircuitBuilder, Netlist};
pub use sim::{Engine, Hazard, InputVector, SimOptions, Transition, VectorResult};
