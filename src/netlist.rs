//! Representation and construction of gate-level netlists

mod builder;
mod level;
mod netlist;
pub mod stats;

pub use builder::CircuitBuilder;
pub use netlist::{Gate, Net, Netlist, Thunk};
