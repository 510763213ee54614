//! Read and write netlists and stimulus files

mod bench;
mod vectors;

use std::fs::File;
use std::path::Path;

pub use bench::{read_bench, write_bench};
pub use vectors::{read_vectors, write_patterns};

use crate::error::{Error, Result};
use crate::logic::Value;
use crate::netlist::Netlist;
use crate::sim::InputVector;

/// Parse a logic network from a file
///
/// Following extensions are supported: .bench
pub fn read_netlist_file(path: impl AsRef<Path>) -> Result<Netlist> {
    let path = path.as_ref();
    match path.extension() {
        Some(ext) if ext == "bench" => read_bench(File::open(path)?),
        _ => Err(Error::Parse {
            line: 0,
            msg: format!("unsupported netlist file `{}`", path.display()),
        }),
    }
}

/// Write a logic network to a file
///
/// Following extensions are supported: .bench
pub fn write_netlist_file(path: impl AsRef<Path>, netlist: &Netlist) -> Result<()> {
    let path = path.as_ref();
    match path.extension() {
        Some(ext) if ext == "bench" => write_bench(&mut File::create(path)?, netlist),
        _ => Err(Error::Parse {
            line: 0,
            msg: format!("unsupported netlist file `{}`", path.display()),
        }),
    }
}

/// Read a stimulus file for a given netlist
pub fn read_vector_file(path: impl AsRef<Path>, netlist: &Netlist) -> Result<Vec<InputVector>> {
    read_vectors(File::open(path.as_ref())?, netlist)
}

/// Write response patterns to a file
pub fn write_pattern_file(path: impl AsRef<Path>, patterns: &[Vec<Value>]) -> Result<()> {
    write_patterns(&mut File::create(path.as_ref())?, patterns)
}
