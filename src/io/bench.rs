//! IO for .bench (ISCAS) files
//!
//! Only the combinational subset is accepted: `INPUT`, `OUTPUT` and the
//! seven gate types. Sequential elements such as `DFF` are rejected.

use std::io::{BufRead, BufReader, Read, Write};

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::logic::GateKind;
use crate::netlist::{CircuitBuilder, Netlist};

fn parse_error(line: usize, msg: impl Into<String>) -> Error {
    Error::Parse {
        line,
        msg: msg.into(),
    }
}

/// Split `NAME(arg1, arg2)` into the name and its arguments
fn split_call(s: &str, line: usize) -> Result<(&str, Vec<&str>)> {
    let (name, rest) = s
        .split_once('(')
        .ok_or_else(|| parse_error(line, format!("expected a parenthesized list in `{s}`")))?;
    let args = rest
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| parse_error(line, format!("missing closing parenthesis in `{s}`")))?;
    let args = args
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    Ok((name.trim(), args))
}

/// Parse a logic network in .bench format
pub fn read_bench<R: Read>(r: R) -> Result<Netlist> {
    let mut builder = CircuitBuilder::new();
    for (i, line) in BufReader::new(r).lines().enumerate() {
        let line = line?;
        let num = i + 1;
        let statement = line.trim();
        if statement.is_empty() || statement.starts_with('#') {
            continue;
        }
        if let Some((target, expr)) = statement.split_once('=') {
            let target = target.trim();
            let (kind, args) = split_call(expr.trim(), num)?;
            let kind = GateKind::from_name(kind)
                .ok_or_else(|| parse_error(num, format!("unsupported gate `{kind}`")))?;
            builder.add_gate(kind, &args, target)?;
        } else {
            let (kind, args) = split_call(statement, num)?;
            match kind.to_uppercase().as_str() {
                "INPUT" => builder.add_inputs(&args)?,
                "OUTPUT" => builder.add_outputs(&args)?,
                other => {
                    return Err(parse_error(num, format!("unknown statement `{other}`")));
                }
            }
        }
    }
    builder.freeze()
}

/// Write a logic network in .bench format
pub fn write_bench<W: Write>(w: &mut W, netlist: &Netlist) -> Result<()> {
    for &n in netlist.inputs() {
        writeln!(w, "INPUT({})", netlist.net(n).name)?;
    }
    for &n in netlist.outputs() {
        writeln!(w, "OUTPUT({})", netlist.net(n).name)?;
    }
    writeln!(w)?;
    for i in 0..netlist.nb_gates() {
        let gate = netlist.gate(i);
        writeln!(
            w,
            "{} = {}({})",
            netlist.net(gate.output).name,
            gate.kind,
            gate.inputs
                .iter()
                .map(|&n| netlist.net(n).name.as_str())
                .join(", ")
        )?;
    }
    Ok(())
}
