//! IO for stimulus and response pattern files
//!
//! One pattern per line, one symbol per net in declaration order, with an
//! optional `n:` prefix. Whitespace between symbols is ignored:
//!
//! ```text
//! 1: 0110
//! 2: 1U00
//! ```

use std::io::{BufRead, BufReader, Read, Write};

use crate::error::{Error, Result};
use crate::logic::Value;
use crate::netlist::Netlist;
use crate::sim::InputVector;

/// Read stimulus vectors, one per line, inputs in declaration order
pub fn read_vectors<R: Read>(r: R, netlist: &Netlist) -> Result<Vec<InputVector>> {
    let mut ret = Vec::new();
    for (i, line) in BufReader::new(r).lines().enumerate() {
        let line = line?;
        let num = i + 1;
        let mut pattern = line.trim();
        if pattern.is_empty() || pattern.starts_with('#') {
            continue;
        }
        if let Some((_, rest)) = pattern.split_once(':') {
            pattern = rest.trim();
        }
        let values: Vec<Value> = pattern
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Value::from_symbol)
            .collect::<Result<_>>()
            .map_err(|e| Error::Parse {
                line: num,
                msg: e.to_string(),
            })?;
        if values.len() != netlist.nb_inputs() {
            return Err(Error::Parse {
                line: num,
                msg: format!(
                    "expected {} values, got {}",
                    netlist.nb_inputs(),
                    values.len()
                ),
            });
        }
        ret.push(
            netlist
                .inputs()
                .iter()
                .zip(values)
                .map(|(&n, v)| (netlist.net(n).name.clone(), v))
                .collect(),
        );
    }
    Ok(ret)
}

/// Write response patterns, one line per vector
pub fn write_patterns<W: Write>(w: &mut W, patterns: &[Vec<Value>]) -> Result<()> {
    for (i, pattern) in patterns.iter().enumerate() {
        write!(w, "{}: ", i + 1)?;
        for v in pattern {
            write!(w, "{}", v)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GateKind;
    use crate::logic::Value::*;
    use crate::netlist::CircuitBuilder;

    fn simple() -> Netlist {
        let mut builder = CircuitBuilder::new();
        builder.add_inputs(["a", "b", "c"]).unwrap();
        builder.add_gate(GateKind::And, &["a", "b", "c"], "y").unwrap();
        builder.add_output("y").unwrap();
        builder.freeze().unwrap()
    }

    #[test]
    fn test_read() {
        let netlist = simple();
        let src = "# stimulus\n1: 011\n2: 1U0\n\n110\n";
        let vectors = read_vectors(src.as_bytes(), &netlist).unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0]["a"], Zero);
        assert_eq!(vectors[0]["b"], One);
        assert_eq!(vectors[1]["b"], Unknown);
        assert_eq!(vectors[2]["a"], One);
    }

    #[test]
    fn test_width_mismatch() {
        let netlist = simple();
        let err = read_vectors("01\n".as_bytes(), &netlist).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_bad_symbol() {
        let netlist = simple();
        let err = read_vectors("0z1\n".as_bytes(), &netlist).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_write() {
        let mut buf = Vec::new();
        write_patterns(&mut buf, &[vec![One, Zero], vec![Unknown, One]]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1: 10\n2: U1\n");
    }
}
