use std::fmt;

use crate::{CellKind, Circuit};

/// Prints the netlist in text form, one cell per line, output ports last:
///
/// ```text
/// %0:1 = input "a"
/// %1:1 = input "b"
/// %2:1 = input "s"
/// %4:1 = mux %2 { 0 => %0, 1 => %1 }
/// %3:0 = output "o" %4
/// ```
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for cell in self.cells() {
            let out = cell.out;
            let width = self.signal(out).width;
            write!(f, "{out}:{width} = ")?;
            match &cell.kind {
                CellKind::Input => {
                    let name = self.signal(out).name.as_deref().unwrap_or_default();
                    writeln!(f, "input {name:?}")?;
                }
                CellKind::Const(value) => {
                    writeln!(f, "const {value:0w$b}", w = width as usize)?;
                }
                CellKind::And(a, b) => writeln!(f, "and {a} {b}")?,
                CellKind::Or(a, b) => writeln!(f, "or {a} {b}")?,
                CellKind::Xor(a, b) => writeln!(f, "xor {a} {b}")?,
                CellKind::Not(a) => writeln!(f, "not {a}")?,
                CellKind::Eq(a, b) => writeln!(f, "eq {a} {b}")?,
                CellKind::Concat(parts) => {
                    write!(f, "concat")?;
                    for part in parts {
                        write!(f, " {part}")?;
                    }
                    writeln!(f)?;
                }
                CellKind::Slice { val, lo, hi } => writeln!(f, "slice {val} [{hi}:{lo}]")?,
                CellKind::Mux(mux) => {
                    write!(f, "mux {} {{ ", mux.sel)?;
                    for (index, (tag, val)) in mux.cases.iter().enumerate() {
                        if index != 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{tag} => {val}")?;
                    }
                    if let Some(default) = mux.default {
                        if !mux.cases.is_empty() {
                            write!(f, ", ")?;
                        }
                        write!(f, "_ => {default}")?;
                    }
                    writeln!(f, " }}")?;
                }
            }
        }
        for port in self.ports_out() {
            let name = self.signal(port.signal).name.as_deref().unwrap_or_default();
            match port.driver {
                Some(driver) => writeln!(f, "{}:0 = output {name:?} {driver}", port.signal)?,
                None => writeln!(f, "{}:0 = output {name:?} ?", port.signal)?,
            }
        }
        Ok(())
    }
}
