use crate::SignalId;

/// One combinational operation in a [`Circuit`].
///
/// A cell owns the signal it produces; the signal's width is fixed by the
/// operation's width rule when the cell is added.
///
/// [`Circuit`]: crate::Circuit
#[derive(Debug, Clone)]
pub struct Cell {
    pub kind: CellKind,
    pub out: SignalId,
}

/// The operation performed by a [`Cell`].
#[derive(Debug, Clone)]
pub enum CellKind {
    /// A constant, already checked to fit the output width.
    Const(u64),
    /// An input port; its value comes from the per-cycle stimulus.
    Input,
    /// Bitwise AND of two equal-width operands.
    And(SignalId, SignalId),
    /// Bitwise OR of two equal-width operands.
    Or(SignalId, SignalId),
    /// Bitwise XOR of two equal-width operands.
    Xor(SignalId, SignalId),
    /// Bitwise complement within the operand's width.
    Not(SignalId),
    /// Equality of two equal-width operands; output is 1 bit.
    Eq(SignalId, SignalId),
    /// Concatenation, most significant part first; output width is the sum
    /// of the part widths.
    Concat(Vec<SignalId>),
    /// The inclusive bit range `lo..=hi` of `val`, LSB first.
    Slice { val: SignalId, lo: u32, hi: u32 },
    Mux(Mux),
}

/// A multiplexer selecting among tagged cases by the runtime value of `sel`.
///
/// The first case whose tag equals the select value wins; if none matches,
/// `default` does. Construction guarantees that the cases plus the default
/// cover the whole select domain, so evaluation always has a winner.
#[derive(Debug, Clone)]
pub struct Mux {
    pub sel: SignalId,
    pub cases: Vec<(u64, SignalId)>,
    pub default: Option<SignalId>,
}

impl CellKind {
    /// Visits every operand signal, in order.
    pub fn visit(&self, mut f: impl FnMut(SignalId)) {
        match self {
            CellKind::Const(_) | CellKind::Input => (),
            CellKind::And(a, b) | CellKind::Or(a, b) | CellKind::Xor(a, b) | CellKind::Eq(a, b) => {
                f(*a);
                f(*b);
            }
            CellKind::Not(a) => f(*a),
            CellKind::Concat(parts) => {
                for &part in parts {
                    f(part);
                }
            }
            CellKind::Slice { val, .. } => f(*val),
            CellKind::Mux(mux) => {
                f(mux.sel);
                for &(_, val) in &mux.cases {
                    f(val);
                }
                if let Some(default) = mux.default {
                    f(default);
                }
            }
        }
    }
}
