use std::fmt::{Debug, Display};

/// Identifies a [`Signal`] within a single [`Circuit`]; the id is a position
/// in the circuit's signal table, in creation order.
///
/// [`Circuit`]: crate::Circuit
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignalId {
    pub(crate) index: u32,
}

impl SignalId {
    pub(crate) fn from_index(index: usize) -> SignalId {
        assert!(index <= u32::MAX as usize);
        SignalId { index: index as u32 }
    }

    /// The position of this signal in the circuit's signal table.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl Debug for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SignalId({})", self.index)
    }
}

impl Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "%{}", self.index)
    }
}

/// The role a signal plays at the circuit boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Driven by per-cycle external stimulus, bound by name.
    Input,
    /// An externally visible sink; driven by exactly one signal, and not
    /// readable as an operand.
    Output,
    /// Anonymous wiring produced by a cell.
    Internal,
}

/// A named or anonymous value of a fixed bit width.
#[derive(Clone, Debug)]
pub struct Signal {
    /// Present exactly on inputs and outputs; used for stimulus binding and
    /// as the trace key.
    pub name: Option<String>,
    /// Bit width; between 1 and [`MAX_WIDTH`] inclusive.
    ///
    /// [`MAX_WIDTH`]: crate::MAX_WIDTH
    pub width: u32,
    pub kind: SignalKind,
}
