//! This library provides the in-memory form of a ripple netlist.
//!
//! A [`Circuit`] is represented as an append-only list of [`Cell`]s, each of
//! which produces exactly one [`Signal`]. Cells may only refer to signals
//! that already exist, so the cell list is always in topological order and
//! can be evaluated front to back without a cycle check. Input and output
//! ports carry names; everything else is anonymous internal wiring.

mod signal;
mod cell;
mod circuit;
mod cond;
mod error;
mod print;

pub use signal::{Signal, SignalId, SignalKind};
pub use cell::{Cell, CellKind, Mux};
pub use circuit::{Circuit, PortOut, MAX_WIDTH};
pub use cond::CondAssign;
pub use error::CircuitError;
