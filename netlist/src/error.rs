use thiserror::Error;

use crate::SignalId;

/// Errors detected while describing a circuit.
///
/// All of these are raised eagerly, before any simulation step runs, and are
/// fatal to the build: the description must be fixed and rebuilt. Nothing is
/// ever silently defaulted; in particular a mux that covers only part of its
/// select domain is rejected rather than given a don't-care value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("signal width {width} is unsupported (must be between 1 and 64)")]
    UnsupportedWidth { width: u32 },
    #[error("port name {name:?} is already declared")]
    DuplicateName { name: String },
    #[error("operand {signal} does not refer to a signal in this circuit")]
    UnknownSignal { signal: SignalId },
    #[error("output {signal} cannot be read as an operand")]
    OutputOperand { signal: SignalId },
    #[error("operand widths {lhs} and {rhs} do not match")]
    WidthMismatch { lhs: u32, rhs: u32 },
    #[error("constant {value} does not fit in {width} bits")]
    ConstOutOfRange { value: u64, width: u32 },
    #[error("bit range {lo}..={hi} is out of range for a {width}-bit signal")]
    Range { lo: u32, hi: u32, width: u32 },
    #[error("output {output} is already driven")]
    Reassignment { output: SignalId },
    #[error("predicate value {tag} appears in more than one clause")]
    DuplicatePredicate { tag: u64 },
    #[error("mux over a {sel_width}-bit select covers only {covered} values and has no default")]
    IncompleteMux { sel_width: u32, covered: u64 },
    #[error("output {name:?} is never driven")]
    UnboundOutput { name: String },
    #[error("{signal} is not a declared output")]
    NotAnOutput { signal: SignalId },
}
