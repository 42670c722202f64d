//! Cycle-accurate evaluation of ripple netlists.
//!
//! A [`Simulator`] borrows a validated [`Circuit`] and is driven one cycle
//! at a time with external stimulus. Each [`Simulator::step`] evaluates the
//! cells once, in construction (topological) order, then snapshots the port
//! values into a [`Trace`] record. The circuit is purely combinational, so
//! a step is a pure function of its stimulus: no state is carried between
//! cycles other than the trace itself.

mod trace;

use indexmap::IndexMap;
use thiserror::Error;

use ripple_netlist::{CellKind, Circuit, CircuitError, SignalId};

pub use trace::{Column, CycleRecord, Trace};

/// Errors detected while applying per-cycle stimulus.
///
/// A rejected step commits nothing: the trace and the scratch state are left
/// exactly as they were, and the caller may retry with corrected stimulus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("stimulus names {name:?}, which is not a declared input")]
    UnknownInput { name: String },
    #[error("stimulus is missing a value for input {name:?}")]
    MissingInput { name: String },
    #[error("stimulus value {value} for input {name:?} does not fit in {width} bits")]
    OutOfRange { name: String, value: u64, width: u32 },
}

pub(crate) fn mask(width: u32) -> u64 {
    if width >= 64 { u64::MAX } else { (1 << width) - 1 }
}

/// Drives a circuit cycle by cycle and records the resulting trace.
pub struct Simulator<'a> {
    circuit: &'a Circuit,
    values: Vec<u64>,
    stimulus: IndexMap<String, u64>,
    trace: Trace,
}

impl<'a> Simulator<'a> {
    /// Validates the circuit and prepares a simulator over it. The borrow
    /// keeps the circuit read-only until the simulator is dropped.
    pub fn new(circuit: &'a Circuit) -> Result<Self, CircuitError> {
        circuit.validate()?;
        Ok(Simulator {
            circuit,
            values: vec![0; circuit.signal_count()],
            stimulus: IndexMap::new(),
            trace: Trace::new(circuit, false),
        })
    }

    /// Also records internal signals (named `%id`, as in the netlist text
    /// form) in the trace. Only meaningful before the first step.
    pub fn record_internal(mut self) -> Self {
        if self.trace.is_empty() {
            self.trace = Trace::new(self.circuit, true);
        }
        self
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Finishes simulation, handing the trace to the caller.
    pub fn into_trace(self) -> Trace {
        self.trace
    }

    /// Simulates one cycle.
    ///
    /// `stimulus` must supply a value for every declared input, by name, in
    /// range for the input's width; the cycle is rejected otherwise. On
    /// success the new record, containing every input and output value, is
    /// appended to the trace and returned.
    pub fn step<'s>(
        &mut self,
        stimulus: impl IntoIterator<Item = (&'s str, u64)>,
    ) -> Result<CycleRecord<'_>, SimError> {
        // check the whole stimulus before touching any state
        self.stimulus.clear();
        for (name, value) in stimulus {
            let input = self
                .circuit
                .port(name)
                .filter(|&id| self.circuit.ports_in().contains(&id))
                .ok_or_else(|| SimError::UnknownInput { name: name.to_owned() })?;
            let width = self.circuit.signal(input).width;
            if value & !mask(width) != 0 {
                return Err(SimError::OutOfRange { name: name.to_owned(), value, width });
            }
            self.stimulus.insert(name.to_owned(), value);
        }
        for &id in self.circuit.ports_in() {
            let name = self.circuit.signal(id).name.as_deref().unwrap_or_default();
            match self.stimulus.get(name) {
                Some(&value) => self.values[id.index()] = value,
                None => return Err(SimError::MissingInput { name: name.to_owned() }),
            }
        }

        // one pass in construction order; operands always precede their users
        for cell in self.circuit.cells() {
            let out = cell.out;
            let width = self.circuit.signal(out).width;
            let value = match &cell.kind {
                CellKind::Input => self.values[out.index()],
                CellKind::Const(value) => *value,
                CellKind::And(a, b) => self.value(*a) & self.value(*b),
                CellKind::Or(a, b) => self.value(*a) | self.value(*b),
                CellKind::Xor(a, b) => self.value(*a) ^ self.value(*b),
                CellKind::Not(a) => !self.value(*a) & mask(width),
                CellKind::Eq(a, b) => (self.value(*a) == self.value(*b)) as u64,
                CellKind::Concat(parts) => {
                    let mut acc = 0u64;
                    for &part in parts {
                        let w = self.circuit.signal(part).width;
                        acc = acc.checked_shl(w).unwrap_or(0) | self.value(part);
                    }
                    acc
                }
                CellKind::Slice { val, lo, hi } => (self.value(*val) >> lo) & mask(hi - lo + 1),
                CellKind::Mux(mux) => {
                    let sel = self.value(mux.sel);
                    let chosen = mux
                        .cases
                        .iter()
                        .find(|&&(tag, _)| tag == sel)
                        .map(|&(_, val)| val)
                        .or(mux.default);
                    match chosen {
                        Some(val) => self.value(val),
                        None => unreachable!("mux coverage is checked at construction"),
                    }
                }
            };
            self.values[out.index()] = value;
        }

        // outputs snapshot their driver only after every cell has settled
        let mut row = Vec::with_capacity(self.trace.columns().len());
        for &id in self.circuit.ports_in() {
            row.push(self.values[id.index()]);
        }
        for port in self.circuit.ports_out() {
            match port.driver {
                Some(driver) => row.push(self.values[driver.index()]),
                None => unreachable!("outputs are bound before validation passes"),
            }
        }
        for id in self.trace.internal_signals() {
            row.push(self.values[id.index()]);
        }
        let cycle = self.trace.push(row);
        tracing::trace!(cycle, "step");
        Ok(self.trace.record(cycle))
    }

    fn value(&self, id: SignalId) -> u64 {
        self.values[id.index()]
    }
}
