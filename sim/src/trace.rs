use std::fmt::Write as _;

use ripple_netlist::{Circuit, SignalId, SignalKind};

/// One column of a [`Trace`]: a signal name and its width.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub width: u32,
}

/// The ordered history of per-cycle port values produced by simulation.
///
/// Columns are fixed when the simulator is created: inputs in declaration
/// order, then outputs in declaration order, then (if enabled) internal
/// signals in creation order. One row is appended per successful step; the
/// trace is read-only for its consumers.
#[derive(Debug, Clone)]
pub struct Trace {
    columns: Vec<Column>,
    internals: Vec<SignalId>,
    rows: Vec<Vec<u64>>,
}

impl Trace {
    pub(crate) fn new(circuit: &Circuit, record_internal: bool) -> Trace {
        let mut columns = Vec::new();
        for &id in circuit.ports_in() {
            let signal = circuit.signal(id);
            columns.push(Column {
                name: signal.name.clone().unwrap_or_default(),
                width: signal.width,
            });
        }
        for port in circuit.ports_out() {
            let signal = circuit.signal(port.signal);
            columns.push(Column {
                name: signal.name.clone().unwrap_or_default(),
                width: signal.width,
            });
        }
        let mut internals = Vec::new();
        if record_internal {
            for (id, signal) in circuit.signals() {
                if signal.kind == SignalKind::Internal {
                    columns.push(Column { name: format!("{id}"), width: signal.width });
                    internals.push(id);
                }
            }
        }
        Trace { columns, internals, rows: Vec::new() }
    }

    pub(crate) fn internal_signals(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.internals.iter().copied()
    }

    pub(crate) fn push(&mut self, row: Vec<u64>) -> usize {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// The number of recorded cycles.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The record for one cycle. Panics if the cycle was never simulated.
    pub fn record(&self, cycle: usize) -> CycleRecord<'_> {
        assert!(cycle < self.rows.len());
        CycleRecord { trace: self, cycle }
    }

    pub fn iter(&self) -> impl Iterator<Item = CycleRecord<'_>> {
        (0..self.rows.len()).map(|cycle| CycleRecord { trace: self, cycle })
    }

    /// Renders the trace as a table, one row per cycle.
    pub fn render_table(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| column.name.len().max(digits(column.width)))
            .collect();
        let mut out = String::new();
        write!(out, "cycle").unwrap();
        for (column, &pad) in self.columns.iter().zip(&widths) {
            write!(out, " {:>pad$}", column.name).unwrap();
        }
        out.push('\n');
        for (cycle, row) in self.rows.iter().enumerate() {
            write!(out, "{cycle:>5}").unwrap();
            for (&value, &pad) in row.iter().zip(&widths) {
                write!(out, " {value:>pad$}").unwrap();
            }
            out.push('\n');
        }
        out
    }

    /// Renders the trace one signal per line, values in cycle order, in the
    /// style of a textual waveform viewer.
    pub fn render_trace(&self) -> String {
        let pad = self.columns.iter().map(|column| column.name.len()).max().unwrap_or(0);
        let mut out = String::new();
        for (index, column) in self.columns.iter().enumerate() {
            write!(out, "{:>pad$}", column.name).unwrap();
            let value_pad = digits(column.width);
            for row in &self.rows {
                write!(out, " {:>value_pad$}", row[index]).unwrap();
            }
            out.push('\n');
        }
        out
    }
}

/// Decimal digits needed for the largest value of a given bit width.
fn digits(width: u32) -> usize {
    let max = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
    (max.ilog10() + 1) as usize
}

/// A read-only view of one cycle's record.
#[derive(Debug, Clone, Copy)]
pub struct CycleRecord<'a> {
    trace: &'a Trace,
    cycle: usize,
}

impl<'a> CycleRecord<'a> {
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// The recorded value of the named signal, if it was recorded.
    pub fn get(&self, name: &str) -> Option<u64> {
        let index = self.trace.columns.iter().position(|column| column.name == name)?;
        Some(self.trace.rows[self.cycle][index])
    }

    /// Iterates `(name, value)` pairs: inputs first, then outputs, each in
    /// declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, u64)> + 'a {
        let row = &self.trace.rows[self.cycle];
        self.trace.columns.iter().zip(row).map(|(column, &value)| (column.name.as_str(), value))
    }
}
