use indexmap::IndexMap;

use crate::{Cell, CellKind, CircuitError, Mux, Signal, SignalId, SignalKind};

/// Values are stored in machine words, so signals are capped at 64 bits.
pub const MAX_WIDTH: u32 = 64;

/// An output port: a declared [`SignalKind::Output`] signal together with
/// the signal that drives it, once one has been assigned.
#[derive(Debug, Clone, Copy)]
pub struct PortOut {
    pub signal: SignalId,
    pub driver: Option<SignalId>,
}

/// A combinational circuit: a signal table, an append-only list of cells in
/// topological (creation) order, and the input/output port lists.
///
/// Construction is a distinct phase from simulation: every `add_*` method
/// checks its width rule eagerly and cells are never removed or rewritten.
/// Once a simulator takes a shared borrow of the circuit, the borrow checker
/// keeps the netlist read-only for the whole simulation phase.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    signals: Vec<Signal>,
    cells: Vec<Cell>,
    ports_in: Vec<SignalId>,
    ports_out: Vec<PortOut>,
    names: IndexMap<String, SignalId>,
}

impl Circuit {
    pub fn new() -> Circuit {
        Default::default()
    }

    pub fn signal(&self, id: SignalId) -> &Signal {
        &self.signals[id.index()]
    }

    pub fn signals(&self) -> impl Iterator<Item = (SignalId, &Signal)> {
        self.signals.iter().enumerate().map(|(index, signal)| (SignalId::from_index(index), signal))
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Input ports, in declaration order.
    pub fn ports_in(&self) -> &[SignalId] {
        &self.ports_in
    }

    /// Output ports, in declaration order.
    pub fn ports_out(&self) -> &[PortOut] {
        &self.ports_out
    }

    /// Looks up a declared input or output by name.
    pub fn port(&self, name: &str) -> Option<SignalId> {
        self.names.get(name).copied()
    }

    fn add_signal(
        &mut self,
        name: Option<String>,
        width: u32,
        kind: SignalKind,
    ) -> Result<SignalId, CircuitError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(CircuitError::UnsupportedWidth { width });
        }
        let id = SignalId::from_index(self.signals.len());
        self.signals.push(Signal { name, width, kind });
        Ok(id)
    }

    pub(crate) fn check(&self, id: SignalId) -> Result<&Signal, CircuitError> {
        self.signals.get(id.index()).ok_or(CircuitError::UnknownSignal { signal: id })
    }

    /// Like [`Circuit::check`], but also rejects output signals, which are
    /// sinks and carry no readable value.
    pub(crate) fn operand(&self, id: SignalId) -> Result<&Signal, CircuitError> {
        let signal = self.check(id)?;
        if signal.kind == SignalKind::Output {
            return Err(CircuitError::OutputOperand { signal: id });
        }
        Ok(signal)
    }

    fn binary(&self, a: SignalId, b: SignalId) -> Result<u32, CircuitError> {
        let lhs = self.operand(a)?.width;
        let rhs = self.operand(b)?.width;
        if lhs != rhs {
            return Err(CircuitError::WidthMismatch { lhs, rhs });
        }
        Ok(lhs)
    }

    fn add_cell(&mut self, kind: CellKind, width: u32) -> Result<SignalId, CircuitError> {
        let out = self.add_signal(None, width, SignalKind::Internal)?;
        self.cells.push(Cell { kind, out });
        Ok(out)
    }

    /// Declares an input port. Its value is supplied by name, per cycle, in
    /// the stimulus given to the simulator.
    pub fn declare_input(&mut self, name: &str, width: u32) -> Result<SignalId, CircuitError> {
        if self.names.contains_key(name) {
            return Err(CircuitError::DuplicateName { name: name.to_owned() });
        }
        let id = self.add_signal(Some(name.to_owned()), width, SignalKind::Input)?;
        self.names.insert(name.to_owned(), id);
        self.cells.push(Cell { kind: CellKind::Input, out: id });
        self.ports_in.push(id);
        Ok(id)
    }

    /// Declares an output port. It stays provisionally undriven until bound
    /// with [`Circuit::drive`] or a [`CondAssign`] chain.
    ///
    /// [`CondAssign`]: crate::CondAssign
    pub fn declare_output(&mut self, name: &str, width: u32) -> Result<SignalId, CircuitError> {
        if self.names.contains_key(name) {
            return Err(CircuitError::DuplicateName { name: name.to_owned() });
        }
        let id = self.add_signal(Some(name.to_owned()), width, SignalKind::Output)?;
        self.names.insert(name.to_owned(), id);
        self.ports_out.push(PortOut { signal: id, driver: None });
        Ok(id)
    }

    /// Binds `src` as the single driver of the output `output`.
    pub fn drive(&mut self, output: SignalId, src: SignalId) -> Result<(), CircuitError> {
        let rhs = self.operand(src)?.width;
        let signal = self.check(output)?;
        if signal.kind != SignalKind::Output {
            return Err(CircuitError::NotAnOutput { signal: output });
        }
        if signal.width != rhs {
            return Err(CircuitError::WidthMismatch { lhs: signal.width, rhs });
        }
        let Some(port) = self.ports_out.iter_mut().find(|port| port.signal == output) else {
            return Err(CircuitError::NotAnOutput { signal: output });
        };
        if port.driver.is_some() {
            return Err(CircuitError::Reassignment { output });
        }
        port.driver = Some(src);
        Ok(())
    }

    pub(crate) fn driver_of(&self, output: SignalId) -> Option<SignalId> {
        self.ports_out.iter().find(|port| port.signal == output).and_then(|port| port.driver)
    }

    pub fn add_const(&mut self, value: u64, width: u32) -> Result<SignalId, CircuitError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(CircuitError::UnsupportedWidth { width });
        }
        if width < 64 && value >> width != 0 {
            return Err(CircuitError::ConstOutOfRange { value, width });
        }
        self.add_cell(CellKind::Const(value), width)
    }

    pub fn add_and(&mut self, a: SignalId, b: SignalId) -> Result<SignalId, CircuitError> {
        let width = self.binary(a, b)?;
        self.add_cell(CellKind::And(a, b), width)
    }

    pub fn add_or(&mut self, a: SignalId, b: SignalId) -> Result<SignalId, CircuitError> {
        let width = self.binary(a, b)?;
        self.add_cell(CellKind::Or(a, b), width)
    }

    pub fn add_xor(&mut self, a: SignalId, b: SignalId) -> Result<SignalId, CircuitError> {
        let width = self.binary(a, b)?;
        self.add_cell(CellKind::Xor(a, b), width)
    }

    pub fn add_not(&mut self, a: SignalId) -> Result<SignalId, CircuitError> {
        let width = self.operand(a)?.width;
        self.add_cell(CellKind::Not(a), width)
    }

    pub fn add_eq(&mut self, a: SignalId, b: SignalId) -> Result<SignalId, CircuitError> {
        self.binary(a, b)?;
        self.add_cell(CellKind::Eq(a, b), 1)
    }

    /// Concatenates `parts` most significant first.
    pub fn add_concat(&mut self, parts: &[SignalId]) -> Result<SignalId, CircuitError> {
        let mut width: u32 = 0;
        for &part in parts {
            width = width.saturating_add(self.operand(part)?.width);
        }
        if width == 0 || width > MAX_WIDTH {
            return Err(CircuitError::UnsupportedWidth { width });
        }
        self.add_cell(CellKind::Concat(parts.to_vec()), width)
    }

    /// Extracts the inclusive bit range `lo..=hi` of `val`.
    pub fn add_slice(&mut self, val: SignalId, lo: u32, hi: u32) -> Result<SignalId, CircuitError> {
        let width = self.operand(val)?.width;
        if hi < lo || hi >= width {
            return Err(CircuitError::Range { lo, hi, width });
        }
        self.add_cell(CellKind::Slice { val, lo, hi }, hi - lo + 1)
    }

    /// Adds a multiplexer over `sel` with the given `(tag, value)` cases,
    /// first match winning. The cases must cover every value of the select
    /// domain unless a `default` is supplied.
    pub fn add_mux(
        &mut self,
        sel: SignalId,
        cases: &[(u64, SignalId)],
        default: Option<SignalId>,
    ) -> Result<SignalId, CircuitError> {
        let width = self.check_mux(sel, cases, default)?;
        self.add_cell(CellKind::Mux(Mux { sel, cases: cases.to_vec(), default }), width)
    }

    /// Checks all mux width rules and the completeness rule; returns the
    /// output width.
    pub(crate) fn check_mux(
        &self,
        sel: SignalId,
        cases: &[(u64, SignalId)],
        default: Option<SignalId>,
    ) -> Result<u32, CircuitError> {
        let sel_width = self.operand(sel)?.width;
        let mut width: Option<u32> = None;
        for (index, &(tag, val)) in cases.iter().enumerate() {
            if cases[..index].iter().any(|&(seen, _)| seen == tag) {
                return Err(CircuitError::DuplicatePredicate { tag });
            }
            if sel_width < 64 && tag >> sel_width != 0 {
                return Err(CircuitError::ConstOutOfRange { value: tag, width: sel_width });
            }
            let rhs = self.operand(val)?.width;
            match width {
                Some(lhs) if lhs != rhs => return Err(CircuitError::WidthMismatch { lhs, rhs }),
                _ => width = Some(rhs),
            }
        }
        if let Some(default) = default {
            let rhs = self.operand(default)?.width;
            match width {
                Some(lhs) if lhs != rhs => return Err(CircuitError::WidthMismatch { lhs, rhs }),
                _ => width = Some(rhs),
            }
        }
        let Some(width) = width else {
            return Err(CircuitError::IncompleteMux { sel_width, covered: 0 });
        };
        // tags are distinct and in range, so a full cover is exactly 2^sel_width cases
        if default.is_none() && (cases.len() as u128) != 1u128 << sel_width {
            return Err(CircuitError::IncompleteMux { sel_width, covered: cases.len() as u64 });
        }
        Ok(width)
    }

    /// Checks that every cell operand resolves and every declared output has
    /// a driver. Run by the simulator before the first step.
    pub fn validate(&self) -> Result<(), CircuitError> {
        for cell in &self.cells {
            let mut bad = None;
            cell.kind.visit(|signal| {
                if signal.index() >= self.signals.len() && bad.is_none() {
                    bad = Some(signal);
                }
            });
            if let Some(signal) = bad {
                return Err(CircuitError::UnknownSignal { signal });
            }
        }
        for port in &self.ports_out {
            if port.driver.is_none() {
                let name = self.signal(port.signal).name.clone().unwrap_or_default();
                return Err(CircuitError::UnboundOutput { name });
            }
        }
        tracing::debug!(
            cells = self.cells.len(),
            inputs = self.ports_in.len(),
            outputs = self.ports_out.len(),
            "validated circuit"
        );
        Ok(())
    }
}
