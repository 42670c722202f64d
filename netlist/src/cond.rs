use crate::{Circuit, CircuitError, SignalId, SignalKind};

/// A chain of mutually exclusive guarded assignments to one output.
///
/// Begun with [`Circuit::assign_when`], extended with [`CondAssign::when`]
/// clauses (and at most one [`CondAssign::otherwise`]), and lowered by
/// [`CondAssign::finish`] into a single mux cell driving the output. Clause
/// order is preserved, so if two clauses could ever match, the first one
/// declared wins; duplicate predicate values are rejected outright.
#[derive(Debug)]
pub struct CondAssign<'a> {
    circuit: &'a mut Circuit,
    output: SignalId,
    sel: SignalId,
    cases: Vec<(u64, SignalId)>,
    default: Option<SignalId>,
}

impl Circuit {
    /// Begins a guarded-assignment chain for the output `output`, selecting
    /// on the runtime value of `sel`.
    pub fn assign_when(
        &mut self,
        output: SignalId,
        sel: SignalId,
    ) -> Result<CondAssign<'_>, CircuitError> {
        let signal = self.check(output)?;
        if signal.kind != SignalKind::Output {
            return Err(CircuitError::NotAnOutput { signal: output });
        }
        if self.driver_of(output).is_some() {
            return Err(CircuitError::Reassignment { output });
        }
        self.operand(sel)?;
        Ok(CondAssign { circuit: self, output, sel, cases: Vec::new(), default: None })
    }
}

impl<'a> CondAssign<'a> {
    /// Adds a clause: when `sel` equals `tag`, the output takes `value`.
    pub fn when(mut self, tag: u64, value: SignalId) -> Result<Self, CircuitError> {
        if self.cases.iter().any(|&(seen, _)| seen == tag) {
            return Err(CircuitError::DuplicatePredicate { tag });
        }
        self.circuit.operand(value)?;
        self.cases.push((tag, value));
        Ok(self)
    }

    /// Closes the select domain: any select value not named by a `when`
    /// clause yields `value`.
    pub fn otherwise(mut self, value: SignalId) -> Result<Self, CircuitError> {
        if self.default.is_some() {
            return Err(CircuitError::Reassignment { output: self.output });
        }
        self.circuit.operand(value)?;
        self.default = Some(value);
        Ok(self)
    }

    /// Lowers the accumulated clauses into one mux cell and drives the
    /// output with it. Fails with [`CircuitError::IncompleteMux`] if the
    /// clauses do not cover the select domain and there is no `otherwise`.
    pub fn finish(self) -> Result<SignalId, CircuitError> {
        let width = self.circuit.check_mux(self.sel, &self.cases, self.default)?;
        let lhs = self.circuit.signal(self.output).width;
        if lhs != width {
            return Err(CircuitError::WidthMismatch { lhs, rhs: width });
        }
        let value = self.circuit.add_mux(self.sel, &self.cases, self.default)?;
        self.circuit.drive(self.output, value)?;
        Ok(value)
    }
}
