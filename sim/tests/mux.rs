use ripple_netlist::{Circuit, CircuitError};
use ripple_sim::Simulator;

fn mux21_cond() -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 1)?;
    let b = circuit.declare_input("b", 1)?;
    let s = circuit.declare_input("s", 1)?;
    let o = circuit.declare_output("o", 1)?;
    circuit.assign_when(o, s)?.when(0, a)?.when(1, b)?.finish()?;
    Ok(circuit)
}

fn mux21_gates() -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 1)?;
    let b = circuit.declare_input("b", 1)?;
    let s = circuit.declare_input("s", 1)?;
    let o = circuit.declare_output("o", 1)?;
    let not_s = circuit.add_not(s)?;
    let pick_a = circuit.add_and(a, not_s)?;
    let pick_b = circuit.add_and(b, s)?;
    let either = circuit.add_or(pick_a, pick_b)?;
    circuit.drive(o, either)?;
    Ok(circuit)
}

/// A `width`-bit 2:1 mux from gates: the select is fanned out across the
/// data width with a concat, then o = (a & !mask) | (b & mask).
fn mux21_gates_wide(width: u32) -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", width)?;
    let b = circuit.declare_input("b", width)?;
    let s = circuit.declare_input("s", 1)?;
    let o = circuit.declare_output("o", width)?;
    let fanout = vec![s; width as usize];
    let mask = circuit.add_concat(&fanout)?;
    let not_mask = circuit.add_not(mask)?;
    let pick_a = circuit.add_and(a, not_mask)?;
    let pick_b = circuit.add_and(b, mask)?;
    let either = circuit.add_or(pick_a, pick_b)?;
    circuit.drive(o, either)?;
    Ok(circuit)
}

fn mux21_cond_wide(width: u32) -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", width)?;
    let b = circuit.declare_input("b", width)?;
    let s = circuit.declare_input("s", 1)?;
    let o = circuit.declare_output("o", width)?;
    circuit.assign_when(o, s)?.when(0, a)?.when(1, b)?.finish()?;
    Ok(circuit)
}

fn mux51() -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 3)?;
    let b = circuit.declare_input("b", 3)?;
    let c = circuit.declare_input("c", 3)?;
    let d = circuit.declare_input("d", 3)?;
    let e = circuit.declare_input("e", 3)?;
    let s = circuit.declare_input("s", 3)?;
    let o = circuit.declare_output("o", 3)?;
    circuit
        .assign_when(o, s)?
        .when(0, a)?
        .when(1, b)?
        .when(2, c)?
        .when(3, d)?
        .when(4, e)?
        .otherwise(a)?
        .finish()?;
    Ok(circuit)
}

#[test]
fn test_mux21_truth_table() {
    for circuit in [mux21_cond().unwrap(), mux21_gates().unwrap()] {
        let mut sim = Simulator::new(&circuit).unwrap();
        for a in 0..2u64 {
            for b in 0..2u64 {
                for s in 0..2u64 {
                    let record = sim.step([("a", a), ("b", b), ("s", s)]).unwrap();
                    let expected = if s == 0 { a } else { b };
                    assert_eq!(record.get("o"), Some(expected), "a={a} b={b} s={s}");
                }
            }
        }
    }
}

#[test]
fn test_mux21_end_to_end() {
    let circuit = mux21_cond().unwrap();
    let mut sim = Simulator::new(&circuit).unwrap();
    assert_eq!(sim.step([("a", 1), ("b", 0), ("s", 0)]).unwrap().get("o"), Some(1));
    assert_eq!(sim.step([("a", 1), ("b", 0), ("s", 1)]).unwrap().get("o"), Some(0));
}

#[test]
fn test_gate_equivalence_exhaustive() {
    // the gate rendition and the lowered conditional assignment agree on
    // the full input domain, for data widths up to 4 bits
    for width in 1..=4u32 {
        let gates = mux21_gates_wide(width).unwrap();
        let cond = mux21_cond_wide(width).unwrap();
        let mut gates_sim = Simulator::new(&gates).unwrap();
        let mut cond_sim = Simulator::new(&cond).unwrap();
        for a in 0..1u64 << width {
            for b in 0..1u64 << width {
                for s in 0..2u64 {
                    let stimulus = [("a", a), ("b", b), ("s", s)];
                    let from_gates = gates_sim.step(stimulus).unwrap().get("o");
                    let from_cond = cond_sim.step(stimulus).unwrap().get("o");
                    assert_eq!(from_gates, from_cond, "width={width} a={a} b={b} s={s}");
                    assert_eq!(from_cond, Some(if s == 0 { a } else { b }));
                }
            }
        }
    }
}

#[test]
fn test_mux51_selects_d() {
    let circuit = mux51().unwrap();
    let mut sim = Simulator::new(&circuit).unwrap();
    let record = sim
        .step([("a", 5), ("b", 1), ("c", 2), ("d", 7), ("e", 3), ("s", 3)])
        .unwrap();
    assert_eq!(record.get("o"), Some(7));
}

#[test]
fn test_mux51_all_cases() {
    let circuit = mux51().unwrap();
    let mut sim = Simulator::new(&circuit).unwrap();
    let data = [("a", 5), ("b", 1), ("c", 2), ("d", 7), ("e", 3)];
    for s in 0..5u64 {
        let mut stimulus = data.to_vec();
        stimulus.push(("s", s));
        let record = sim.step(stimulus).unwrap();
        assert_eq!(record.get("o"), Some(data[s as usize].1));
    }
    // selects past the named cases fall through to the otherwise clause
    for s in 5..8u64 {
        let mut stimulus = data.to_vec();
        stimulus.push(("s", s));
        assert_eq!(sim.step(stimulus).unwrap().get("o"), Some(5));
    }
}

#[test]
fn test_step_is_deterministic() {
    let circuit = mux51().unwrap();
    let mut sim = Simulator::new(&circuit).unwrap();
    let stimulus = [("a", 4), ("b", 1), ("c", 2), ("d", 7), ("e", 3), ("s", 2)];
    let first: Vec<_> = sim.step(stimulus).unwrap().iter().map(|(_, value)| value).collect();
    let second: Vec<_> = sim.step(stimulus).unwrap().iter().map(|(_, value)| value).collect();
    assert_eq!(first, second);
}
