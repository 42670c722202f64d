use ripple_netlist::{Circuit, CircuitError};
use ripple_sim::{SimError, Simulator};

fn adder_free_demo() -> Result<Circuit, CircuitError> {
    // o = (a ^ b) & c, plus a sliced nibble, to get a few internal signals
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 4)?;
    let b = circuit.declare_input("b", 4)?;
    let c = circuit.declare_input("c", 4)?;
    let o = circuit.declare_output("o", 4)?;
    let lo = circuit.declare_output("lo", 2)?;
    let mixed = circuit.add_xor(a, b)?;
    let gated = circuit.add_and(mixed, c)?;
    circuit.drive(o, gated)?;
    let low_bits = circuit.add_slice(gated, 0, 1)?;
    circuit.drive(lo, low_bits)?;
    Ok(circuit)
}

#[test]
fn test_trace_shape() {
    let circuit = adder_free_demo().unwrap();
    let mut sim = Simulator::new(&circuit).unwrap();
    for cycle in 0..5u64 {
        sim.step([("a", cycle), ("b", 15 - cycle), ("c", 9)]).unwrap();
    }
    let trace = sim.into_trace();
    assert_eq!(trace.len(), 5);
    let names: Vec<_> = trace.columns().iter().map(|column| column.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "o", "lo"]);
    for (cycle, record) in trace.iter().enumerate() {
        assert_eq!(record.cycle(), cycle);
        let cycle = cycle as u64;
        assert_eq!(record.get("a"), Some(cycle));
        assert_eq!(record.get("o"), Some((cycle ^ (15 - cycle)) & 9));
        assert_eq!(record.get("lo"), Some((cycle ^ (15 - cycle)) & 9 & 3));
        assert_eq!(record.iter().count(), 5);
    }
}

#[test]
fn test_rejected_step_commits_nothing() {
    let circuit = adder_free_demo().unwrap();
    let mut sim = Simulator::new(&circuit).unwrap();
    sim.step([("a", 1), ("b", 2), ("c", 3)]).unwrap();

    let err = sim.step([("a", 1), ("b", 2)]).unwrap_err();
    assert_eq!(err, SimError::MissingInput { name: "c".to_owned() });

    let err = sim.step([("a", 1), ("b", 2), ("c", 3), ("x", 0)]).unwrap_err();
    assert_eq!(err, SimError::UnknownInput { name: "x".to_owned() });

    // outputs are not stimulus targets either
    let err = sim.step([("a", 1), ("b", 2), ("c", 3), ("o", 0)]).unwrap_err();
    assert_eq!(err, SimError::UnknownInput { name: "o".to_owned() });

    let err = sim.step([("a", 16), ("b", 2), ("c", 3)]).unwrap_err();
    assert_eq!(err, SimError::OutOfRange { name: "a".to_owned(), value: 16, width: 4 });

    assert_eq!(sim.trace().len(), 1);
    // the simulator stays usable after a rejected step
    sim.step([("a", 1), ("b", 2), ("c", 3)]).unwrap();
    assert_eq!(sim.trace().len(), 2);
}

#[test]
fn test_internal_recording() {
    let circuit = adder_free_demo().unwrap();
    let mut sim = Simulator::new(&circuit).unwrap().record_internal();
    sim.step([("a", 3), ("b", 5), ("c", 15)]).unwrap();
    let trace = sim.into_trace();
    let names: Vec<_> = trace.columns().iter().map(|column| column.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "o", "lo", "%5", "%6", "%7"]);
    let record = trace.record(0);
    assert_eq!(record.get("%5"), Some(3 ^ 5));
    assert_eq!(record.get("%6"), Some(3 ^ 5));
    assert_eq!(record.get("%7"), Some((3 ^ 5) & 3));
}

#[test]
fn test_concat_slice_eq_semantics() {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 2).unwrap();
    let b = circuit.declare_input("b", 3).unwrap();
    let joined = circuit.add_concat(&[a, b]).unwrap();
    let o = circuit.declare_output("o", 5).unwrap();
    circuit.drive(o, joined).unwrap();
    let five = circuit.add_const(5, 3).unwrap();
    let hit = circuit.add_eq(b, five).unwrap();
    let is_five = circuit.declare_output("is_five", 1).unwrap();
    circuit.drive(is_five, hit).unwrap();
    let mid = circuit.add_slice(joined, 1, 3).unwrap();
    let window = circuit.declare_output("window", 3).unwrap();
    circuit.drive(window, mid).unwrap();

    let mut sim = Simulator::new(&circuit).unwrap();
    // a = 0b10, b = 0b011: concat is MSB-first, so o = 0b10_011
    let record = sim.step([("a", 0b10), ("b", 0b011)]).unwrap();
    assert_eq!(record.get("o"), Some(0b10011));
    assert_eq!(record.get("is_five"), Some(0));
    assert_eq!(record.get("window"), Some(0b001));
    let record = sim.step([("a", 0b01), ("b", 0b101)]).unwrap();
    assert_eq!(record.get("o"), Some(0b01101));
    assert_eq!(record.get("is_five"), Some(1));
    assert_eq!(record.get("window"), Some(0b110));
}

#[test]
fn test_render() {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 1).unwrap();
    let o = circuit.declare_output("o", 1).unwrap();
    let inverted = circuit.add_not(a).unwrap();
    circuit.drive(o, inverted).unwrap();
    let mut sim = Simulator::new(&circuit).unwrap();
    for value in [0u64, 1, 1, 0] {
        sim.step([("a", value)]).unwrap();
    }
    let trace = sim.into_trace();
    assert_eq!(trace.render_trace(), "a 0 1 1 0\no 1 0 0 1\n");
    assert_eq!(
        trace.render_table(),
        concat!(
            "cycle a o\n",
            "    0 0 1\n",
            "    1 1 0\n",
            "    2 1 1\n",
            "    3 0 0\n",
        )
    );
}
