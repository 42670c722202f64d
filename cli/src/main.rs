use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ripple_netlist::{Circuit, CircuitError};
use ripple_sim::Simulator;

/// Builds the demo multiplexer circuits and simulates them with seeded
/// random stimulus.
#[derive(Parser)]
struct Args {
    /// Demo circuit to run; all of them when omitted.
    #[arg(value_enum)]
    demo: Option<Demo>,
    /// Number of cycles to simulate.
    #[arg(long, default_value_t = 8)]
    cycles: usize,
    /// Seed for the stimulus generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Record internal signals in the trace.
    #[arg(long)]
    internal: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Demo {
    /// 1-bit 2:1 mux built with conditional assignment.
    Mux21,
    /// 1-bit 2:1 mux built from AND/OR/NOT gates.
    Mux21Gates,
    /// 3-bit 5:1 mux.
    Mux51,
}

/// 2:1 mux as a guarded-assignment chain lowered to a single mux cell.
fn mux21() -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 1)?;
    let b = circuit.declare_input("b", 1)?;
    let s = circuit.declare_input("s", 1)?;
    let o = circuit.declare_output("o", 1)?;
    circuit.assign_when(o, s)?.when(0, a)?.when(1, b)?.finish()?;
    Ok(circuit)
}

/// The same 2:1 mux spelled out in gates: o = (a & !s) | (b & s).
fn mux21_gates() -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new();
    let a = circuit.declare_input("a", 1)?;
    let b = circuit.declare_input("b", 1)?;
    let s = circuit.declare_input("s", 1)?;
    let o = circuit.declare_output("o_wg", 1)?;
    let not_s = circuit.add_not(s)?;
    let pick_a = circuit.add_and(a, not_s)?;
    let pick_b = circuit.add_and(b, s)?;
    let either = circuit.add_or(pick_a, pick_b)?;
    circuit.drive(o, either)?;
    Ok(circuit)
}

/// 3-bit 5:1 mux. Select values 5..=7 are not meaningful inputs, but the
/// engine refuses don't-cares, so they fall through to `a`.
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

fn run(
    name: &str,
    circuit: &Circuit,
    args: &Args,
    rng: &mut Xoshiro256StarStar,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- {name} ---");
    print!("{circuit}");
    println!();
    let mut sim = Simulator::new(circuit)?;
    if args.internal {
        sim = sim.record_internal();
    }
    for _ in 0..args.cycles {
        let stimulus: Vec<(&str, u64)> = circuit
            .ports_in()
            .iter()
            .map(|&id| {
                let signal = circuit.signal(id);
                let max = if signal.width >= 64 { u64::MAX } else { (1 << signal.width) - 1 };
                (signal.name.as_deref().unwrap_or_default(), rng.gen_range(0..=max))
            })
            .collect();
        sim.step(stimulus)?;
    }
    print!("{}", sim.into_trace().render_trace());
    println!();
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_tree::HierarchicalLayer::new(2))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let demos: &[(&str, fn() -> Result<Circuit, CircuitError>, Demo)] = &[
        ("1-bit 2:1 mux, conditional assignment", mux21, Demo::Mux21),
        ("1-bit 2:1 mux, explicit gates", mux21_gates, Demo::Mux21Gates),
        ("3-bit 5:1 mux", mux51, Demo::Mux51),
    ];
    let mut rng = Xoshiro256StarStar::seed_from_u64(args.seed);
    for &(name, build, demo) in demos {
        if args.demo.is_some_and(|chosen| chosen != demo) {
            continue;
        }
        let result = build()
            .map_err(Into::into)
            .and_then(|circuit| run(name, &circuit, &args, &mut rng));
        if let Err(err) = result {
            eprintln!("{name}: {err}");
            std::process::exit(1);
        }
    }
}
