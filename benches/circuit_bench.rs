// benches/circuit_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use surface_switch_sim::prelude::*;

fn benchmark_circuits(c: &mut Criterion) {
    c.bench_function("surface13_run", |b| {
        let code = surface_13();
        b.iter(|| run(&code, LogicalState::Zero, None).unwrap());
    });

    c.bench_function("surface17_run_with_error", |b| {
        let code = surface_17();
        let error = PauliError::new(Pauli::Y, 4);
        b.iter(|| run(&code, LogicalState::One, Some(black_box(error))).unwrap());
    });

    c.bench_function("code_conversion_13_to_17", |b| {
        let (source, target) = (surface_13(), surface_17());
        let request = ConversionRequest::new(&source, &target, LogicalState::One);
        b.iter(|| convert(black_box(&request)).unwrap());
    });

    c.bench_function("register_gate_sweep_16_wires", |b| {
        b.iter(|| {
            let mut reg = Register::new(black_box(16));
            for w in 0..16 {
                reg.h(w).unwrap();
            }
            for w in 0..15 {
                reg.cnot(w, w + 1).unwrap();
            }
            reg.norm()
        });
    });

    c.bench_function("decode_pattern_policy", |b| {
        let code = surface_17();
        let outcome = run(&code, LogicalState::Zero, Some(PauliError::new(Pauli::Y, 4))).unwrap();
        let syndrome = code.syndrome_map(&outcome.syndrome);
        b.iter(|| decode(&code, black_box(&syndrome)).unwrap());
    });
}

criterion_group!(benches, benchmark_circuits);
criterion_main!(benches);
