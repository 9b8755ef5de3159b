//! Wall-clock benchmark for `cegis::synthesize` across a handful of
//! fixed parity specs, structured like the teacher's `benches/end_to_end.rs`
//! (one Criterion group, one function per problem size).

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use boolsynth::enumerate::EnumerateMode;
use boolsynth::spec::Spec;

fn parity_spec(num_vars: u32) -> Spec {
    let rows: Vec<bool> = (0u32..(1 << num_vars))
        .map(|row| (0..num_vars).filter(|v| (row >> v) & 1 != 0).count() % 2 == 1)
        .collect();
    Spec::from_truth_table(
        num_vars,
        (0..num_vars).map(|i| format!("v{i}")).collect(),
        vec![0; num_vars as usize],
        num_vars,
        rows,
    )
    .unwrap()
}

fn bench_parity(c: &mut Criterion) {
    let mut group = c.benchmark_group("parity");
    for num_vars in 2u32..=6 {
        group.bench_function(format!("n{num_vars}"), |b| {
            b.iter(|| {
                let mut spec = parity_spec(num_vars);
                let solution =
                    boolsynth::synthesize(black_box(&mut spec), EnumerateMode::Sequential).unwrap();
                black_box(solution);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parity);
criterion_main!(benches);
