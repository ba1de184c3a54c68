use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use refcom::{Counted, Handle, diagnostics};

fn bench_clone_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("Handle clone/drop");

    let handle = Counted::new([0u8; 64]);
    group.bench_function("untracked", |b| {
        diagnostics::set_tracking(false);
        b.iter(|| {
            let copy = black_box(&handle).clone();
            black_box(copy)
        });
    });

    group.bench_function("arc baseline", |b| {
        let arc = std::sync::Arc::new([0u8; 64]);
        b.iter(|| {
            let copy = black_box(&arc).clone();
            black_box(copy)
        });
    });

    group.finish();
}

fn bench_clone_from(c: &mut Criterion) {
    let mut group = c.benchmark_group("Handle clone_from");

    for sharing in [false, true] {
        group.bench_with_input(
            BenchmarkId::from_parameter(if sharing { "same" } else { "different" }),
            &sharing,
            |b, &sharing| {
                let x = Counted::new(1u32);
                let y = if sharing { x.clone() } else { Counted::new(2u32) };
                let mut target = x.clone();
                b.iter(|| {
                    target.clone_from(black_box(&y));
                    target.clone_from(black_box(&x));
                });
            },
        );
    }

    group.finish();
}

fn bench_take_reset(c: &mut Criterion) {
    c.bench_function("Handle take + reset", |b| {
        let source = Counted::new(0u64);
        b.iter(|| {
            let mut slot = source.clone();
            let mut moved: Handle<Counted<u64>> = slot.take();
            moved.reset();
            black_box((slot, moved))
        });
    });
}

criterion_group!(benches, bench_clone_drop, bench_clone_from, bench_take_reset);
criterion_main!(benches);
