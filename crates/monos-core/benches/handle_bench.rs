use criterion::{black_box, criterion_group, criterion_main, Criterion};
use monos_core::UniqueHandle;

#[derive(Debug, Clone, Copy, Default)]
struct Payload {
    values: [u64; 8],
}

fn bench_handles(c: &mut Criterion) {
    let mut group = c.benchmark_group("Handle Lifecycle");

    group.bench_function("Acquire + Release", |b| {
        b.iter(|| {
            let handle = UniqueHandle::from_boxed(Box::new(Payload::default()));
            black_box(handle.is_owning());
        });
    });

    group.bench_function("Transfer", |b| {
        b.iter(|| {
            let mut source = UniqueHandle::from_boxed(Box::new(Payload::default()));
            let destination = source.take();
            black_box(destination.is_owning());
        });
    });

    group.bench_function("Borrowing Access", |b| {
        let handle = UniqueHandle::from_boxed(Box::new(Payload {
            values: [7; 8],
        }));
        b.iter(|| {
            let sum: u64 = handle.get().map(|p| p.values.iter().sum()).unwrap_or(0);
            black_box(sum);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_handles);
criterion_main!(benches);
