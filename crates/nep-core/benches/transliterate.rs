use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nep_core::Keymap;

fn sample(len: usize) -> String {
    "namaste, ma nepali bolchu. KaSTo CHa? 123 [{]}\\|<.>/ "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn bench_transliterate(c: &mut Criterion) {
    let keymap = Keymap::global();
    let mut group = c.benchmark_group("transliterate");
    for len in [16usize, 256, 4096, 65536] {
        let input = sample(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            b.iter(|| keymap.transliterate(input))
        });
    }
    group.finish();
}

fn bench_fixed_point(c: &mut Criterion) {
    let keymap = Keymap::global();
    let converted = keymap.transliterate(&sample(4096));
    c.bench_function("is_fixed_point/4096", |b| {
        b.iter(|| keymap.is_fixed_point(&converted))
    });
}

criterion_group!(benches, bench_transliterate, bench_fixed_point);
criterion_main!(benches);
