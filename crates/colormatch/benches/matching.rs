use colormatch::opt::Options;
use colormatch::{ColorRecord, DistanceMetric, Matcher};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

fn random_records(prefix: &str, count: usize) -> Vec<ColorRecord> {
    let mut rng = rand::rng();
    (0..count)
        .map(|index| {
            ColorRecord::new(format!("{}{}", prefix, index), rng.random_range(0..=0xffffff))
                .expect("random RGB values fit into 24 bits")
        })
        .collect()
}

pub fn run_benchmarks(c: &mut Criterion) {
    let originals = random_records("Original", 1_000);
    let specs = random_records("Spec", 64);

    let mut group = c.benchmark_group("matching");
    group.sample_size(20);

    for metric in [DistanceMetric::Cie94, DistanceMetric::Ciede2000] {
        let sequential = Matcher::with_options(
            Options::builder().metric(metric).parallel_threshold(0).build(),
        );
        group.bench_with_input(
            BenchmarkId::new("sequential", metric),
            &metric,
            |b, _| b.iter(|| sequential.find_matches(&originals, &specs)),
        );

        let parallel = Matcher::with_options(
            Options::builder().metric(metric).parallel_threshold(1).build(),
        );
        group.bench_with_input(BenchmarkId::new("parallel", metric), &metric, |b, _| {
            b.iter(|| parallel.find_matches(&originals, &specs))
        });
    }

    group.finish();
}

criterion_group!(benches, run_benchmarks);
criterion_main!(benches);
