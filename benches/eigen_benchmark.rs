use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use spectral_algebra::dense::covariance;
use spectral_algebra::dimred::pca::PcaBuilder;
use spectral_algebra::eigen::PowerIteration;

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.random_range(-1.0..1.0))
}

fn bench_covariance(c: &mut Criterion) {
    let mut group = c.benchmark_group("covariance");
    for &(rows, cols) in &[(100usize, 20usize), (500, 50)] {
        let x = random_matrix(rows, cols, 42);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", rows, cols)),
            &x,
            |b, x| b.iter(|| covariance(x.view()).unwrap()),
        );
    }
    group.finish();
}

fn bench_incremental_extension(c: &mut Criterion) {
    let mut group = c.benchmark_group("eigen_extension");
    let x = random_matrix(200, 30, 42);

    group.bench_function("direct_5", |b| {
        b.iter(|| {
            let mut pca = PcaBuilder::new(PowerIteration::new())
                .matrix(x.clone())
                .build();
            pca.eigen(5).unwrap().len()
        })
    });
    group.bench_function("extend_3_then_5", |b| {
        b.iter(|| {
            let mut pca = PcaBuilder::new(PowerIteration::new())
                .matrix(x.clone())
                .build();
            pca.eigen(3).unwrap();
            pca.eigen(5).unwrap().len()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_covariance, bench_incremental_extension);
criterion_main!(benches);
