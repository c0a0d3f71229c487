//! Benchmarks for continuum smoothing, line detection and the redshift grid scan
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use specline::{
    DetectorConfig, FftSmoother, LineDetector, ObservedLine, RedshiftEstimator, RedshiftSearch,
    SmoothingParams,
};
use specline::spectrum::synthetic::{linear_grid, synthetic_flux, GaussianNoise, SyntheticLine};

/// Seeded spectrum: sloped continuum, a few lines and unit noise
fn synthetic_spectrum(n: usize) -> (Vec<f64>, Vec<f64>) {
    let wavelength = linear_grid(4000.0, 2.0, n);
    let lines: Vec<SyntheticLine> = [(n / 4, 20.0), (n / 2, -15.0), (3 * n / 4, 25.0)]
        .iter()
        .map(|&(center, amp)| SyntheticLine::new(wavelength[center], amp, 4.0))
        .collect();
    let flux = synthetic_flux(&wavelength, 100.0, 0.01, &lines, 1.0, &mut GaussianNoise::new(n as u64));
    (wavelength, flux)
}

fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_smoothing");

    for &n in &[1024usize, 4096, 16384] {
        let (_, flux) = synthetic_spectrum(n);
        let mut smoother = FftSmoother::new(n, SmoothingParams::default()).unwrap();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &flux, |b, flux| {
            b.iter(|| smoother.smooth(black_box(flux), None).unwrap())
        });
    }

    group.finish();
}

fn bench_detection(c: &mut Criterion) {
    let (wavelength, flux) = synthetic_spectrum(4096);
    let detector = LineDetector::new(DetectorConfig::default());

    c.bench_function("line_detection_4096", |b| {
        b.iter(|| {
            detector
                .detect(black_box(&wavelength), black_box(&flux), None)
                .unwrap()
        })
    });
}

fn bench_redshift_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("redshift_scan");
    let lines: Vec<ObservedLine> = [7219.3, 5347.1, 5507.5, 5454.8]
        .iter()
        .map(|&w| ObservedLine::from(w))
        .collect();

    for &z_max in &[1.0, 3.0, 6.0] {
        let estimator = RedshiftEstimator::new(RedshiftSearch::range(0.0, z_max));
        let points = estimator.search().grid_points();

        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::new("scan", points), &lines, |b, lines| {
            b.iter(|| estimator.scan(black_box(lines)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("estimate", points), &lines, |b, lines| {
            b.iter(|| estimator.estimate(black_box(lines)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_smoothing, bench_detection, bench_redshift_scan);
criterion_main!(benches);
