//! Criterion benchmarks for the update rules and scene building.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mlviz::config::SequenceTiming;
use mlviz::dataset::{DataPoint, Dataset};
use mlviz::network::NeuralNetworkView;
use mlviz::params::Parameters;
use mlviz::render::{render_regression, PlotSpec};
use mlviz::update::{LinearSgd, LogisticSgd, UpdateRule};

fn synthetic(n: usize) -> Vec<DataPoint> {
    (0..n)
        .map(|i| {
            let x = 15.0 + 40.0 * (i as f64) / (n as f64);
            DataPoint::new(x, 180.0 * x + 500.0)
        })
        .collect()
}

/// One tick over datasets of growing size.
fn bench_step_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_size");

    for size in [6usize, 64, 512, 4096].iter() {
        let points = synthetic(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("linear", size), &points, |b, points| {
            let rule = LinearSgd::default();
            let mut p = Parameters::new(100.0, 2000.0);
            b.iter(|| {
                p = rule.step(p, black_box(points));
                black_box(p)
            });
        });

        group.bench_with_input(BenchmarkId::new("logistic", size), &points, |b, points| {
            let rule = LogisticSgd::default();
            let mut p = Parameters::default();
            b.iter(|| {
                p = rule.step(p, black_box(points));
                black_box(p)
            });
        });
    }

    group.finish();
}

/// Scene construction for each page at its built-in size.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let insurance = Dataset::insurance_charges();
    let plot = PlotSpec::linear_preset();
    let p = Parameters::new(100.0, 2000.0);
    group.bench_function("linear_chart", |b| {
        b.iter(|| black_box(render_regression(&plot, &insurance, |x| p.linear(x))))
    });

    let pass_fail = Dataset::pass_fail();
    let curve = PlotSpec::logistic_preset().with_curve_samples(64);
    let rule = LogisticSgd::default();
    group.bench_function("logistic_curve_64", |b| {
        b.iter(|| black_box(render_regression(&curve, &pass_fail, |x| rule.predict(p, x))))
    });

    if let Ok(view) = NeuralNetworkView::energy_prediction(SequenceTiming::default()) {
        group.bench_function("network", |b| b.iter(|| black_box(view.scene())));
    }

    group.finish();
}

criterion_group!(benches, bench_step_sizes, bench_render);
criterion_main!(benches);
