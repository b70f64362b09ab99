use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filter_designer::design::{
    design_ls, design_ls_batch, design_notch, desired_response, frequency_response, DesiredResponseSpec,
};
use filter_designer::filters::{FirFilter, IirFilter};
use ndarray::Array1;

const MASK_SIZES: &[usize] = &[256, 1024, 4096];
const FIR_ORDERS: &[usize] = &[15, 63, 127];

fn lowpass_mask(samples: usize) -> Array1<f64> {
    desired_response(&DesiredResponseSpec::lowpass(samples, 2.0, 3.0, 0.2, 0.3))
        .expect("valid lowpass mask")
}

fn benchmark_desired_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("desired_response");

    for &samples in MASK_SIZES {
        group.throughput(Throughput::Elements(samples as u64));
        group.bench_with_input(BenchmarkId::new("lowpass", samples), &samples, |b, &n| {
            let spec = DesiredResponseSpec::lowpass(n, 2.0, 3.0, 0.2, 0.3);
            b.iter(|| desired_response(black_box(&spec)));
        });
        group.bench_with_input(BenchmarkId::new("bandpass_centered", samples), &samples, |b, &n| {
            let spec = DesiredResponseSpec::bandpass_centered(n, 1000.0, 3.0, 200.0, 120.0, 100.0);
            b.iter(|| desired_response(black_box(&spec)));
        });
    }

    group.finish();
}

fn benchmark_least_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("least_squares");

    for &samples in MASK_SIZES {
        let mask = lowpass_mask(samples);
        let weights = Array1::from_elem(samples, 1.0);

        for &order in FIR_ORDERS {
            group.bench_with_input(
                BenchmarkId::new("design_ls", format!("{}ord_{}pts", order, samples)),
                &order,
                |b, &order| b.iter(|| design_ls(order, black_box(mask.view()), None)),
            );
            group.bench_with_input(
                BenchmarkId::new("design_wls", format!("{}ord_{}pts", order, samples)),
                &order,
                |b, &order| b.iter(|| design_ls(order, black_box(mask.view()), Some(weights.view()))),
            );
        }
    }

    let masks: Vec<Array1<f64>> = (0..16).map(|_| lowpass_mask(1024)).collect();
    group.bench_function("batch_16x63", |b| b.iter(|| design_ls_batch(63, black_box(&masks))));

    group.finish();
}

fn benchmark_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtering");
    let signal: Vec<f64> = (0..4096).map(|n| (n as f64 * 0.37).sin()).collect();
    group.throughput(Throughput::Elements(signal.len() as u64));

    let taps = design_ls(63, lowpass_mask(1024).view(), None).expect("valid design");
    group.bench_function("fir_63", |b| {
        let mut filter = FirFilter::new(taps.clone()).expect("valid taps");
        b.iter(|| filter.process(black_box(&signal)))
    });

    let notch = design_notch(60.0, 500.0, 2.0).expect("valid notch");
    group.bench_function("notch", |b| {
        let mut filter = IirFilter::new(&notch).expect("valid notch");
        b.iter(|| filter.process(black_box(&signal)))
    });

    group.bench_function("frequency_response_63x1024", |b| {
        b.iter(|| frequency_response(black_box(&taps), &[1.0], 1024))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_desired_response,
    benchmark_least_squares,
    benchmark_filtering
);
criterion_main!(benches);
