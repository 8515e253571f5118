use coalign::lowlevel::{Correlator, ZnccScalar};
use coalign::{find_best_match_location, repair_nonfinite, EstimatorConfig, Image, ShiftEstimator};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_layer(width: usize, height: usize) -> Image {
    Image::from_fn(width, height, |x, y| {
        (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as f64
    })
    .unwrap()
}

fn crop(img: &Image, x: usize, y: usize, width: usize, height: usize) -> Image {
    Image::from_view(img.view().roi(x, y, width, height).unwrap()).unwrap()
}

fn bench_estimate(c: &mut Criterion) {
    let layer = make_layer(256, 256);
    let template = crop(&layer, 90, 70, 64, 64);

    let sequential = ShiftEstimator::new();
    c.bench_function("estimate_256_tpl64", |b| {
        b.iter(|| {
            let mut layer = layer.clone();
            let mut template = template.clone();
            black_box(sequential.estimate(&mut layer, &mut template).unwrap())
        });
    });

    if cfg!(feature = "rayon") {
        let parallel = ShiftEstimator::new().with_config(EstimatorConfig {
            parallel: true,
            ..EstimatorConfig::default()
        });
        c.bench_function("estimate_256_tpl64_parallel", |b| {
            b.iter(|| {
                let mut layer = layer.clone();
                let mut template = template.clone();
                black_box(parallel.estimate(&mut layer, &mut template).unwrap())
            });
        });
    }

    let surface = ZnccScalar.correlate(layer.view(), template.view()).unwrap();
    c.bench_function("find_best_match_location", |b| {
        b.iter(|| black_box(find_best_match_location(surface.view()).unwrap()));
    });
}

fn bench_repair(c: &mut Criterion) {
    let mut holey = make_layer(512, 512);
    for i in 0..2000 {
        let x = (i * 37) % 512;
        let y = (i * 91) % 512;
        *holey.get_mut(x, y).unwrap() = f64::NAN;
    }

    c.bench_function("repair_nonfinite_512_2000", |b| {
        b.iter(|| {
            let mut img = holey.clone();
            black_box(repair_nonfinite(&mut img).unwrap())
        });
    });
}

criterion_group!(benches, bench_estimate, bench_repair);
criterion_main!(benches);
