use criterion::{criterion_group, criterion_main, Criterion};

use edgezoom_core::{FractalParams, FractalSpec, ViewWindow};
use edgezoom_render::{
    evaluate, select_target, ArithmeticMode, RenderCancel, SessionConfig, ZoomSession,
};

fn bench_hardware_frame(c: &mut Criterion) {
    let spec = FractalSpec::mandelbrot(100);
    let view = ViewWindow::default_mandelbrot(100).unwrap();
    let cancel = RenderCancel::new();

    c.bench_function("frame_800x800_f64", |b| {
        b.iter(|| {
            evaluate(
                &view,
                &spec,
                FractalParams::default(),
                800,
                800,
                ArithmeticMode::Hardware,
                &cancel,
            )
        });
    });
}

fn bench_precise_frame(c: &mut Criterion) {
    let spec = FractalSpec::mandelbrot(128);
    let view = ViewWindow::default_mandelbrot(128).unwrap();
    let cancel = RenderCancel::new();

    c.bench_function("frame_200x200_mpfr", |b| {
        b.iter(|| {
            evaluate(
                &view,
                &spec,
                FractalParams::default(),
                200,
                200,
                ArithmeticMode::Precise,
                &cancel,
            )
        });
    });
}

fn bench_select_target(c: &mut Criterion) {
    let spec = FractalSpec::mandelbrot(100);
    let view = ViewWindow::default_mandelbrot(100).unwrap();
    let cancel = RenderCancel::new();
    let result = evaluate(
        &view,
        &spec,
        FractalParams::default(),
        800,
        800,
        ArithmeticMode::Hardware,
        &cancel,
    )
    .unwrap();

    c.bench_function("select_target_800x800", |b| {
        b.iter(|| select_target(&result.frame, &view));
    });
}

fn bench_session_step(c: &mut Criterion) {
    let config = SessionConfig {
        width: 256,
        height: 256,
        ..SessionConfig::default()
    };
    let cancel = RenderCancel::new();
    let mut session = ZoomSession::with_spec(config, FractalSpec::mandelbrot(100)).unwrap();

    c.bench_function("session_step_256x256", |b| {
        b.iter(|| session.step(&cancel));
    });
}

criterion_group!(
    benches,
    bench_hardware_frame,
    bench_precise_frame,
    bench_select_target,
    bench_session_step
);
criterion_main!(benches);
