use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion};
use virtual_input::prelude::*;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("button_machine_advance", |b| {
        let now = Instant::now();
        let mut machine = ButtonMachine::default();
        let mut active = false;
        b.iter(|| {
            active = !active;
            machine.advance(active, now);
            machine.state()
        })
    });

    c.bench_function("cutoff_axis_scaled", |b| {
        b.iter(|| cutoff_axis(0.73, 0.25, CutoffKind::Scaled))
    });

    c.bench_function("cutoff_dual_axis_radial", |b| {
        b.iter(|| {
            cutoff_dual_axis(
                glam::Vec2::new(0.7, -0.4),
                0.1,
                CutoffKind::Scaled,
                0.2,
                CutoffKind::Scaled,
            )
        })
    });

    c.bench_function("delegated_button_update", |b| {
        let now = Instant::now();
        let mut jump = DelegatedButtonSignature::new("Jump", Some(Box::new(|| true)));
        b.iter(|| {
            jump.update(now);
            jump.state(TickContext::Update)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
