use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion};
use virtual_input::prelude::*;
use virtual_input::signature::InputSignature;

fn populated_collection(count: usize) -> SignatureCollection {
    let mut collection = SignatureCollection::new();
    for index in 0..count {
        let signature: Box<dyn InputSignature> = Box::new(
            DelegatedButtonSignature::new(format!("Button{index}"), Some(Box::new(|| false)))
                .with_precedence(index as f32),
        );
        collection.add(signature).unwrap();
    }
    collection
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("collection_get", |b| {
        let collection = populated_collection(32);
        b.iter(|| collection.get("Button17").is_some())
    });

    c.bench_function("collection_update_all", |b| {
        let now = Instant::now();
        let mut collection = populated_collection(32);
        b.iter(|| collection.update_all(now))
    });

    c.bench_function("collection_sort", |b| {
        let mut collection = populated_collection(32);
        b.iter(|| collection.sort())
    });

    c.bench_function("device_button_state", |b| {
        let mut device = GenericInputDevice::new("Bench Pad");
        device
            .register(Box::new(DelegatedButtonSignature::new(
                "Jump",
                Some(Box::new(|| true)),
            )))
            .unwrap();
        device.update(Instant::now());
        b.iter(|| device.button_state("Jump", TickContext::Update))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
