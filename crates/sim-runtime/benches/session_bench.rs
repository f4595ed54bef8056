use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::ParamField;
use sim_runtime::Session;

fn bench_slider_drag(c: &mut Criterion) {
    let mut session = Session::default();
    c.bench_function("session churn sweep", |b| {
        b.iter(|| {
            for step in 0..=40 {
                let _ = session.set(ParamField::Churn, f64::from(step) * 0.5);
            }
        })
    });
}

criterion_group!(benches, bench_slider_drag);
criterion_main!(benches);
