//! # Feedforward Model Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use steer_lib::car_params::TorqueParams;
use steer_lib::lat_ctrl::FeedforwardModel;
use veh_if::car::CarVariant;
use veh_if::state::CycleInput;

fn feedforward_benchmark(c: &mut Criterion) {
    // ---- Build a representative cycle input ----

    let input = CycleInput {
        v_ego_ms: 22.0,
        lat_accel_desired_ms2: 1.4,
        lat_accel_error_ms2: 0.1,
        lat_accel_deadzone_ms2: 0.05,
        friction_compensation: true,
        g_lat_accel_ms2: -0.2,
        lat_jerk_desired_ms3: 0.6,
    };

    let torque_params = TorqueParams::for_variant(CarVariant::Ram1500);

    // Bench both strategies
    c.bench_function("FeedforwardModel::Sigmoid::compute", |b| {
        b.iter(|| FeedforwardModel::Sigmoid.compute(&input, &torque_params))
    });

    c.bench_function("FeedforwardModel::Linear::compute", |b| {
        b.iter(|| FeedforwardModel::Linear.compute(&input, &torque_params))
    });
}

criterion_group!(benches, feedforward_benchmark);
criterion_main!(benches);
