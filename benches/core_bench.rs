use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use interaction_arbiter::{
    Actor, Collider, ColliderKind, InputSample, Interactable, InteractionManager, LineCastProbe,
    SphereOverlapProbe,
};
use std::hint::black_box;

fn build_world(manager: &mut InteractionManager, count: usize) {
    for index in 0..count {
        let id = index as u64 + 1;
        let column = (index % 100) as f32;
        let row = (index / 100) as f32;
        let center = Vec3::new(column * 2.0, 0.0, row * 2.0);
        manager
            .registry_mut()
            .register_interactable(Interactable::new(id, center));
        manager.registry_mut().register_collider(
            Collider::sphere(id + 1_000_000, center, 0.4),
            id,
            ColliderKind::Surface,
        );
    }
}

fn bench_manager_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("manager_tick");

    for &count in &[1_000usize, 10_000usize] {
        let mut manager = InteractionManager::new();
        build_world(&mut manager, count);

        let mut actor = Actor::new(1);
        actor
            .resolver_mut()
            .set_near_probe(Box::new(SphereOverlapProbe::new(Vec3::ZERO, 0.3)));
        actor
            .resolver_mut()
            .set_far_probe(Box::new(LineCastProbe::new(Vec3::ZERO, Vec3::X, 10.0, 20)));
        manager.register_actor(actor);
        manager.tick(0.016);

        group.bench_with_input(BenchmarkId::new("hover_and_cast", count), &count, |b, _| {
            b.iter(|| {
                if let Some(actor) = manager.actor_mut(1) {
                    actor.set_select_sample(InputSample::idle());
                }
                manager.tick(black_box(0.016));
            })
        });
    }

    group.finish();
}

fn bench_spatial_queries(c: &mut Criterion) {
    let mut manager = InteractionManager::new();
    build_world(&mut manager, 10_000);
    manager.registry_mut().refresh_spatial_index();

    c.bench_function("within_radius_10k", |b| {
        b.iter(|| {
            let matches = manager
                .registry()
                .spatial()
                .within_radius(black_box(Vec3::new(50.0, 0.0, 50.0)), 5.0);
            black_box(matches.len())
        })
    });
}

criterion_group!(benches, bench_manager_tick, bench_spatial_queries);
criterion_main!(benches);
