//! # World Benchmark
//!
//! Measures the per-frame cost of the runtime itself:
//! - Spawn/destroy churn through the pools
//! - Update walk over one kind
//! - Depth-sorted render gather
//!
//! Run with: `cargo bench --package kestrel_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kestrel_core::{
    Component, ComponentId, ComponentRegistry, DrawList, Poolable, RenderSink, TextureId, World,
};
use kestrel_shared::Point;

#[derive(Default)]
struct Drift {
    step: i32,
}

impl Poolable for Drift {}

impl Component for Drift {
    fn update(&mut self, world: &mut World, me: ComponentId, _dt: f32) {
        let entity = world.entity_of(me);
        world.entity_mut(entity).position.x += self.step;
    }

    fn render(&self, world: &World, me: ComponentId, sink: &mut dyn RenderSink) {
        let position = world.entity(world.entity_of(me)).position;
        sink.texture(TextureId(0), position, false);
    }
}

fn populated(count: usize) -> World {
    let registry = ComponentRegistry::builder().register::<Drift>().build();
    let mut world = World::new(registry);
    for i in 0..count {
        let entity = world.add_entity_at(Point::new(i as i32, 0));
        let mut drift = world.acquire::<Drift>();
        drift.step = 1;
        let id = world.add(entity, drift);
        world.set_depth(id, (i % 7) as i32);
    }
    world
}

fn bench_spawn_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_churn");

    for count in [1_000, 10_000] {
        let mut world = populated(count);
        world.clear();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut spawned = Vec::with_capacity(count);
                for _ in 0..count {
                    let entity = world.add_entity();
                    let drift = world.acquire::<Drift>();
                    world.add(entity, drift);
                    spawned.push(entity);
                }
                for entity in spawned {
                    world.destroy_entity(entity);
                }
                black_box(world.pool_stats::<Drift>())
            });
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut world = populated(10_000);
    c.bench_function("update_10k", |b| {
        b.iter(|| world.update(black_box(1.0 / 60.0)));
    });
}

fn bench_render(c: &mut Criterion) {
    let mut world = populated(10_000);
    let mut list = DrawList::new();
    c.bench_function("render_10k", |b| {
        b.iter(|| {
            list.clear();
            world.render(&mut list);
            black_box(list.len())
        });
    });
}

criterion_group!(benches, bench_spawn_churn, bench_update, bench_render);
criterion_main!(benches);
