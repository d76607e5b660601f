//! # Physics Benchmark
//!
//! Frame cost of the collision layer, which scans colliders linearly:
//! - Movers falling onto a tile grid
//! - Movers bouncing between rect walls
//! - A full frame of the sample room
//!
//! Run with: `cargo bench --package kestrel`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kestrel::core::{ComponentId, DrawList, EntityId, World};
use kestrel::physics::{Collider, Mover};
use kestrel::shared::{Mask, Point, RectI, Vec2};
use kestrel::{spawn, GameLoop, GameLoopConfig, Room};

const BODY: RectI = RectI::new(0, 0, 6, 8);

fn grid_world(actors: usize) -> World {
    let mut world = World::new(kestrel::registry());

    let level = world.add_entity();
    let mut grid = Collider::grid(64, 32, 8, Mask::SOLID);
    for x in 0..64 {
        grid.set_cell(x, 0, true);
    }
    world.add(level, grid);

    for i in 0..actors {
        let x = 8 + (i as i32 * 7) % 480;
        let y = 16 + (i as i32 / 64) * 10;
        let entity = world.add_entity_at(Point::new(x, y));
        let wired = spawn::mover(&mut world, entity, BODY, Mask::PLAYER);
        let mover = world.component_mut::<Mover>(wired.component);
        mover.gravity = -450.0;
        mover.speed = Vec2::new(if i % 2 == 0 { 40.0 } else { -40.0 }, 0.0);
        mover.on_hit_x = Some(Box::new(
            |mover: &mut Mover, _: &mut World, _: ComponentId| {
                mover.speed.x = -mover.speed.x;
            },
        ));
    }
    world
}

fn walled_world(actors: usize, walls: usize) -> World {
    let mut world = World::new(kestrel::registry());
    for i in 0..walls {
        let entity = world.add_entity_at(Point::new(i as i32 * 64, 0));
        spawn::collider(&mut world, entity, RectI::new(0, 0, 4, 64), Mask::SOLID);
    }
    for i in 0..actors {
        let entity = world.add_entity_at(Point::new(8 + (i as i32 % 48), i as i32 % 56));
        let wired = spawn::mover(&mut world, entity, BODY, Mask::PLAYER);
        world.component_mut::<Mover>(wired.component).speed = Vec2::new(120.0, 0.0);
    }
    world
}

fn bench_grid_fall(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_fall");

    for actors in [64, 256] {
        let mut world = grid_world(actors);
        group.bench_with_input(BenchmarkId::from_parameter(actors), &actors, |b, _| {
            b.iter(|| world.update(black_box(1.0 / 60.0)));
        });
    }

    group.finish();
}

fn bench_rect_walls(c: &mut Criterion) {
    let mut group = c.benchmark_group("rect_walls");

    for walls in [16, 128] {
        let mut world = walled_world(128, walls);
        group.bench_with_input(BenchmarkId::from_parameter(walls), &walls, |b, _| {
            b.iter(|| world.update(black_box(1.0 / 60.0)));
        });
    }

    group.finish();
}

fn bench_sample_room_frame(c: &mut Criterion) {
    let room = match Room::from_toml_str(include_str!("../rooms/sample.toml")) {
        Ok(room) => room,
        Err(err) => panic!("sample room: {err}"),
    };
    let mut world = World::new(kestrel::registry());
    let mut no_spawns = |_: &mut World, _: &str, _: Point| -> Option<EntityId> { None };
    room.instantiate(&mut world, &mut no_spawns);

    let config = GameLoopConfig {
        debug_render: true,
        ..GameLoopConfig::default()
    };
    let timestep = config.timestep;
    let mut game_loop = GameLoop::new(world, config);
    let mut sink = DrawList::new();

    c.bench_function("sample_room_frame", |b| {
        b.iter(|| {
            sink.clear();
            black_box(game_loop.frame(timestep, &mut sink))
        });
    });
}

criterion_group!(
    benches,
    bench_grid_fall,
    bench_rect_walls,
    bench_sample_room_frame
);
criterion_main!(benches);
