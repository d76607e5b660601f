//! # KESTREL Headless Runner
//!
//! Loads a room, drops a test actor into it and steps a fixed number of
//! frames without any window. Useful for checking room files and timing the
//! simulation.
//!
//! ```bash
//! kestrel-headless <room.toml> [config.toml] [frames]
//!
//! # More detail
//! RUST_LOG=kestrel=debug kestrel-headless rooms/sample.toml
//! ```

use std::env;
use std::error::Error;
use std::process::ExitCode;

use kestrel::core::{DrawList, EntityId, World};
use kestrel::shared::{Mask, Point, RectI};
use kestrel::{spawn, GameLoop, GameLoopConfig, Room, SpawnFactory};
use tracing::{error, info};

/// Frames stepped when no count is given (ten seconds at 60 FPS).
const DEFAULT_FRAMES: u64 = 600;

/// Size of the test actor.
const ACTOR: RectI = RectI::new(0, 0, 8, 12);

/// Spawns a gravity-driven actor for `player` points; everything else is
/// content this runner does not know.
struct HeadlessFactory<'a> {
    config: &'a GameLoopConfig,
    actors: Vec<EntityId>,
}

impl SpawnFactory for HeadlessFactory<'_> {
    fn spawn(&mut self, world: &mut World, tag: &str, position: Point) -> Option<EntityId> {
        if tag != "player" {
            return None;
        }
        let entity = world.add_entity_at(position);
        let wired = spawn::mover(world, entity, ACTOR, Mask::PLAYER);
        self.config.apply_to(world.component_mut(wired.component));
        self.actors.push(entity);
        Some(entity)
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let room_path = args
        .next()
        .ok_or("usage: kestrel-headless <room.toml> [config.toml] [frames]")?;
    let config = match args.next() {
        Some(path) => GameLoopConfig::from_path(path)?,
        None => GameLoopConfig::default(),
    };
    let frames = match args.next() {
        Some(count) => count.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };

    let room = Room::from_path(&room_path)?;
    let mut world = World::new(kestrel::registry());

    let mut factory = HeadlessFactory {
        config: &config,
        actors: Vec::new(),
    };
    let instance = room.instantiate(&mut world, &mut factory);
    let mut actors = factory.actors;

    // Rooms without a player spawn still get one actor, dropped from the top
    if actors.is_empty() {
        let bounds = room.bounds();
        let top = Point::new(bounds.w / 2, bounds.top() - ACTOR.h);
        let entity = world.add_entity_at(top);
        let wired = spawn::mover(&mut world, entity, ACTOR, Mask::PLAYER);
        config.apply_to(world.component_mut(wired.component));
        actors.push(entity);
    }

    info!(
        platforms = instance.platforms.len(),
        spawned = instance.spawned.len(),
        skipped = instance.skipped.len(),
        frames,
        "starting headless run"
    );

    let timestep = config.timestep;
    let mut game_loop = GameLoop::new(world, config);
    let mut sink = DrawList::new();
    for _ in 0..frames {
        sink.clear();
        game_loop.frame(timestep, &mut sink);
    }

    let world = game_loop.world();
    for actor in actors.iter().filter(|actor| world.is_alive(**actor)) {
        let position = world.entity(*actor).position;
        info!(%actor, x = position.x, y = position.y, "actor at rest");
    }
    game_loop.stats().log_summary();
    info!(
        frames = game_loop.frame_count(),
        entities = world.entity_count(),
        draw_calls = sink.len(),
        "headless run finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
