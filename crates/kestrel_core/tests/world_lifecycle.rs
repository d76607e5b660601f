//! # World Lifecycle Tests
//!
//! Exercises the runtime through its public surface only:
//! - Pool reuse across add/destroy cycles
//! - Destruction ordering and hook visibility
//! - Walks that survive destruction during update
//! - Depth-sorted render dispatch
//! - Stale and foreign id detection

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use kestrel_core::{
    Component, ComponentId, ComponentRegistry, DrawCommand, DrawList, EcsError, Poolable,
    RenderSink, TextureId, World,
};
use kestrel_shared::Point;

type Log = Rc<RefCell<Vec<String>>>;

/// Records its updates and can destroy a victim while updating.
#[derive(Default)]
struct Tracer {
    label: &'static str,
    log: Log,
    victim: Option<ComponentId>,
    destroy_self: bool,
    destroy_entity: bool,
    depth: i32,
}

impl Poolable for Tracer {}

impl Component for Tracer {
    fn initial_depth(&self) -> i32 {
        self.depth
    }

    fn update(&mut self, world: &mut World, me: ComponentId, _dt: f32) {
        self.log.borrow_mut().push(format!("update {}", self.label));
        if let Some(victim) = self.victim.take() {
            world.destroy(victim);
        }
        if self.destroy_self {
            world.destroy(me);
        }
        if self.destroy_entity {
            let entity = world.entity_of(me);
            world.destroy_entity(entity);
        }
    }

    fn render(&self, _world: &World, _me: ComponentId, sink: &mut dyn RenderSink) {
        let texture = self.label.as_bytes()[0];
        sink.texture(TextureId(u32::from(texture)), Point::ZERO, false);
    }

    fn destroyed(&mut self, world: &mut World, me: ComponentId) {
        let live = world.count::<Tracer>();
        // Hooks must still resolve their owner and find themselves on it
        let linked = world
            .try_entity_of(me)
            .and_then(|owner| world.try_entity(owner))
            .is_ok_and(|entity| entity.components().contains(&me));
        let suffix = if linked { "" } else { " unlinked" };
        self.log
            .borrow_mut()
            .push(format!("destroyed {} live={live}{suffix}", self.label));
    }
}

/// Second kind, registered first, to check cross-kind update order.
#[derive(Default)]
struct Early {
    log: Log,
}

impl Poolable for Early {}

impl Component for Early {
    fn update(&mut self, _world: &mut World, _me: ComponentId, _dt: f32) {
        self.log.borrow_mut().push("update early".to_string());
    }
}

fn registry() -> Arc<ComponentRegistry> {
    ComponentRegistry::builder()
        .register::<Early>()
        .register::<Tracer>()
        .build()
}

fn tracer(world: &mut World, log: &Log, label: &'static str) -> ComponentId {
    let entity = world.add_entity();
    tracer_on(world, entity, log, label)
}

fn tracer_on(
    world: &mut World,
    entity: kestrel_core::EntityId,
    log: &Log,
    label: &'static str,
) -> ComponentId {
    let mut component = world.acquire::<Tracer>();
    component.label = label;
    component.log = Rc::clone(log);
    world.add(entity, component)
}

fn drain(log: &Log) -> Vec<String> {
    log.borrow_mut().drain(..).collect()
}

#[test]
fn test_pool_reuse_across_cycles() {
    let mut world = World::new(registry());
    let log = Log::default();

    for _ in 0..8 {
        let ids: Vec<ComponentId> = (0..4).map(|_| tracer(&mut world, &log, "p")).collect();
        for id in ids {
            let entity = world.entity_of(id);
            world.destroy_entity(entity);
        }
    }

    let stats = world.pool_stats::<Tracer>();
    assert_eq!(stats.allocated, 4);
    assert_eq!(stats.available, 4);
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn test_recycled_component_is_reset() {
    let mut world = World::new(registry());
    let log = Log::default();

    let id = tracer(&mut world, &log, "old");
    world.component_mut::<Tracer>(id).victim = Some(id);
    world.destroy(id);

    let recycled = world.acquire::<Tracer>();
    assert_eq!(recycled.label, "");
    assert!(recycled.victim.is_none());
    assert_eq!(Rc::strong_count(&log), 1);
}

#[test]
fn test_destroy_entity_notifies_every_component_before_unlinking() {
    let mut world = World::new(registry());
    let log = Log::default();

    let entity = world.add_entity();
    let a = tracer_on(&mut world, entity, &log, "a");
    let b = tracer_on(&mut world, entity, &log, "b");
    let c = tracer_on(&mut world, entity, &log, "c");
    assert_eq!(world.components_of(entity), &[a, b, c]);

    world.destroy_entity(entity);

    assert_eq!(
        drain(&log),
        vec!["destroyed c live=3", "destroyed b live=3", "destroyed a live=3"]
    );
    assert!(!world.is_alive(entity));
    assert!(!world.contains(a));
    assert_eq!(world.count::<Tracer>(), 0);
    assert_eq!(world.first::<Tracer>(), None);
}

#[test]
fn test_destroy_component_leaves_entity_alive() {
    let mut world = World::new(registry());
    let log = Log::default();

    let entity = world.add_entity();
    let a = tracer_on(&mut world, entity, &log, "a");
    let b = tracer_on(&mut world, entity, &log, "b");

    world.destroy(a);
    assert_eq!(drain(&log), vec!["destroyed a live=2"]);
    assert_eq!(world.components_of(entity), &[b]);
    assert_eq!(world.find::<Tracer>(entity), Some(b));
    assert_eq!(world.first::<Tracer>(), Some(b));
}

#[test]
fn test_update_skips_victim_destroyed_ahead_of_the_walk() {
    let mut world = World::new(registry());
    let log = Log::default();

    let x = tracer(&mut world, &log, "x");
    let _y = tracer(&mut world, &log, "y");
    let z = tracer(&mut world, &log, "z");
    world.component_mut::<Tracer>(x).victim = Some(z);

    world.update(0.016);

    assert_eq!(
        drain(&log),
        vec!["update x", "destroyed z live=3", "update y"]
    );
    assert_eq!(world.count::<Tracer>(), 2);
}

#[test]
fn test_update_continues_after_destroying_the_next_component() {
    let mut world = World::new(registry());
    let log = Log::default();

    let x = tracer(&mut world, &log, "x");
    let y = tracer(&mut world, &log, "y");
    let _z = tracer(&mut world, &log, "z");
    world.component_mut::<Tracer>(x).victim = Some(y);

    world.update(0.016);

    assert_eq!(
        drain(&log),
        vec!["update x", "destroyed y live=3", "update z"]
    );

    world.update(0.016);
    assert_eq!(drain(&log), vec!["update x", "update z"]);
}

#[test]
fn test_component_destroying_itself_is_torn_down_after_update() {
    let mut world = World::new(registry());
    let log = Log::default();

    let x = tracer(&mut world, &log, "x");
    let _y = tracer(&mut world, &log, "y");
    world.component_mut::<Tracer>(x).destroy_self = true;

    world.update(0.016);

    assert_eq!(
        drain(&log),
        vec!["update x", "destroyed x live=2", "update y"]
    );
    assert!(!world.contains(x));
    assert_eq!(world.pool_stats::<Tracer>().available, 1);
}

#[test]
fn test_component_destroying_its_entity_mid_update() {
    let mut world = World::new(registry());
    let log = Log::default();

    let entity = world.add_entity();
    let x = tracer_on(&mut world, entity, &log, "x");
    let _sibling = tracer_on(&mut world, entity, &log, "s");
    let _other = tracer(&mut world, &log, "o");
    world.component_mut::<Tracer>(x).destroy_entity = true;

    world.update(0.016);

    assert_eq!(
        drain(&log),
        vec![
            "update x",
            "destroyed s live=3",
            "destroyed x live=3",
            "update o"
        ]
    );
    assert!(!world.is_alive(entity));
    assert_eq!(world.count::<Tracer>(), 1);
}

#[test]
fn test_entity_destroyed_by_its_first_component_keeps_hooks_linked() {
    let mut world = World::new(registry());
    let log = Log::default();

    let entity = world.add_entity();
    let first = tracer_on(&mut world, entity, &log, "a");
    let _second = tracer_on(&mut world, entity, &log, "b");
    let _third = tracer_on(&mut world, entity, &log, "c");
    world.component_mut::<Tracer>(first).destroy_entity = true;

    world.update(0.016);

    // Siblings later in the walk never update once their entity is doomed
    assert_eq!(
        drain(&log),
        vec![
            "update a",
            "destroyed c live=3",
            "destroyed b live=3",
            "destroyed a live=3"
        ]
    );
    assert!(!world.is_alive(entity));
    assert_eq!(world.count::<Tracer>(), 0);
    assert_eq!(world.pool_stats::<Tracer>().available, 3);
}

#[test]
fn test_doomed_entity_reads_as_destroyed_until_check_in() {
    let mut world = World::new(registry());
    let log = Log::default();

    let entity = world.add_entity();
    let held = tracer_on(&mut world, entity, &log, "a");
    let sibling = tracer_on(&mut world, entity, &log, "b");
    let bystander = tracer(&mut world, &log, "c");

    world.with_component::<Tracer, _, _>(held, |_, world| {
        world.destroy_entity(entity);
        // A second request while doomed is a no-op
        world.destroy_entity(entity);
        world.destroy(sibling);

        assert!(!world.is_alive(entity));
        assert!(!world.contains(held));
        assert!(!world.contains(sibling));
        assert_eq!(
            world.try_entity_of(sibling).err(),
            Some(EcsError::DeadComponent(sibling))
        );
        let seen: Vec<ComponentId> = world.iter::<Tracer>().map(|(id, _)| id).collect();
        assert_eq!(seen, vec![bystander]);
    });

    assert_eq!(
        drain(&log),
        vec!["destroyed b live=3", "destroyed a live=3"]
    );
    assert!(!world.is_alive(entity));
    assert_eq!(world.first::<Tracer>(), Some(bystander));
}

#[test]
fn test_with_component_checks_out_and_back_in() {
    let mut world = World::new(registry());
    let log = Log::default();

    let id = tracer(&mut world, &log, "a");
    let label = world.with_component::<Tracer, _, _>(id, |tracer, world| {
        assert!(world.get::<Tracer>(id).is_none());
        assert_eq!(
            world.try_component::<Tracer>(id).err(),
            Some(EcsError::BusyComponent(id))
        );
        tracer.label = "b";
        tracer.label
    });

    assert_eq!(label, "b");
    assert_eq!(world.component::<Tracer>(id).label, "b");

    world.with_component::<Tracer, _, _>(id, |_, world| world.destroy(id));
    assert_eq!(drain(&log), vec!["destroyed b live=1"]);
    assert_eq!(world.pool_stats::<Tracer>().available, 1);
}

#[test]
fn test_kinds_update_in_registration_order() {
    let mut world = World::new(registry());
    let log = Log::default();

    let _p = tracer(&mut world, &log, "p");
    let entity = world.add_entity();
    let early = Early {
        log: Rc::clone(&log),
    };
    world.add(entity, early);
    let _q = tracer(&mut world, &log, "q");

    world.update(0.016);

    assert_eq!(drain(&log), vec!["update early", "update p", "update q"]);
}

#[test]
fn test_inactive_components_and_entities_skip_update() {
    let mut world = World::new(registry());
    let log = Log::default();

    let a = tracer(&mut world, &log, "a");
    let b = tracer(&mut world, &log, "b");
    let _c = tracer(&mut world, &log, "c");

    world.set_active(a, false);
    let owner = world.entity_of(b);
    world.entity_mut(owner).active = false;

    world.update(0.016);
    assert_eq!(drain(&log), vec!["update c"]);
    assert!(!world.is_active(a));
}

#[test]
fn test_render_sorts_by_depth_stably() {
    let mut world = World::new(registry());
    let log = Log::default();

    for (label, depth) in [("a", 5), ("b", 1), ("c", 1), ("d", 3)] {
        let id = tracer(&mut world, &log, label);
        world.set_depth(id, depth);
    }

    let mut list = DrawList::new();
    world.render(&mut list);

    let order: Vec<u32> = list
        .commands
        .iter()
        .map(|command| match command {
            DrawCommand::Texture { texture, .. } => texture.0,
            other => panic!("unexpected draw {other:?}"),
        })
        .collect();
    let expected: Vec<u32> = "bcda".bytes().map(u32::from).collect();
    assert_eq!(order, expected);
}

#[test]
fn test_render_skips_hidden_components_and_entities() {
    let mut world = World::new(registry());
    let log = Log::default();

    let a = tracer(&mut world, &log, "a");
    let b = tracer(&mut world, &log, "b");
    let _c = tracer(&mut world, &log, "c");

    world.set_visible(a, false);
    let owner = world.entity_of(b);
    world.entity_mut(owner).visible = false;

    let mut list = DrawList::new();
    world.render(&mut list);
    assert_eq!(
        list.commands,
        vec![DrawCommand::Texture {
            texture: TextureId(u32::from(b'c')),
            position: Point::ZERO,
            flip_x: false,
        }]
    );

    // Nothing is retained between frames
    list.clear();
    world.debug_render(&mut list);
    assert!(list.is_empty());
}

#[test]
fn test_initial_depth_comes_from_the_component() {
    let mut world = World::new(registry());
    let entity = world.add_entity();
    let mut component = world.acquire::<Tracer>();
    component.depth = -7;
    let id = world.add(entity, component);
    assert_eq!(world.depth(id), -7);
}

#[test]
fn test_iteration_helpers_follow_insertion_order() {
    let mut world = World::new(registry());
    let log = Log::default();

    let a = tracer(&mut world, &log, "a");
    let b = tracer(&mut world, &log, "b");
    let c = tracer(&mut world, &log, "c");

    assert_eq!(world.first::<Tracer>(), Some(a));
    assert_eq!(world.last::<Tracer>(), Some(c));
    assert_eq!(world.ids::<Tracer>().collect::<Vec<_>>(), vec![a, b, c]);
    let labels: Vec<&str> = world.iter::<Tracer>().map(|(_, p)| p.label).collect();
    assert_eq!(labels, vec!["a", "b", "c"]);
    assert_eq!(world.first::<Early>(), None);
}

#[test]
fn test_entity_slots_are_recycled_with_new_generation() {
    let mut world = World::new(registry());

    let first = world.add_entity_at(Point::new(3, 4));
    assert_eq!(world.entity(first).position, Point::new(3, 4));
    world.destroy_entity(first);

    let second = world.add_entity();
    assert_eq!(second.index(), first.index());
    assert_ne!(second.generation(), first.generation());
    assert!(!world.is_alive(first));
    assert_eq!(world.entity(second).position, Point::ZERO);
}

#[test]
fn test_clear_destroys_everything() {
    let mut world = World::new(registry());
    let log = Log::default();

    for label in ["a", "b", "c"] {
        tracer(&mut world, &log, label);
    }
    world.clear();

    assert_eq!(world.entity_count(), 0);
    assert_eq!(world.count::<Tracer>(), 0);
    assert_eq!(world.entities().count(), 0);
}

#[test]
fn test_try_accessors_report_errors() {
    let mut world = World::new(registry());
    let mut other = World::new(registry());
    let log = Log::default();

    let id = tracer(&mut world, &log, "a");
    let entity = world.entity_of(id);
    let foreign = other.add_entity();

    assert!(matches!(
        world.try_entity(foreign),
        Err(EcsError::ForeignEntity(_))
    ));
    assert!(matches!(
        world.try_component::<Early>(id),
        Err(EcsError::TypeMismatch { .. })
    ));

    world.destroy_entity(entity);
    assert_eq!(world.try_entity(entity).err(), Some(EcsError::DeadEntity(entity)));
    assert_eq!(
        world.try_component::<Tracer>(id).err(),
        Some(EcsError::DeadComponent(id))
    );
    assert!(world.get::<Tracer>(id).is_none());
    assert!(world.try_destroy(id).is_err());
}

#[test]
#[should_panic(expected = "destroyed")]
fn test_stale_component_access_panics() {
    let mut world = World::new(registry());
    let log = Log::default();

    let id = tracer(&mut world, &log, "a");
    world.destroy(id);
    let _ = world.component::<Tracer>(id);
}

#[test]
#[should_panic(expected = "another world")]
fn test_adding_to_foreign_entity_panics() {
    let mut world = World::new(registry());
    let mut other = World::new(registry());

    let foreign = other.add_entity();
    let component = world.acquire::<Tracer>();
    world.add(foreign, component);
}

#[test]
#[should_panic(expected = "not registered")]
fn test_unregistered_kind_panics() {
    #[derive(Default)]
    struct Stray;
    impl Poolable for Stray {}
    impl Component for Stray {}

    let mut world = World::new(registry());
    let entity = world.add_entity();
    world.add(entity, Stray);
}
