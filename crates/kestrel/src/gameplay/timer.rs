//! # Timer
//!
//! Countdown component. On expiry it fires an optional callback, then
//! repeats, removes itself or removes its whole entity.

use kestrel_core::{Component, ComponentId, Poolable, World};

/// Callback fired when a timer expires. Receives the world and the timer's
/// id.
pub type TimerCallback = Box<dyn FnMut(&mut World, ComponentId)>;

/// What a timer does after firing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerMode {
    /// Destroy the timer component.
    #[default]
    Once,
    /// Start counting down again.
    Repeat,
    /// Destroy the entity owning the timer.
    DestroyEntity,
}

/// Countdown component.
#[derive(Default)]
pub struct Timer {
    /// Countdown length in seconds.
    pub duration: f32,
    /// Seconds left before expiry.
    pub remaining: f32,
    /// Behavior after firing.
    pub mode: TimerMode,
    /// Fired on expiry.
    pub on_expire: Option<TimerCallback>,
}

impl Poolable for Timer {}

impl Timer {
    /// (Re)starts the countdown.
    pub fn start(&mut self, duration: f32, mode: TimerMode) {
        self.duration = duration;
        self.remaining = duration;
        self.mode = mode;
    }

    /// Installs the expiry callback.
    pub fn on_expire(&mut self, callback: impl FnMut(&mut World, ComponentId) + 'static) {
        self.on_expire = Some(Box::new(callback));
    }
}

impl Component for Timer {
    fn update(&mut self, world: &mut World, me: ComponentId, dt: f32) {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return;
        }

        if let Some(mut callback) = self.on_expire.take() {
            callback(world, me);
            self.on_expire.get_or_insert(callback);
        }
        // The callback may have torn the timer down already
        if !world.contains(me) {
            return;
        }

        match self.mode {
            TimerMode::Repeat => {
                self.remaining = if self.duration > 0.0 {
                    self.remaining + self.duration
                } else {
                    self.duration
                };
            }
            TimerMode::Once => world.destroy(me),
            TimerMode::DestroyEntity => {
                let owner = world.entity_of(me);
                world.destroy_entity(owner);
            }
        }
    }
}
