//! # KESTREL Game Loop
//!
//! Fixed-timestep frame driver:
//! ```text
//! Frame N:
//! 1. ACCUMULATE  clamp the real frame delta, add it to the accumulator
//! 2. UPDATE      run World::update(timestep) while a whole step is banked
//! 3. RENDER      World::render, then World::debug_render when enabled
//! 4. RECORD      frame statistics, warn on frames over budget
//! ```

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use kestrel_core::{RenderSink, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::physics::Mover;

/// Frame time budget before a frame is reported as slow.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Configuration for the game loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameLoopConfig {
    /// Simulation step in seconds.
    pub timestep: f32,
    /// Largest real frame delta accepted, in seconds. Longer frames (pauses,
    /// debugger stops) are clamped so the simulation does not spiral.
    pub max_frame_delta: f32,
    /// Updates allowed per frame before banked time is dropped.
    pub max_updates_per_frame: u32,
    /// Run the debug render pass after the regular one.
    pub debug_render: bool,
    /// Gravity given to movers spawned with the defaults.
    pub gravity: f32,
    /// Friction given to movers spawned with the defaults.
    pub friction: f32,
    /// Log frame timing.
    pub enable_timing_logs: bool,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            max_frame_delta: 0.1,
            max_updates_per_frame: 5,
            debug_render: false,
            gravity: -450.0,
            friction: 800.0,
            enable_timing_logs: false,
        }
    }
}

impl GameLoopConfig {
    /// Parses and validates a config. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.timestep > 0.0 && self.timestep.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "timestep",
                reason: format!("must be a positive number of seconds, got {}", self.timestep),
            });
        }
        if self.max_frame_delta < self.timestep {
            return Err(ConfigError::Invalid {
                field: "max_frame_delta",
                reason: format!(
                    "must be at least one timestep ({}), got {}",
                    self.timestep, self.max_frame_delta
                ),
            });
        }
        if self.max_updates_per_frame == 0 {
            return Err(ConfigError::Invalid {
                field: "max_updates_per_frame",
                reason: "must allow at least one update".to_string(),
            });
        }
        if self.friction < 0.0 {
            return Err(ConfigError::Invalid {
                field: "friction",
                reason: format!("must not be negative, got {}", self.friction),
            });
        }
        Ok(())
    }

    /// Applies the default gravity and friction to a mover.
    pub fn apply_to(&self, mover: &mut Mover) {
        mover.gravity = self.gravity;
        mover.friction = self.friction;
    }
}

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Simulation steps run this frame.
    pub updates: u32,
    /// Time spent in updates, in microseconds.
    pub update_us: u64,
    /// Time spent in render passes, in microseconds.
    pub render_us: u64,
    /// Live entities at the end of the frame.
    pub entities: usize,
}

impl FrameStats {
    /// Update plus render time, in microseconds.
    #[must_use]
    pub const fn total_us(&self) -> u64 {
        self.update_us + self.render_us
    }
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Total simulation steps.
    pub updates: u64,
    /// Sum of frame times.
    pub total_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded [`MAX_FRAME_TIME`].
    pub frames_over_budget: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_recorded: 0,
            updates: 0,
            total_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        let total = stats.total_us();
        self.frames_recorded += 1;
        self.updates += u64::from(stats.updates);
        self.total_us_sum += total;
        self.min_frame_us = self.min_frame_us.min(total);
        self.max_frame_us = self.max_frame_us.max(total);
        if total > MAX_FRAME_TIME.as_micros() as u64 {
            self.frames_over_budget += 1;
        }
    }

    /// Average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Logs a summary at debug level.
    pub fn log_summary(&self) {
        debug!(
            frames = self.frames_recorded,
            updates = self.updates,
            avg_ms = self.avg_frame_ms(),
            min_us = if self.frames_recorded == 0 { 0 } else { self.min_frame_us },
            max_us = self.max_frame_us,
            over_budget = self.frames_over_budget,
            "frame statistics"
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// The frame driver. Owns the world of the current room.
pub struct GameLoop {
    world: World,
    config: GameLoopConfig,
    /// Banked simulation time, in seconds.
    accumulator: f32,
    frame_count: u64,
    stats: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a game loop around `world`.
    #[must_use]
    pub fn new(world: World, config: GameLoopConfig) -> Self {
        Self {
            world,
            config,
            accumulator: 0.0,
            frame_count: 0,
            stats: FrameStatsAccumulator::new(),
        }
    }

    /// Runs one frame of `frame_delta` real seconds.
    ///
    /// Returns the statistics of the frame.
    pub fn frame(&mut self, frame_delta: f32, sink: &mut dyn RenderSink) -> FrameStats {
        self.accumulator += frame_delta.clamp(0.0, self.config.max_frame_delta);

        let update_start = Instant::now();
        let mut updates = 0;
        while self.accumulator >= self.config.timestep {
            if updates == self.config.max_updates_per_frame {
                // Too far behind: drop the backlog rather than spiral
                self.accumulator = 0.0;
                break;
            }
            self.world.update(self.config.timestep);
            self.accumulator -= self.config.timestep;
            updates += 1;
        }
        let update_us = update_start.elapsed().as_micros() as u64;

        let render_start = Instant::now();
        self.world.render(sink);
        if self.config.debug_render {
            self.world.debug_render(sink);
        }
        let render_us = render_start.elapsed().as_micros() as u64;

        let stats = FrameStats {
            frame: self.frame_count,
            updates,
            update_us,
            render_us,
            entities: self.world.entity_count(),
        };
        self.end_frame(stats);
        stats
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats.record(stats);

        if self.config.enable_timing_logs && stats.total_us() > MAX_FRAME_TIME.as_micros() as u64 {
            warn!(
                frame = stats.frame,
                total_ms = stats.total_us() as f64 / 1000.0,
                budget_ms = MAX_FRAME_TIME.as_secs_f64() * 1000.0,
                "frame exceeded budget"
            );
        }
    }

    /// Number of frames run.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &GameLoopConfig {
        &self.config
    }

    /// Accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// The simulated world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The simulated world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Gives the world back, e.g. to tear the room down.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::DrawList;

    #[test]
    fn test_config_defaults_and_partial_toml() {
        let config = GameLoopConfig::from_toml_str("debug_render = true\ngravity = -300.0").unwrap();
        assert!(config.debug_render);
        assert_eq!(config.gravity, -300.0);
        assert_eq!(config.timestep, GameLoopConfig::default().timestep);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = GameLoopConfig::from_toml_str("timestep = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "timestep", .. }));

        let err = GameLoopConfig::from_toml_str("timestep = 0.5\nmax_frame_delta = 0.1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_frame_delta", .. }));

        let err = GameLoopConfig::from_toml_str("timestep = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_fixed_timestep_banks_time() {
        let config = GameLoopConfig {
            timestep: 0.25,
            max_frame_delta: 1.0,
            ..GameLoopConfig::default()
        };
        let world = World::new(crate::registry());
        let mut game_loop = GameLoop::new(world, config);
        let mut sink = DrawList::new();

        assert_eq!(game_loop.frame(0.125, &mut sink).updates, 0);
        assert_eq!(game_loop.frame(0.125, &mut sink).updates, 1);
        assert_eq!(game_loop.frame(0.5, &mut sink).updates, 2);
        assert_eq!(game_loop.frame_count(), 3);
        assert_eq!(game_loop.stats().updates, 3);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let config = GameLoopConfig {
            timestep: 0.25,
            max_frame_delta: 0.5,
            ..GameLoopConfig::default()
        };
        let mut game_loop = GameLoop::new(World::new(crate::registry()), config);
        let mut sink = DrawList::new();

        assert_eq!(game_loop.frame(10.0, &mut sink).updates, 2);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new();
        for i in 0..10 {
            acc.record(FrameStats {
                frame: i,
                updates: 1,
                update_us: 1_000,
                render_us: 1_000,
                entities: 0,
            });
        }
        acc.record(FrameStats {
            frame: 10,
            updates: 1,
            update_us: 40_000,
            render_us: 0,
            entities: 0,
        });

        assert_eq!(acc.frames_recorded, 11);
        assert_eq!(acc.frames_over_budget, 1);
        assert_eq!(acc.min_frame_us, 2_000);
        assert_eq!(acc.max_frame_us, 40_000);
    }
}
