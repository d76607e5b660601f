//! # Rooms
//!
//! A room descriptor is plain data produced by an external map tool and
//! stored as TOML. Instantiating it builds the static geometry (tile grid,
//! barriers, one-way platforms), the moving platforms, and hands every
//! spawn point to a [`SpawnFactory`].
//!
//! ## Layout
//!
//! `tiles` and `solid` are row-major and list the **top** row first, the way
//! the file reads. In the world, row 0 is the bottom row: the first row of
//! the file lands at `y = (height - 1) * tile_size`.
//!
//! ```toml
//! width = 4
//! height = 2
//! tile_size = 8
//! tiles = [-1, -1, -1, -1,
//!           0,  1,  1,  2]
//! solid = [false, false, false, false,
//!          true,  true,  true,  true]
//!
//! [[spawns]]
//! tag = "player"
//! x = 8
//! y = 8
//! ```

use std::fs;
use std::path::Path;

use kestrel_core::{EntityId, TextureId, World};
use kestrel_shared::{Mask, Point, RectI};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RoomError, RoomResult};
use crate::physics::{Collider, Grid, Shape};
use crate::spawn;
use crate::tilemap::Tilemap;

/// Largest number of cells a room may hold.
pub const MAX_ROOM_CELLS: usize = 1 << 22;

fn default_tile_size() -> u32 {
    8
}

/// `cells * tile_size` when it fits in world pixels.
fn pixel_extent(cells: u32, tile_size: u32) -> Option<i32> {
    cells
        .checked_mul(tile_size)
        .and_then(|pixels| i32::try_from(pixels).ok())
}

/// A tagged spawn point, in world pixels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// What to spawn; interpreted by the [`SpawnFactory`].
    pub tag: String,
    /// X position.
    pub x: i32,
    /// Y position (up is positive).
    pub y: i32,
}

impl SpawnPoint {
    /// Position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A moving platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    /// Collision rectangle relative to the platform position.
    pub rect: RectI,
    /// Path; the platform starts at the first point and travels to the last.
    pub waypoints: Vec<Point>,
    /// Change of the path parameter per second.
    #[serde(default)]
    pub speed: f32,
}

/// Serializable description of a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomDescriptor {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Side of one tile in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Texture handle per cell, `-1` for empty. May be omitted.
    #[serde(default)]
    pub tiles: Vec<i32>,
    /// Solidity per cell. May be omitted.
    #[serde(default)]
    pub solid: Vec<bool>,
    /// Spawn points.
    #[serde(default)]
    pub spawns: Vec<SpawnPoint>,
    /// Extra solid rectangles, in world pixels.
    #[serde(default)]
    pub barriers: Vec<RectI>,
    /// One-way platforms, in world pixels.
    #[serde(default)]
    pub jumpthrus: Vec<RectI>,
    /// Moving platforms.
    #[serde(default)]
    pub platforms: Vec<PlatformDescriptor>,
}

impl RoomDescriptor {
    /// Parses and validates a descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the room is invalid.
    pub fn from_toml_str(source: &str) -> RoomResult<Self> {
        let descriptor: Self = toml::from_str(source)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Reads, parses and validates a descriptor file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> RoomResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| RoomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks layer sizes, tile values, rectangles and platform paths.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> RoomResult<()> {
        if self.width == 0 || self.height == 0 || self.tile_size == 0 {
            return Err(RoomError::EmptyRoom {
                width: self.width,
                height: self.height,
                tile_size: self.tile_size,
            });
        }

        let fits = pixel_extent(self.width, self.tile_size).is_some()
            && pixel_extent(self.height, self.tile_size).is_some()
            && self.cell_count() <= MAX_ROOM_CELLS;
        if !fits {
            return Err(RoomError::TooLarge {
                width: self.width,
                height: self.height,
                tile_size: self.tile_size,
            });
        }

        let expected = self.cell_count();
        for (layer, actual) in [("tiles", self.tiles.len()), ("solid", self.solid.len())] {
            if actual != 0 && actual != expected {
                return Err(RoomError::LayerSize {
                    layer,
                    expected,
                    actual,
                });
            }
        }

        if let Some((index, &value)) = self.tiles.iter().enumerate().find(|(_, v)| **v < -1) {
            return Err(RoomError::InvalidTile { index, value });
        }

        let layers = [
            ("barrier", &self.barriers),
            ("jumpthru", &self.jumpthrus),
        ];
        for (layer, rects) in layers {
            if let Some(index) = rects.iter().position(|r| r.w <= 0 || r.h <= 0) {
                return Err(RoomError::EmptyRect { layer, index });
            }
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            if platform.waypoints.is_empty() {
                return Err(RoomError::EmptyWaypoints { index });
            }
            if platform.rect.w <= 0 || platform.rect.h <= 0 {
                return Err(RoomError::EmptyRect {
                    layer: "platform",
                    index,
                });
            }
        }

        Ok(())
    }

    /// World-space cell coordinates of a row-major index.
    fn cell(&self, index: usize) -> (i32, i32) {
        let width = self.width as usize;
        let x = (index % width) as i32;
        let y = (self.height as usize - 1 - index / width) as i32;
        (x, y)
    }
}

/// Creates the entities of room spawn points.
pub trait SpawnFactory {
    /// Spawns `tag` at `position`. Returns `None` for tags this factory does
    /// not know; the room logs and skips them.
    fn spawn(&mut self, world: &mut World, tag: &str, position: Point) -> Option<EntityId>;
}

impl<F> SpawnFactory for F
where
    F: FnMut(&mut World, &str, Point) -> Option<EntityId>,
{
    fn spawn(&mut self, world: &mut World, tag: &str, position: Point) -> Option<EntityId> {
        self(world, tag, position)
    }
}

/// Entities created by [`Room::instantiate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomInstance {
    /// Entity holding the tile grid collider and the tilemap.
    pub geometry: Option<EntityId>,
    /// Barrier entities.
    pub barriers: Vec<EntityId>,
    /// One-way platform entities.
    pub jumpthrus: Vec<EntityId>,
    /// Moving platform entities.
    pub platforms: Vec<EntityId>,
    /// Entities returned by the spawn factory.
    pub spawned: Vec<EntityId>,
    /// Spawn tags the factory did not know.
    pub skipped: Vec<String>,
}

/// A validated room, ready to instantiate any number of times.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    descriptor: RoomDescriptor,
}

impl Room {
    /// Wraps a descriptor after validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is invalid.
    pub fn new(descriptor: RoomDescriptor) -> RoomResult<Self> {
        descriptor.validate()?;
        Ok(Self { descriptor })
    }

    /// Loads a room from TOML source.
    ///
    /// # Errors
    ///
    /// See [`RoomDescriptor::from_toml_str`].
    pub fn from_toml_str(source: &str) -> RoomResult<Self> {
        RoomDescriptor::from_toml_str(source).map(|descriptor| Self { descriptor })
    }

    /// Loads a room file.
    ///
    /// # Errors
    ///
    /// See [`RoomDescriptor::from_path`].
    pub fn from_path(path: impl AsRef<Path>) -> RoomResult<Self> {
        let path = path.as_ref();
        let room = RoomDescriptor::from_path(path).map(|descriptor| Self { descriptor })?;
        info!(
            path = %path.display(),
            width = room.descriptor.width,
            height = room.descriptor.height,
            "room loaded"
        );
        Ok(room)
    }

    /// The underlying descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &RoomDescriptor {
        &self.descriptor
    }

    /// Room size in pixels.
    #[must_use]
    pub fn bounds(&self) -> RectI {
        let d = &self.descriptor;
        // `validate` guarantees both extents fit
        let extent = |cells| pixel_extent(cells, d.tile_size).unwrap_or(i32::MAX);
        RectI::new(0, 0, extent(d.width), extent(d.height))
    }

    /// Builds the room inside `world`.
    ///
    /// Creates, in order: the geometry entity (solid grid collider and
    /// tilemap), barriers, jumpthrus, moving platforms, then every spawn
    /// point through `factory`.
    ///
    /// # Panics
    ///
    /// Panics if `world` lacks a built-in component kind the room needs.
    pub fn instantiate(&self, world: &mut World, factory: &mut dyn SpawnFactory) -> RoomInstance {
        let d = &self.descriptor;
        let mut instance = RoomInstance {
            geometry: self.build_geometry(world),
            ..RoomInstance::default()
        };

        for rect in &d.barriers {
            instance.barriers.push(static_rect(world, *rect, Mask::SOLID));
        }
        for rect in &d.jumpthrus {
            instance.jumpthrus.push(static_rect(world, *rect, Mask::JUMPTHRU));
        }

        for platform in &d.platforms {
            let start = platform.waypoints[0];
            let entity = world.add_entity_at(start);
            spawn::solid(
                world,
                entity,
                platform.rect,
                &platform.waypoints,
                platform.speed,
            );
            instance.platforms.push(entity);
        }

        for point in &d.spawns {
            match factory.spawn(world, &point.tag, point.position()) {
                Some(entity) => instance.spawned.push(entity),
                None => {
                    warn!(tag = %point.tag, x = point.x, y = point.y, "unknown spawn tag, skipped");
                    instance.skipped.push(point.tag.clone());
                }
            }
        }

        debug!(
            barriers = instance.barriers.len(),
            jumpthrus = instance.jumpthrus.len(),
            platforms = instance.platforms.len(),
            spawned = instance.spawned.len(),
            skipped = instance.skipped.len(),
            "room instantiated"
        );
        instance
    }

    fn build_geometry(&self, world: &mut World) -> Option<EntityId> {
        let d = &self.descriptor;
        let has_solid = d.solid.iter().any(|&cell| cell);
        let has_tiles = d.tiles.iter().any(|&tile| tile >= 0);
        if !has_solid && !has_tiles {
            return None;
        }

        let (columns, rows, size) = (d.width as i32, d.height as i32, d.tile_size as i32);
        let entity = world.add_entity();

        if has_solid {
            let mut grid = world.acquire::<Collider>();
            grid.shape = Shape::Grid(Grid::new(columns, rows, size));
            grid.mask = Mask::SOLID;
            for (index, _) in d.solid.iter().enumerate().filter(|&(_, &cell)| cell) {
                let (x, y) = d.cell(index);
                grid.set_cell(x, y, true);
            }
            world.add(entity, grid);
        }

        if has_tiles {
            let mut tilemap = world.acquire::<Tilemap>();
            tilemap.resize(columns, rows, size);
            for (index, &tile) in d.tiles.iter().enumerate() {
                if tile >= 0 {
                    let (x, y) = d.cell(index);
                    tilemap.set(x, y, Some(TextureId(tile as u32)));
                }
            }
            world.add(entity, tilemap);
        }

        Some(entity)
    }
}

/// Entity at the rect's corner with a same-sized collider.
fn static_rect(world: &mut World, rect: RectI, mask: Mask) -> EntityId {
    let entity = world.add_entity_at(rect.position());
    spawn::collider(world, entity, RectI::new(0, 0, rect.w, rect.h), mask);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        width = 3
        height = 2
        tiles = [-1, 4, -1,
                  1, 1,  1]
        solid = [false, false, false,
                 true,  true,  true]
    "#;

    #[test]
    fn test_defaults_and_layers() {
        let room = RoomDescriptor::from_toml_str(SMALL).unwrap();
        assert_eq!(room.tile_size, 8);
        assert!(room.spawns.is_empty());
        assert_eq!(room.cell(0), (0, 1));
        assert_eq!(room.cell(4), (1, 0));
    }

    #[test]
    fn test_layer_size_mismatch() {
        let err = RoomDescriptor::from_toml_str("width = 2\nheight = 2\nsolid = [true]").unwrap_err();
        assert!(matches!(
            err,
            RoomError::LayerSize {
                layer: "solid",
                expected: 4,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_invalid_values() {
        let err = RoomDescriptor::from_toml_str("width = 1\nheight = 1\ntiles = [-2]").unwrap_err();
        assert!(matches!(err, RoomError::InvalidTile { index: 0, value: -2 }));

        let err = RoomDescriptor::from_toml_str("width = 0\nheight = 1").unwrap_err();
        assert!(matches!(err, RoomError::EmptyRoom { .. }));

        let source = r#"
            width = 1
            height = 1
            [[platforms]]
            rect = { x = 0, y = 0, w = 8, h = 2 }
            waypoints = []
        "#;
        let err = RoomDescriptor::from_toml_str(source).unwrap_err();
        assert!(matches!(err, RoomError::EmptyWaypoints { index: 0 }));

        let err = RoomDescriptor::from_toml_str("width = ").unwrap_err();
        assert!(matches!(err, RoomError::Parse(_)));
    }

    #[test]
    fn test_oversized_rooms_are_rejected() {
        // 2^28 tiles of 8px is one past i32::MAX pixels
        let wide = format!("width = {}\nheight = 1", 1_u32 << 28);
        let err = RoomDescriptor::from_toml_str(&wide).unwrap_err();
        assert!(matches!(err, RoomError::TooLarge { tile_size: 8, .. }));

        // Pixel width overflows u32
        let tall = format!("width = 1\nheight = {}\ntile_size = 16", 1_u32 << 30);
        let err = RoomDescriptor::from_toml_str(&tall).unwrap_err();
        assert!(matches!(err, RoomError::TooLarge { width: 1, .. }));

        let crowded = "width = 4096\nheight = 2048\ntile_size = 1";
        let err = RoomDescriptor::from_toml_str(crowded).unwrap_err();
        assert!(matches!(err, RoomError::TooLarge { .. }));
    }

    #[test]
    fn test_largest_room_bounds() {
        let source = "width = 2048\nheight = 2048";
        let room = Room::from_toml_str(source).expect("room at the cell limit");
        assert_eq!(room.descriptor().cell_count(), MAX_ROOM_CELLS);
        assert_eq!(room.bounds(), RectI::new(0, 0, 16384, 16384));
    }
}
