//! # Tilemap
//!
//! Per-cell texture grid drawn behind the actors of a room.

use kestrel_core::{Component, ComponentId, Poolable, RenderSink, TextureId, World};
use kestrel_shared::Point;

/// Render depth of room tiles; lower draws first.
pub const TILEMAP_DEPTH: i32 = -100;

/// Grid of optional texture handles, anchored at the entity position.
///
/// Cell `(0, 0)` is the bottom-left cell.
#[derive(Clone, Debug, Default)]
pub struct Tilemap {
    columns: i32,
    rows: i32,
    tile_size: i32,
    tiles: Vec<Option<TextureId>>,
}

impl Poolable for Tilemap {
    fn reset(&mut self) {
        self.columns = 0;
        self.rows = 0;
        self.tile_size = 0;
        self.tiles.clear();
    }
}

impl Tilemap {
    /// Creates an empty tilemap.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is negative or the tile size is not positive.
    #[must_use]
    pub fn new(columns: i32, rows: i32, tile_size: i32) -> Self {
        let mut tilemap = Self::default();
        tilemap.resize(columns, rows, tile_size);
        tilemap
    }

    /// Clears every cell and changes the dimensions.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is negative or the tile size is not positive.
    pub fn resize(&mut self, columns: i32, rows: i32, tile_size: i32) {
        assert!(
            columns >= 0 && rows >= 0 && tile_size > 0,
            "invalid tilemap {columns}x{rows} with tile size {tile_size}"
        );
        self.columns = columns;
        self.rows = rows;
        self.tile_size = tile_size;
        self.tiles.clear();
        self.tiles.resize((columns * rows) as usize, None);
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    #[track_caller]
    fn offset(&self, x: i32, y: i32) -> usize {
        assert!(
            (0..self.columns).contains(&x) && (0..self.rows).contains(&y),
            "tile ({x}, {y}) outside {}x{}",
            self.columns,
            self.rows
        );
        (y * self.columns + x) as usize
    }

    /// Texture of a cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the map.
    #[track_caller]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<TextureId> {
        self.tiles[self.offset(x, y)]
    }

    /// Sets or clears the texture of a cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the map.
    #[track_caller]
    pub fn set(&mut self, x: i32, y: i32, texture: Option<TextureId>) {
        let offset = self.offset(x, y);
        self.tiles[offset] = texture;
    }
}

impl Component for Tilemap {
    fn initial_depth(&self) -> i32 {
        TILEMAP_DEPTH
    }

    fn render(&self, world: &World, me: ComponentId, sink: &mut dyn RenderSink) {
        let origin = world.entity(world.entity_of(me)).position;
        for y in 0..self.rows {
            for x in 0..self.columns {
                if let Some(texture) = self.tiles[(y * self.columns + x) as usize] {
                    let cell = Point::new(x * self.tile_size, y * self.tile_size);
                    sink.texture(texture, origin + cell, false);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut tilemap = Tilemap::new(3, 2, 8);
        tilemap.set(2, 1, Some(TextureId(4)));

        assert_eq!(tilemap.get(2, 1), Some(TextureId(4)));
        assert_eq!(tilemap.get(0, 0), None);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_panics() {
        let tilemap = Tilemap::new(3, 2, 8);
        let _ = tilemap.get(0, 2);
    }
}
