//! # Collider
//!
//! Spatial-query component. A collider sits at its entity's position plus
//! `origin` and has one of three shapes:
//! - `None`: never overlaps anything
//! - `Rect`: an axis-aligned rectangle relative to the collider position
//! - `Grid`: a tile grid of filled/empty cells, anchored bottom-left
//!
//! Queries are linear scans over every live collider of the world.

use kestrel_core::{Component, ComponentId, Poolable, RenderSink, World};
use kestrel_shared::{Color, Mask, Point, RectI};

/// Boolean tile grid used by level geometry.
///
/// Cell `(0, 0)` is the bottom-left cell; `y` grows upward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    columns: i32,
    rows: i32,
    cell_size: i32,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is negative or the cell size is not positive.
    #[must_use]
    pub fn new(columns: i32, rows: i32, cell_size: i32) -> Self {
        assert!(
            columns >= 0 && rows >= 0 && cell_size > 0,
            "invalid grid {columns}x{rows} with cell size {cell_size}"
        );
        Self {
            columns,
            rows,
            cell_size,
            cells: vec![false; (columns * rows) as usize],
        }
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

    /// Side of one cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    #[track_caller]
    fn offset(&self, x: i32, y: i32) -> usize {
        assert!(
            (0..self.columns).contains(&x) && (0..self.rows).contains(&y),
            "grid cell ({x}, {y}) outside {}x{}",
            self.columns,
            self.rows
        );
        (y * self.columns + x) as usize
    }

    /// Whether a cell is filled.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    #[track_caller]
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> bool {
        self.cells[self.offset(x, y)]
    }

    /// Fills or clears a cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    #[track_caller]
    pub fn set_cell(&mut self, x: i32, y: i32, filled: bool) {
        let offset = self.offset(x, y);
        self.cells[offset] = filled;
    }

    /// Whether any filled cell intersects `rect` (grid-local pixels).
    /// Cells outside the grid are ignored.
    fn any_filled(&self, rect: RectI) -> bool {
        if rect.w <= 0 || rect.h <= 0 {
            return false;
        }

        let size = self.cell_size;
        let x0 = rect.left().div_euclid(size).max(0);
        let x1 = (rect.right() - 1).div_euclid(size).min(self.columns - 1);
        let y0 = rect.bottom().div_euclid(size).max(0);
        let y1 = (rect.top() - 1).div_euclid(size).min(self.rows - 1);

        (y0..=y1).any(|y| (x0..=x1).any(|x| self.cells[(y * self.columns + x) as usize]))
    }

    /// Grid extent in grid-local pixels.
    fn extent(&self) -> RectI {
        RectI::new(
            0,
            0,
            self.columns * self.cell_size,
            self.rows * self.cell_size,
        )
    }
}

/// Collision shape variants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Shape {
    /// Never overlaps.
    #[default]
    None,
    /// Rectangle relative to the collider position.
    Rect(RectI),
    /// Tile grid anchored at the collider position.
    Grid(Grid),
}

/// Spatial-query component.
///
/// # Example
///
/// ```rust,ignore
/// let mut body = world.acquire::<Collider>();
/// body.set_rect(RectI::new(0, 0, 8, 12));
/// body.mask = Mask::PLAYER;
/// let body = world.add(player, body);
///
/// let grounded = Collider::check_by(&world, body, Mask::SOLID, Point::DOWN);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Collider {
    /// Categories this collider belongs to.
    pub mask: Mask,
    /// Offset from the entity position.
    pub origin: Point,
    /// Current shape.
    pub shape: Shape,
}

impl Poolable for Collider {}

impl Collider {
    /// Rectangle collider.
    #[must_use]
    pub fn rect(rect: RectI, mask: Mask) -> Self {
        Self {
            mask,
            origin: Point::ZERO,
            shape: Shape::Rect(rect),
        }
    }

    /// Grid collider with every cell empty.
    #[must_use]
    pub fn grid(columns: i32, rows: i32, cell_size: i32, mask: Mask) -> Self {
        Self {
            mask,
            origin: Point::ZERO,
            shape: Shape::Grid(Grid::new(columns, rows, cell_size)),
        }
    }

    /// Replaces the shape with a rectangle.
    pub fn set_rect(&mut self, rect: RectI) {
        self.shape = Shape::Rect(rect);
    }

    /// The rectangle of a rect collider.
    ///
    /// # Panics
    ///
    /// Panics if the shape is not a rectangle.
    #[track_caller]
    #[must_use]
    pub fn get_rect(&self) -> RectI {
        match &self.shape {
            Shape::Rect(rect) => *rect,
            other => panic!("collider shape is {other:?}, not a rect"),
        }
    }

    #[track_caller]
    fn grid_ref(&self) -> &Grid {
        match &self.shape {
            Shape::Grid(grid) => grid,
            _ => panic!("collider shape is not a grid"),
        }
    }

    /// Whether a grid cell is filled.
    ///
    /// # Panics
    ///
    /// Panics if the shape is not a grid or the cell is out of bounds.
    #[track_caller]
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> bool {
        self.grid_ref().cell(x, y)
    }

    /// Fills or clears a grid cell.
    ///
    /// # Panics
    ///
    /// Panics if the shape is not a grid or the cell is out of bounds.
    #[track_caller]
    pub fn set_cell(&mut self, x: i32, y: i32, filled: bool) {
        match &mut self.shape {
            Shape::Grid(grid) => grid.set_cell(x, y, filled),
            _ => panic!("collider shape is not a grid"),
        }
    }

    /// World-space anchor of this collider.
    #[must_use]
    pub fn position(&self, world: &World, me: ComponentId) -> Point {
        world.entity(world.entity_of(me)).position + self.origin
    }

    /// World-space bounding box, `None` for the empty shape.
    #[must_use]
    pub fn bounds(&self, world: &World, me: ComponentId) -> Option<RectI> {
        let position = self.position(world, me);
        match &self.shape {
            Shape::None => None,
            Shape::Rect(rect) => Some(rect.translate(position)),
            Shape::Grid(grid) => Some(grid.extent().translate(position)),
        }
    }

    /// Whether this collider, at its position shifted by `offset`, overlaps
    /// any other collider whose mask intersects `mask`.
    #[must_use]
    pub fn check(&self, world: &World, me: ComponentId, mask: Mask, offset: Point) -> bool {
        self.first_hit(world, me, mask, offset).is_some()
    }

    /// First collider (alive-list order) that [`Collider::check`] would hit.
    #[must_use]
    pub fn first_hit(
        &self,
        world: &World,
        me: ComponentId,
        mask: Mask,
        offset: Point,
    ) -> Option<ComponentId> {
        let position = self.position(world, me) + offset;
        world
            .iter::<Collider>()
            .filter(|(id, other)| *id != me && other.mask.intersects(mask))
            .find(|(id, other)| {
                overlaps(&self.shape, position, &other.shape, other.position(world, *id))
            })
            .map(|(id, _)| id)
    }

    /// Whether this collider, shifted by `offset`, overlaps `other`.
    #[must_use]
    pub fn overlaps_with(
        &self,
        world: &World,
        me: ComponentId,
        other: ComponentId,
        offset: Point,
    ) -> bool {
        if other == me {
            return false;
        }
        world.get::<Collider>(other).is_some_and(|target| {
            overlaps(
                &self.shape,
                self.position(world, me) + offset,
                &target.shape,
                target.position(world, other),
            )
        })
    }

    /// [`Collider::check`] by id. A destroyed or checked-out collider hits
    /// nothing.
    #[must_use]
    pub fn check_by(world: &World, id: ComponentId, mask: Mask, offset: Point) -> bool {
        world
            .get::<Collider>(id)
            .is_some_and(|collider| collider.check(world, id, mask, offset))
    }

    /// [`Collider::first_hit`] by id.
    #[must_use]
    pub fn first_hit_by(
        world: &World,
        id: ComponentId,
        mask: Mask,
        offset: Point,
    ) -> Option<ComponentId> {
        world
            .get::<Collider>(id)
            .and_then(|collider| collider.first_hit(world, id, mask, offset))
    }

    fn debug_color(&self) -> Color {
        if self.mask.intersects(Mask::SOLID) {
            Color::RED
        } else if self.mask.intersects(Mask::JUMPTHRU) {
            Color::YELLOW
        } else {
            Color::GREEN
        }
    }
}

impl Component for Collider {
    fn debug_render(&self, world: &World, me: ComponentId, sink: &mut dyn RenderSink) {
        let position = self.position(world, me);
        let color = self.debug_color();
        match &self.shape {
            Shape::None => {}
            Shape::Rect(rect) => sink.rect_line(rect.translate(position), color),
            Shape::Grid(grid) => {
                let size = grid.cell_size;
                for y in 0..grid.rows {
                    for x in 0..grid.columns {
                        if grid.cell(x, y) {
                            let cell = RectI::new(x * size, y * size, size, size);
                            sink.rect_line(cell.translate(position), color);
                        }
                    }
                }
            }
        }
    }
}

/// Overlap between two placed shapes.
fn overlaps(a: &Shape, a_position: Point, b: &Shape, b_position: Point) -> bool {
    match (a, b) {
        (Shape::Rect(a), Shape::Rect(b)) => {
            a.translate(a_position).overlaps(b.translate(b_position))
        }
        (Shape::Rect(rect), Shape::Grid(grid)) => {
            grid.any_filled(rect.translate(a_position - b_position))
        }
        (Shape::Grid(grid), Shape::Rect(rect)) => {
            grid.any_filled(rect.translate(b_position - a_position))
        }
        _ => false,
    }
}
