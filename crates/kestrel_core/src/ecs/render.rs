//! # Render Sinks
//!
//! Components draw through a [`RenderSink`]; the backend behind it (sprite
//! batcher, debug shape renderer) lives outside the runtime.

use kestrel_shared::{Color, Point, RectI};

/// Opaque handle to an image owned by the asset system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Drawing surface handed to components during render passes.
pub trait RenderSink {
    /// Draws an image with its bottom-left corner at `position`.
    fn texture(&mut self, texture: TextureId, position: Point, flip_x: bool);

    /// Fills a rectangle.
    fn rect(&mut self, rect: RectI, color: Color);

    /// Outlines a rectangle.
    fn rect_line(&mut self, rect: RectI, color: Color);
}

/// One recorded draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    /// See [`RenderSink::texture`].
    Texture {
        /// Image handle.
        texture: TextureId,
        /// Bottom-left corner.
        position: Point,
        /// Horizontal mirror.
        flip_x: bool,
    },
    /// See [`RenderSink::rect`].
    Rect {
        /// Filled area.
        rect: RectI,
        /// Fill color.
        color: Color,
    },
    /// See [`RenderSink::rect_line`].
    RectLine {
        /// Outlined area.
        rect: RectI,
        /// Line color.
        color: Color,
    },
}

/// A sink that records draw calls in order.
///
/// Used by headless runs and tests; a real backend replays the list.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    /// Recorded calls, in submission order.
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forgets every recorded call, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSink for DrawList {
    fn texture(&mut self, texture: TextureId, position: Point, flip_x: bool) {
        self.commands.push(DrawCommand::Texture {
            texture,
            position,
            flip_x,
        });
    }

    fn rect(&mut self, rect: RectI, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn rect_line(&mut self, rect: RectI, color: Color) {
        self.commands.push(DrawCommand::RectLine { rect, color });
    }
}
