// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dungeon map rendering.
//!
//! Map text arrives as a grid of symbolic glyphs. The [`grid`] parser indexes it, the
//! [`shapes`] rule engine turns glyph neighbourhoods into drawing primitives, and the
//! [`projector`] scales and centers those primitives onto a [`Surface`], usually a braille
//! [`Raster`].

#[cfg(test)]
pub(crate) mod fixtures;
pub mod grid;
pub mod projector;
pub mod raster;
pub mod shapes;

use tiny_skia::{Path, Point, Transform};

pub use grid::{Grid, BLANK};
pub use projector::{render_map, Projection};
pub use raster::{Raster, RasterError, MAX_DOT_SIDE};
pub use shapes::{primitives, ArrowStyle, Block, Brush, Direction, LinkAxis, Primitive, Shape};

pub const ROOM_TOP_LEFT: char = '╭';
pub const ROOM_BOTTOM_RIGHT: char = '╯';
pub const ROOM_OCCUPIED: char = '╳';
pub const LINK_HORIZONTAL: char = '↔';
pub const LINK_VERTICAL: char = '↕';

/// Renders map text onto a fresh raster of `columns` x `rows` braille cells.
pub fn render_braille(text: &str, columns: usize, rows: usize) -> Result<String, RasterError> {
    let mut raster = Raster::for_cells(columns, rows)?;
    render_map(&Grid::parse(text), &mut raster);
    Ok(raster.to_braille_string())
}

/// What a dot was painted with. Later variants win when both land on the same dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ink {
    /// The reference grid drawn beneath the map.
    Grid,
    /// Rooms, links and arrows.
    Map,
}

/// A drawing target in device units (dots, pixels).
///
/// Paths arrive in local units together with the transform that projects them, the way a
/// 2-D canvas context draws.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Erases everything and drops the clip.
    fn clear(&mut self);

    fn stroke(&mut self, path: &Path, transform: Transform, ink: Ink);
    fn fill(&mut self, path: &Path, transform: Transform, ink: Ink);

    /// Restricts later drawing to the device rectangle spanned by `min` and `max`.
    fn clip(&mut self, min: Point, max: Point);
}
