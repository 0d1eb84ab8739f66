// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Glyph-adjacency rules that turn map text into drawing primitives.
//!
//! The map is tiled in 4x4 blocks whose centers sit at `-2, 2, 6, ...` on both axes. A room
//! occupies the 3x3 cells around its block center; the cell between two rooms carries link
//! glyphs and the cells on a room's rim carry exit arrows. Each rule only looks at a fixed
//! offset from its block center, so a glyph can only ever affect the block it belongs to.

use tiny_skia::{Path, PathBuilder, Transform};

use super::grid::Grid;
use super::{LINK_HORIZONTAL, LINK_VERTICAL, ROOM_BOTTOM_RIGHT, ROOM_OCCUPIED, ROOM_TOP_LEFT};

pub const BLOCK_STRIDE: i32 = 4;
pub const FIRST_BLOCK_CENTER: i32 = -2;

/// Arrowhead depth and half-width.
const ARROW_HEAD: f32 = 0.4;
const ARROW_START: f32 = 1.0;
const ARROW_END: f32 = 1.5;
const DOUBLE_ARROW_GAP: f32 = 0.2;
const LINK_END: f32 = 3.0;

/// Exit directions present in the map alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    South,
    North,
    NorthEast,
    SouthWest,
}

impl Direction {
    /// Rule evaluation order.
    pub const ALL: [Self; 6] =
        [Self::East, Self::West, Self::South, Self::North, Self::NorthEast, Self::SouthWest];

    /// Rotation in degrees applied to the canonical east-pointing template (y axis down,
    /// so positive angles turn clockwise on screen).
    ///
    /// The diagonals use 315° and 135°.
    pub fn degrees(self) -> f32 {
        match self {
            Self::East => 0.0,
            Self::West => 180.0,
            Self::South => 90.0,
            Self::North => 270.0,
            Self::NorthEast => 315.0,
            Self::SouthWest => 135.0,
        }
    }

    /// Cell holding this direction's arrow glyph, relative to the block center.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::South => (0, 1),
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::SouthWest => (-1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowStyle {
    /// Exit to a known room.
    Single,
    /// Exit leaving the current zone.
    Double,
    /// Exit to a room not yet visited.
    Dotted,
}

impl ArrowStyle {
    pub const ALL: [Self; 3] = [Self::Single, Self::Double, Self::Dotted];

    pub fn glyph(self, direction: Direction) -> char {
        match (self, direction) {
            (Self::Single, Direction::East) => '→',
            (Self::Single, Direction::West) => '←',
            (Self::Single, Direction::South) => '↓',
            (Self::Single, Direction::North) => '↑',
            (Self::Single, Direction::NorthEast) => '↗',
            (Self::Single, Direction::SouthWest) => '↙',
            (Self::Double, Direction::East) => '⇒',
            (Self::Double, Direction::West) => '⇐',
            (Self::Double, Direction::South) => '⇓',
            (Self::Double, Direction::North) => '⇑',
            (Self::Double, Direction::NorthEast) => '⇗',
            (Self::Double, Direction::SouthWest) => '⇙',
            (Self::Dotted, Direction::East) => '⇢',
            (Self::Dotted, Direction::West) => '⇠',
            (Self::Dotted, Direction::South) => '⇣',
            (Self::Dotted, Direction::North) => '⇡',
            (Self::Dotted, Direction::NorthEast) => '⤴',
            (Self::Dotted, Direction::SouthWest) => '⤶',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkAxis {
    /// Towards the room on the right.
    Horizontal,
    /// Towards the room below.
    Vertical,
}

/// Grid cell at the center of a 4x4 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    RoomOutline { at: Block },
    RoomFill { at: Block },
    Connector { at: Block, axis: LinkAxis },
    Arrow { at: Block, style: ArrowStyle, direction: Direction },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    Stroke,
    Fill,
}

/// One path to paint, in block-local units (block center at the origin).
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub brush: Brush,
    pub path: Path,
}

impl Shape {
    fn new(brush: Brush, path: Option<Path>) -> Option<Self> {
        path.map(|path| Self { brush, path })
    }
}

impl Primitive {
    pub fn block(&self) -> Block {
        match *self {
            Self::RoomOutline { at }
            | Self::RoomFill { at }
            | Self::Connector { at, .. }
            | Self::Arrow { at, .. } => at,
        }
    }

    /// Geometry relative to the block center, one grid cell per unit.
    pub fn shapes(&self) -> Vec<Shape> {
        let shape = match *self {
            Self::RoomOutline { .. } => Shape::new(Brush::Stroke, room_path()),
            Self::RoomFill { .. } => Shape::new(Brush::Fill, room_path()),
            Self::Connector { axis: LinkAxis::Horizontal, .. } => {
                Shape::new(Brush::Stroke, segment((1.0, 0.0), (LINK_END, 0.0)))
            }
            Self::Connector { axis: LinkAxis::Vertical, .. } => {
                Shape::new(Brush::Stroke, segment((0.0, 1.0), (0.0, LINK_END)))
            }
            Self::Arrow { style, direction, .. } => {
                let rotation = Transform::from_rotate(direction.degrees());
                return arrow_template(style)
                    .into_iter()
                    .filter_map(|shape| Shape::new(shape.brush, shape.path.transform(rotation)))
                    .collect();
            }
        };
        shape.into_iter().collect()
    }
}

/// Block centers along one axis for a grid of `size` rows.
pub fn block_centers(size: usize) -> impl Iterator<Item = i32> {
    let limit = i32::try_from(size).unwrap_or(i32::MAX - BLOCK_STRIDE).saturating_add(2);
    (0..)
        .map_while(|idx: i32| idx.checked_mul(BLOCK_STRIDE)?.checked_add(FIRST_BLOCK_CENTER))
        .take_while(move |center| *center < limit)
}

/// All primitives for `grid`, block by block (rows outer, columns inner).
pub fn primitives(grid: &Grid) -> Vec<Primitive> {
    let mut out = Vec::new();
    for y in block_centers(grid.size()) {
        for x in block_centers(grid.size()) {
            block_primitives(grid, Block { x, y }, &mut out);
        }
    }
    out
}

pub fn block_primitives(grid: &Grid, at: Block, out: &mut Vec<Primitive>) {
    let Block { x, y } = at;

    if grid.get(x - 1, y - 1) == ROOM_TOP_LEFT && grid.get(x + 1, y + 1) == ROOM_BOTTOM_RIGHT {
        if grid.get(x, y) == ROOM_OCCUPIED {
            out.push(Primitive::RoomFill { at });
        } else {
            out.push(Primitive::RoomOutline { at });
        }
    }

    if grid.get(x + 2, y) == LINK_HORIZONTAL {
        out.push(Primitive::Connector { at, axis: LinkAxis::Horizontal });
    }
    if grid.get(x, y + 2) == LINK_VERTICAL {
        out.push(Primitive::Connector { at, axis: LinkAxis::Vertical });
    }

    for style in ArrowStyle::ALL {
        for direction in Direction::ALL {
            let (dx, dy) = direction.offset();
            if grid.get(x + dx, y + dy) == style.glyph(direction) {
                out.push(Primitive::Arrow { at, style, direction });
            }
        }
    }
}

fn segment(from: (f32, f32), to: (f32, f32)) -> Option<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(from.0, from.1);
    builder.line_to(to.0, to.1);
    builder.finish()
}

// Rounded square of radius 1, one quadratic corner per quadrant.
fn room_path() -> Option<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(0.0, -1.0);
    builder.quad_to(1.0, -1.0, 1.0, 0.0);
    builder.quad_to(1.0, 1.0, 0.0, 1.0);
    builder.quad_to(-1.0, 1.0, -1.0, 0.0);
    builder.quad_to(-1.0, -1.0, 0.0, -1.0);
    builder.close();
    builder.finish()
}

fn arrow_head() -> Option<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(ARROW_END + ARROW_HEAD, 0.0);
    builder.line_to(ARROW_END, ARROW_HEAD);
    builder.line_to(ARROW_END, -ARROW_HEAD);
    builder.close();
    builder.finish()
}

// East-pointing template, just outside the room's right edge.
fn arrow_template(style: ArrowStyle) -> Vec<Shape> {
    let shaft = |offset: f32| segment((ARROW_START, offset), (ARROW_END, offset));

    let shapes = match style {
        ArrowStyle::Single => {
            vec![Shape::new(Brush::Stroke, shaft(0.0)), Shape::new(Brush::Fill, arrow_head())]
        }
        ArrowStyle::Double => {
            let mut shafts = PathBuilder::new();
            for offset in [-DOUBLE_ARROW_GAP, DOUBLE_ARROW_GAP] {
                shafts.move_to(ARROW_START, offset);
                shafts.line_to(ARROW_END, offset);
            }
            vec![
                Shape::new(Brush::Stroke, shafts.finish()),
                Shape::new(Brush::Fill, arrow_head()),
            ]
        }
        ArrowStyle::Dotted => vec![Shape::new(Brush::Stroke, shaft(0.0))],
    };
    shapes.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests;
