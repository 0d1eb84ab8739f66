// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tiny_skia::{Path, PathBuilder, Point, Transform};

use super::grid::Grid;
use super::shapes::{primitives, Block, Brush};
use super::{Ink, Surface};

/// How grid units map onto a surface: uniform scale plus a centering offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f32,
    /// Device-space offset applied before scaling; centers the longer axis.
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Projection {
    /// Fits a `size`-row grid (plus half a unit of margin on each side) into the largest
    /// centered square of a `width` x `height` surface.
    pub fn fit(size: usize, width: f32, height: f32) -> Self {
        let offset_x = if width > height { (width - height) / 2.0 } else { 0.0 };
        let offset_y = if height > width { (height - width) / 2.0 } else { 0.0 };
        let scale = width.min(height) / (size as f32 + 1.0);
        Self { scale, offset_x, offset_y }
    }

    /// Grid-to-device transform. Grid line `i` lands half a unit in from the square's edge.
    pub fn transform(&self) -> Transform {
        Transform::from_translate(self.offset_x, self.offset_y)
            .pre_scale(self.scale, self.scale)
            .pre_translate(0.5, 0.5)
    }

    /// Device position of a point given in grid units.
    pub fn project(&self, x: f32, y: f32) -> Point {
        let mut points = [Point::from_xy(x, y)];
        self.transform().map_points(&mut points);
        points[0]
    }
}

/// Redraws `surface` from scratch: reference grid, clip to the grid square, then the map.
///
/// Drawing is a pure function of the grid and the surface size, so repeated calls produce
/// identical output.
pub fn render_map<S: Surface + ?Sized>(grid: &Grid, surface: &mut S) -> Projection {
    surface.clear();

    let projection = Projection::fit(grid.size(), surface.width(), surface.height());
    let base = projection.transform();
    let extent = grid.size() as f32;

    if let Some(lines) = reference_grid(grid.size()) {
        surface.stroke(&lines, base, Ink::Grid);
    }

    surface.clip(projection.project(0.0, 0.0), projection.project(extent, extent));

    for primitive in primitives(grid) {
        let Block { x, y } = primitive.block();
        let local = base.pre_translate(x as f32 + 0.5, y as f32 + 0.5);
        for shape in primitive.shapes() {
            match shape.brush {
                Brush::Stroke => surface.stroke(&shape.path, local, Ink::Map),
                Brush::Fill => surface.fill(&shape.path, local, Ink::Map),
            }
        }
    }

    projection
}

// `size + 1` lines per axis spanning `[0, size]`.
fn reference_grid(size: usize) -> Option<Path> {
    let extent = size as f32;
    let mut builder = PathBuilder::new();
    for i in 0..=size {
        let i = i as f32;
        builder.move_to(i, 0.0);
        builder.line_to(i, extent);
        builder.move_to(0.0, i);
        builder.line_to(extent, i);
    }
    builder.finish()
}
