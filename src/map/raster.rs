// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tiny_skia::{
    Color, FillRule, Mask, Paint, Path, PathBuilder, Pixmap, Point, Rect, Stroke, Transform,
};

use super::{Ink, Surface};

const BRAILLE_BASE: u32 = 0x2800;

// Bit for the dot at (dx, dy) inside one 2x4 braille cell.
const BRAILLE_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Largest raster side, in dots.
pub const MAX_DOT_SIDE: usize = 4096;

/// Coverage at which a pixel counts as an inked dot.
const INK_THRESHOLD: u8 = 128;

/// A dot bitmap drawing surface backed by one pixmap per [`Ink`].
///
/// A dot reads as map ink whenever the map layer covers it, so rooms always win over the
/// reference grid regardless of drawing order. Drawing outside the bitmap or outside the
/// current clip is discarded.
///
/// Dots are grouped into 2x4 blocks for braille output, which makes one terminal cell hold
/// a roughly square patch of the map.
#[derive(Clone)]
pub struct Raster {
    grid: Pixmap,
    map: Pixmap,
    clip: Option<Mask>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty { width, height });
        }
        if width > MAX_DOT_SIDE || height > MAX_DOT_SIDE {
            return Err(RasterError::TooLarge { width, height });
        }

        let layer = || {
            let (w, h) = (u32::try_from(width).ok()?, u32::try_from(height).ok()?);
            Pixmap::new(w, h)
        };
        match (layer(), layer()) {
            (Some(grid), Some(map)) => Ok(Self { grid, map, clip: None }),
            _ => Err(RasterError::TooLarge { width, height }),
        }
    }

    /// Raster sized to cover `columns` x `rows` braille cells.
    pub fn for_cells(columns: usize, rows: usize) -> Result<Self, RasterError> {
        let too_large = RasterError::TooLarge { width: columns, height: rows };
        let width = columns.checked_mul(2).ok_or_else(|| too_large.clone())?;
        let height = rows.checked_mul(4).ok_or(too_large)?;
        Self::new(width, height)
    }

    pub fn dot_width(&self) -> usize {
        self.grid.width() as usize
    }

    pub fn dot_height(&self) -> usize {
        self.grid.height() as usize
    }

    pub fn dot(&self, x: usize, y: usize) -> Option<Ink> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        let map = self.map.pixel(x, y)?.alpha();
        let grid = self.grid.pixel(x, y)?.alpha();
        classify(map, grid)
    }

    pub fn inked_dots(&self, ink: Ink) -> usize {
        self.map
            .pixels()
            .iter()
            .zip(self.grid.pixels())
            .filter(|(map, grid)| classify(map.alpha(), grid.alpha()) == Some(ink))
            .count()
    }

    pub fn columns(&self) -> usize {
        self.dot_width().div_ceil(2)
    }

    pub fn rows(&self) -> usize {
        self.dot_height().div_ceil(4)
    }

    /// Braille glyph and dominant ink for one terminal cell. Empty cells are `' '`.
    pub fn cell(&self, column: usize, row: usize) -> (char, Option<Ink>) {
        let mut bits = 0u8;
        let mut ink = None;

        for (dx, column_bits) in BRAILLE_BITS.iter().enumerate() {
            for (dy, bit) in column_bits.iter().enumerate() {
                let dot = self.dot((column * 2) + dx, (row * 4) + dy);
                if dot.is_some() {
                    bits |= bit;
                    ink = ink.max(dot);
                }
            }
        }

        if bits == 0 {
            return (' ', None);
        }
        let ch = char::from_u32(BRAILLE_BASE + u32::from(bits)).unwrap_or(' ');
        (ch, ink)
    }

    /// Braille rendering with trailing blanks trimmed from every line.
    pub fn to_braille_string(&self) -> String {
        let mut lines = Vec::<String>::with_capacity(self.rows());
        for row in 0..self.rows() {
            let line = (0..self.columns()).map(|column| self.cell(column, row).0).collect::<String>();
            lines.push(line.trim_end_matches(' ').to_owned());
        }
        lines.join("\n")
    }
}

fn classify(map: u8, grid: u8) -> Option<Ink> {
    if map >= INK_THRESHOLD {
        Some(Ink::Map)
    } else if grid >= INK_THRESHOLD {
        Some(Ink::Grid)
    } else {
        None
    }
}

// Solid, aliased paint: a dot is either covered or not.
fn ink_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::BLACK);
    paint.anti_alias = false;
    paint
}

// Zero width strokes as a one-dot hairline at any scale.
fn hairline() -> Stroke {
    Stroke { width: 0.0, ..Stroke::default() }
}

impl Surface for Raster {
    fn width(&self) -> f32 {
        self.grid.width() as f32
    }

    fn height(&self) -> f32 {
        self.grid.height() as f32
    }

    fn clear(&mut self) {
        self.grid.fill(Color::TRANSPARENT);
        self.map.fill(Color::TRANSPARENT);
        self.clip = None;
    }

    fn stroke(&mut self, path: &Path, transform: Transform, ink: Ink) {
        let layer = match ink {
            Ink::Grid => &mut self.grid,
            Ink::Map => &mut self.map,
        };
        layer.stroke_path(path, &ink_paint(), &hairline(), transform, self.clip.as_ref());
    }

    fn fill(&mut self, path: &Path, transform: Transform, ink: Ink) {
        let layer = match ink {
            Ink::Grid => &mut self.grid,
            Ink::Map => &mut self.map,
        };
        let paint = ink_paint();
        let clip = self.clip.as_ref();
        layer.fill_path(path, &paint, FillRule::Winding, transform, clip);
        // Outline too, so shapes thinner than a dot stay visible.
        layer.stroke_path(path, &paint, &hairline(), transform, clip);
    }

    /// Snaps the clip outwards to whole dots: every dot from `min` to `max` inclusive stays.
    fn clip(&mut self, min: Point, max: Point) {
        let Some(mut mask) = Mask::new(self.grid.width(), self.grid.height()) else {
            self.clip = None;
            return;
        };

        let rect = Rect::from_ltrb(
            min.x.min(max.x).floor(),
            min.y.min(max.y).floor(),
            min.x.max(max.x).floor() + 1.0,
            min.y.max(max.y).floor() + 1.0,
        );
        // An unusable rectangle leaves the mask empty, which admits nothing.
        if let Some(rect) = rect {
            mask.fill_path(
                &PathBuilder::from_rect(rect),
                FillRule::Winding,
                false,
                Transform::identity(),
            );
        }
        self.clip = Some(mask);
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.grid.width() == other.grid.width()
            && self.grid.height() == other.grid.height()
            && self.grid.data() == other.grid.data()
            && self.map.data() == other.map.data()
            && self.clip.as_ref().map(Mask::data) == other.clip.as_ref().map(Mask::data)
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.dot_width())
            .field("height", &self.dot_height())
            .field("map_dots", &self.inked_dots(Ink::Map))
            .field("grid_dots", &self.inked_dots(Ink::Grid))
            .field("clipped", &self.clip.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    Empty { width: usize, height: usize },
    TooLarge { width: usize, height: usize },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { width, height } => write!(f, "raster is empty: {width}x{height}"),
            Self::TooLarge { width, height } => write!(
                f,
                "raster too large: {width}x{height} (at most {MAX_DOT_SIDE} dots per side)"
            ),
        }
    }
}

impl std::error::Error for RasterError {}
