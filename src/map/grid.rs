// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Character returned for every cell outside the grid.
pub const BLANK: char = ' ';

/// A square-ish grid of map glyphs parsed from map text.
///
/// The grid is permissive: ragged or non-square input never errors. Reads outside
/// `[0, size)` on either axis, and reads past the end of a short row, return [`BLANK`], so the
/// rule engine never has to special-case the edges of the map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    /// Parses map text: one row per `\n`-terminated line.
    ///
    /// The empty segment after the final terminator is dropped, so `"ab\ncd\n"` has two rows.
    /// A trailing `\r` is stripped from each line.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.split('\n').collect::<Vec<_>>();
        if matches!(lines.last(), Some(line) if line.is_empty()) {
            lines.pop();
        }

        let rows = lines
            .into_iter()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).chars().collect())
            .collect();

        Self { rows }
    }

    /// Number of rows; also the column bound used by [`Grid::get`].
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, x: i32, y: i32) -> char {
        let size = self.size();
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return BLANK;
        };
        if x >= size || y >= size {
            return BLANK;
        }

        self.rows[y].get(x).copied().unwrap_or(BLANK)
    }
}
