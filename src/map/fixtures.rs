// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Shared map text for tests.

use super::Grid;

/// Three rooms as the game server draws them: the occupied room, one to its east (joined by
/// `↔`) and one to its south (joined by `↕`). The occupied room has a zone exit north (`⇑`),
/// an unexplored exit west (`⇠`) and an exit up (`↗`); the east room has a one-way exit east
/// (`→`) and an unexplored exit down (`⤶`).
pub(crate) const THREE_ROOMS: &str = concat!(
    "             \n",
    "             \n",
    "             \n",
    "             \n",
    "             \n",
    "     ╭⇑↗ ╭─╮ \n",
    "     ⇠╳│↔│ → \n",
    "     ╰─╯ ⤶─╯ \n",
    "      ↕      \n",
    "     ╭─╮     \n",
    "     │ │     \n",
    "     ╰─╯     \n",
    "             \n",
);

/// A blank `size` x `size` grid with the given glyphs placed at `(x, y)`.
pub(crate) fn grid_with(size: usize, glyphs: &[(usize, usize, char)]) -> Grid {
    let mut rows = vec![vec![' '; size]; size];
    for &(x, y, ch) in glyphs {
        rows[y][x] = ch;
    }
    Grid::parse(&text_from_rows(&rows))
}

pub(crate) fn text_from_rows(rows: &[Vec<char>]) -> String {
    let mut text = String::new();
    for row in rows {
        text.extend(row.iter());
        text.push('\n');
    }
    text
}

pub(crate) fn rows_of(text: &str) -> Vec<Vec<char>> {
    text.lines().map(|line| line.chars().collect()).collect()
}
