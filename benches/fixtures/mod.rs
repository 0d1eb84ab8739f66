// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Shared deterministic benchmark fixtures (no RNG).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    fn rooms_per_side(self) -> usize {
        match self {
            Self::Small => 3,
            Self::Medium => 8,
            Self::Large => 20,
        }
    }
}

/// Square map of rooms on every block, linked east and south, with a scattering of exits.
pub fn map_text(case: Case) -> String {
    let rooms = case.rooms_per_side();
    let size = (rooms * 4) + 1;
    let mut rows = vec![vec![' '; size]; size];

    for ry in 0..rooms {
        for rx in 0..rooms {
            let (x, y) = ((rx * 4) + 2, (ry * 4) + 2);
            rows[y - 1][x - 1] = '╭';
            rows[y - 1][x] = '─';
            rows[y - 1][x + 1] = '╮';
            rows[y][x - 1] = '│';
            rows[y][x + 1] = '│';
            rows[y + 1][x - 1] = '╰';
            rows[y + 1][x] = '─';
            rows[y + 1][x + 1] = '╯';

            if rx + 1 < rooms {
                rows[y][x + 2] = '↔';
            }
            if ry + 1 < rooms {
                rows[y + 2][x] = '↕';
            }
            match (rx + ry) % 4 {
                0 => rows[y - 1][x + 1] = '↗',
                1 => rows[y - 1][x] = '⇑',
                2 => rows[y][x - 1] = '⇠',
                _ => {}
            }
        }
    }
    rows[2][2] = '╳';

    let mut text = String::with_capacity(size * (size + 1) * 3);
    for row in rows {
        text.extend(row);
        text.push('\n');
    }
    text
}
