// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::map::Ink;

pub(crate) const PALETTE_ENV: &str = "GRUFFLES_PALETTE";

const MAP_INK: Color = Color::Rgb(0xc0, 0xc0, 0xc0);

// Palette slots, after fg and bg.
const ANSI_RED: usize = 1;
const ANSI_YELLOW: usize = 3;
const ANSI_CYAN: usize = 6;
const ANSI_BRIGHT_BLACK: usize = 8;

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(PALETTE_ENV) {
            Ok(value) => Self::from_value(&value),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_string(),
                value: "<non-unicode>".to_string(),
            }),
        }
    }

    pub(crate) fn from_value(value: &str) -> Result<Self, ThemeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let palette = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
            name: PALETTE_ENV.to_string(),
            value: format!("{trimmed} ({error})"),
        })?;
        Ok(Self { palette: Some(palette) })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn ansi_color(&self, idx: usize, fallback: Color) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi[idx],
            None => fallback,
        }
    }

    pub(crate) fn border_style(&self, dragging: bool) -> Style {
        if dragging {
            self.base_style().fg(self.ansi_color(ANSI_YELLOW, Color::Yellow))
        } else {
            self.base_style().fg(self.ansi_color(ANSI_BRIGHT_BLACK, Color::DarkGray))
        }
    }

    pub(crate) fn title_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::BOLD)
    }

    pub(crate) fn prompt_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(ANSI_CYAN, Color::Cyan))
    }

    pub(crate) fn notice_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(ANSI_RED, Color::Red))
    }

    /// Grid ink is dim; map ink is a fixed light grey.
    pub(crate) fn ink_style(&self, ink: Ink) -> Style {
        match ink {
            Ink::Grid => self.base_style().fg(self.ansi_color(ANSI_BRIGHT_BLACK, Color::DarkGray)),
            Ink::Map => self.base_style().fg(MAP_INK),
        }
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg, then the 16 ansi colors), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let mut ansi = [Color::Reset; 16];
        for (slot, part) in ansi.iter_mut().zip(&parts[2..]) {
            *slot = parse_palette_color(part)?;
        }

        Ok(Self { fg: parse_palette_color(parts[0])?, bg: parse_palette_color(parts[1])?, ansi })
    }
}

/// Accepts `#RRGGBB`, `0xRRGGBB`, `RRGGBB` and X11 `rgb:RR/GG/BB`.
fn parse_palette_color(value: &str) -> Result<Color, String> {
    if value.is_empty() {
        return Err("empty color".to_string());
    }

    let lower = value.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let channels = rest
            .split('/')
            .map(parse_hex_channel)
            .collect::<Result<Vec<_>, _>>()?;
        let [r, g, b] = channels[..] else {
            return Err(format!("invalid rgb: value: {value}"));
        };
        return Ok(Color::Rgb(r, g, b));
    }

    let hex = lower.strip_prefix('#').or_else(|| lower.strip_prefix("0x")).unwrap_or(&lower);
    if hex.len() != 6 {
        return Err(format!("invalid hex color: {value} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {value}"))?;
    let [_, r, g, b] = rgb.to_be_bytes();
    Ok(Color::Rgb(r, g, b))
}

// Two hex digits, or four of which the high two count.
fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let digits = match value.len() {
        2 | 4 => value.get(..2).unwrap_or(value),
        _ => return Err(format!("invalid rgb: component {value} (expected 2 or 4 hex digits)")),
    };
    u8::from_str_radix(digits, 16).map_err(|_| format!("invalid rgb: component {value}"))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
