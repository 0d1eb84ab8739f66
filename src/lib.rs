// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gruffles: a multi-pane terminal client for a text-based multiplayer game.
//!
//! Incoming `{type, msg}` records are either map text, drawn as a braille dungeon map, or
//! output, routed to every pane whose include/exclude patterns admit the message type.

pub mod config;
pub mod logging;
pub mod map;
pub mod pane;
pub mod route;
pub mod session;
pub mod transport;
pub mod tui;
