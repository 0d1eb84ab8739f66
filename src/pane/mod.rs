// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Screen layout.
//!
//! A layout description is a tree of `vsp` (side by side), `sp` (stacked), `input`, `output`
//! and `map` nodes. It is decoded once into [`LayoutNode`] and then materialised into a
//! [`PaneTree`] plus the output regions the router feeds.

use std::fmt;

use serde::Deserialize;
use tracing::warn;

mod tree;

pub use tree::{materialize, DragHandle, PaneArea, PaneRole, PaneTree, MIN_PANE_CELLS};

/// Layout entry exactly as it appears in a layout file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub include: Option<String>,
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default)]
    pub panes: Vec<RawNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Relative size within the parent split; always positive.
    pub weight: f64,
    pub id: Option<String>,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `vsp`: children side by side.
    Columns(Vec<LayoutNode>),
    /// `sp`: children stacked top to bottom.
    Rows(Vec<LayoutNode>),
    Input,
    Output { include: Option<String>, exclude: Option<String> },
    Map,
}

impl LayoutNode {
    pub fn new(weight: f64, id: Option<&str>, kind: NodeKind) -> Self {
        Self { weight: normalize_weight(Some(weight)), id: id.map(str::to_owned), kind }
    }

    /// Converts a decoded entry. Unknown node types are logged and dropped together with
    /// their subtree; their siblings are unaffected.
    pub fn from_raw(raw: RawNode) -> Option<Self> {
        let weight = normalize_weight(raw.size);
        let kind = match raw.kind.as_str() {
            "vsp" => NodeKind::Columns(children(raw.panes)),
            "sp" => NodeKind::Rows(children(raw.panes)),
            "input" => NodeKind::Input,
            "output" => NodeKind::Output { include: raw.include, exclude: raw.exclude },
            "map" => NodeKind::Map,
            other => {
                warn!(kind = other, id = ?raw.id, "unknown layout node; skipping");
                return None;
            }
        };
        Some(Self { weight, id: raw.id, kind })
    }
}

fn children(panes: Vec<RawNode>) -> Vec<LayoutNode> {
    panes.into_iter().filter_map(LayoutNode::from_raw).collect()
}

// Missing, zero, negative or non-numeric sizes count as 1.
fn normalize_weight(size: Option<f64>) -> f64 {
    match size {
        Some(size) if size.is_finite() && size > 0.0 => size,
        _ => 1.0,
    }
}

pub fn parse_layout(json: &str) -> Result<LayoutNode, LayoutError> {
    let raw: RawNode =
        serde_json::from_str(json).map_err(|err| LayoutError::Json(err.to_string()))?;
    let kind = raw.kind.clone();
    LayoutNode::from_raw(raw).ok_or(LayoutError::UnknownRoot(kind))
}

/// Output and input on the left, the map on the right.
pub fn default_layout() -> LayoutNode {
    LayoutNode::new(
        1.0,
        None,
        NodeKind::Columns(vec![
            LayoutNode::new(
                65.0,
                None,
                NodeKind::Rows(vec![
                    LayoutNode::new(
                        45.0,
                        Some("main"),
                        NodeKind::Output {
                            include: None,
                            exclude: Some("combat|social|map".to_owned()),
                        },
                    ),
                    LayoutNode::new(10.0, Some("input"), NodeKind::Input),
                ]),
            ),
            LayoutNode::new(
                35.0,
                None,
                NodeKind::Rows(vec![LayoutNode::new(50.0, Some("map"), NodeKind::Map)]),
            ),
        ]),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    Json(String),
    UnknownRoot(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(reason) => write!(f, "invalid layout: {reason}"),
            Self::UnknownRoot(kind) => write!(f, "unknown layout root type {kind:?}"),
        }
    }
}

impl std::error::Error for LayoutError {}
