// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::layout::{Constraint, Direction, Flex, Layout, Position, Rect};
use tracing::{debug, warn};

use super::{LayoutNode, NodeKind};
use crate::route::{Filter, OutputRegion};

/// Smallest extent a drag may shrink a pane to, in cells.
pub const MIN_PANE_CELLS: u16 = 3;

const RATIO_DENOMINATOR: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneRole {
    Input,
    Map,
    /// Index into the output regions returned by [`materialize`].
    Output(usize),
    /// Duplicate input or map pane; takes up space but shows nothing.
    Vacant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneArea {
    pub id: Option<String>,
    pub role: PaneRole,
    pub rect: Rect,
}

/// A split boundary grabbed by the mouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragHandle {
    path: Vec<usize>,
    boundary: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf { id: Option<String>, role: PaneRole },
    Split(Split),
}

#[derive(Debug, Clone)]
struct Split {
    direction: Direction,
    /// Percent of the split's extent per child; sums to 100.
    shares: Vec<f64>,
    children: Vec<Node>,
    // Geometry from the last `arrange`, used to hit-test drags.
    area: Rect,
    cells: Vec<Rect>,
}

#[derive(Debug, Clone)]
pub struct PaneTree {
    root: Node,
    has_input: bool,
    has_map: bool,
}

/// Builds the pane tree and, in layout order, the output regions it refers to.
///
/// The first `input` and `map` nodes win; later ones become vacant panes. An output node
/// whose patterns do not compile is dropped like an unknown node.
pub fn materialize(layout: &LayoutNode) -> (PaneTree, Vec<OutputRegion>) {
    let mut builder = Builder::default();
    let root = builder
        .node(layout)
        .unwrap_or_else(|| Node::Split(Split::new(Direction::Horizontal, &[], Vec::new())));

    if !builder.has_input {
        warn!("layout must have exactly one input pane; commands cannot be sent");
    }

    let tree = PaneTree { root, has_input: builder.has_input, has_map: builder.has_map };
    (tree, builder.regions)
}

#[derive(Debug, Default)]
struct Builder {
    regions: Vec<OutputRegion>,
    has_input: bool,
    has_map: bool,
}

impl Builder {
    fn node(&mut self, layout: &LayoutNode) -> Option<Node> {
        let id = layout.id.clone();
        let role = match &layout.kind {
            NodeKind::Columns(children) => {
                return Some(self.split(Direction::Horizontal, children));
            }
            NodeKind::Rows(children) => return Some(self.split(Direction::Vertical, children)),
            NodeKind::Input if self.has_input => {
                warn!(id = ?id, "cannot have more than one input pane");
                PaneRole::Vacant
            }
            NodeKind::Input => {
                self.has_input = true;
                PaneRole::Input
            }
            NodeKind::Map if self.has_map => {
                warn!(id = ?id, "cannot have more than one map pane");
                PaneRole::Vacant
            }
            NodeKind::Map => {
                self.has_map = true;
                PaneRole::Map
            }
            NodeKind::Output { include, exclude } => {
                match Filter::new(include.as_deref(), exclude.as_deref()) {
                    Ok(filter) => {
                        self.regions.push(OutputRegion::new(id.clone(), filter));
                        PaneRole::Output(self.regions.len() - 1)
                    }
                    Err(err) => {
                        warn!(id = ?id, error = %err, "skipping output pane");
                        return None;
                    }
                }
            }
        };
        Some(Node::Leaf { id, role })
    }

    fn split(&mut self, direction: Direction, layouts: &[LayoutNode]) -> Node {
        let mut weights = Vec::with_capacity(layouts.len());
        let mut children = Vec::with_capacity(layouts.len());
        for layout in layouts {
            if let Some(child) = self.node(layout) {
                weights.push(layout.weight);
                children.push(child);
            }
        }
        Node::Split(Split::new(direction, &weights, children))
    }
}

impl Split {
    fn new(direction: Direction, weights: &[f64], children: Vec<Node>) -> Self {
        let total: f64 = weights.iter().sum();
        let shares = weights.iter().map(|weight| weight / total * 100.0).collect();
        Self { direction, shares, children, area: Rect::default(), cells: Vec::new() }
    }

    fn constraints(&self) -> Vec<Constraint> {
        self.shares
            .iter()
            .map(|share| {
                let parts = (share * f64::from(RATIO_DENOMINATOR) / 100.0).round() as u32;
                Constraint::Ratio(parts, RATIO_DENOMINATOR)
            })
            .collect()
    }

    fn boundary_at(&self, at: Position) -> Option<usize> {
        self.cells.windows(2).position(|pair| {
            let (first, second) = (pair[0], pair[1]);
            match self.direction {
                Direction::Horizontal => at.x.saturating_add(1) == first.right() || at.x == second.x,
                Direction::Vertical => at.y.saturating_add(1) == first.bottom() || at.y == second.y,
            }
        })
    }

    fn move_boundary(&mut self, boundary: usize, column: u16, row: u16) -> bool {
        let (Some(first), Some(second)) =
            (self.cells.get(boundary).copied(), self.cells.get(boundary + 1).copied())
        else {
            return false;
        };
        let (start, end, pointer) = match self.direction {
            Direction::Horizontal => (first.x, second.right(), column),
            Direction::Vertical => (first.y, second.bottom(), row),
        };

        let total = end.saturating_sub(start);
        if total < MIN_PANE_CELLS * 2 {
            return false;
        }
        let cells = pointer
            .saturating_add(1)
            .saturating_sub(start)
            .clamp(MIN_PANE_CELLS, total - MIN_PANE_CELLS);

        let pair = self.shares[boundary] + self.shares[boundary + 1];
        let share = pair * f64::from(cells) / f64::from(total);
        if (share - self.shares[boundary]).abs() < 1e-9 {
            return false;
        }

        self.shares[boundary] = share;
        self.shares[boundary + 1] = pair - share;
        debug!(boundary, share, "moved split boundary");
        true
    }
}

impl Node {
    fn arrange(&mut self, area: Rect, out: &mut Vec<PaneArea>) {
        match self {
            Self::Leaf { id, role } => out.push(PaneArea { id: id.clone(), role: *role, rect: area }),
            Self::Split(split) => {
                split.area = area;
                split.cells = Layout::default()
                    .direction(split.direction)
                    .flex(Flex::Legacy)
                    .constraints(split.constraints())
                    .split(area)
                    .to_vec();
                for (child, cell) in split.children.iter_mut().zip(split.cells.iter().copied()) {
                    child.arrange(cell, out);
                }
            }
        }
    }

    // Innermost boundary under `at` wins.
    fn find_boundary(&self, at: Position, path: &mut Vec<usize>) -> Option<DragHandle> {
        let Self::Split(split) = self else {
            return None;
        };
        if !split.area.contains(at) {
            return None;
        }

        for (idx, (child, cell)) in split.children.iter().zip(&split.cells).enumerate() {
            if cell.contains(at) {
                path.push(idx);
                if let Some(handle) = child.find_boundary(at, path) {
                    return Some(handle);
                }
                path.pop();
            }
        }

        split.boundary_at(at).map(|boundary| DragHandle { path: path.clone(), boundary })
    }

    fn split_at_mut(&mut self, path: &[usize]) -> Option<&mut Split> {
        let Self::Split(split) = self else {
            return None;
        };
        match path.split_first() {
            None => Some(split),
            Some((idx, rest)) => split.children.get_mut(*idx)?.split_at_mut(rest),
        }
    }
}

impl PaneTree {
    pub fn has_input(&self) -> bool {
        self.has_input
    }

    pub fn has_map(&self) -> bool {
        self.has_map
    }

    /// Negotiates pane rectangles inside `area`, leaves in layout order.
    pub fn arrange(&mut self, area: Rect) -> Vec<PaneArea> {
        let mut out = Vec::new();
        self.root.arrange(area, &mut out);
        out
    }

    /// Grabs the split boundary under the given cell, using the geometry of the last
    /// [`arrange`](Self::arrange).
    pub fn begin_drag(&self, column: u16, row: u16) -> Option<DragHandle> {
        let mut path = Vec::new();
        self.root.find_boundary(Position::new(column, row), &mut path)
    }

    /// Moves a grabbed boundary to the pointer. Returns whether the layout changed; the
    /// new geometry applies from the next `arrange`.
    pub fn drag(&mut self, handle: &DragHandle, column: u16, row: u16) -> bool {
        match self.root.split_at_mut(&handle.path) {
            Some(split) => split.move_boundary(handle.boundary, column, row),
            None => false,
        }
    }
}
