// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session state and the event mediator that mutates it.
//!
//! All session state lives in one [`SessionState`] owned by a [`Controller`]. Events are
//! dispatched to handlers registered per [`EventKind`]; the built-in handlers cache map text,
//! re-project the map, route output and turn submitted lines into commands.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::map::{render_map, Grid, Projection, Raster, RasterError};
use crate::route::Router;
use crate::transport::{Inbound, Outbound};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The map pane now measures `width` x `height` terminal cells.
    Resize { width: u16, height: u16 },
    Message(Inbound),
    /// A line entered in the input pane.
    Submit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Resize,
    Message,
    Submit,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Resize { .. } => EventKind::Resize,
            Self::Message(_) => EventKind::Message,
            Self::Submit(_) => EventKind::Submit,
        }
    }
}

/// What one dispatch produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub outbound: Vec<Outbound>,
    /// Output regions that received the message body.
    pub delivered: Vec<usize>,
    pub rendered: bool,
}

pub type Handler = Box<dyn FnMut(&mut SessionState, &Event, &mut Outcome)>;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    map_text: Option<String>,
    grid: Grid,
    router: Router,
    raster: Option<Raster>,
    projection: Option<Projection>,
}

impl SessionState {
    pub fn new(router: Router) -> Self {
        Self { router, ..Self::default() }
    }

    /// Most recent map text, if any arrived.
    pub fn map_text(&self) -> Option<&str> {
        self.map_text.as_deref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Map surface; absent until the map pane has been measured.
    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    /// Re-projects the cached map onto the map surface. Without map text, or before the
    /// surface exists, the surface is left untouched.
    pub fn render(&mut self) -> bool {
        if self.map_text.as_deref().map_or(true, str::is_empty) {
            return false;
        }
        let Some(raster) = self.raster.as_mut() else {
            return false;
        };
        self.projection = Some(render_map(&self.grid, raster));
        true
    }

    fn set_map_text(&mut self, text: &str) {
        self.grid = Grid::parse(text);
        self.map_text = Some(text.to_owned());
        debug!(rows = self.grid.size(), "map updated");
    }

    fn resize(&mut self, width: u16, height: u16) {
        match Raster::for_cells(usize::from(width), usize::from(height)) {
            Ok(raster) => self.raster = Some(raster),
            // A collapsed pane has nothing to draw on until it grows again.
            Err(RasterError::Empty { .. }) => self.raster = None,
            Err(err) => {
                warn!(error = %err, "cannot size map surface");
                self.raster = None;
            }
        }
    }
}

fn on_message(state: &mut SessionState, event: &Event, outcome: &mut Outcome) {
    let Event::Message(message) = event else {
        return;
    };
    if message.is_map() {
        state.set_map_text(&message.msg);
        outcome.rendered |= state.render();
        return;
    }
    outcome.delivered = state.router.route(message);
}

fn on_resize(state: &mut SessionState, event: &Event, outcome: &mut Outcome) {
    let Event::Resize { width, height } = *event else {
        return;
    };
    state.resize(width, height);
    outcome.rendered |= state.render();
}

fn on_submit(_state: &mut SessionState, event: &Event, outcome: &mut Outcome) {
    let Event::Submit(line) = event else {
        return;
    };
    outcome.outbound.extend(Outbound::from_line(line));
}

/// Mediator between UI events and session state.
pub struct Controller {
    state: SessionState,
    handlers: BTreeMap<EventKind, Vec<Handler>>,
}

impl Controller {
    pub fn new(router: Router) -> Self {
        let mut controller = Self { state: SessionState::new(router), handlers: BTreeMap::new() };
        controller.register(EventKind::Message, on_message);
        controller.register(EventKind::Resize, on_resize);
        controller.register(EventKind::Submit, on_submit);
        controller
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Adds a handler; handlers for one kind run in registration order, built-ins first.
    pub fn register(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&mut SessionState, &Event, &mut Outcome) + 'static,
    ) {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    pub fn dispatch(&mut self, event: &Event) -> Outcome {
        let mut outcome = Outcome::default();
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers {
                handler(&mut self.state, event, &mut outcome);
            }
        }
        outcome
    }
}
