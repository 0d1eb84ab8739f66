// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Provides the interactive client shell (ratatui + crossterm): output panes, the command
//! line, the braille map and mouse-draggable split boundaries.

use std::{error::Error, io, time::Duration};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::map::Raster;
use crate::pane::{materialize, DragHandle, LayoutNode, PaneArea, PaneRole, PaneTree};
use crate::route::Router;
use crate::session::{Controller, Event as SessionEvent};
use crate::transport::{Outbound, Transport, TransportEvent};

mod input;
mod theme;

use input::{InputLine, PROMPT};
use theme::TuiTheme;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const SCROLL_STEP: usize = 3;

/// Runs the client until the user quits. The connection keeps running in the background;
/// its events are drained before every frame.
pub fn run(
    config: &ClientConfig,
    layout: &LayoutNode,
    mut transport: Transport,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut app = App::new(layout, &config.greeting(), theme);
    let mut terminal = TerminalSession::new()?;

    while !app.should_quit {
        while let Some(event) = transport.try_recv() {
            app.handle_transport(event);
        }
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        for command in app.take_outbound() {
            if let Err(err) = transport.send(command) {
                warn!(error = %err, "command not sent");
                app.input.notice(&format!("[{err}]"));
            }
        }
    }

    Ok(())
}

pub struct App {
    controller: Controller,
    panes: PaneTree,
    input: InputLine,
    theme: TuiTheme,
    /// Lines scrolled up from the bottom, per output region.
    scroll: Vec<usize>,
    /// Pane geometry of the last frame, for mouse hit-testing.
    areas: Vec<PaneArea>,
    /// Map pane interior the raster was last sized for.
    map_cells: Option<(u16, u16)>,
    drag: Option<DragHandle>,
    outbox: Vec<Outbound>,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(layout: &LayoutNode, greeting: &str, theme: TuiTheme) -> Self {
        let (panes, regions) = materialize(layout);
        let scroll = vec![0; regions.len()];
        Self {
            controller: Controller::new(Router::new(regions)),
            panes,
            input: InputLine::new(greeting),
            theme,
            scroll,
            areas: Vec::new(),
            map_cells: None,
            drag: None,
            outbox: Vec::new(),
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn take_outbound(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn handle_transport(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected { peer } => info!(%peer, "session started"),
            TransportEvent::Message(message) => {
                self.controller.dispatch(&SessionEvent::Message(message));
            }
            TransportEvent::Error(reason) => self.input.notice(&format!("[error: {reason}]")),
            TransportEvent::Closed => self.input.notice("[connection closed]"),
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            _ if !self.panes.has_input() => {}
            KeyCode::Enter => self.submit(),
            KeyCode::Char(ch) if !ctrl => self.input.insert(ch),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Up => self.input.history_prev(),
            KeyCode::Down => self.input.history_next(),
            _ => {}
        }
    }

    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = self.panes.begin_drag(column, row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(handle) = &self.drag {
                    if self.panes.drag(handle, column, row) {
                        // Re-project on the next frame.
                        self.map_cells = None;
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag = None,
            MouseEventKind::ScrollUp => self.scroll_at(column, row, true),
            MouseEventKind::ScrollDown => self.scroll_at(column, row, false),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let line = self.input.submit();
        let outcome = self.controller.dispatch(&SessionEvent::Submit(line));
        self.outbox.extend(outcome.outbound);
    }

    fn scroll_at(&mut self, column: u16, row: u16, up: bool) {
        let at = Position::new(column, row);
        let Some(PaneRole::Output(idx)) =
            self.areas.iter().find(|area| area.rect.contains(at)).map(|area| area.role)
        else {
            return;
        };

        let len = self
            .controller
            .state()
            .router()
            .region(idx)
            .map_or(0, |region| region.scrollback().len());
        if let Some(offset) = self.scroll.get_mut(idx) {
            *offset = if up {
                offset.saturating_add(SCROLL_STEP).min(len)
            } else {
                offset.saturating_sub(SCROLL_STEP)
            };
        }
    }

    fn sync_map_size(&mut self, areas: &[PaneArea]) {
        let Some(map) = areas.iter().find(|area| area.role == PaneRole::Map) else {
            return;
        };
        let inner = Block::default().borders(Borders::ALL).inner(map.rect);
        let cells = (inner.width, inner.height);
        if self.map_cells != Some(cells) {
            self.map_cells = Some(cells);
            self.controller.dispatch(&SessionEvent::Resize { width: cells.0, height: cells.1 });
        }
    }

    fn pane_block(&self, area: &PaneArea) -> Block<'static> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.drag.is_some()))
            .style(self.theme.base_style());
        match &area.id {
            Some(id) => block.title(Span::styled(format!(" {id} "), self.theme.title_style())),
            None => block,
        }
    }
}

pub(crate) fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let areas = app.panes.arrange(frame.area());
    app.sync_map_size(&areas);

    for area in &areas {
        match area.role {
            PaneRole::Output(idx) => draw_output(frame, app, area, idx),
            PaneRole::Input => draw_input(frame, app, area),
            PaneRole::Map => draw_map(frame, app, area),
            PaneRole::Vacant => frame.render_widget(app.pane_block(area), area.rect),
        }
    }

    app.areas = areas;
}

fn draw_output(frame: &mut Frame<'_>, app: &App, area: &PaneArea, idx: usize) {
    let block = app.pane_block(area);
    let inner = block.inner(area.rect);
    frame.render_widget(block, area.rect);

    let Some(region) = app.controller.state().router().region(idx) else {
        return;
    };
    let offset = app.scroll.get(idx).copied().unwrap_or(0);
    let lines = tail(region.scrollback().lines(), usize::from(inner.height), offset)
        .map(Line::raw)
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines).style(app.theme.base_style()), inner);
}

fn draw_input(frame: &mut Frame<'_>, app: &App, area: &PaneArea) {
    let block = app.pane_block(area);
    let inner = block.inner(area.rect);
    frame.render_widget(block, area.rect);
    if inner.is_empty() {
        return;
    }

    let echo_rows = usize::from(inner.height - 1);
    let mut lines = tail(app.input.echo(), echo_rows, 0)
        .map(|line| {
            let style = if line.notice { app.theme.notice_style() } else { app.theme.base_style() };
            Line::styled(line.text.as_str(), style)
        })
        .collect::<Vec<_>>();
    lines.push(Line::from(vec![
        Span::styled(PROMPT, app.theme.prompt_style()),
        Span::raw(app.input.text()),
    ]));
    let prompt_row = u16::try_from(lines.len() - 1).unwrap_or(0);
    frame.render_widget(Paragraph::new(lines).style(app.theme.base_style()), inner);

    let column = u16::try_from(PROMPT.chars().count() + app.input.cursor()).unwrap_or(u16::MAX);
    let x = inner.x.saturating_add(column).min(inner.right() - 1);
    frame.set_cursor_position(Position::new(x, inner.y + prompt_row));
}

fn draw_map(frame: &mut Frame<'_>, app: &App, area: &PaneArea) {
    let block = app.pane_block(area);
    let inner = block.inner(area.rect);
    frame.render_widget(block, area.rect);

    if let Some(raster) = app.controller.state().raster() {
        frame.render_widget(MapView { raster, theme: &app.theme }, inner);
    }
}

/// The last `height` lines, moved up by `offset` but never past the first line.
fn tail<T>(
    lines: impl ExactSizeIterator<Item = T>,
    height: usize,
    offset: usize,
) -> impl Iterator<Item = T> {
    let total = lines.len();
    let end = total - offset.min(total.saturating_sub(height));
    let start = end.saturating_sub(height);
    lines.skip(start).take(end - start)
}

/// Braille rendering of the map raster, one terminal cell per 2x4 dots.
struct MapView<'a> {
    raster: &'a Raster,
    theme: &'a TuiTheme,
}

impl Widget for MapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = area.width.min(u16::try_from(self.raster.columns()).unwrap_or(u16::MAX));
        let rows = area.height.min(u16::try_from(self.raster.rows()).unwrap_or(u16::MAX));

        for row in 0..rows {
            for column in 0..columns {
                let (ch, ink) = self.raster.cell(usize::from(column), usize::from(row));
                let Some(ink) = ink else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
                    cell.set_char(ch).set_style(self.theme.ink_style(ink));
                }
            }
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
