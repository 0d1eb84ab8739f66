// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;

pub(crate) const PROMPT: &str = "] ";
pub(crate) const INPUT_HISTORY: usize = 500;
const ECHO_LINES: usize = 1000;

/// One line shown above the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EchoLine {
    pub(crate) text: String,
    /// Client status (connection errors, closure) rather than something the user typed.
    pub(crate) notice: bool,
}

/// Single-line command editor with history and an echo of what was entered.
#[derive(Debug, Clone)]
pub(crate) struct InputLine {
    buffer: Vec<char>,
    cursor: usize,
    history: VecDeque<String>,
    // Index into `history` while browsing with Up/Down; `draft` holds the unsent line.
    browsing: Option<usize>,
    draft: Vec<char>,
    echo: VecDeque<EchoLine>,
}

impl InputLine {
    pub(crate) fn new(greeting: &str) -> Self {
        let mut input = Self {
            buffer: Vec::new(),
            cursor: 0,
            history: VecDeque::new(),
            browsing: None,
            draft: Vec::new(),
            echo: VecDeque::new(),
        };
        input.push_echo(greeting, false);
        input
    }

    pub(crate) fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Cursor position in characters.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn echo(&self) -> impl ExactSizeIterator<Item = &EchoLine> {
        self.echo.iter()
    }

    /// Adds a status line above the prompt.
    pub(crate) fn notice(&mut self, text: &str) {
        self.push_echo(text, true);
    }

    pub(crate) fn insert(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
    }

    pub(crate) fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub(crate) fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.len());
    }

    pub(crate) fn home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub(crate) fn history_prev(&mut self) {
        let next = match self.browsing {
            None if self.history.is_empty() => return,
            None => {
                self.draft = std::mem::take(&mut self.buffer);
                self.history.len() - 1
            }
            Some(0) => return,
            Some(idx) => idx - 1,
        };
        self.browsing = Some(next);
        self.load(self.history[next].chars().collect());
    }

    pub(crate) fn history_next(&mut self) {
        let Some(idx) = self.browsing else {
            return;
        };
        if idx + 1 < self.history.len() {
            self.browsing = Some(idx + 1);
            self.load(self.history[idx + 1].chars().collect());
        } else {
            self.browsing = None;
            let draft = std::mem::take(&mut self.draft);
            self.load(draft);
        }
    }

    /// Takes the current line, echoes it after the prompt and records it in history.
    /// Blank lines are echoed but not recorded.
    pub(crate) fn submit(&mut self) -> String {
        let line = self.text();
        self.push_echo(&format!("{PROMPT}{line}"), false);

        if !line.trim().is_empty() && self.history.back() != Some(&line) {
            if self.history.len() >= INPUT_HISTORY {
                self.history.pop_front();
            }
            self.history.push_back(line.clone());
        }

        self.buffer.clear();
        self.draft.clear();
        self.cursor = 0;
        self.browsing = None;
        line
    }

    // One entry per line of `text`; the oldest entries fall off past `ECHO_LINES`.
    fn push_echo(&mut self, text: &str, notice: bool) {
        let text = text.strip_suffix('\n').unwrap_or(text);
        for line in text.split('\n') {
            if self.echo.len() >= ECHO_LINES {
                self.echo.pop_front();
            }
            self.echo.push_back(EchoLine { text: line.to_owned(), notice });
        }
    }

    fn load(&mut self, buffer: Vec<char>) {
        self.cursor = buffer.len();
        self.buffer = buffer;
    }
}
