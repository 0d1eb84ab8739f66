// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gruffles-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gruffles and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Message routing to output panes.
//!
//! Every output pane owns a [`Filter`] compiled once from its layout entry. An inbound
//! message is appended to every pane whose filter admits the message type; panes are not
//! mutually exclusive, so one message can land in several panes or in none.

use std::collections::VecDeque;
use std::fmt;

use regex::Regex;

use crate::transport::{Inbound, MAP_TYPE};

/// Lines kept per output pane.
pub const OUTPUT_HISTORY: usize = 1000;

/// Include/exclude admission rule for message types.
///
/// Patterns use the `regex` crate dialect and match anywhere in the type, so `combat`
/// admits `combat` as well as `combat-round`.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl Filter {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, FilterError> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|err| FilterError { pattern: pattern.to_owned(), reason: err.to_string() })
        };

        Ok(Self {
            include: include.map(compile).transpose()?,
            exclude: exclude.map(compile).transpose()?,
        })
    }

    pub fn admits(&self, kind: &str) -> bool {
        let mut admitted = true;
        if let Some(include) = &self.include {
            admitted = include.is_match(kind);
        }
        if let Some(exclude) = &self.exclude {
            admitted = admitted && !exclude.is_match(kind);
        }
        admitted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterError {
    pub pattern: String,
    pub reason: String,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pattern {:?}: {}", self.pattern, self.reason)
    }
}

impl std::error::Error for FilterError {}

/// Bounded line history; the oldest lines fall off first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrollback {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Scrollback {
    pub fn new(capacity: usize) -> Self {
        Self { lines: VecDeque::new(), capacity }
    }

    /// Appends `text` one line at a time. Empty text still produces one empty line.
    pub fn push_text(&mut self, text: &str) {
        let text = text.strip_suffix('\n').unwrap_or(text);
        for line in text.split('\n') {
            self.push_line(line.strip_suffix('\r').unwrap_or(line));
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_owned());
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(String::as_str)
    }
}

/// One output pane as the router sees it.
#[derive(Debug, Clone)]
pub struct OutputRegion {
    id: Option<String>,
    filter: Filter,
    scrollback: Scrollback,
}

impl OutputRegion {
    pub fn new(id: Option<String>, filter: Filter) -> Self {
        Self { id, filter, scrollback: Scrollback::new(OUTPUT_HISTORY) }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn append(&mut self, text: &str) {
        self.scrollback.push_text(text);
    }
}

/// Fan-out of inbound messages to output regions, in layout order.
#[derive(Debug, Clone, Default)]
pub struct Router {
    regions: Vec<OutputRegion>,
}

impl Router {
    pub fn new(regions: Vec<OutputRegion>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[OutputRegion] {
        &self.regions
    }

    pub fn region(&self, idx: usize) -> Option<&OutputRegion> {
        self.regions.get(idx)
    }

    /// Indices of the regions that would receive a message of type `kind`.
    pub fn targets(&self, kind: &str) -> Vec<usize> {
        if kind == MAP_TYPE {
            return Vec::new();
        }
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, region)| region.filter.admits(kind))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Appends the message body to every admitting region and returns their indices.
    ///
    /// Map-typed messages are never routed.
    pub fn route(&mut self, message: &Inbound) -> Vec<usize> {
        let targets = self.targets(&message.kind);
        for idx in &targets {
            self.regions[*idx].append(&message.msg);
        }
        targets
    }
}
