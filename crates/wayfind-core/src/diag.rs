//! Diagnostics context shared by the navigation and FSM layers.
//!
//! A [`Diagnostics`] handle is created by the owner of a navigation map or
//! state machine and cloned into every component that needs to report
//! something. Clones share one journal. Each report is filtered by a
//! per-category minimum severity, forwarded to the [`log`] facade, and kept
//! in a bounded journal that callers (tests, tooling, a game console) can
//! inspect or drain.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Subsystem a report originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Graph,
    Search,
    Route,
    Nearest,
    Fsm,
    Agent,
}

const CATEGORY_COUNT: usize = 6;

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Graph,
        Category::Search,
        Category::Route,
        Category::Nearest,
        Category::Fsm,
        Category::Agent,
    ];

    /// `log` target used when forwarding reports of this category.
    pub const fn target(self) -> &'static str {
        match self {
            Category::Graph => "wayfind::graph",
            Category::Search => "wayfind::search",
            Category::Route => "wayfind::route",
            Category::Nearest => "wayfind::nearest",
            Category::Fsm => "wayfind::fsm",
            Category::Agent => "wayfind::agent",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Graph => "graph",
            Category::Search => "search",
            Category::Route => "route",
            Category::Nearest => "nearest",
            Category::Fsm => "fsm",
            Category::Agent => "agent",
        };
        f.write_str(name)
    }
}

/// Report severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn level(self) -> log::Level {
        match self {
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    /// Monotonic sequence number across the journal's lifetime.
    pub seq: u64,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", self.category, sev, self.message)
    }
}

/// Default journal capacity before old entries are trimmed.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 4096;

#[derive(Debug)]
struct Journal {
    /// `None` silences the category entirely.
    filters: [Option<Severity>; CATEGORY_COUNT],
    reports: Vec<Report>,
    capacity: usize,
    seq: u64,
}

/// Cloneable diagnostics handle. See the module docs.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    inner: Rc<RefCell<Journal>>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Create a context that records every severity in every category.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }

    /// Create a context whose journal keeps roughly `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Journal {
                filters: [Some(Severity::Info); CATEGORY_COUNT],
                reports: Vec::new(),
                capacity: capacity.max(1),
                seq: 0,
            })),
        }
    }

    /// Only record reports of `category` at or above `min`.
    pub fn set_filter(&self, category: Category, min: Severity) {
        self.inner.borrow_mut().filters[category.index()] = Some(min);
    }

    /// Drop every report of `category`.
    pub fn silence(&self, category: Category) {
        self.inner.borrow_mut().filters[category.index()] = None;
    }

    /// Whether a report of this category and severity would be recorded.
    pub fn enabled(&self, category: Category, severity: Severity) -> bool {
        self.inner.borrow().filters[category.index()].is_some_and(|min| severity >= min)
    }

    /// Record a report, if it passes the category filter.
    pub fn report(&self, category: Category, severity: Severity, message: impl Into<String>) {
        if !self.enabled(category, severity) {
            return;
        }
        let message = message.into();
        log::log!(target: category.target(), severity.level(), "{message}");

        let mut j = self.inner.borrow_mut();
        let seq = j.seq;
        j.seq += 1;
        j.reports.push(Report {
            category,
            severity,
            message,
            seq,
        });
        if j.reports.len() > j.capacity {
            let excess = j.reports.len() - j.capacity;
            // Trim in chunks so a saturated journal does not shift on every push.
            let chunk = excess.max(j.capacity / 8);
            let n = chunk.min(j.reports.len());
            j.reports.drain(..n);
        }
    }

    pub fn info(&self, category: Category, message: impl Into<String>) {
        self.report(category, Severity::Info, message);
    }

    pub fn warn(&self, category: Category, message: impl Into<String>) {
        self.report(category, Severity::Warning, message);
    }

    pub fn error(&self, category: Category, message: impl Into<String>) {
        self.report(category, Severity::Error, message);
    }

    /// Snapshot of the journal, oldest first.
    pub fn reports(&self) -> Vec<Report> {
        self.inner.borrow().reports.clone()
    }

    /// Number of journal entries matching `category` and `severity`.
    pub fn count(&self, category: Category, severity: Severity) -> usize {
        self.inner
            .borrow()
            .reports
            .iter()
            .filter(|r| r.category == category && r.severity == severity)
            .count()
    }

    /// Number of journal entries of `severity` in any category.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.inner
            .borrow()
            .reports
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    /// Remove and return every journal entry.
    pub fn drain(&self) -> Vec<Report> {
        std::mem::take(&mut self.inner.borrow_mut().reports)
    }

    /// Discard the journal without touching filters.
    pub fn clear(&self) {
        self.inner.borrow_mut().reports.clear();
    }

    /// Whether two handles share the same journal.
    pub fn same_journal(&self, other: &Diagnostics) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
