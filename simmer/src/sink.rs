//! Progress sinks for human-readable narrative lines.
//!
//! Progress lines ("Time to soak the beans.") are a side channel: they are
//! never part of an operation's result. Operations write them to a
//! [`ProgressSink`] so tests can capture them and the CLI can print them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Destination for progress lines.
pub trait ProgressSink {
    /// Record one line.
    fn emit(&self, line: &str);
}

/// Shared handle to a sink.
pub type SharedSink = Rc<dyn ProgressSink>;

/// Emits progress lines as `info` events on the `simmer::progress` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "simmer::progress", "{line}");
    }
}

/// Prints progress lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Captures progress lines in memory.
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`SharedSink`] writing into this recorder.
    pub fn shared(&self) -> SharedSink {
        Rc::new(self.clone())
    }

    /// Snapshot of every line recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Returns `true` if any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }

    /// Drop every recorded line.
    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

impl fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSink")
            .field("lines", &self.lines.borrow().len())
            .finish()
    }
}
