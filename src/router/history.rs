//! Session history
//!
//! The engine's view of the browser history stack: entries carry the URL in
//! a JSON state object, pushes truncate the forward tail, and back/forward
//! traversals produce the popstate events that re-enter the controller.

use serde_json::{Value, json};

/// One session-history entry
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Entry URL
    pub url: String,
    /// State object attached to the entry
    pub state: Value,
}

/// Event produced by a back/forward traversal
#[derive(Debug, Clone, PartialEq)]
pub struct PopStateEvent {
    /// State object of the entry the traversal landed on
    pub state: Value,
}

impl PopStateEvent {
    /// URL carried in the state object, if any
    pub fn url(&self) -> Option<&str> {
        self.state.get("url").and_then(Value::as_str)
    }
}

/// Session-history stack with a cursor
#[derive(Debug)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl SessionHistory {
    /// Start with a single entry for the initial location.
    /// The entry has no state object until the router replaces it.
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url.into(),
                state: Value::Null,
            }],
            index: 0,
        }
    }

    /// State object carrying `url`, as the router stores it
    pub fn state_for(url: &str) -> Value {
        json!({ "url": url })
    }

    /// The entry the cursor sits on
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    /// Replace the current entry in place
    pub fn replace(&mut self, url: impl Into<String>, state: Value) {
        self.entries[self.index] = HistoryEntry {
            url: url.into(),
            state,
        };
    }

    /// Push a new entry, discarding any forward entries
    pub fn push(&mut self, url: impl Into<String>, state: Value) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url: url.into(),
            state,
        });
        self.index += 1;
    }

    /// Step back one entry; `None` at the start of the stack
    pub fn back(&mut self) -> Option<PopStateEvent> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(PopStateEvent {
            state: self.current().state.clone(),
        })
    }

    /// Step forward one entry; `None` at the end of the stack
    pub fn forward(&mut self) -> Option<PopStateEvent> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(PopStateEvent {
            state: self.current().state.clone(),
        })
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty (never true: there is always one entry)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
