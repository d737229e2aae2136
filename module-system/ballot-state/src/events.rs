use serde::{Deserialize, Serialize};

/// An event emitted during the execution of a call. Events of a reverted call are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifies the kind of event, e.g. `"Election: vote"`.
    pub key: String,
    /// Human readable payload.
    pub value: String,
}

impl Event {
    /// Creates a new event.
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}
