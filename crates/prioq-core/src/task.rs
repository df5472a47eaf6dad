use crate::Priority;
use serde::{Deserialize, Serialize};

/// A queued unit of work: an opaque text payload tagged with a
/// priority tier. Tasks carry no identity and no timestamp; two tasks
/// with identical fields are indistinguishable and queue
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub body: String,

    /// Missing on the wire means `low`.
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn new(body: impl Into<String>, priority: Priority) -> Self {
        Task {
            body: body.into(),
            priority,
        }
    }
}
