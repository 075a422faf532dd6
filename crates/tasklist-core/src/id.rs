use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Identifier of a task, unique within one session.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().trim_start_matches('#').parse()?))
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Issues strictly increasing task identifiers.
///
/// Identifiers are never handed out twice, even after the task holding one
/// has been deleted or the whole collection replaced by an import.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    /// Seed the counter past every identifier in `existing` (or at 1 when empty).
    pub fn seeded<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = TaskId>,
    {
        let next = existing
            .into_iter()
            .map(|id| id.0.saturating_add(1))
            .max()
            .unwrap_or(1);
        Self { next }
    }

    /// Identifier that the next call to [`next_id`](Self::next_id) will return.
    #[must_use]
    pub const fn peek(&self) -> TaskId {
        TaskId(self.next)
    }

    /// Hand out a fresh identifier.
    pub const fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next += 1;
        id
    }
}
