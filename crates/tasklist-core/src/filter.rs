//! Filter and sort pipeline producing the visible subset of tasks.

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::task::{Priority, Task, parse_due_date};
use crate::text_matcher::TextMatcher;

/// Completion status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Keep everything.
    #[default]
    All,
    /// Keep open tasks.
    Active,
    /// Keep finished tasks.
    Completed,
}

impl StatusFilter {
    /// Token used in configuration and the shell.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    const fn keeps(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Priority filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    /// Keep every priority.
    #[default]
    All,
    /// Keep only `low`.
    Low,
    /// Keep only `medium`.
    Medium,
    /// Keep only `high`.
    High,
}

impl PriorityFilter {
    /// Token used in configuration and the shell.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// The single priority this filter keeps, if it is restrictive.
    #[must_use]
    pub const fn priority(self) -> Option<Priority> {
        match self {
            Self::All => None,
            Self::Low => Some(Priority::Low),
            Self::Medium => Some(Priority::Medium),
            Self::High => Some(Priority::High),
        }
    }

    fn keeps(self, task: &Task) -> bool {
        self.priority().is_none_or(|wanted| task.priority == wanted)
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Newest first.
    #[default]
    CreatedAt,
    /// Alphabetical by root collation; lowercase first on case-only ties.
    Title,
    /// High before medium before low.
    Priority,
    /// Earliest due date first; undated tasks last.
    DueDate,
    /// Physical collection order, as changed by reorder-to-front.
    Manual,
}

impl SortKey {
    /// Token used in configuration and the shell.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::Manual => "manual",
        }
    }

    fn compare(self, collator: Option<&CollatorBorrowed<'static>>, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::CreatedAt => b.created_at.cmp(&a.created_at),
            Self::Title => compare_titles(collator, &a.title, &b.title),
            Self::Priority => b.priority.rank().cmp(&a.priority.rank()),
            Self::DueDate => compare_due_dates(a.due_date.as_deref(), b.due_date.as_deref()),
            Self::Manual => Ordering::Equal,
        }
    }
}

/// The live status/priority/search/sort configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Completion status filter.
    #[serde(default)]
    pub status: StatusFilter,
    /// Priority filter.
    #[serde(default)]
    pub priority: PriorityFilter,
    /// Free-text search; blank matches everything.
    #[serde(default)]
    pub search: String,
    /// Sort key.
    #[serde(default)]
    pub sort: SortKey,
}

impl FilterCriteria {
    /// Returns true when no task can be filtered out.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.status == StatusFilter::All
            && self.priority == PriorityFilter::All
            && self.search.trim().is_empty()
    }

    fn matches_with(&self, task: &Task, matcher: Option<&TextMatcher>) -> bool {
        self.status.keeps(task)
            && self.priority.keeps(task)
            && matcher.is_none_or(|matcher| matcher.matches(task))
    }

    /// Run the pipeline: filter `tasks`, then sort the survivors.
    ///
    /// The input is left untouched. Ties keep their collection order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let matcher = TextMatcher::new(&self.search);
        let mut visible: Vec<&Task> = tasks
            .iter()
            .filter(|task| self.matches_with(task, matcher.as_ref()))
            .collect();
        let key = self.sort;
        let collator = (key == SortKey::Title).then(title_collator).flatten();
        visible.sort_by(|a, b| key.compare(collator.as_ref(), a, b));
        visible
    }
}

/// Root-locale collator; `None` only if the compiled collation data is unusable.
fn title_collator() -> Option<CollatorBorrowed<'static>> {
    Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()).ok()
}

/// Collated title ordering. Without a collator, compares lowercase code points.
fn compare_titles(collator: Option<&CollatorBorrowed<'static>>, a: &str, b: &str) -> Ordering {
    let primary = collator.map_or_else(
        || a.to_lowercase().cmp(&b.to_lowercase()),
        |collator| collator.compare(a, b),
    );
    primary.then_with(|| b.cmp(a))
}

fn compare_due_dates(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (parse_due_date(a), parse_due_date(b)) {
            (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
            _ => a.cmp(b),
        },
    }
}
