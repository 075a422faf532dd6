use tasklist_core::{FilterCriteria, PriorityFilter, SortKey, StatusFilter};
use thiserror::Error;

/// Error type returned while building criteria from user-facing inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterBuildError {
    /// Status token is not `all`, `active` or `completed`.
    #[error("invalid status: {token}")]
    InvalidStatus {
        /// Token as typed.
        token: String,
    },
    /// Priority token is not `all`, `low`, `medium` or `high`.
    #[error("invalid priority: {token}")]
    InvalidPriority {
        /// Token as typed.
        token: String,
    },
    /// Sort token names no known sort key.
    #[error("invalid sort key: {token}")]
    InvalidSort {
        /// Token as typed.
        token: String,
    },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into [`FilterCriteria`].
#[derive(Debug, Clone, Default)]
pub struct CriteriaBuilder {
    status: StatusFilter,
    priority: PriorityFilter,
    search: Option<String>,
    sort: SortKey,
}

impl CriteriaBuilder {
    /// Create a builder with the default criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing criteria.
    #[must_use]
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            status: criteria.status,
            priority: criteria.priority,
            search: Some(criteria.search.clone()).filter(|text| !text.trim().is_empty()),
            sort: criteria.sort,
        }
    }

    /// Set the status clause from an optional token.
    ///
    /// # Errors
    /// Returns an error if the token is not a known status.
    pub fn with_status(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = token {
            self.status = parse_status_token(token)?;
        }
        Ok(self)
    }

    /// Set the priority clause from an optional token.
    ///
    /// # Errors
    /// Returns an error if the token is not `all` or a priority level.
    pub fn with_priority(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = token {
            self.priority = parse_priority_token(token)?;
        }
        Ok(self)
    }

    /// Set the sort key from an optional token.
    ///
    /// # Errors
    /// Returns an error if the token is not a known sort key.
    pub fn with_sort(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = token {
            self.sort = parse_sort_token(token)?;
        }
        Ok(self)
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_search(mut self, text: Option<String>) -> Self {
        self.search = text.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        self
    }

    /// Build the final [`FilterCriteria`].
    #[must_use]
    pub fn build(self) -> FilterCriteria {
        FilterCriteria {
            status: self.status,
            priority: self.priority,
            search: self.search.unwrap_or_default(),
            sort: self.sort,
        }
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_ascii_lowercase().replace(['-', '_', ' '], "")
}

/// Parse a status token (`all`, `active`, `completed`).
///
/// # Errors
/// Returns an error for any other token.
pub fn parse_status_token(token: &str) -> FilterBuildResult<StatusFilter> {
    match normalize(token).as_str() {
        "all" => Ok(StatusFilter::All),
        "active" | "open" | "pending" => Ok(StatusFilter::Active),
        "completed" | "done" => Ok(StatusFilter::Completed),
        _ => Err(FilterBuildError::InvalidStatus {
            token: token.to_string(),
        }),
    }
}

/// Parse a priority filter token (`all`, `low`, `medium`, `high`).
///
/// # Errors
/// Returns an error for any other token.
pub fn parse_priority_token(token: &str) -> FilterBuildResult<PriorityFilter> {
    match normalize(token).as_str() {
        "all" => Ok(PriorityFilter::All),
        "low" => Ok(PriorityFilter::Low),
        "medium" => Ok(PriorityFilter::Medium),
        "high" => Ok(PriorityFilter::High),
        _ => Err(FilterBuildError::InvalidPriority {
            token: token.to_string(),
        }),
    }
}

/// Parse a sort key token (`createdAt`, `title`, `priority`, `dueDate`, `manual`).
///
/// # Errors
/// Returns an error for any other token.
pub fn parse_sort_token(token: &str) -> FilterBuildResult<SortKey> {
    match normalize(token).as_str() {
        "createdat" | "created" => Ok(SortKey::CreatedAt),
        "title" => Ok(SortKey::Title),
        "priority" => Ok(SortKey::Priority),
        "duedate" | "due" => Ok(SortKey::DueDate),
        "manual" => Ok(SortKey::Manual),
        _ => Err(FilterBuildError::InvalidSort {
            token: token.to_string(),
        }),
    }
}

impl FilterBuildError {
    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::InvalidStatus { token } => {
                format!("unknown status '{token}' (expected all, active or completed)")
            }
            Self::InvalidPriority { token } => {
                format!("unknown priority '{token}' (expected all, low, medium or high)")
            }
            Self::InvalidSort { token } => {
                format!("unknown sort key '{token}' (expected createdAt, title, priority, dueDate or manual)")
            }
        }
    }
}
