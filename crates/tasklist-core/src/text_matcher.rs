use crate::task::Task;

/// Case-insensitive substring matcher over task title and description.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Determine whether the title or the description contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title)
            || (!task.description.is_empty() && self.matches_field(&task.description))
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}
