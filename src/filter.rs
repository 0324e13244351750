// Completion filter and text search over the task collection

use crate::task::Task;
use std::str::FromStr;

/// Completion filter applied when listing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every task regardless of state
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks only
    Completed,
}

impl Filter {
    /// Whether a task passes this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            other => Err(format!(
                "unknown filter '{other}' (expected all, active, or completed)"
            )),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Active => write!(f, "active"),
            Filter::Completed => write!(f, "completed"),
        }
    }
}

/// Select the tasks visible under a filter and search query
///
/// Search is a case-insensitive substring match on the task text; an empty
/// query matches everything. Stored order is preserved, so the result is
/// always a subsequence of the full collection.
pub fn visible<'a>(tasks: &'a [Task], filter: Filter, search: &str) -> Vec<&'a Task> {
    let query = search.to_lowercase();
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .filter(|task| query.is_empty() || task.text.to_lowercase().contains(&query))
        .collect()
}
