use serde::{Deserialize, Serialize};

/// Aggregate task counts as computed by the backend. The client never derives
/// these from its (possibly filtered) task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(rename = "pendentes")]
    pub pending: u64,
    #[serde(rename = "emAndamento")]
    pub in_progress: u64,
    #[serde(rename = "concluidas")]
    pub completed: u64,
    pub total: u64,
}

impl Counters {
    /// Share of completed tasks, rounded to the nearest whole percent.
    /// Zero when there are no tasks.
    pub fn completion_percentage(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u64
    }

    /// Whether the per-status counts add up to `total`. A sum that overflows
    /// is inconsistent.
    pub fn is_consistent(&self) -> bool {
        self.pending
            .checked_add(self.in_progress)
            .and_then(|sum| sum.checked_add(self.completed))
            .is_some_and(|sum| sum == self.total)
    }
}
