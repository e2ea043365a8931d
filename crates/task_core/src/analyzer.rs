use crate::stats::{Distribution, TaskStatistics};

pub const DEFAULT_OVERLOAD_THRESHOLD: usize = 5;
pub const OVERLOAD_WARNING: &str = "Warning: too many pending tasks, please prioritize your backlog!";

#[derive(Debug, Clone, Copy)]
pub struct TaskAnalyzer<'a> {
    statistics: TaskStatistics<'a>,
}

impl<'a> TaskAnalyzer<'a> {
    pub fn new(statistics: TaskStatistics<'a>) -> Self {
        Self { statistics }
    }

    pub fn statistics(&self) -> &TaskStatistics<'a> {
        &self.statistics
    }

    /// True when pending tasks strictly exceed `threshold`.
    pub fn check_task_overload(&self, threshold: usize) -> bool {
        self.statistics.pending() > threshold
    }

    pub fn overload_warning(&self, threshold: usize) -> Option<&'static str> {
        self.check_task_overload(threshold).then_some(OVERLOAD_WARNING)
    }

    pub fn priority_distribution(&self) -> Distribution {
        self.statistics.by_priority()
    }

    pub fn completion_rate(&self) -> f64 {
        self.statistics.completion_rate()
    }
}
