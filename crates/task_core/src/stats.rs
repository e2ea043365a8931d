use crate::model::{Task, TaskStatus};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Label counts in order of first occurrence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Distribution(Vec<(String, usize)>);

impl Distribution {
    fn record(&mut self, label: &str) {
        match self.0.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, count)) => *count += 1,
            None => self.0.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, count)| *count)
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.0
    }

    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .0
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_rate: f64,
    pub by_category: Distribution,
    pub by_priority: Distribution,
}

/// Read-only aggregation over a task snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TaskStatistics<'a> {
    tasks: &'a [Task],
}

impl<'a> TaskStatistics<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed(&self) -> usize {
        self.count_status(TaskStatus::Done)
    }

    pub fn pending(&self) -> usize {
        self.count_status(TaskStatus::Pending)
    }

    fn count_status(&self, status: TaskStatus) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.status == status)
            .count()
    }

    /// Percentage in `0.0..=100.0`; an empty list is `0.0`.
    pub fn completion_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.completed() as f64 / total as f64 * 100.0
    }

    pub fn by_category(&self) -> Distribution {
        let mut distribution = Distribution::default();
        for task in self.tasks {
            distribution.record(&task.category);
        }
        distribution
    }

    pub fn by_priority(&self) -> Distribution {
        let mut distribution = Distribution::default();
        for task in self.tasks {
            distribution.record(task.priority.label());
        }
        distribution
    }

    pub fn snapshot(&self) -> TaskStats {
        TaskStats {
            total: self.total(),
            completed: self.completed(),
            pending: self.pending(),
            completion_rate: self.completion_rate(),
            by_category: self.by_category(),
            by_priority: self.by_priority(),
        }
    }
}
