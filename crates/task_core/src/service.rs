use crate::analyzer::TaskAnalyzer;
use crate::manager::TaskManager;
use crate::report::ReportGenerator;
use crate::stats::{TaskStatistics, TaskStats};
use crate::storage::TaskStorage;
use std::path::Path;

/// Analytics entry point over a manager. Nothing is cached: every call
/// rebuilds statistics, analyzer and report generator from the current list.
pub struct AnalyzerService<'a, S: TaskStorage> {
    manager: &'a TaskManager<S>,
}

impl<'a, S: TaskStorage> AnalyzerService<'a, S> {
    pub fn new(manager: &'a TaskManager<S>) -> Self {
        Self { manager }
    }

    fn components(&self) -> (TaskAnalyzer<'a>, ReportGenerator<'a>) {
        let tasks = self.manager.tasks();
        let analyzer = TaskAnalyzer::new(TaskStatistics::new(tasks));
        (analyzer, ReportGenerator::new(tasks, analyzer))
    }

    pub fn today_report(&self) -> String {
        let (_, report) = self.components();
        report.generate_summary()
    }

    pub fn export_summary(&self, path: &Path) -> String {
        let (_, report) = self.components();
        report.export_to_txt(path)
    }

    pub fn statistics(&self) -> TaskStats {
        let (analyzer, _) = self.components();
        analyzer.statistics().snapshot()
    }

    pub fn overload_warning(&self, threshold: usize) -> Option<&'static str> {
        let (analyzer, _) = self.components();
        analyzer.overload_warning(threshold)
    }
}
