//! Sequential supervised task runner: one spinner per task, failures
//! recorded, execution always continues to the next task.

use std::io::{stderr, IsTerminal, Stderr, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::warn;

use crate::indicator::Spinner;
use crate::settings::Settings;
use crate::style::Theme;
use crate::Result;

type Work<'a> = Box<dyn FnOnce() -> std::result::Result<(), String> + 'a>;

struct Task<'a> {
    title: String,
    work: Work<'a>,
}

/// What happened to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub title: String,
    pub outcome: std::result::Result<(), String>,
}

impl TaskReport {
    pub fn failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// A list of named tasks run back to back, each under its own spinner.
///
/// A task that returns `Err` or panics is reported as failed and the run
/// moves on; the panic never crosses the runner's boundary.
pub struct Tasks<'a> {
    tasks: Vec<Task<'a>>,
    settings: Settings,
}

impl<'a> Tasks<'a> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn add(
        mut self,
        title: impl Into<String>,
        work: impl FnOnce() -> std::result::Result<(), String> + 'a,
    ) -> Self {
        self.tasks.push(Task {
            title: title.into(),
            work: Box::new(work),
        });
        self
    }

    pub fn run(self) -> Result<Vec<TaskReport>> {
        let tty = stderr().is_terminal() && !self.settings.non_interactive();
        let theme = Theme::from_settings(&self.settings);
        self.run_on(|| stderr(), tty, theme)
    }

    /// Sink-injected variant; each task gets a fresh spinner on its own
    /// sink handle.
    pub(crate) fn run_on<W, F>(self, mut sink: F, tty: bool, theme: Theme) -> Result<Vec<TaskReport>>
    where
        W: Write + Send + 'static,
        F: FnMut() -> W,
    {
        let mut reports = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            let spinner = Spinner::start_on(sink(), tty, theme, task.title.clone());
            let outcome = match catch_unwind(AssertUnwindSafe(task.work)) {
                Ok(result) => result,
                Err(panic) => {
                    let text = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "task panicked".to_string());
                    warn!("task {:?} panicked: {text}", task.title);
                    Err(text)
                }
            };
            match &outcome {
                Ok(()) => spinner.success(&task.title)?,
                Err(message) => spinner.error(format!("{}: {message}", task.title))?,
            }
            reports.push(TaskReport {
                title: task.title,
                outcome,
            });
        }
        Ok(reports)
    }
}

impl Default for Tasks<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::indicator::test_sink::SharedSink;

    #[test]
    fn all_tasks_run_in_order() {
        let sink = SharedSink::default();
        let order = Cell::new(0);
        let reports = Tasks::new()
            .add("first", || {
                assert_eq!(order.get(), 0);
                order.set(1);
                Ok(())
            })
            .add("second", || {
                assert_eq!(order.get(), 1);
                order.set(2);
                Ok(())
            })
            .run_on(|| sink.clone(), false, Theme::plain())
            .unwrap();
        assert_eq!(order.get(), 2);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| !r.failed()));
    }

    #[test]
    fn failure_is_recorded_and_the_run_continues() {
        let sink = SharedSink::default();
        let reports = Tasks::new()
            .add("breaks", || Err("boom".to_string()))
            .add("still runs", || Ok(()))
            .run_on(|| sink.clone(), false, Theme::plain())
            .unwrap();
        assert!(reports[0].failed());
        assert_eq!(reports[0].outcome, Err("boom".to_string()));
        assert!(!reports[1].failed());
        assert!(sink.contents().contains("x breaks: boom"));
        assert!(sink.contents().contains("v still runs"));
    }

    #[test]
    fn panic_is_confined_to_its_task() {
        let sink = SharedSink::default();
        let reports = Tasks::new()
            .add("explodes", || panic!("kaboom"))
            .add("survivor", || Ok(()))
            .run_on(|| sink.clone(), false, Theme::plain())
            .unwrap();
        assert!(reports[0].failed());
        assert_eq!(reports[0].outcome, Err("kaboom".to_string()));
        assert!(!reports[1].failed());
    }

    #[test]
    fn empty_task_list_is_a_no_op() {
        let sink = SharedSink::default();
        let reports = Tasks::new()
            .run_on(|| sink.clone(), false, Theme::plain())
            .unwrap();
        assert!(reports.is_empty());
        assert_eq!(sink.contents(), "");
    }
}
