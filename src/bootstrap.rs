// Bootstrap Loader
//
// Loads every entity kind's store from its external source exactly once, in
// parallel: one scoped OS thread per source, one aggregate report collected
// only after every thread has finished. A failing source never cancels or
// delays its siblings; its failure is captured per-source in the report.
// The scope join releases all worker threads unconditionally, success or not.
//
// There is no per-source timeout: a source that hangs (e.g. a blocked
// filesystem) hangs the whole first load.

use std::thread;

use anyhow::Result;
use log::{info, warn};

/// One named unit of bootstrap work. The closure reads a source and
/// populates its store, returning how many entities it loaded.
pub struct LoadTask<'a> {
    name: String,
    run: Box<dyn FnOnce() -> Result<usize> + Send + 'a>,
}

impl<'a> LoadTask<'a> {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: FnOnce() -> Result<usize> + Send + 'a,
    {
        LoadTask {
            name: name.into(),
            run: Box::new(run),
        }
    }
}

/// Per-source outcome: loaded count, or the failure rendered with its
/// full context chain.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub name: String,
    pub result: Result<usize, String>,
}

impl SourceReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate outcome of one bootstrap run, in task order.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub sources: Vec<SourceReport>,
}

impl LoadReport {
    pub fn all_succeeded(&self) -> bool {
        self.sources.iter().all(SourceReport::is_ok)
    }

    pub fn total_loaded(&self) -> usize {
        self.sources
            .iter()
            .filter_map(|s| s.result.as_ref().ok())
            .sum()
    }

    pub fn failures(&self) -> Vec<&SourceReport> {
        self.sources.iter().filter(|s| !s.is_ok()).collect()
    }
}

/// Runs every task on its own thread and blocks until all of them finish,
/// then assembles the aggregate report. This is the only blocking point in
/// the data tier, and it runs at most once per catalog construction.
pub fn load_all(tasks: Vec<LoadTask>) -> LoadReport {
    info!("bootstrap: loading {} sources in parallel", tasks.len());

    let mut sources = Vec::with_capacity(tasks.len());
    thread::scope(|scope| {
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| (task.name, scope.spawn(task.run)))
            .collect();

        // Joining inside the scope keeps per-task identity; the scope itself
        // guarantees no worker outlives this function.
        for (name, handle) in handles {
            let result = match handle.join() {
                Ok(Ok(count)) => {
                    info!("bootstrap: source '{}' loaded {} entities", name, count);
                    Ok(count)
                }
                Ok(Err(err)) => {
                    warn!("bootstrap: source '{}' failed: {:#}", name, err);
                    Err(format!("{:#}", err))
                }
                Err(_) => {
                    warn!("bootstrap: source '{}' panicked", name);
                    Err("load task panicked".to_string())
                }
            };
            sources.push(SourceReport { name, result });
        }
    });

    LoadReport { sources }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[test]
    fn test_all_tasks_run_and_report_in_order() {
        let report = load_all(vec![
            LoadTask::new("students", || Ok(3)),
            LoadTask::new("courses", || Ok(2)),
            LoadTask::new("instructors", || Ok(1)),
            LoadTask::new("modules", || Ok(4)),
        ]);

        assert!(report.all_succeeded());
        assert_eq!(report.total_loaded(), 10);
        let names: Vec<&str> = report.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["students", "courses", "instructors", "modules"]);
    }

    #[test]
    fn test_one_failure_does_not_block_siblings() {
        let loaded = AtomicUsize::new(0);
        let report = load_all(vec![
            LoadTask::new("good-a", || {
                loaded.fetch_add(1, Ordering::SeqCst);
                Ok(5)
            }),
            LoadTask::new("bad", || Err(anyhow!("source file corrupted"))),
            LoadTask::new("good-b", || {
                loaded.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            }),
        ]);

        assert_eq!(loaded.load(Ordering::SeqCst), 2);
        assert!(!report.all_succeeded());
        assert_eq!(report.total_loaded(), 12);

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "bad");
        assert!(failures[0]
            .result
            .as_ref()
            .unwrap_err()
            .contains("corrupted"));
    }

    #[test]
    fn test_panicking_task_is_reported_not_propagated() {
        let report = load_all(vec![
            LoadTask::new("panics", || panic!("boom")),
            LoadTask::new("fine", || Ok(1)),
        ]);

        assert!(!report.all_succeeded());
        assert_eq!(report.total_loaded(), 1);
        assert_eq!(
            report.sources[0].result.as_ref().unwrap_err(),
            "load task panicked"
        );
    }

    #[test]
    fn test_sources_load_in_parallel_not_sequentially() {
        const NAP: Duration = Duration::from_millis(100);

        let start = Instant::now();
        let report = load_all(
            (0..4)
                .map(|i| {
                    LoadTask::new(format!("slow-{}", i), move || {
                        thread::sleep(NAP);
                        Ok(1)
                    })
                })
                .collect(),
        );
        let elapsed = start.elapsed();

        assert!(report.all_succeeded());
        // Wall clock tracks the slowest source, not the sum of all four.
        assert!(
            elapsed < NAP * 3,
            "expected parallel load, took {:?}",
            elapsed
        );
    }
}
