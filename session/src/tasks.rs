use std::future::Future;

use anyhow::Result;
use log::{debug, warn};
use tokio::task::JoinHandle;

#[derive(Debug)]
pub enum TaskOutcome<K> {
    Completed(K),
    Failed(K, anyhow::Error),
    Cancelled(K),
}

impl<K> TaskOutcome<K> {
    pub fn key(&self) -> &K {
        match self {
            TaskOutcome::Completed(key)
            | TaskOutcome::Failed(key, _)
            | TaskOutcome::Cancelled(key) => key,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed(_))
    }
}

/// Requests whose completion the view does not wait for.
///
/// Nothing is retried. A task keeps running after the view moves on, and its
/// outcome is only observed through [`BackgroundTasks::take_finished`] or
/// [`BackgroundTasks::settle`]. [`BackgroundTasks::abort_all`] signals
/// cancellation without waiting; dropping the tracker aborts whatever is
/// still running.
#[derive(Debug)]
pub struct BackgroundTasks<K> {
    handles: Vec<(K, JoinHandle<Result<()>>)>,
}

impl<K> Default for BackgroundTasks<K> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<K> BackgroundTasks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, key: K, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.handles.push((key, tokio::spawn(task)));
    }

    /// Number of tracked tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.handles
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn abort_all(&self) {
        for (_, handle) in &self.handles {
            handle.abort();
        }
    }

    /// Waits for every tracked task and reports how each one ended.
    #[must_use]
    pub async fn settle(&mut self) -> Vec<TaskOutcome<K>> {
        let handles = std::mem::take(&mut self.handles);
        collect(handles).await
    }

    /// Reports the tasks that already finished and keeps tracking the rest.
    #[must_use]
    pub async fn take_finished(&mut self) -> Vec<TaskOutcome<K>> {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.handles)
            .into_iter()
            .partition(|(_, handle)| handle.is_finished());
        self.handles = running;

        collect(finished).await
    }
}

impl<K> Drop for BackgroundTasks<K> {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            debug!("aborting {} background request(s)", self.pending());
            self.abort_all();
        }
    }
}

async fn collect<K>(handles: Vec<(K, JoinHandle<Result<()>>)>) -> Vec<TaskOutcome<K>> {
    let mut outcomes = Vec::with_capacity(handles.len());

    for (key, handle) in handles {
        let outcome = match handle.await {
            Ok(Ok(())) => TaskOutcome::Completed(key),
            Ok(Err(e)) => {
                warn!("background request failed: {e:#}");
                TaskOutcome::Failed(key, e)
            }
            Err(e) if e.is_cancelled() => {
                debug!("background request cancelled");
                TaskOutcome::Cancelled(key)
            }
            Err(e) => TaskOutcome::Failed(key, anyhow::anyhow!("background request panicked: {e}")),
        };
        outcomes.push(outcome);
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_settle_reports_each_outcome_in_spawn_order() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn(1, async { Ok(()) });
        tasks.spawn(2, async { Err(anyhow::anyhow!("boom")) });

        let outcomes = tasks.settle().await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], TaskOutcome::Completed(1)));
        match &outcomes[1] {
            TaskOutcome::Failed(key, e) => {
                assert_eq!(*key, 2);
                assert_eq!(e.to_string(), "boom");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_abort_all_cancels_unfinished_tasks() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("slow", async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        assert_eq!(tasks.pending(), 1);

        tasks.abort_all();
        let outcomes = tasks.settle().await;

        assert!(matches!(outcomes[0], TaskOutcome::Cancelled("slow")));
    }

    #[tokio::test]
    async fn test_take_finished_keeps_running_tasks() {
        let mut tasks = BackgroundTasks::new();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        tasks.spawn("fast", async { Ok(()) });
        tasks.spawn("blocked", async move {
            wait.await?;
            Ok(())
        });

        while tasks.pending() > 1 {
            tokio::task::yield_now().await;
        }

        let finished = tasks.take_finished().await;
        assert_eq!(finished.len(), 1);
        assert_eq!(*finished[0].key(), "fast");
        assert_eq!(tasks.pending(), 1);

        release.send(()).unwrap();
        let rest = tasks.settle().await;
        assert!(rest[0].is_completed());
    }

    #[tokio::test]
    async fn test_drop_aborts_running_tasks() {
        let (held, closed) = tokio::sync::oneshot::channel::<()>();
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("slow", async move {
            let _held = held;
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });

        drop(tasks);

        let result = tokio::time::timeout(Duration::from_secs(5), closed).await;
        assert!(matches!(result, Ok(Err(_))));
    }

    #[tokio::test]
    async fn test_settle_without_tasks() {
        let mut tasks: BackgroundTasks<u64> = BackgroundTasks::new();
        assert!(tasks.settle().await.is_empty());
        assert_eq!(tasks.pending(), 0);
    }
}
