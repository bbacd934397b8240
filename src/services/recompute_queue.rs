// src/services/recompute_queue.rs
//
// Fire-and-forget delivery of recompute targets.
//
// Inline runs the recompute on the caller's thread. Background hands the
// target to a tokio worker that runs each recompute on the blocking pool;
// `settled()` resolves once everything enqueued so far has been processed.
// In both modes failures are logged and dropped.

use log::{error, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Notify};

use super::aggregates::AggregateEngine;
use crate::domain::AggregateTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeMode {
    Inline,
    Background,
}

pub struct RecomputeQueue {
    engine: Arc<AggregateEngine>,
    sender: Option<mpsc::UnboundedSender<AggregateTarget>>,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl RecomputeQueue {
    pub fn inline(engine: Arc<AggregateEngine>) -> Self {
        Self {
            engine,
            sender: None,
            pending: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Spawn the worker on `runtime`
    pub fn background(engine: Arc<AggregateEngine>, runtime: &Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let idle = Arc::new(Notify::new());

        runtime.spawn(run_worker(
            Arc::clone(&engine),
            receiver,
            Arc::clone(&pending),
            Arc::clone(&idle),
        ));

        info!("Background recompute worker started");

        Self {
            engine,
            sender: Some(sender),
            pending,
            idle,
        }
    }

    /// Background when a tokio runtime is reachable from this thread,
    /// inline otherwise
    pub fn for_mode(engine: Arc<AggregateEngine>, mode: RecomputeMode) -> Self {
        match (mode, Handle::try_current()) {
            (RecomputeMode::Background, Ok(runtime)) => Self::background(engine, &runtime),
            (RecomputeMode::Background, Err(_)) => {
                warn!("No tokio runtime available, recomputing inline");
                Self::inline(engine)
            }
            (RecomputeMode::Inline, _) => Self::inline(engine),
        }
    }

    pub fn mode(&self) -> RecomputeMode {
        if self.sender.is_some() {
            RecomputeMode::Background
        } else {
            RecomputeMode::Inline
        }
    }

    /// Schedule a recompute and return immediately
    pub fn enqueue(&self, target: AggregateTarget) {
        let Some(sender) = &self.sender else {
            self.engine.recompute_logged(target);
            return;
        };

        self.pending.fetch_add(1, Ordering::SeqCst);
        if let Err(mpsc::error::SendError(target)) = sender.send(target) {
            warn!("Recompute worker stopped, running {:?} inline", target);
            self.finish_one();
            self.engine.recompute_logged(target);
        }
    }

    /// Targets enqueued but not yet processed
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Wait until every target enqueued so far has been processed
    pub async fn settled(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }

            notified.await;
        }
    }

    fn finish_one(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

async fn run_worker(
    engine: Arc<AggregateEngine>,
    mut receiver: mpsc::UnboundedReceiver<AggregateTarget>,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
) {
    while let Some(target) = receiver.recv().await {
        let engine = Arc::clone(&engine);
        if let Err(e) = tokio::task::spawn_blocking(move || engine.recompute_logged(target)).await
        {
            error!("Recompute task for {:?} aborted: {}", target, e);
        }

        if pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            idle.notify_waiters();
        }
    }

    info!("Background recompute worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::repositories::comment_repository::MockCommentRepository;
    use crate::repositories::episode_repository::MockEpisodeRepository;
    use crate::repositories::reply_repository::MockReplyRepository;
    use crate::repositories::review_repository::MockReviewRepository;
    use crate::repositories::season_repository::MockSeasonRepository;
    use crate::repositories::series_repository::MockSeriesRepository;
    use uuid::Uuid;

    fn engine_counting_seasons(calls: usize) -> Arc<AggregateEngine> {
        let mut season = MockSeasonRepository::new();
        season
            .expect_count_by_series()
            .times(calls)
            .returning(|_| Ok(Some(1)));
        let mut series = MockSeriesRepository::new();
        series
            .expect_set_seasons_count()
            .times(calls)
            .returning(|_, _| Ok(false));

        Arc::new(AggregateEngine::new(
            Arc::new(series),
            Arc::new(season),
            Arc::new(MockEpisodeRepository::new()),
            Arc::new(MockCommentRepository::new()),
            Arc::new(MockReplyRepository::new()),
            Arc::new(MockReviewRepository::new()),
            Arc::new(EventBus::new()),
        ))
    }

    #[test]
    fn test_inline_runs_on_caller_thread() {
        let queue = RecomputeQueue::inline(engine_counting_seasons(1));
        queue.enqueue(AggregateTarget::SeriesSeasons(Uuid::new_v4()));
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.mode(), RecomputeMode::Inline);
    }

    #[test]
    fn test_background_without_runtime_falls_back_to_inline() {
        let queue =
            RecomputeQueue::for_mode(engine_counting_seasons(0), RecomputeMode::Background);
        assert_eq!(queue.mode(), RecomputeMode::Inline);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_background_settles_after_all_targets() {
        let queue =
            RecomputeQueue::for_mode(engine_counting_seasons(3), RecomputeMode::Background);
        assert_eq!(queue.mode(), RecomputeMode::Background);

        for _ in 0..3 {
            queue.enqueue(AggregateTarget::SeriesSeasons(Uuid::new_v4()));
        }

        queue.settled().await;
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test]
    async fn test_settled_returns_immediately_when_idle() {
        let queue = RecomputeQueue::for_mode(engine_counting_seasons(0), RecomputeMode::Background);
        queue.settled().await;
    }
}
