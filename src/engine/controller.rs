use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;
use tokio::{sync::broadcast, sync::Mutex, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    models::{OptionReview, QuizDefinition, QuizView, Snapshot, Summary},
    settings::RunnerConfig,
    storage::SnapshotStore,
};

use super::QuizEngine;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum QuizEvent {
    #[serde(rename = "state_changed")]
    StateChanged { view: QuizView },

    #[serde(rename = "tick", rename_all = "camelCase")]
    Tick { remaining_sec: u64 },

    #[serde(rename = "finished", rename_all = "camelCase")]
    Finished {
        summary: Summary,
        finished_at: DateTime<Utc>,
        timed_out: bool,
    },
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Owns the single active attempt.
///
/// Every mutation, whether from the user or the ticker, goes through the
/// engine mutex, is followed by a snapshot write, and is announced on the
/// event channel.
#[derive(Clone)]
pub struct QuizController {
    engine: Arc<Mutex<QuizEngine>>,
    definition: Arc<QuizDefinition>,
    store: Arc<dyn SnapshotStore>,
    events: broadcast::Sender<QuizEvent>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
    debug: bool,
}

impl QuizController {
    pub fn new(
        definition: QuizDefinition,
        store: Arc<dyn SnapshotStore>,
        config: &RunnerConfig,
    ) -> Self {
        let stored = store.load();
        let mut engine = QuizEngine::from_snapshot(&definition, stored.as_ref());
        if engine.is_finished() {
            // Restored finished attempts have no cached summary yet.
            engine.finish();
        }

        match &stored {
            Some(snapshot) if snapshot.quiz_title == definition.title => {
                info!(
                    "Resuming '{}' at question {} with {}s left",
                    definition.title,
                    engine.current_index().saturating_add(1),
                    engine.remaining_sec()
                );
            }
            Some(snapshot) => {
                info!(
                    "Ignoring saved progress for '{}'; starting '{}' fresh",
                    snapshot.quiz_title, definition.title
                );
            }
            None => info!("Starting '{}'", definition.title),
        }

        persist_snapshot(store.as_ref(), &engine);

        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            definition: Arc::new(definition),
            store,
            events,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: config.tick_interval,
            debug: config.debug,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QuizEvent> {
        self.events.subscribe()
    }

    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    pub async fn view(&self) -> QuizView {
        self.engine.lock().await.view()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.engine.lock().await.to_snapshot()
    }

    pub async fn summary(&self) -> Option<Summary> {
        self.engine.lock().await.summary().copied()
    }

    pub async fn review(&self, idx: usize) -> Option<Vec<OptionReview>> {
        self.engine.lock().await.review(idx)
    }

    pub async fn next(&self) -> QuizView {
        self.apply("next", QuizEngine::next).await
    }

    pub async fn prev(&self) -> QuizView {
        self.apply("prev", QuizEngine::prev).await
    }

    pub async fn go_to(&self, idx: usize) -> QuizView {
        self.apply("go_to", |engine| engine.go_to(idx)).await
    }

    pub async fn select(&self, option_index: usize) -> QuizView {
        let (recorded, view) = {
            let mut engine = self.engine.lock().await;
            let recorded = engine.select(option_index);
            if recorded {
                self.persist(&engine);
            }
            (recorded, engine.view())
        };

        if recorded {
            debug!(
                "Recorded option {} for question {}",
                option_index.saturating_add(1),
                view.current_index.saturating_add(1)
            );
            self.emit(QuizEvent::StateChanged { view: view.clone() });
        } else {
            debug!("Ignored selection of option {}", option_index.saturating_add(1));
        }
        view
    }

    pub async fn finish(&self) -> Summary {
        let (was_finished, summary, view) = {
            let mut engine = self.engine.lock().await;
            let was_finished = engine.is_finished();
            let summary = engine.finish();
            self.persist(&engine);
            (was_finished, summary, engine.view())
        };

        self.stop_ticker().await;

        if !was_finished {
            self.emit(QuizEvent::StateChanged { view });
            self.announce_finished(summary, false);
        }
        summary
    }

    /// Charges one second. Returns the summary once the attempt is over.
    pub async fn tick(&self) -> Option<Summary> {
        let (was_finished, outcome, remaining_sec) = {
            let mut engine = self.engine.lock().await;
            let was_finished = engine.is_finished();
            let outcome = engine.tick();
            if !was_finished {
                self.persist(&engine);
            }
            (was_finished, outcome, engine.remaining_sec())
        };

        if was_finished {
            return outcome;
        }

        if self.debug {
            info!("Tick: {remaining_sec}s left");
        } else {
            debug!("Tick: {remaining_sec}s left");
        }
        self.emit(QuizEvent::Tick { remaining_sec });

        if let Some(summary) = outcome {
            self.announce_finished(summary, true);
        }
        outcome
    }

    /// Discards the current attempt, including its stored snapshot, and
    /// starts over with the full time limit.
    pub async fn restart(&self) -> QuizView {
        self.stop_ticker().await;

        if let Err(err) = self.store.clear() {
            error!("Failed to clear saved progress: {err:#}");
        }

        let view = {
            let mut engine = self.engine.lock().await;
            *engine = QuizEngine::new(&self.definition);
            self.persist(&engine);
            engine.view()
        };

        info!("Restarted '{}'", self.definition.title);
        self.emit(QuizEvent::StateChanged { view: view.clone() });
        self.start_ticker().await;
        view
    }

    /// Spawns the countdown task. The first tick lands one interval after
    /// the call. Does nothing for a finished attempt.
    pub async fn start_ticker(&self) {
        if self.engine.lock().await.is_finished() {
            return;
        }

        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel.cancel();
            previous.handle.abort();
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let controller = self.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval =
                time::interval_at(time::Instant::now() + tick_interval, tick_interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if controller.tick().await.is_some() {
                            break;
                        }
                    }
                }
            }
            debug!("Ticker stopped");
        });

        *ticker_guard = Some(Ticker { handle, cancel });
    }

    pub async fn stop_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel.cancel();
            ticker.handle.abort();
        }
    }

    async fn apply<F>(&self, action: &str, mutate: F) -> QuizView
    where
        F: FnOnce(&mut QuizEngine),
    {
        let view = {
            let mut engine = self.engine.lock().await;
            mutate(&mut *engine);
            self.persist(&engine);
            engine.view()
        };

        debug!(
            "{action}: question {}/{}",
            view.current_index.saturating_add(1),
            view.total
        );
        self.emit(QuizEvent::StateChanged { view: view.clone() });
        view
    }

    fn persist(&self, engine: &QuizEngine) {
        persist_snapshot(self.store.as_ref(), engine);
    }

    fn announce_finished(&self, summary: Summary, timed_out: bool) {
        info!(
            "Finished '{}'{}: {}/{} correct ({}), {}",
            self.definition.title,
            if timed_out { " (time's up)" } else { "" },
            summary.correct,
            summary.total,
            summary.percent_display(),
            if summary.passed { "passed" } else { "failed" }
        );
        self.emit(QuizEvent::Finished {
            summary,
            finished_at: Utc::now(),
            timed_out,
        });
    }

    fn emit(&self, event: QuizEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn persist_snapshot(store: &dyn SnapshotStore, engine: &QuizEngine) {
    if let Err(err) = store.save(&engine.to_snapshot()) {
        error!("Failed to save progress: {err:#}");
    }
}
