//! Campaign progress pollers
//!
//! One tokio task per running campaign. Each task fetches progress right
//! away, then once per period, until the backend reports nothing pending.
//! Tasks hang off a registry-wide cancellation token so none can outlive
//! the registry.

use super::core::{EventSender, ProgressBoard, lock};
use crate::api::OutreachApi;
use crate::api::error_handler::ErrorHandler;
use crate::events::Event;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

struct Slot {
    /// Distinguishes successive pollers for the same campaign id.
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct Slots {
    next_generation: u64,
    active: HashMap<u64, Slot>,
}

/// Owns every running poller.
pub struct PollerRegistry {
    api: Arc<dyn OutreachApi>,
    board: ProgressBoard,
    events: EventSender,
    period: Duration,
    root: CancellationToken,
    slots: Arc<Mutex<Slots>>,
}

impl PollerRegistry {
    pub fn new(
        api: Arc<dyn OutreachApi>,
        board: ProgressBoard,
        events: EventSender,
        period: Duration,
    ) -> Self {
        Self {
            api,
            board,
            events,
            period,
            root: CancellationToken::new(),
            slots: Arc::new(Mutex::new(Slots::default())),
        }
    }

    /// Starts polling `campaign_id`. Returns `false` without doing anything
    /// when a poller for it already runs or the registry has been disposed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, campaign_id: u64) -> bool {
        let mut slots = lock(&self.slots);
        if self.root.is_cancelled() || slots.active.contains_key(&campaign_id) {
            return false;
        }
        let generation = slots.next_generation;
        slots.next_generation += 1;
        let token = self.root.child_token();
        slots.active.insert(
            campaign_id,
            Slot {
                generation,
                token: token.clone(),
            },
        );
        drop(slots);

        let poller = Poller {
            campaign_id,
            generation,
            token,
            period: self.period,
            api: Arc::clone(&self.api),
            board: self.board.clone(),
            events: self.events.clone(),
            slots: Arc::clone(&self.slots),
            error_handler: ErrorHandler::new(),
        };
        tokio::spawn(poller.run());
        debug!("Started progress poller for campaign {}", campaign_id);
        true
    }

    /// Cancels the poller for `campaign_id`, if any.
    pub fn stop(&self, campaign_id: u64) -> bool {
        match lock(&self.slots).active.remove(&campaign_id) {
            Some(slot) => {
                slot.token.cancel();
                debug!("Stopped progress poller for campaign {}", campaign_id);
                true
            }
            None => false,
        }
    }

    /// Cancels every poller. The registry stays usable.
    pub fn stop_all(&self) {
        let mut slots = lock(&self.slots);
        for (_, slot) in slots.active.drain() {
            slot.token.cancel();
        }
    }

    /// Cancels every poller and refuses new ones from now on.
    pub fn dispose(&self) {
        self.root.cancel();
        lock(&self.slots).active.clear();
    }

    pub fn is_polling(&self, campaign_id: u64) -> bool {
        lock(&self.slots).active.contains_key(&campaign_id)
    }

    /// Ids with a running poller, ascending.
    pub fn active_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = lock(&self.slots).active.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        lock(&self.slots).active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PollerRegistry {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

struct Poller {
    campaign_id: u64,
    generation: u64,
    token: CancellationToken,
    period: Duration,
    api: Arc<dyn OutreachApi>,
    board: ProgressBoard,
    events: EventSender,
    slots: Arc<Mutex<Slots>>,
    error_handler: ErrorHandler,
}

impl Poller {
    async fn run(self) {
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                result = self.api.campaign_progress(self.campaign_id) => result,
            };

            match result {
                Ok(progress) => {
                    if self.token.is_cancelled() {
                        break;
                    }
                    self.board.record(self.campaign_id, progress);
                    if progress.is_finished() {
                        let permit = tokio::select! {
                            biased;
                            _ = self.token.cancelled() => break,
                            permit = self.events.reserve() => permit,
                        };
                        let completed = Event::completed(self.campaign_id, progress);
                        // The completion is queued before the slot disappears.
                        self.release(|| {
                            if let Some(permit) = permit {
                                permit.send(completed);
                            }
                        });
                        return;
                    }
                    self.events
                        .try_send_event(Event::progress(self.campaign_id, progress));
                }
                Err(e) => {
                    // The next tick retries; only a finished snapshot ends polling.
                    let log_level = self.error_handler.classify_error(&e);
                    debug!(
                        "Progress fetch for campaign {} failed: {}",
                        self.campaign_id, e
                    );
                    self.events.try_send_event(Event::poll_failed(
                        self.campaign_id,
                        e.user_message(),
                        log_level,
                    ));
                }
            }
        }
        debug!("Poller for campaign {} cancelled", self.campaign_id);
    }

    /// Removes this poller's slot and runs `on_release` under the same lock.
    /// Does nothing if the slot was already taken away by `stop` or now
    /// belongs to a newer poller.
    fn release(&self, on_release: impl FnOnce()) {
        let mut slots = lock(&self.slots);
        if slots
            .active
            .get(&self.campaign_id)
            .is_some_and(|slot| slot.generation == self.generation)
        {
            slots.active.remove(&self.campaign_id);
            on_release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockOutreachApi;
    use crate::api::error::ApiError;
    use crate::events::EventType;
    use crate::models::Progress;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    const PERIOD: Duration = Duration::from_secs(5);

    fn pending(n: u64) -> Progress {
        Progress {
            total: 10,
            sent: 10 - n,
            pending: n,
            failed: 0,
        }
    }

    /// Mock whose progress endpoint answers from `script` (last entry
    /// repeats) and counts calls.
    fn scripted_api(
        script: Vec<Result<Progress, u16>>,
    ) -> (Arc<dyn OutreachApi>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut mock = MockOutreachApi::new();
        mock.expect_campaign_progress().returning(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            match script[n.min(script.len() - 1)] {
                Ok(progress) => Ok(progress),
                Err(status) => Err(ApiError::Http {
                    status,
                    message: "unavailable".to_string(),
                }),
            }
        });
        (Arc::new(mock), calls)
    }

    fn registry(api: Arc<dyn OutreachApi>) -> (PollerRegistry, ProgressBoard, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(16);
        let board = ProgressBoard::new();
        let registry = PollerRegistry::new(api, board.clone(), EventSender::new(tx), PERIOD);
        (registry, board, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_is_a_noop() {
        let (api, calls) = scripted_api(vec![Ok(pending(5))]);
        let (registry, _board, _rx) = registry(api);

        assert!(registry.start(3));
        assert!(!registry.start(3));
        time::sleep(Duration::from_millis(1)).await;

        // One task, one immediate fetch.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.active_ids(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_snapshot_releases_slot() {
        let (api, calls) = scripted_api(vec![Ok(pending(7)), Ok(pending(0))]);
        let (registry, board, mut rx) = registry(api);

        registry.start(8);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type, EventType::Progress);
        assert!(registry.is_polling(8));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Completed);
        assert!(!registry.is_polling(8));
        assert_eq!(board.get(8), Some(pending(0)));

        time::sleep(PERIOD * 4).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_is_queued_when_slot_is_released() {
        let (api, _calls) = scripted_api(vec![Ok(pending(0))]);
        let (registry, _board, mut rx) = registry(api);

        registry.start(1);
        registry.start(2);
        while !registry.is_empty() {
            tokio::task::yield_now().await;
        }

        let mut completed: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|e| e.event_type == EventType::Completed)
            .filter_map(|e| e.campaign_id)
            .collect();
        completed.sort_unstable();
        assert_eq!(completed, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_polling() {
        let (api, calls) = scripted_api(vec![Err(503), Err(429), Ok(pending(2))]);
        let (registry, board, mut rx) = registry(api);

        registry.start(1);
        let failure = rx.recv().await.unwrap();
        assert_eq!(failure.event_type, EventType::Error);
        assert!(board.get(1).is_none());

        time::sleep(PERIOD * 2 + Duration::from_millis(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(registry.is_polling(1));
        assert_eq!(board.get(1), Some(pending(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_without_pending_keeps_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut mock = MockOutreachApi::new();
        mock.expect_campaign_progress().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            serde_json::from_str::<Progress>(r#"{"total": 10, "sent": 3}"#).map_err(ApiError::from)
        });
        let (registry, board, mut rx) = registry(Arc::new(mock));

        registry.start(4);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type, EventType::Error);

        time::sleep(PERIOD * 2 + Duration::from_millis(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(registry.is_polling(4));
        assert!(board.get(4).is_none());
        while let Ok(event) = rx.try_recv() {
            assert_ne!(event.event_type, EventType::Completed);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_the_task() {
        let (api, calls) = scripted_api(vec![Ok(pending(4))]);
        let (registry, _board, _rx) = registry(api);

        registry.start(2);
        time::sleep(Duration::from_millis(1)).await;
        assert!(registry.stop(2));
        assert!(!registry.stop(2));

        time::sleep(PERIOD * 6).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_keeps_registry_usable() {
        let (api, calls) = scripted_api(vec![Ok(pending(4))]);
        let (registry, _board, _rx) = registry(api);

        registry.start(1);
        registry.start(2);
        time::sleep(Duration::from_millis(1)).await;
        registry.stop_all();
        assert!(registry.is_empty());

        time::sleep(PERIOD * 3).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(registry.start(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_refuses_new_pollers() {
        let (api, calls) = scripted_api(vec![Ok(pending(4))]);
        let (registry, _board, _rx) = registry(api);

        registry.start(1);
        time::sleep(Duration::from_millis(1)).await;
        registry.dispose();

        assert!(!registry.start(5));
        time::sleep(PERIOD * 3).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pollers() {
        let (api, calls) = scripted_api(vec![Ok(pending(4))]);
        let (registry, _board, _rx) = registry(api);

        registry.start(1);
        time::sleep(Duration::from_millis(1)).await;
        drop(registry);

        time::sleep(PERIOD * 3).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
