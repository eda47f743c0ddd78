//! State shared between the view-model and its pollers

use crate::events::Event;
use crate::models::Progress;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// Locks a mutex, recovering the data if a previous holder panicked. Every
/// critical section here is a single map operation, so the data stays
/// consistent either way.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Latest progress snapshot per campaign. Each poller writes only its own key.
#[derive(Debug, Clone, Default)]
pub struct ProgressBoard {
    snapshots: Arc<Mutex<HashMap<u64, Progress>>>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, campaign_id: u64) -> Option<Progress> {
        lock(&self.snapshots).get(&campaign_id).copied()
    }

    pub fn record(&self, campaign_id: u64, progress: Progress) {
        lock(&self.snapshots).insert(campaign_id, progress);
    }

    pub fn remove(&self, campaign_id: u64) -> Option<Progress> {
        lock(&self.snapshots).remove(&campaign_id)
    }

    pub fn len(&self) -> usize {
        lock(&self.snapshots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Event channel handle given to every poller
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Waits for queue space. The permit then sends without waiting, so the
    /// send can happen while a lock is held. `None` once the receiver is gone.
    pub async fn reserve(&self) -> Option<mpsc::Permit<'_, Event>> {
        self.sender.reserve().await.ok()
    }

    /// Send an informational event, dropping it when the queue is full so a
    /// slow consumer never stalls a poller.
    pub fn try_send_event(&self, event: Event) {
        let _ = self.sender.try_send(event);
    }
}
