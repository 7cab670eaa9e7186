//! Session state handle
//!
//! [`DebateSession`] is the explicit, shared state handle for one debate:
//! the scheduler and transcript behind a mutex, a lock-free cancellation
//! flag, an epoch counter that invalidates in-flight turns on reset, and
//! the broadcast channel events flow through.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use agora_core::{DebateState, SchedulerPhase, TurnScheduler};

use crate::events::{DebateEvent, DebateStatus};

/// Capacity of the event broadcast channel
const EVENT_BUFFER: usize = 1024;

/// Mutex-guarded portion of the session
#[derive(Debug, Default)]
pub(crate) struct SessionInner {
    /// Turn scheduling state machine
    pub scheduler: TurnScheduler,
    /// Transcript, counters, running flag
    pub state: DebateState,
    /// Bumped by every reset; in-flight turns compare against it before
    /// touching the transcript
    pub epoch: u64,
}

/// Shared state handle for one debate session
#[derive(Debug)]
pub struct DebateSession {
    /// Session identity, for logs
    pub id: Uuid,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    inner: Mutex<SessionInner>,
    cancel: AtomicBool,
    events: broadcast::Sender<DebateEvent>,
}

impl Default for DebateSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateSession {
    /// Fresh, empty session
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            inner: Mutex::new(SessionInner::default()),
            cancel: AtomicBool::new(false),
            events,
        };
        info!(session_id = %session.id, "debate session created");
        session
    }

    /// Subscribe to status and snapshot events
    pub fn subscribe(&self) -> broadcast::Receiver<DebateEvent> {
        self.events.subscribe()
    }

    /// Emit an event; dropped silently when nobody listens
    pub(crate) fn emit(&self, event: DebateEvent) {
        let _ = self.events.send(event);
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // a poisoned lock only means a panicking turn; the state itself
        // stays structurally valid
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Request a cooperative stop. Only sets a flag; the driving task
    /// observes it after the current fragment.
    pub fn request_stop(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.lock().scheduler.request_stop();
    }

    /// Whether a stop has been requested
    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub(crate) fn clear_cancel(&self) {
        self.cancel.store(false, Ordering::SeqCst);
    }

    /// Hard interrupt: clear the transcript and counters, invalidate any
    /// in-flight turn, return to idle. Valid at any time, mid-stream
    /// included.
    pub fn reset(&self) {
        {
            let mut inner = self.lock();
            inner.epoch += 1;
            let SessionInner {
                scheduler, state, ..
            } = &mut *inner;
            scheduler.reset(state);
        }
        self.clear_cancel();
        info!(session_id = %self.id, "debate session reset");
        self.emit(DebateEvent::Status(DebateStatus::Reset));
    }

    /// Current scheduler phase
    pub fn phase(&self) -> SchedulerPhase {
        self.lock().scheduler.phase()
    }

    /// Epoch value, for in-flight turn validation
    pub(crate) fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Clone of the current debate state
    pub fn state_snapshot(&self) -> DebateState {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::AgentSlot;

    #[test]
    fn test_stop_only_sets_flag() {
        let session = DebateSession::new();
        assert!(!session.cancel_requested());
        session.request_stop();
        assert!(session.cancel_requested());
        assert!(session.state_snapshot().conversation.is_empty());
    }

    #[test]
    fn test_reset_bumps_epoch_and_clears() {
        let session = DebateSession::new();
        let before = session.epoch();
        {
            let mut inner = session.lock();
            inner.state.begin_entry(AgentSlot::First, "A");
            inner.state.running = true;
        }
        session.request_stop();
        session.reset();
        assert_eq!(session.epoch(), before + 1);
        let state = session.state_snapshot();
        assert!(state.conversation.is_empty());
        assert!(state.chat_history.is_empty());
        assert_eq!(state.message_count, 0);
        assert_eq!(state.current_agent_index, None);
        assert!(!state.running);
        assert!(!session.cancel_requested());
        assert_eq!(session.phase(), SchedulerPhase::Idle);
    }
}
