//! Turn scheduling state machine
//!
//! The [`TurnScheduler`] decides how a debate begins, alternates and ends:
//! `Idle → Running → {Stopping, LimitReached} → Idle (via reset)`. It owns
//! the phase; the seat and counter it steers live in [`DebateState`] so the
//! whole session stays one serializable record.
//!
//! The very first speaker is drawn from an injected random source, which
//! keeps the coin flip seedable in tests.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::AgentSlot;
use crate::state::DebateState;

/// Hard cap on the number of turns in one debate session
pub const MESSAGE_LIMIT: u32 = 1000;

/// Scheduler lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulerPhase {
    /// No debate running
    #[default]
    Idle,
    /// Driving task active, turns alternating
    Running,
    /// Cooperative stop requested, in-flight turn finalizing
    Stopping,
    /// Message limit hit; terminal until reset
    LimitReached,
}

/// Result of a `start` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Transitioned into `Running`
    Started,
    /// Already running; nothing changed
    AlreadyRunning,
}

/// Result of advancing past a completed turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The other seat speaks next
    Continue,
    /// The message limit was reached; the debate halts
    LimitReached,
}

/// Turn scheduler for a two-seat debate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnScheduler {
    phase: SchedulerPhase,
}

impl TurnScheduler {
    /// New scheduler in `Idle`
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Begin (or resume) a debate.
    ///
    /// Idempotent: a second `start` while `Running` changes nothing. The
    /// first start since a reset draws the opening seat uniformly at
    /// random from the injected source.
    pub fn start<R: Rng>(&mut self, state: &mut DebateState, rng: &mut R) -> StartOutcome {
        if self.phase == SchedulerPhase::Running {
            return StartOutcome::AlreadyRunning;
        }
        if state.current_agent_index.is_none() {
            state.current_agent_index = Some(AgentSlot::from_index(rng.random_range(0..2)));
        }
        state.running = true;
        self.phase = SchedulerPhase::Running;
        StartOutcome::Started
    }

    /// Whether another turn may begin
    pub fn has_capacity(state: &DebateState) -> bool {
        state.message_count < MESSAGE_LIMIT
    }

    /// Advance past a completed turn: toggle the seat, then halt if the
    /// entry counter has reached [`MESSAGE_LIMIT`].
    pub fn advance(&mut self, state: &mut DebateState) -> Advance {
        if let Some(slot) = state.current_agent_index {
            state.current_agent_index = Some(slot.other());
        }
        if state.message_count >= MESSAGE_LIMIT {
            self.phase = SchedulerPhase::LimitReached;
            state.running = false;
            Advance::LimitReached
        } else {
            Advance::Continue
        }
    }

    /// Note a cooperative stop request; the driving loop finalizes the
    /// in-flight turn before `finish_stopped` completes the transition.
    pub fn request_stop(&mut self) {
        if self.phase == SchedulerPhase::Running {
            self.phase = SchedulerPhase::Stopping;
        }
    }

    /// Complete a cooperative stop once the in-flight turn has finalized
    pub fn finish_stopped(&mut self, state: &mut DebateState) {
        state.running = false;
        self.phase = SchedulerPhase::Idle;
    }

    /// Halt at the message cap without advancing, used when a run begins
    /// on a session that is already full.
    pub fn finish_limit(&mut self, state: &mut DebateState) {
        state.running = false;
        self.phase = SchedulerPhase::LimitReached;
    }

    /// Hard interrupt: clear the whole session and return to `Idle`,
    /// valid from any phase.
    pub fn reset(&mut self, state: &mut DebateState) {
        state.reset();
        self.phase = SchedulerPhase::Idle;
    }
}
