//! Debate controller
//!
//! [`DebateController`] owns the session handle and runs the turn loop:
//! scheduler → memory window → prompt → streaming generation → aggregation
//! → advance, until a stop request, a reset, or the 1000-message cap ends
//! the run. All generation failures are converted to transcript content or
//! status events here; nothing propagates to the presentation layer
//! mid-run.

use std::sync::{Arc, Mutex};

use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{info, warn};

use agora_core::{
    build_prompt, memory_window, Advance, AgentPair, AgentSlot, DebateState, SchedulerPhase,
    StartOutcome, TurnScheduler,
};
use agora_llm::{GenerateOptions, GenerateRequest, StreamingGenerator};

use crate::aggregator::{ResponseAggregator, TurnAborted};
use crate::events::{DebateEvent, DebateStatus};
use crate::session::{DebateSession, SessionInner};

/// A `run` that never began
#[derive(Debug, Clone, Error)]
pub enum StartError {
    /// The connectivity probe failed; no state was mutated
    #[error("cannot connect to the generation service; check the URL and that it is running")]
    Unreachable,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another driving task already owns the session; nothing changed
    AlreadyRunning,
    /// A stop request ended the run after the in-flight turn finalized
    Stopped,
    /// The 1000-message cap was reached
    LimitReached,
    /// A reset raced the run; the loop abandoned its in-flight turn
    Interrupted,
}

/// Debate-wide configuration: topic, rules and the two participants
#[derive(Debug, Clone)]
pub struct DebateConfig {
    /// Topic of the debate, injected into every prompt
    pub topic: String,
    /// Free-text behavioral constraints injected into every prompt
    pub stage_rules: String,
    /// The two participants in seat order
    pub agents: AgentPair,
}

impl DebateConfig {
    /// New configuration
    pub fn new(topic: &str, stage_rules: &str, agents: AgentPair) -> Self {
        Self {
            topic: topic.to_string(),
            stage_rules: stage_rules.to_string(),
            agents,
        }
    }
}

/// Top-level coordinator for one debate session
pub struct DebateController<G: StreamingGenerator> {
    generator: Arc<G>,
    config: DebateConfig,
    session: Arc<DebateSession>,
    rng: Mutex<StdRng>,
}

impl<G: StreamingGenerator> DebateController<G> {
    /// Controller with an OS-seeded random first speaker
    pub fn new(generator: Arc<G>, config: DebateConfig) -> Self {
        Self::with_rng(generator, config, StdRng::from_os_rng())
    }

    /// Controller with a deterministic first-speaker coin flip
    pub fn with_seed(generator: Arc<G>, config: DebateConfig, seed: u64) -> Self {
        Self::with_rng(generator, config, StdRng::seed_from_u64(seed))
    }

    /// Controller with an explicit random source
    pub fn with_rng(generator: Arc<G>, config: DebateConfig, rng: StdRng) -> Self {
        Self {
            generator,
            config,
            session: Arc::new(DebateSession::new()),
            rng: Mutex::new(rng),
        }
    }

    /// The shared session handle
    pub fn session(&self) -> Arc<DebateSession> {
        Arc::clone(&self.session)
    }

    /// Subscribe to status and snapshot events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<DebateEvent> {
        self.session.subscribe()
    }

    /// Clone of the current debate state
    pub fn state_snapshot(&self) -> DebateState {
        self.session.state_snapshot()
    }

    /// Request a cooperative stop; takes effect within one fragment
    pub fn stop(&self) {
        self.session.request_stop();
    }

    /// Hard reset: clear the session, valid at any time
    pub fn reset(&self) {
        self.session.reset();
    }

    /// Run the debate loop as the single driving task.
    ///
    /// Refuses to start when the generation service is unreachable
    /// (nothing mutated) and is a no-op when a driving task already owns
    /// the session.
    pub async fn run(&self) -> Result<RunOutcome, StartError> {
        {
            let inner = self.session.lock();
            if inner.scheduler.phase() == SchedulerPhase::Running {
                return Ok(RunOutcome::AlreadyRunning);
            }
        }

        // connectivity comes first; a failed probe must leave no trace
        if !self.generator.is_available().await {
            warn!(backend = self.generator.name(), "generation service unreachable");
            return Err(StartError::Unreachable);
        }

        self.session.clear_cancel();
        {
            let mut inner = self.session.lock();
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let SessionInner {
                scheduler, state, ..
            } = &mut *inner;
            if scheduler.start(state, &mut *rng) == StartOutcome::AlreadyRunning {
                return Ok(RunOutcome::AlreadyRunning);
            }
        }
        info!(
            session_id = %self.session.id,
            backend = self.generator.name(),
            topic = %self.config.topic,
            "debate started"
        );
        self.session.emit(DebateEvent::Status(DebateStatus::Started));

        loop {
            if self.session.cancel_requested() {
                return Ok(self.finish_stopped());
            }

            // resolve the turn under the lock, remembering the epoch so a
            // racing reset aborts the turn before it writes anything
            let (slot, epoch) = {
                let inner = self.session.lock();
                if !TurnScheduler::has_capacity(&inner.state) {
                    drop(inner);
                    return Ok(self.finish_limit());
                }
                match inner.state.current_agent_index {
                    Some(slot) => (slot, inner.epoch),
                    None => return Ok(RunOutcome::Interrupted),
                }
            };

            let agent = self.config.agents.get(slot).clone();
            let stop_marker = self.config.agents.opponent(slot).stop_marker();
            let memory = {
                let inner = self.session.lock();
                memory_window(&inner.state.conversation, agent.memory_size)
            };
            let prompt = build_prompt(&agent, &self.config.topic, &self.config.stage_rules, &memory);
            let request = GenerateRequest::new(&agent.model, &prompt).with_options(GenerateOptions {
                temperature: agent.temperature,
                top_k: agent.top_k,
                stop: vec![stop_marker],
            });

            let turn = self.drive_turn(slot, &agent.name, epoch, request).await;
            if turn.is_err() {
                // reset raced us; the session is already clean
                return Ok(RunOutcome::Interrupted);
            }

            let advance = {
                let mut inner = self.session.lock();
                if inner.epoch != epoch {
                    return Ok(RunOutcome::Interrupted);
                }
                let SessionInner {
                    scheduler, state, ..
                } = &mut *inner;
                scheduler.advance(state)
            };
            if advance == Advance::LimitReached {
                info!(session_id = %self.session.id, "message limit reached");
                self.session.emit(DebateEvent::Status(DebateStatus::LimitReached));
                return Ok(RunOutcome::LimitReached);
            }
        }
    }

    /// Drive one generation call through the aggregator.
    ///
    /// Transport failures become the sentinel entry; cancellation keeps
    /// the partial text. Only a racing reset surfaces as an error.
    async fn drive_turn(
        &self,
        slot: AgentSlot,
        speaker: &str,
        epoch: u64,
        request: GenerateRequest,
    ) -> Result<(), TurnAborted> {
        let mut stream = match self.generator.generate(request).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(speaker, error = %err, "generation call failed");
                let agg = ResponseAggregator::begin(&self.session, slot, speaker, epoch)?;
                agg.fail()?;
                self.session.emit(DebateEvent::Status(DebateStatus::Errored {
                    agent: speaker.to_string(),
                }));
                return Ok(());
            }
        };

        let mut agg = ResponseAggregator::begin(&self.session, slot, speaker, epoch)?;
        let mut failed = false;
        let mut cancelled = false;
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => agg.push(&fragment)?,
                Err(err) => {
                    warn!(speaker, error = %err, "generation stream failed mid-sequence");
                    failed = true;
                    break;
                }
            }
            // the cancellation suspension point: once per fragment
            if self.session.cancel_requested() {
                cancelled = true;
                break;
            }
        }

        if failed {
            agg.fail()?;
            self.session.emit(DebateEvent::Status(DebateStatus::Errored {
                agent: speaker.to_string(),
            }));
        } else {
            agg.finish()?;
            if !cancelled {
                self.session.emit(DebateEvent::Status(DebateStatus::Finished {
                    agent: speaker.to_string(),
                }));
            }
        }
        Ok(())
    }

    fn finish_stopped(&self) -> RunOutcome {
        {
            let mut inner = self.session.lock();
            let SessionInner {
                scheduler, state, ..
            } = &mut *inner;
            scheduler.finish_stopped(state);
        }
        info!(session_id = %self.session.id, "debate stopped");
        self.session.emit(DebateEvent::Status(DebateStatus::Stopped));
        RunOutcome::Stopped
    }

    fn finish_limit(&self) -> RunOutcome {
        {
            let mut inner = self.session.lock();
            let SessionInner {
                scheduler, state, ..
            } = &mut *inner;
            scheduler.finish_limit(state);
        }
        self.session.emit(DebateEvent::Status(DebateStatus::LimitReached));
        RunOutcome::LimitReached
    }
}
