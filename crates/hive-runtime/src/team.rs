//! Team — scheduling agents over a shared world.
//!
//! The team is the only place where agents meet. Each tick:
//! 1. Gossip published on the previous tick becomes visible
//! 2. Every agent decides against a fresh view of the world
//! 3. Once all decisions are in, their actions are applied in ordinal order
//! 4. Outgoing gossip is queued on the bus for the next tick
//!
//! No agent sees another's action from the same tick.

use crate::bus::{BusConfig, GossipBus};
use crate::config::TeamConfig;
use hive_agents::team_agent::TeamAgent;
use hive_core::agent::{Agent, Decision};
use hive_core::error::{HiveError, Result};
use hive_core::trust::TrustStore;
use hive_core::types::*;
use hive_core::world::WorldView;
use serde::Serialize;
use tracing::{debug, info, warn};

/// The world a team runs in.
pub trait Environment {
    /// The world as `agent` perceives it this tick. The survey's team list
    /// must follow the team's spawn order.
    fn view<'a>(&'a self, agent: &AgentId) -> Box<dyn WorldView + 'a>;

    /// Carry out `action` for `agent`. Returns false if the world refused it.
    fn apply(&mut self, agent: &AgentId, action: &AgentAction) -> bool;

    /// Whether the task is done from the world's point of view.
    fn is_complete(&self) -> bool {
        false
    }
}

/// Event emitted by the team while running.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TeamEvent {
    /// An agent joined the team.
    Spawned { id: AgentId, ordinal: usize },
    /// An agent moved between phases while deciding.
    PhaseChanged { id: AgentId, from: Phase, to: Phase },
    /// The world carried out an action.
    Acted { id: AgentId, action: AgentAction },
    /// The world refused an action.
    Rejected { id: AgentId, action: AgentAction },
    /// An agent broadcast a message.
    Broadcast { from: AgentId, kind: &'static str },
    /// The task was completed.
    Completed { tick: Tick },
    /// A tick completed.
    TickComplete { tick: Tick, idle: usize, messages: usize },
}

/// Counters over the team's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub tick: Tick,
    pub agents: usize,
    pub actions_applied: usize,
    pub actions_rejected: usize,
    pub idle_decisions: usize,
    pub messages_published: usize,
    pub envelopes_delivered: usize,
    pub messages_in_flight: usize,
    /// Most slots any single agent believes delivered.
    pub slots_delivered: usize,
    pub completed_at: Option<Tick>,
}

/// A set of agents sharing a gossip bus.
pub struct Team {
    agents: Vec<Box<dyn Agent>>,
    bus: GossipBus,
    tick: Tick,
    event_history: Vec<(Tick, TeamEvent)>,
    actions_applied: usize,
    actions_rejected: usize,
    idle_decisions: usize,
    completed_at: Option<Tick>,
}

impl Default for Team {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

impl Team {
    pub fn new(bus: BusConfig) -> Self {
        Self {
            agents: Vec::new(),
            bus: GossipBus::new(bus),
            tick: 0,
            event_history: Vec::new(),
            actions_applied: 0,
            actions_rejected: 0,
            idle_decisions: 0,
            completed_at: None,
        }
    }

    /// Build a team of [`TeamAgent`]s from configuration.
    pub fn from_config(config: &TeamConfig) -> Result<Self> {
        config.validate()?;
        let mut team = Self::new(config.bus.clone());
        for spec in &config.agents {
            let agent = TeamAgent::new(spec.name.as_str(), spec.config.clone(), config.trust);
            team.spawn(Box::new(agent))?;
        }
        Ok(team)
    }

    /// Add an agent. Its ordinal is its position in spawn order.
    pub fn spawn(&mut self, agent: Box<dyn Agent>) -> Result<usize> {
        if self.agents.iter().any(|a| a.id() == agent.id()) {
            return Err(HiveError::DuplicateAgent(agent.id().clone()));
        }
        let ordinal = self.agents.len();
        let id = agent.id().clone();
        debug!(agent = %id, ordinal, "agent spawned");
        self.record(TeamEvent::Spawned { id, ordinal });
        self.agents.push(agent);
        Ok(ordinal)
    }

    /// Agent ids in ordinal order, for building the world survey.
    pub fn roster(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| a.id().clone()).collect()
    }

    /// Run a single tick.
    pub fn tick(&mut self, env: &mut dyn Environment) -> Vec<TeamEvent> {
        self.tick += 1;
        let now = self.tick;
        let mut events = Vec::new();

        let visible = self.bus.take_visible(now);

        // Decide
        let mut decisions: Vec<(AgentId, Decision)> = Vec::with_capacity(self.agents.len());
        for agent in self.agents.iter_mut() {
            let id = agent.id().clone();
            let inbox = self.bus.inbox_for(&id, &visible);
            let before = agent.phase();
            let decision = {
                let view = env.view(&id);
                agent.decide(now, view.as_ref(), &inbox)
            };
            let after = agent.phase();
            if before != after {
                events.push(TeamEvent::PhaseChanged {
                    id: id.clone(),
                    from: before,
                    to: after,
                });
            }
            decisions.push((id, decision));
        }

        // Apply
        let mut idle = 0;
        let mut messages = 0;
        for (id, decision) in decisions {
            let Decision { action, outbox } = decision;
            if action.is_idle() {
                idle += 1;
            } else if env.apply(&id, &action) {
                self.actions_applied += 1;
                events.push(TeamEvent::Acted {
                    id: id.clone(),
                    action,
                });
            } else {
                self.actions_rejected += 1;
                warn!(agent = %id, tick = now, ?action, "action refused by the world");
                events.push(TeamEvent::Rejected {
                    id: id.clone(),
                    action,
                });
            }
            for message in &outbox {
                events.push(TeamEvent::Broadcast {
                    from: id.clone(),
                    kind: message.kind(),
                });
            }
            messages += self.bus.publish(&id, now, outbox);
        }
        self.idle_decisions += idle;

        if self.completed_at.is_none() && self.is_complete(env) {
            self.completed_at = Some(now);
            info!(tick = now, "team completed the delivery");
            events.push(TeamEvent::Completed { tick: now });
        }

        events.push(TeamEvent::TickComplete {
            tick: now,
            idle,
            messages,
        });

        for event in &events {
            self.event_history.push((now, event.clone()));
        }
        events
    }

    /// Run `ticks` ticks.
    pub fn run(&mut self, env: &mut dyn Environment, ticks: u64) -> Vec<Vec<TeamEvent>> {
        (0..ticks).map(|_| self.tick(env)).collect()
    }

    /// Tick until the task is complete or `max_ticks` more ticks have run.
    ///
    /// Returns the tick on which the team completed, if it did.
    pub fn run_until_complete(&mut self, env: &mut dyn Environment, max_ticks: u64) -> Option<Tick> {
        for _ in 0..max_ticks {
            if self.completed_at.is_some() {
                break;
            }
            self.tick(env);
        }
        if self.completed_at.is_none() {
            warn!(tick = self.tick, max_ticks, "team did not complete");
        }
        self.completed_at
    }

    /// Complete when the world says so or every agent believes every slot delivered.
    pub fn is_complete(&self, env: &dyn Environment) -> bool {
        env.is_complete()
            || (!self.agents.is_empty() && self.agents.iter().all(|a| a.believes_complete()))
    }

    /// Restore every agent's trust from `store`. Returns the number of records loaded.
    pub fn load_trust(&mut self, store: &dyn TrustStore) -> Result<usize> {
        let mut total = 0;
        for agent in self.agents.iter_mut() {
            total += agent.ledger_mut().load_from(store)?;
        }
        info!(records = total, "team trust restored");
        Ok(total)
    }

    /// Persist every agent's trust to `store`.
    pub fn save_trust(&self, store: &mut dyn TrustStore) -> Result<()> {
        for agent in &self.agents {
            agent.ledger().persist_to(store)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> TeamStats {
        TeamStats {
            tick: self.tick,
            agents: self.agents.len(),
            actions_applied: self.actions_applied,
            actions_rejected: self.actions_rejected,
            idle_decisions: self.idle_decisions,
            messages_published: self.bus.published(),
            envelopes_delivered: self.bus.delivered(),
            messages_in_flight: self.bus.in_flight(),
            slots_delivered: self
                .agents
                .iter()
                .map(|a| a.drop_offs().iter().filter(|d| d.delivered).count())
                .max()
                .unwrap_or(0),
            completed_at: self.completed_at,
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn agents(&self) -> &[Box<dyn Agent>] {
        &self.agents
    }

    pub fn agent(&self, id: &AgentId) -> Option<&dyn Agent> {
        self.agents.iter().find(|a| a.id() == id).map(|a| a.as_ref())
    }

    pub fn agent_mut(&mut self, id: &AgentId) -> Result<&mut Box<dyn Agent>> {
        self.agents
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or_else(|| HiveError::UnknownAgent(id.clone()))
    }

    /// Every event recorded so far, with the tick it happened on.
    pub fn event_history(&self) -> &[(Tick, TeamEvent)] {
        &self.event_history
    }

    fn record(&mut self, event: TeamEvent) {
        self.event_history.push((self.tick, event));
    }
}
