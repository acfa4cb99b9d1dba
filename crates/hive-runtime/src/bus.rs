//! Gossip bus — broadcast delivery between teammates.
//!
//! Messages published on tick `t` are delivered to every other agent on
//! tick `t + 1`, in the order each sender published them. The bus can be
//! told to deliver every envelope twice, which exercises the receivers'
//! duplicate handling the way a real at-least-once transport would.

use hive_core::gossip::{Envelope, GossipMessage};
use hive_core::types::{AgentId, Tick};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Delivery settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Deliver every envelope twice (default: false).
    pub redeliver: bool,
}

/// In-memory broadcast bus.
#[derive(Debug, Default)]
pub struct GossipBus {
    config: BusConfig,
    in_flight: Vec<Envelope>,
    published: usize,
    delivered: usize,
}

impl GossipBus {
    pub fn new(config: BusConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Queue `messages` from `from`, sent on `tick`. Returns how many were queued.
    pub fn publish(&mut self, from: &AgentId, tick: Tick, messages: Vec<GossipMessage>) -> usize {
        let count = messages.len();
        for message in messages {
            trace!(from = %from, tick, kind = message.kind(), "gossip published");
            self.in_flight.push(Envelope::new(from.clone(), tick, message));
        }
        self.published += count;
        count
    }

    /// Remove and return every envelope visible on `tick`, in send order.
    pub fn take_visible(&mut self, tick: Tick) -> Vec<Envelope> {
        let (visible, later): (Vec<Envelope>, Vec<Envelope>) =
            self.in_flight.drain(..).partition(|e| e.visible_at(tick));
        self.in_flight = later;
        if !self.config.redeliver {
            return visible;
        }
        visible
            .into_iter()
            .flat_map(|e| [e.clone(), e])
            .collect()
    }

    /// The slice of `visible` addressed to `agent`: everything it did not send.
    pub fn inbox_for(&mut self, agent: &AgentId, visible: &[Envelope]) -> Vec<Envelope> {
        let inbox: Vec<Envelope> = visible.iter().filter(|e| e.from != *agent).cloned().collect();
        self.delivered += inbox.len();
        inbox
    }

    /// Envelopes published but not yet visible.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn published(&self) -> usize {
        self.published
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}
