//! Content-based agent routing for workflows that pick an agent by query
//! content rather than by a fixed graph edge.
//!
//! Grounded in the AI router described in spec §4.F: an LLM-backed router is
//! an external collaborator (the core only specifies the contract), with two
//! required fallbacks — keyword scoring and uniform-random — so a workflow
//! keeps working when no LLM binding is configured.

use async_trait::async_trait;
use rand::Rng;

use crate::error::A2AResult;

/// One entry in the network of agents a router chooses among.
#[derive(Debug, Clone)]
pub struct RoutableAgent {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// A router's decision: the chosen agent's name and a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    pub agent_name: String,
    pub confidence: f64,
}

/// Content-based agent selection contract.
///
/// LLM-backed implementations are external collaborators of the core; this
/// crate ships the two fallbacks the spec requires so routing keeps working
/// without one configured.
#[async_trait]
pub trait AgentRouter: Send + Sync {
    async fn route(&self, query: &str, network: &[RoutableAgent]) -> A2AResult<RoutingDecision>;
}

/// Scores each agent by how many of its tags or description words appear in
/// the query, normalized to `[0, 1]` by dividing by 10 and clamping.
///
/// Ties break toward the first agent in `network` order (stable, so routing
/// is deterministic for a fixed network and query).
pub struct KeywordRouter;

#[async_trait]
impl AgentRouter for KeywordRouter {
    async fn route(&self, query: &str, network: &[RoutableAgent]) -> A2AResult<RoutingDecision> {
        let query_lower = query.to_lowercase();
        let mut best: Option<(f64, &RoutableAgent)> = None;

        for agent in network {
            let mut matches = 0u32;
            for tag in &agent.tags {
                if query_lower.contains(&tag.to_lowercase()) {
                    matches += 1;
                }
            }
            for word in agent.description.split_whitespace() {
                let word = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
                if !word.is_empty() && query_lower.contains(&word) {
                    matches += 1;
                }
            }
            let confidence = (matches as f64 / 10.0).clamp(0.0, 1.0);
            match best {
                Some((best_confidence, _)) if best_confidence >= confidence => {}
                _ => best = Some((confidence, agent)),
            }
        }

        match best {
            Some((confidence, agent)) => Ok(RoutingDecision {
                agent_name: agent.name.clone(),
                confidence,
            }),
            None => Ok(RoutingDecision {
                agent_name: String::new(),
                confidence: 0.0,
            }),
        }
    }
}

/// Picks a uniformly random agent from the network with a fixed 0.5
/// confidence — the fallback of last resort when even keyword scoring
/// cannot be applied (e.g. an empty query).
pub struct RandomRouter;

#[async_trait]
impl AgentRouter for RandomRouter {
    async fn route(&self, _query: &str, network: &[RoutableAgent]) -> A2AResult<RoutingDecision> {
        if network.is_empty() {
            return Ok(RoutingDecision {
                agent_name: String::new(),
                confidence: 0.0,
            });
        }
        let index = rand::thread_rng().gen_range(0..network.len());
        Ok(RoutingDecision {
            agent_name: network[index].name.clone(),
            confidence: 0.5,
        })
    }
}
