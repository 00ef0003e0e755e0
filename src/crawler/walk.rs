//! Ring Walk
//!
//! Reconstructs one revolution of the ring by following predecessor pointers
//! from a starting peer. Each answer is folded into a [`RingWalk`], which
//! decides whether to keep going and to whom.
//!
//! The walk moves backwards through predecessors, but edges are recorded in
//! the successor direction (`successor -> me`), so the rendered graph reads in
//! ring order.

use super::error::WalkError;
use super::types::{CrawlEdge, CrawlNode};
use crate::ring::client::RingClient;
use crate::ring::types::{PeerInfo, PeerRef};

/// Upper bound on queried peers per walk.
pub const DEFAULT_MAX_HOPS: usize = 1024;

/// What to do after recording one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Query this peer next.
    Continue(PeerRef),
    /// The walk is complete.
    Done,
}

/// Working node/edge lists of one walk.
#[derive(Debug, Default)]
pub struct RingWalk {
    nodes: Vec<CrawlNode>,
    edges: Vec<CrawlEdge>,
}

/// Everything one walk produced, including a partial graph on error.
#[derive(Debug)]
pub struct WalkReport {
    pub nodes: Vec<CrawlNode>,
    pub edges: Vec<CrawlEdge>,
    /// Number of peers queried.
    pub hops: usize,
    pub result: Result<(), WalkError>,
}

impl RingWalk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[CrawlNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CrawlEdge] {
        &self.edges
    }

    /// Folds one peer's answer into the graph.
    pub fn record(&mut self, info: PeerInfo) -> Step {
        // Back at the start by id, even if the predecessor check did not fire.
        if self.nodes.first().is_some_and(|first| first.id == info.node.id) {
            return Step::Done;
        }

        let me = info.node.clone();
        let predecessor = info.predecessor.clone();
        let successor_id = info.successor.id;

        self.nodes.push(CrawlNode::from_info(info));

        if self.nodes.len() > 1 {
            self.edges.push(CrawlEdge::new(successor_id, me.id));
        }

        let first_id = self.nodes[0].id;
        if predecessor.id == first_id {
            self.edges.push(CrawlEdge::new(me.id, predecessor.id));
            return Step::Done;
        }

        if predecessor != me {
            Step::Continue(predecessor)
        } else {
            // Peer claims to be its own predecessor.
            Step::Done
        }
    }

    pub fn into_report(self, hops: usize, result: Result<(), WalkError>) -> WalkReport {
        WalkReport {
            nodes: self.nodes,
            edges: self.edges,
            hops,
            result,
        }
    }
}

/// Walks the ring from `start`, querying at most `max_hops` peers.
pub async fn walk<C: RingClient>(client: &C, start: &PeerRef, max_hops: usize) -> WalkReport {
    let mut ring = RingWalk::new();
    let mut current = start.clone();
    let mut hops = 0;

    let result = loop {
        if hops >= max_hops {
            break Err(WalkError::HopLimitExceeded { limit: max_hops });
        }
        hops += 1;

        let info = match client.describe(&current).await {
            Ok(info) => info,
            Err(e) => break Err(WalkError::from(e)),
        };

        tracing::trace!("Hop {}: {} (pre={})", hops, info.node, info.predecessor.id);

        match ring.record(info) {
            Step::Continue(next) => current = next,
            Step::Done => break Ok(()),
        }
    };

    tracing::debug!(
        "Walk from {} finished after {} hop(s): {} nodes, {} edges",
        start.id,
        hops,
        ring.nodes.len(),
        ring.edges.len()
    );

    ring.into_report(hops, result)
}
