use rand::SeedableRng;
use rand::rngs::StdRng;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::error::WalkError;
use super::failover::elect_anchor;
use super::types::{Anchor, CrawlEdge, CrawlNode, CycleOutcome, Snapshot};
use super::walk::{DEFAULT_MAX_HOPS, walk};
use crate::ring::client::RingClient;
use crate::ring::types::PeerRef;
use crate::snapshot::publisher::SnapshotPublisher;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Observer that periodically walks the ring and keeps the latest graph.
///
/// Owns the anchor and the previous cycle's node list. Both change only at
/// cycle boundaries, inside [`RingCrawler::crawl_cycle`].
pub struct RingCrawler<C> {
    client: C,
    anchor: Anchor,
    nodes: Vec<CrawlNode>,
    edges: Vec<CrawlEdge>,
    max_hops: usize,
    cycles: u64,
    last_outcome: Option<CycleOutcome>,
    rng: StdRng,
}

impl<C: RingClient> RingCrawler<C> {
    pub fn new(client: C, anchor: PeerRef) -> Self {
        Self {
            client,
            anchor: Anchor::new(anchor),
            nodes: Vec::new(),
            edges: Vec::new(),
            max_hops: DEFAULT_MAX_HOPS,
            cycles: 0,
            last_outcome: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Replaces the failover randomness source.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn nodes(&self) -> &[CrawlNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CrawlEdge] {
        &self.edges
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn last_outcome(&self) -> Option<CycleOutcome> {
        self.last_outcome
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            anchor: self.anchor.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Runs one full crawl cycle.
    ///
    /// 1. Moves the current node list aside as failover history.
    /// 2. Walks from the anchor into fresh lists.
    /// 3. On an unreachable peer, marks the anchor down and tries to elect
    ///    a new one from the history.
    pub async fn crawl_cycle(&mut self) -> CycleOutcome {
        let last_nodes = std::mem::take(&mut self.nodes);
        self.edges.clear();
        self.cycles += 1;

        let report = walk(&self.client, &self.anchor.node, self.max_hops).await;
        self.nodes = report.nodes;
        self.edges = report.edges;

        let outcome = match report.result {
            Ok(()) => {
                self.anchor.reachable = true;
                CycleOutcome::Closed
            }
            Err(WalkError::HopLimitExceeded { limit }) => {
                tracing::warn!(
                    "Walk from {} did not close within {} hops; publishing partial ring",
                    self.anchor.node.id,
                    limit
                );
                self.anchor.reachable = true;
                CycleOutcome::Truncated
            }
            Err(WalkError::PeerUnreachable(e)) => {
                tracing::warn!("Walk from {} failed: {}", self.anchor.node.id, e);
                self.anchor.reachable = false;
                self.fail_over(&last_nodes);
                CycleOutcome::Failed
            }
        };

        tracing::debug!(
            "Cycle {} {:?}: {} nodes, {} edges",
            self.cycles,
            outcome,
            self.nodes.len(),
            self.edges.len()
        );

        self.last_outcome = Some(outcome);
        outcome
    }

    fn fail_over(&mut self, last_nodes: &[CrawlNode]) {
        match elect_anchor(last_nodes, &self.anchor.node, &mut self.rng) {
            Ok(next) => {
                info!("Anchor is changed to {}", next);
                // Optimistic until the next walk proves otherwise.
                self.anchor = Anchor::new(next);
            }
            Err(e) => {
                tracing::warn!("Anchor {} stays unreachable: {}", self.anchor.node, e);
            }
        }
    }

    /// Polling driver: one cycle per tick, then publish.
    ///
    /// The first tick fires immediately. Ticks missed while a slow cycle is
    /// still walking are skipped, never queued. `shutdown` is only checked
    /// between cycles.
    pub async fn run<P, F>(&mut self, publisher: P, period: Duration, shutdown: F)
    where
        P: SnapshotPublisher,
        F: Future<Output = ()> + Send,
    {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!("Crawling from anchor {} every {:?}", self.anchor.node, period);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Crawler stopped after {} cycles", self.cycles);
                    return;
                }
                _ = interval.tick() => {}
            }

            self.crawl_cycle().await;

            if let Err(e) = publisher.publish(&self.snapshot()).await {
                tracing::error!("Failed to publish snapshot: {}", e);
            }
        }
    }
}
