use serde::{Deserialize, Serialize};

use crate::ring::types::{PeerInfo, PeerRef};

/// One vertex of the reconstructed ring.
///
/// Rebuilt from scratch every cycle; there is no identity across cycles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlNode {
    pub id: u64,
    /// Human readable `id - hash`.
    pub label: String,
    /// The full response of the peer, kept for display.
    pub data: PeerInfo,
}

impl CrawlNode {
    pub fn from_info(data: PeerInfo) -> Self {
        Self {
            id: data.node.id,
            label: format!("{} - {}", data.node.id, data.node.hash),
            data,
        }
    }

    /// The peer's own record as it reported it.
    pub fn peer(&self) -> &PeerRef {
        &self.data.node
    }
}

/// A directed `from -> to` edge following the successor pointers.
///
/// `id` is the id of the edge's source endpoint; it is only a rendering key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CrawlEdge {
    pub id: u64,
    pub from: u64,
    pub to: u64,
}

impl CrawlEdge {
    pub fn new(from: u64, to: u64) -> Self {
        Self { id: from, from, to }
    }
}

/// The peer a walk starts from, and whether the latest walk could use it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Anchor {
    pub node: PeerRef,
    #[serde(rename = "isAlive")]
    pub reachable: bool,
}

impl Anchor {
    /// A freshly configured anchor is assumed reachable until a walk says otherwise.
    pub fn new(node: PeerRef) -> Self {
        Self {
            node,
            reachable: true,
        }
    }
}

/// The published document, replaced wholesale every cycle.
///
/// `nodes` and `edges` always come from one single walk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub anchor: Anchor,
    pub nodes: Vec<CrawlNode>,
    pub edges: Vec<CrawlEdge>,
}

impl Snapshot {
    pub fn empty(anchor: Anchor) -> Self {
        Self {
            anchor,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// How a crawl cycle ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The walk closed the ring or hit a single-node ring.
    Closed,
    /// Some peer did not answer; failover was attempted.
    Failed,
    /// The walk was cut off at the hop ceiling.
    Truncated,
}
