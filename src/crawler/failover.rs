use rand::Rng;
use rand::seq::SliceRandom;

use super::error::FailoverError;
use super::types::CrawlNode;
use crate::ring::types::PeerRef;

/// Picks a replacement anchor from the previous cycle's nodes.
///
/// Uniform over every node whose id differs from the failed anchor. The
/// returned record is copied verbatim from `last_nodes`.
pub fn elect_anchor<R: Rng + ?Sized>(
    last_nodes: &[CrawlNode],
    failed: &PeerRef,
    rng: &mut R,
) -> Result<PeerRef, FailoverError> {
    let known = last_nodes.len();
    if known < 2 {
        return Err(FailoverError::InsufficientHistory { known });
    }

    let candidates: Vec<&CrawlNode> = last_nodes
        .iter()
        .filter(|node| node.id != failed.id)
        .collect();

    candidates
        .choose(rng)
        .map(|node| node.peer().clone())
        .ok_or(FailoverError::InsufficientHistory { known })
}
