//! Ring Client capability.
//!
//! The crawler never talks to the ring protocol directly. It only needs one
//! query, "describe yourself", and one failure signal. Every transport error,
//! timeout or rejection collapses into [`PeerUnreachable`].

use std::future::Future;

use super::types::{PeerInfo, PeerRef};

/// The single failure outcome of a ring query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("peer {peer} is unreachable: {reason}")]
pub struct PeerUnreachable {
    pub peer: PeerRef,
    pub reason: String,
}

impl PeerUnreachable {
    pub fn new(peer: &PeerRef, reason: impl Into<String>) -> Self {
        Self {
            peer: peer.clone(),
            reason: reason.into(),
        }
    }
}

/// Read-only access to a live ring.
pub trait RingClient: Send + Sync {
    /// Asks `peer` for its self record, predecessor, successor and finger table.
    fn describe(
        &self,
        peer: &PeerRef,
    ) -> impl Future<Output = Result<PeerInfo, PeerUnreachable>> + Send;
}

impl<C: RingClient> RingClient for std::sync::Arc<C> {
    fn describe(
        &self,
        peer: &PeerRef,
    ) -> impl Future<Output = Result<PeerInfo, PeerUnreachable>> + Send {
        (**self).describe(peer)
    }
}
