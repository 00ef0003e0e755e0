//! Crawler error types.

use crate::ring::client::PeerUnreachable;

/// Why a walk stopped before reaching a natural end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError {
    #[error(transparent)]
    PeerUnreachable(#[from] PeerUnreachable),

    #[error("walk exceeded hop limit of {limit}")]
    HopLimitExceeded { limit: usize },
}

/// Why no replacement anchor could be elected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailoverError {
    #[error("insufficient history for failover: {known} known peer(s)")]
    InsufficientHistory { known: usize },
}
