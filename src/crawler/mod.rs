//! Ring Crawler Module
//!
//! Observes a live ring from the outside and turns it into a periodically
//! refreshed node/edge graph.
//!
//! ## Core Mechanisms
//! - **Walk**: starting at the anchor, follow predecessor pointers until the
//!   ring closes, a peer claims to be its own predecessor, or the hop ceiling
//!   is reached.
//! - **Failover**: when a walk hits an unreachable peer, a new anchor is drawn
//!   uniformly from the previous cycle's nodes (never the failed id).
//! - **Cycles**: every cycle starts from empty lists; snapshots are full
//!   replacements, never diffs.

pub mod error;
pub mod failover;
pub mod service;
pub mod types;
pub mod walk;
