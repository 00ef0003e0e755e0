//! Ring Crawler Library
//!
//! A read-only observer for a Chord-style ring. It walks the ring from an
//! anchor peer, rebuilds the node/edge graph of one revolution, and publishes
//! that graph as a snapshot for viewers.
//!
//! ## Architecture Modules
//! - **`ring`**: Peer records, the `RingClient` capability and its UDP adapter.
//! - **`crawler`**: The walk algorithm, anchor failover and the polling driver.
//! - **`snapshot`**: Publishers (memory, file) and the HTTP surface.
//! - **`config`**: Command-line configuration for the binary.

pub mod config;
pub mod crawler;
pub mod ring;
pub mod snapshot;
