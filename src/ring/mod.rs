//! Ring Access Module
//!
//! Everything the crawler knows about the external ring lives here: the peer
//! records it reports, the `RingClient` capability used to query it, and a
//! concrete UDP adapter for the Ring Node's JSON datagram RPC.
//!
//! ## Contract
//! - **Query only**: `describe(peer)` never mutates ring state.
//! - **One failure signal**: timeouts, refused sends, malformed or rejected
//!   replies all surface as `PeerUnreachable`.

pub mod client;
#[cfg(test)]
pub mod mock;
pub mod protocol;
pub mod types;
pub mod udp;

#[cfg(test)]
mod tests;
