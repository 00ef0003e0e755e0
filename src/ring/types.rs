use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a ring participant as seen from the outside.
///
/// Equality is structural over all four fields. Two records sharing an `id`
/// but pointing at different endpoints are different peers, which matters
/// while a ring is mid-update and ids are briefly reused.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PeerRef {
    /// Position on the ring.
    pub id: u64,
    /// Stable content-derived identifier (hex string).
    pub hash: String,
    pub address: String,
    pub port: u16,
}

impl PeerRef {
    pub fn new(id: u64, hash: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            id,
            hash: hash.into(),
            address: address.into(),
            port,
        }
    }

    /// `host:port` string suitable for address resolution.
    pub fn endpoint(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

impl fmt::Display for PeerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.id, self.hash, self.endpoint())
    }
}

/// A peer's answer to a "describe yourself" request.
///
/// The finger table is carried through untouched for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeerInfo {
    pub node: PeerRef,
    #[serde(rename = "pre")]
    pub predecessor: PeerRef,
    #[serde(rename = "suc")]
    pub successor: PeerRef,
    #[serde(rename = "finger", default)]
    pub finger_table: Vec<PeerRef>,
}
