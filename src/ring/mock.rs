//! In-memory ring used by tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::{PeerUnreachable, RingClient};
use super::types::{PeerInfo, PeerRef};

pub fn mock_peer(id: u64) -> PeerRef {
    PeerRef::new(id, format!("{:06X}", id * 0x10101), "127.0.0.1", 50000 + id as u16)
}

/// Answers `describe` from a table keyed by the full peer record.
#[derive(Default)]
pub struct MockRing {
    peers: Mutex<HashMap<PeerRef, PeerInfo>>,
    offline: Mutex<HashSet<u64>>,
    calls: AtomicUsize,
}

impl MockRing {
    /// A consistent ring visiting `ids` in ascending ring order.
    pub fn ring(ids: &[u64]) -> Self {
        let ring = Self::default();
        let n = ids.len();

        for (i, &id) in ids.iter().enumerate() {
            let successor = mock_peer(ids[(i + 1) % n]);
            ring.insert(PeerInfo {
                node: mock_peer(id),
                predecessor: mock_peer(ids[(i + n - 1) % n]),
                successor: successor.clone(),
                finger_table: vec![successor],
            });
        }

        ring
    }

    /// Registers `info` as the answer for `info.node`.
    pub fn insert(&self, info: PeerInfo) {
        self.insert_at(info.node.clone(), info);
    }

    /// Registers the answer given when `target` is queried.
    pub fn insert_at(&self, target: PeerRef, info: PeerInfo) {
        self.peers.lock().unwrap().insert(target, info);
    }

    pub fn set_offline(&self, id: u64, offline: bool) {
        let mut set = self.offline.lock().unwrap();
        if offline {
            set.insert(id);
        } else {
            set.remove(&id);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RingClient for MockRing {
    async fn describe(&self, peer: &PeerRef) -> Result<PeerInfo, PeerUnreachable> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.offline.lock().unwrap().contains(&peer.id) {
            return Err(PeerUnreachable::new(peer, "offline"));
        }

        self.peers
            .lock()
            .unwrap()
            .get(peer)
            .cloned()
            .ok_or_else(|| PeerUnreachable::new(peer, "no such peer"))
    }
}
