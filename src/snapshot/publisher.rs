//! Snapshot Publishers
//!
//! The crawler's only contract with the outside: "replace the latest snapshot
//! with this one". Readers must always see a whole document, either the old
//! one or the new one.

use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::crawler::types::Snapshot;

/// File name of the published document.
pub const SNAPSHOT_FILE: &str = "data.json";

pub trait SnapshotPublisher: Send + Sync {
    fn publish(&self, snapshot: &Snapshot) -> impl Future<Output = Result<()>> + Send;
}

/// Latest snapshot kept in memory for the HTTP surface.
#[derive(Clone)]
pub struct SharedSnapshot {
    latest: Arc<RwLock<Arc<Snapshot>>>,
    published: Arc<AtomicU64>,
    last_published_ms: Arc<AtomicU64>,
}

/// Summary served on the health endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub published: u64,
    pub last_published_ms: Option<u64>,
    pub anchor_alive: bool,
    pub nodes: usize,
    pub edges: usize,
}

impl SharedSnapshot {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            latest: Arc::new(RwLock::new(Arc::new(initial))),
            published: Arc::new(AtomicU64::new(0)),
            last_published_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn latest(&self) -> Arc<Snapshot> {
        self.latest.read().await.clone()
    }

    /// Number of snapshots published so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    pub async fn health(&self) -> HealthReport {
        let latest = self.latest().await;
        let published = self.published();

        HealthReport {
            published,
            last_published_ms: (published > 0)
                .then(|| self.last_published_ms.load(Ordering::SeqCst)),
            anchor_alive: latest.anchor.reachable,
            nodes: latest.nodes.len(),
            edges: latest.edges.len(),
        }
    }
}

impl SnapshotPublisher for SharedSnapshot {
    async fn publish(&self, snapshot: &Snapshot) -> Result<()> {
        *self.latest.write().await = Arc::new(snapshot.clone());
        self.last_published_ms.store(now_ms(), Ordering::SeqCst);
        self.published.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Writes `data.json` into a directory for static serving.
///
/// The document is written to a temporary sibling and renamed over the old
/// one, so a reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct FilePublisher {
    dir: PathBuf,
}

impl FilePublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SnapshotPublisher for FilePublisher {
    async fn publish(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        let tmp = self.dir.join(format!("{}.tmp", SNAPSHOT_FILE));

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, self.path()).await?;

        tracing::trace!("Wrote {} bytes to {}", bytes.len(), self.path().display());
        Ok(())
    }
}

impl<P: SnapshotPublisher> SnapshotPublisher for Option<P> {
    async fn publish(&self, snapshot: &Snapshot) -> Result<()> {
        match self {
            Some(publisher) => publisher.publish(snapshot).await,
            None => Ok(()),
        }
    }
}

/// Publishes to both; the second still runs if the first fails.
impl<A: SnapshotPublisher, B: SnapshotPublisher> SnapshotPublisher for (A, B) {
    async fn publish(&self, snapshot: &Snapshot) -> Result<()> {
        let first = self.0.publish(snapshot).await;
        let second = self.1.publish(snapshot).await;
        first.and(second)
    }
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
