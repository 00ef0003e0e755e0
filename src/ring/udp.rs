use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::client::{PeerUnreachable, RingClient};
use super::protocol::{MAX_DATAGRAM_SIZE, RingMessage, ReplyTo};
use super::types::{PeerInfo, PeerRef};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(1000);

type Reply = Result<PeerInfo, String>;

/// Ring Client speaking the JSON datagram protocol.
///
/// Owns the crawler's listening socket. Replies are matched to callers by
/// request id through `pending`; anything that does not arrive within
/// `request_timeout` counts as unreachable.
pub struct UdpRingClient {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
    pending: Arc<DashMap<Uuid, oneshot::Sender<Reply>>>,
    request_timeout: Duration,
}

impl UdpRingClient {
    pub async fn bind(bind_addr: SocketAddr, request_timeout: Duration) -> anyhow::Result<Arc<Self>> {
        let socket = UdpSocket::bind(bind_addr).await?;
        let local_addr = socket.local_addr()?;

        tracing::info!("Ring client listening on {}", local_addr);

        Ok(Arc::new(Self {
            socket: Arc::new(socket),
            local_addr,
            pending: Arc::new(DashMap::new()),
            request_timeout,
        }))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Spawns the receive loop and returns immediately.
    pub async fn start(self: Arc<Self>) {
        let client = self.clone();
        tokio::spawn(async move {
            client.receive_loop().await;
        });
    }

    /// Number of requests still waiting for a reply.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    async fn receive_loop(self: Arc<Self>) {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, src)) => match serde_json::from_slice::<RingMessage>(&buf[..len]) {
                    Ok(msg) => self.handle_message(msg, src),
                    Err(e) => {
                        tracing::debug!("Dropping malformed datagram from {}: {}", src, e);
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to receive UDP packet: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }

    fn handle_message(&self, msg: RingMessage, src: SocketAddr) {
        match msg {
            RingMessage::Response {
                request_id,
                result,
                error,
            } => {
                let Some((_, waiter)) = self.pending.remove(&request_id) else {
                    tracing::debug!("Late or unknown response {} from {}", request_id, src);
                    return;
                };

                let reply = match (result, error) {
                    (Some(info), None) => Ok(info),
                    (_, Some(error)) => Err(error),
                    (None, None) => Err("empty response".to_string()),
                };

                // The caller may already have timed out.
                let _ = waiter.send(reply);
            }
            RingMessage::Request { method, .. } => {
                tracing::trace!("Ignoring {} request from {}; observer does not serve", method, src);
            }
        }
    }

    async fn request(&self, peer: &PeerRef) -> Result<PeerInfo, String> {
        let target = tokio::net::lookup_host(peer.endpoint())
            .await
            .map_err(|e| format!("resolve failed: {}", e))?
            .next()
            .ok_or_else(|| "address resolved to nothing".to_string())?;

        let request_id = Uuid::new_v4();
        let sender = ReplyTo {
            address: self.local_addr.ip().to_string(),
            port: self.local_addr.port(),
        };
        let encoded = serde_json::to_vec(&RingMessage::get_info(request_id, sender, peer))
            .map_err(|e| format!("encode failed: {}", e))?;

        let (tx, rx) = oneshot::channel();
        self.pending.insert(request_id, tx);

        if let Err(e) = self.socket.send_to(&encoded, target).await {
            self.pending.remove(&request_id);
            return Err(format!("send failed: {}", e));
        }

        let reply = tokio::time::timeout(self.request_timeout, rx).await;
        self.pending.remove(&request_id);

        match reply {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err("reply channel closed".to_string()),
            Err(_) => Err(format!("timed out after {:?}", self.request_timeout)),
        }
    }
}

impl RingClient for UdpRingClient {
    async fn describe(&self, peer: &PeerRef) -> Result<PeerInfo, PeerUnreachable> {
        self.request(peer).await.map_err(|reason| {
            tracing::warn!("Peer {} unreachable: {}", peer, reason);
            PeerUnreachable::new(peer, reason)
        })
    }
}
