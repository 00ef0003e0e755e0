//! Ring Module Tests
//!
//! ## Test Scopes
//! - **Data Structures**: PeerRef equivalence and the JSON shape of peer records.
//! - **Wire Protocol**: request/response framing understood by ring peers.
//! - **UDP Client**: round trips against a fake ring peer on loopback, plus
//!   every path that must collapse into `PeerUnreachable`.

#[cfg(test)]
mod tests {
    use crate::ring::client::RingClient;
    use crate::ring::protocol::{METHOD_GET_INFO, RingMessage, ReplyTo};
    use crate::ring::types::{PeerInfo, PeerRef};
    use crate::ring::udp::UdpRingClient;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::net::UdpSocket;
    use uuid::Uuid;

    fn peer(id: u64, port: u16) -> PeerRef {
        PeerRef::new(id, format!("{:06X}", id * 0x1111), "127.0.0.1", port)
    }

    // ============================================================
    // PEER REF TESTS
    // ============================================================

    #[test]
    fn test_peer_ref_equivalence_uses_all_fields() {
        let a = PeerRef::new(7, "ABCDEF", "127.0.0.1", 5000);

        assert_eq!(a, PeerRef::new(7, "ABCDEF", "127.0.0.1", 5000));
        assert_ne!(a, PeerRef::new(7, "ABCDEF", "127.0.0.1", 5001));
        assert_ne!(a, PeerRef::new(7, "ABCDEE", "127.0.0.1", 5000));
        assert_ne!(a, PeerRef::new(7, "ABCDEF", "10.0.0.1", 5000));
        assert_ne!(a, PeerRef::new(8, "ABCDEF", "127.0.0.1", 5000));
    }

    #[test]
    fn test_peer_ref_endpoint() {
        assert_eq!(peer(1, 50000).endpoint(), "127.0.0.1:50000");
        assert_eq!(PeerRef::new(1, "AA", "::1", 9).endpoint(), "[::1]:9");
        assert_eq!(PeerRef::new(1, "AA", "ring.local", 9).endpoint(), "ring.local:9");
    }

    #[test]
    fn test_peer_info_uses_short_field_names() {
        let info = PeerInfo {
            node: peer(1, 5001),
            predecessor: peer(0, 5000),
            successor: peer(2, 5002),
            finger_table: vec![peer(2, 5002)],
        };

        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["node"]["id"], 1);
        assert_eq!(json["pre"]["port"], 5000);
        assert_eq!(json["suc"]["hash"], peer(2, 5002).hash);
        assert_eq!(json["finger"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_peer_info_missing_finger_table_defaults_empty() {
        let json = serde_json::json!({
            "node": {"id": 1, "hash": "AA", "address": "127.0.0.1", "port": 1},
            "pre": {"id": 1, "hash": "AA", "address": "127.0.0.1", "port": 1},
            "suc": {"id": 1, "hash": "AA", "address": "127.0.0.1", "port": 1},
        });

        let info: PeerInfo = serde_json::from_value(json).unwrap();

        assert!(info.finger_table.is_empty());
        assert_eq!(info.node, info.predecessor);
    }

    // ============================================================
    // WIRE PROTOCOL TESTS
    // ============================================================

    #[test]
    fn test_get_info_request_shape() {
        let id = Uuid::new_v4();
        let sender = ReplyTo {
            address: "127.0.0.1".to_string(),
            port: 55555,
        };

        let msg = RingMessage::get_info(id, sender, &peer(3, 5003));
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "request");
        assert_eq!(json["requestId"], id.to_string());
        assert_eq!(json["method"], METHOD_GET_INFO);
        assert_eq!(json["sender"]["port"], 55555);
        assert_eq!(json["params"]["id"], 3);
    }

    #[test]
    fn test_error_response_parses_without_result() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"type":"response","requestId":"{}","error":"busy"}}"#, id);

        let msg: RingMessage = serde_json::from_str(&raw).unwrap();

        if let RingMessage::Response {
            request_id,
            result,
            error,
        } = msg
        {
            assert_eq!(request_id, id);
            assert!(result.is_none());
            assert_eq!(error.as_deref(), Some("busy"));
        } else {
            panic!("Wrong message type");
        }
    }

    // ============================================================
    // UDP CLIENT TESTS
    // ============================================================

    enum FakeBehaviour {
        Answer,
        Reject,
        Garbage,
    }

    /// Binds a fake ring peer and answers every getInfo according to `behaviour`.
    async fn spawn_fake_peer(behaviour: FakeBehaviour) -> (SocketAddr, PeerRef) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let me = peer(5, addr.port());

        let this = me.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 65536];
            loop {
                let Ok((len, _src)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                let Ok(RingMessage::Request {
                    request_id,
                    sender,
                    params,
                    ..
                }) = serde_json::from_slice::<RingMessage>(&buf[..len])
                else {
                    continue;
                };

                let reply_to: SocketAddr = format!("{}:{}", sender.address, sender.port)
                    .parse()
                    .unwrap();

                let bytes = match behaviour {
                    FakeBehaviour::Answer => {
                        assert_eq!(params, this);
                        let info = PeerInfo {
                            node: this.clone(),
                            predecessor: peer(4, 5004),
                            successor: peer(6, 5006),
                            finger_table: vec![peer(6, 5006), peer(9, 5009)],
                        };
                        serde_json::to_vec(&RingMessage::Response {
                            request_id,
                            result: Some(info),
                            error: None,
                        })
                        .unwrap()
                    }
                    FakeBehaviour::Reject => serde_json::to_vec(&RingMessage::Response {
                        request_id,
                        result: None,
                        error: Some("unknown method".to_string()),
                    })
                    .unwrap(),
                    FakeBehaviour::Garbage => b"not json at all".to_vec(),
                };

                socket.send_to(&bytes, reply_to).await.unwrap();
            }
        });

        (addr, me)
    }

    async fn client(timeout_ms: u64) -> std::sync::Arc<UdpRingClient> {
        let client = UdpRingClient::bind(
            "127.0.0.1:0".parse().unwrap(),
            Duration::from_millis(timeout_ms),
        )
        .await
        .expect("Failed to bind client");
        client.clone().start().await;
        client
    }

    #[tokio::test]
    async fn test_describe_round_trip() {
        // ARRANGE
        let (_addr, target) = spawn_fake_peer(FakeBehaviour::Answer).await;
        let client = client(1000).await;

        // ACT
        let info = client.describe(&target).await.expect("peer should answer");

        // ASSERT
        assert_eq!(info.node, target);
        assert_eq!(info.predecessor.id, 4);
        assert_eq!(info.successor.id, 6);
        assert_eq!(info.finger_table.len(), 2);
        assert_eq!(client.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_describe_rejected_is_unreachable() {
        let (_addr, target) = spawn_fake_peer(FakeBehaviour::Reject).await;
        let client = client(1000).await;

        let err = client.describe(&target).await.unwrap_err();

        assert_eq!(err.peer, target);
        assert!(err.reason.contains("unknown method"));
    }

    #[tokio::test]
    async fn test_describe_garbage_reply_times_out() {
        let (_addr, target) = spawn_fake_peer(FakeBehaviour::Garbage).await;
        let client = client(200).await;

        let err = client.describe(&target).await.unwrap_err();

        assert!(err.reason.contains("timed out"));
        assert_eq!(client.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_describe_silent_peer_is_unreachable() {
        // A bound socket that never answers.
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = peer(9, silent.local_addr().unwrap().port());
        let client = client(150).await;

        let result = client.describe(&target).await;

        assert!(result.is_err());
        assert_eq!(client.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_describe_unresolvable_host_is_unreachable() {
        let client = client(150).await;
        let target = PeerRef::new(1, "AA", "", 0);

        let err = client.describe(&target).await.unwrap_err();

        assert_eq!(err.peer, target);
    }
}
