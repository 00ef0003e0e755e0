//! Ring Node Wire Protocol
//!
//! JSON datagrams exchanged with ring peers. A request names the peer being
//! described and the address the reply must be sent back to; the reply echoes
//! the request id so the client can match it to the waiting caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{PeerInfo, PeerRef};

/// RPC method that returns a peer's self record and neighbours.
pub const METHOD_GET_INFO: &str = "getInfo";

/// Largest datagram the client will accept.
pub const MAX_DATAGRAM_SIZE: usize = 65536;

/// Where a peer should send its reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyTo {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RingMessage {
    #[serde(rename_all = "camelCase")]
    Request {
        request_id: Uuid,
        method: String,
        sender: ReplyTo,
        params: PeerRef,
    },

    #[serde(rename_all = "camelCase")]
    Response {
        request_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<PeerInfo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl RingMessage {
    pub fn get_info(request_id: Uuid, sender: ReplyTo, target: &PeerRef) -> Self {
        RingMessage::Request {
            request_id,
            method: METHOD_GET_INFO.to_string(),
            sender,
            params: target.clone(),
        }
    }
}
