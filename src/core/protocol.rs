//! Wire protocol: JSON request/response messages exchanged between peers.
//!
//! Every message is a single field-named JSON object, read and written in one
//! bounded transport operation. [`MAX_MESSAGE_BYTES`] is a protocol limit:
//! there is no framing, so a payload larger than the ceiling is truncated at
//! the transport and will fail to decode. Raising the ceiling changes wire
//! compatibility and must not be done casually.

use serde_json::{json, Map, Value};

use crate::utils::{DhtError, Result};

/// Read ceiling for a single message, on both the server and client side.
pub const MAX_MESSAGE_BYTES: usize = 1024;

/// Hop budget assigned to a `find` that arrives without a `ttl` field.
///
/// A plain two-field `{"command": "find", "key": ...}` message carries no
/// loop protection; forwarded copies add a `ttl` field so a lookup bouncing
/// between peers that list each other terminates. Decoders that ignore
/// unknown fields still interoperate.
pub const DEFAULT_FIND_TTL: u8 = 8;

/// A request received from (or sent to) a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `{"command": "ping"}` — liveness check.
    Ping,
    /// `{"command": "store", "key": ..., "value": ...}` — record a peer
    /// location for a content key.
    Store { key: String, value: String },
    /// `{"command": "find", "key": ...}` — look up peers for a content key.
    /// `ttl` is present only on forwarded copies.
    Find { key: String, ttl: Option<u8> },
    /// Well-formed JSON object whose command is missing, unrecognized, or
    /// missing its required fields. Answered with [`Response::Invalid`].
    Unknown,
}

/// A response to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `{"status": "alive"}`
    Alive,
    /// `{"status": "stored", "key": ...}`
    Stored { key: String },
    /// `{"peers": [...]}` — addresses known to hold the key.
    Found { peers: Vec<String> },
    /// `{"peers": "not found"}`
    NotFound,
    /// `{"error": "invalid command"}`
    Invalid,
}

pub fn encode_request(request: &Request) -> Vec<u8> {
    let value = match request {
        Request::Ping => json!({"command": "ping"}),
        Request::Store { key, value } => {
            json!({"command": "store", "key": key, "value": value})
        }
        Request::Find { key, ttl: None } => json!({"command": "find", "key": key}),
        Request::Find {
            key,
            ttl: Some(ttl),
        } => json!({"command": "find", "key": key, "ttl": ttl}),
        // Only produced by decoding; never sent.
        Request::Unknown => json!({}),
    };
    value.to_string().into_bytes()
}

pub fn encode_response(response: &Response) -> Vec<u8> {
    let value = match response {
        Response::Alive => json!({"status": "alive"}),
        Response::Stored { key } => json!({"status": "stored", "key": key}),
        Response::Found { peers } => json!({"peers": peers}),
        Response::NotFound => json!({"peers": "not found"}),
        Response::Invalid => json!({"error": "invalid command"}),
    };
    value.to_string().into_bytes()
}

pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let fields = decode_object(bytes)?;

    match fields.get("command").and_then(Value::as_str) {
        Some("ping") => Ok(Request::Ping),
        Some("store") => {
            let key = fields.get("key").and_then(Value::as_str);
            let value = fields.get("value").and_then(Value::as_str);
            match (key, value) {
                (Some(key), Some(value)) => Ok(Request::Store {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
                _ => Ok(Request::Unknown),
            }
        }
        Some("find") => match fields.get("key").and_then(Value::as_str) {
            Some(key) => {
                let ttl = fields
                    .get("ttl")
                    .and_then(Value::as_u64)
                    .map(|t| t.min(u8::MAX as u64) as u8);
                Ok(Request::Find {
                    key: key.to_string(),
                    ttl,
                })
            }
            None => Ok(Request::Unknown),
        },
        _ => Ok(Request::Unknown),
    }
}

pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let fields = decode_object(bytes)?;

    if let Some(status) = fields.get("status").and_then(Value::as_str) {
        return match status {
            "alive" => Ok(Response::Alive),
            "stored" => {
                let key = fields
                    .get("key")
                    .and_then(Value::as_str)
                    .ok_or_else(|| DhtError::MalformedMessage("stored without key".into()))?;
                Ok(Response::Stored {
                    key: key.to_string(),
                })
            }
            other => Err(DhtError::MalformedMessage(format!(
                "unknown status '{}'",
                other
            ))),
        };
    }

    if let Some(peers) = fields.get("peers") {
        return match peers {
            Value::String(s) if s == "not found" => Ok(Response::NotFound),
            Value::Array(entries) => {
                let peers = entries
                    .iter()
                    .map(|entry| {
                        entry
                            .as_str()
                            .map(str::to_string)
                            .ok_or_else(|| DhtError::MalformedMessage("non-string peer".into()))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Response::Found { peers })
            }
            _ => Err(DhtError::MalformedMessage("bad peers field".into())),
        };
    }

    if fields.contains_key("error") {
        return Ok(Response::Invalid);
    }

    Err(DhtError::MalformedMessage(
        "object matches no response shape".into(),
    ))
}

fn decode_object(bytes: &[u8]) -> Result<Map<String, Value>> {
    if bytes.len() > MAX_MESSAGE_BYTES {
        return Err(DhtError::MalformedMessage(format!(
            "{} bytes exceeds the {} byte ceiling",
            bytes.len(),
            MAX_MESSAGE_BYTES
        )));
    }
    let value: Value = serde_json::from_slice(bytes)?;
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(DhtError::MalformedMessage("expected a JSON object".into())),
    }
}
