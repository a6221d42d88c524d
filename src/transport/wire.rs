//! Broker wire protocol: publish commands and response frames.
//!
//! The broker speaks a TCP protocol with per-call acknowledgment:
//!
//! - a client sends the 4-byte protocol magic once per connection;
//! - a batch publish is `MPUB <topic>\n` followed by a big-endian `u32`
//!   body size, then the body: `u32` payload count and each payload as a
//!   `u32` length prefix plus bytes;
//! - the broker answers with one frame: `u32` size, then `i32` frame type
//!   and data. Frame type 0 with data `OK` acknowledges the batch; frame
//!   type 1 carries an error string.
//!
//! Encoding and decoding both live here so the producer and the test-side
//! fake broker share one definition.

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

use crate::error::{Result, TraceError};

/// Protocol magic, sent once when a connection opens.
pub const MAGIC: &[u8; 4] = b"  V2";

/// Acknowledgment / response frame type.
pub const FRAME_TYPE_RESPONSE: i32 = 0;
/// Error frame type; data is a broker error string.
pub const FRAME_TYPE_ERROR: i32 = 1;

/// Upper bound on an acknowledgment frame. Responses are tiny; anything
/// larger means the connection is not speaking this protocol.
pub const MAX_RESPONSE_SIZE: usize = 64 * 1024;

/// Encode a batch publish command for `topic`.
pub fn encode_mpub(topic: &str, bodies: &[Bytes]) -> Vec<u8> {
    let body_len: usize = 4 + bodies.iter().map(|b| 4 + b.len()).sum::<usize>();
    let mut out = Vec::with_capacity(6 + topic.len() + 4 + body_len);

    out.extend_from_slice(b"MPUB ");
    out.extend_from_slice(topic.as_bytes());
    out.push(b'\n');

    out.extend_from_slice(&(body_len as u32).to_be_bytes());
    out.extend_from_slice(&(bodies.len() as u32).to_be_bytes());
    for body in bodies {
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(body);
    }
    out
}

/// Decode an MPUB body (the bytes after the command line and size prefix)
/// back into its payloads.
pub fn decode_mpub_body(body: &[u8]) -> Result<Vec<Vec<u8>>> {
    if body.len() < 4 {
        return Err(TraceError::Protocol(format!(
            "MPUB body too short: {} bytes",
            body.len()
        )));
    }
    let count = BigEndian::read_u32(&body[0..4]) as usize;
    let mut offset = 4;
    let mut payloads = Vec::with_capacity(count);
    for i in 0..count {
        if body.len() < offset + 4 {
            return Err(TraceError::Protocol(format!(
                "truncated length prefix for payload {}",
                i
            )));
        }
        let len = BigEndian::read_u32(&body[offset..offset + 4]) as usize;
        offset += 4;
        if body.len() < offset + len {
            return Err(TraceError::Protocol(format!("truncated payload {}", i)));
        }
        payloads.push(body[offset..offset + len].to_vec());
        offset += len;
    }
    Ok(payloads)
}

/// One response frame from the broker, size prefix already stripped.
#[derive(Debug, Clone)]
pub struct ResponseFrame {
    pub frame_type: i32,
    pub data: Vec<u8>,
}

impl ResponseFrame {
    /// Whether this frame acknowledges the publish.
    pub fn is_ok(&self) -> bool {
        self.frame_type == FRAME_TYPE_RESPONSE && self.data == b"OK"
    }

    /// Error string carried by the frame, lossily decoded.
    pub fn error_message(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// Decode a response frame payload (the bytes after the size prefix).
pub fn decode_response(payload: &[u8]) -> Result<ResponseFrame> {
    if payload.len() < 4 {
        return Err(TraceError::Protocol(format!(
            "response frame too short: {} bytes",
            payload.len()
        )));
    }
    Ok(ResponseFrame {
        frame_type: BigEndian::read_i32(&payload[0..4]),
        data: payload[4..].to_vec(),
    })
}

/// Encode a response frame, size prefix included. Used by the test-side
/// fake broker.
pub fn encode_response(frame_type: i32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + data.len());
    out.extend_from_slice(&((4 + data.len()) as u32).to_be_bytes());
    out.extend_from_slice(&frame_type.to_be_bytes());
    out.extend_from_slice(data);
    out
}
