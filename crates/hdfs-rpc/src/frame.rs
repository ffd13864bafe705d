//! Frame codec for the NameNode wire format.
//!
//! Every message in either direction is one frame:
//!
//! ```text
//! +----------------+---------------------------+---------------------------+-----
//! | length: u32 BE | varint len | header bytes | varint len | payload bytes | ...
//! +----------------+---------------------------+---------------------------+-----
//! ```
//!
//! `length` counts every byte after the prefix. Requests carry three
//! delimited messages (RPC header, method header, request), SASL traffic and
//! responses carry two, error responses only the header.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use prost::Message;

use crate::error::{Result, RpcError};

/// Size of the big-endian length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default upper bound for a received frame body (Hadoop's
/// `ipc.maximum.response.length`).
pub const DEFAULT_MAX_FRAME_LEN: u32 = 128 * 1024 * 1024;

/// Accumulates length-delimited messages into one frame.
#[derive(Debug)]
pub struct FrameBuilder {
    buf: BytesMut,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// Starts an empty frame with room reserved for the prefix.
    pub fn new() -> Self {
        let mut buf = BytesMut::with_capacity(256);
        buf.put_u32(0);
        Self { buf }
    }

    /// Appends `msg` as a varint-length-delimited message.
    pub fn push<M: Message>(mut self, msg: &M) -> Self {
        self.buf.extend_from_slice(&msg.encode_length_delimited_to_vec());
        self
    }

    /// Writes the length prefix and returns the complete frame.
    pub fn finish(mut self) -> Result<Bytes> {
        let body_len = self.buf.len() - LENGTH_PREFIX_SIZE;
        let body_len = u32::try_from(body_len).map_err(|_| {
            RpcError::invalid_frame(format!("body of {} bytes exceeds u32 length", body_len))
        })?;
        self.buf[..LENGTH_PREFIX_SIZE].copy_from_slice(&body_len.to_be_bytes());
        Ok(self.buf.freeze())
    }
}

/// Walks the delimited messages of one complete frame.
#[derive(Debug)]
pub struct FrameReader {
    body: Bytes,
}

impl FrameReader {
    /// Validates the length prefix of `frame` against its actual size.
    pub fn new(mut frame: Bytes) -> Result<Self> {
        if frame.len() < LENGTH_PREFIX_SIZE {
            return Err(RpcError::invalid_frame(format!(
                "frame of {} bytes has no length prefix",
                frame.len()
            )));
        }
        let declared = frame.get_u32() as usize;
        if declared != frame.len() {
            return Err(RpcError::invalid_frame(format!(
                "declared length {} but body is {} bytes",
                declared,
                frame.len()
            )));
        }
        Ok(Self { body: frame })
    }

    /// Wraps a body whose prefix was already consumed and checked.
    pub fn from_body(body: Bytes) -> Self {
        Self { body }
    }

    /// Decodes the next delimited message.
    pub fn next_message<M: Message + Default>(&mut self) -> Result<M> {
        if self.body.is_empty() {
            return Err(RpcError::invalid_frame("expected another message, frame exhausted"));
        }
        Ok(M::decode_length_delimited(&mut self.body)?)
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.body.len()
    }

    /// Fails if anything is left after the last expected message.
    pub fn finish(self) -> Result<()> {
        if !self.body.is_empty() {
            return Err(RpcError::invalid_frame(format!(
                "{} trailing bytes after last message",
                self.body.len()
            )));
        }
        Ok(())
    }
}

/// Encodes `header` and `payload` into one frame.
pub fn encode<H: Message, P: Message>(header: &H, payload: &P) -> Result<Bytes> {
    FrameBuilder::new().push(header).push(payload).finish()
}

/// Decodes a complete frame holding exactly a header and a payload.
pub fn decode<H, P>(frame: Bytes) -> Result<(H, P)>
where
    H: Message + Default,
    P: Message + Default,
{
    let mut reader = FrameReader::new(frame)?;
    let header = reader.next_message()?;
    let payload = reader.next_message()?;
    reader.finish()?;
    Ok((header, payload))
}

/// Parses a length prefix, rejecting bodies larger than `max_len`.
pub fn parse_length(prefix: [u8; LENGTH_PREFIX_SIZE], max_len: u32) -> Result<u32> {
    let len = u32::from_be_bytes(prefix);
    if len > max_len {
        return Err(RpcError::FrameTooLarge {
            size: len,
            max_size: max_len,
        });
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::common::rpc_sasl_proto::SaslState;
    use crate::proto::common::{RpcRequestHeaderProto, RpcSaslProto};

    fn sample_header() -> RpcRequestHeaderProto {
        RpcRequestHeaderProto {
            rpc_kind: Some(2),
            rpc_op: Some(0),
            call_id: -33,
            client_id: Vec::new(),
            retry_count: Some(-1),
        }
    }

    fn sample_payload() -> RpcSaslProto {
        RpcSaslProto {
            version: None,
            state: SaslState::Negotiate as i32,
            token: None,
            auths: Vec::new(),
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let frame = encode(&sample_header(), &sample_payload()).unwrap();
        let (header, payload): (RpcRequestHeaderProto, RpcSaslProto) = decode(frame).unwrap();
        assert_eq!(header, sample_header());
        assert_eq!(payload, sample_payload());
    }

    #[test]
    fn test_prefix_matches_body_length() {
        let frame = encode(&sample_header(), &sample_payload()).unwrap();
        let declared = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        assert_eq!(declared as usize, frame.len() - LENGTH_PREFIX_SIZE);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let frame = encode(&sample_header(), &sample_payload()).unwrap();
        let mut longer = BytesMut::from(&frame[..]);
        longer.put_u8(0);
        let err = decode::<RpcRequestHeaderProto, RpcSaslProto>(longer.freeze()).unwrap_err();
        assert!(matches!(err, RpcError::InvalidFrame { .. }));

        let shorter = frame.slice(..frame.len() - 1);
        let err = decode::<RpcRequestHeaderProto, RpcSaslProto>(shorter).unwrap_err();
        assert!(matches!(err, RpcError::InvalidFrame { .. }));
    }

    #[test]
    fn test_missing_prefix_rejected() {
        let err = FrameReader::new(Bytes::from_static(&[0, 0])).unwrap_err();
        assert!(matches!(err, RpcError::InvalidFrame { .. }));
    }

    #[test]
    fn test_missing_payload_rejected() {
        let frame = FrameBuilder::new().push(&sample_header()).finish().unwrap();
        let err = decode::<RpcRequestHeaderProto, RpcSaslProto>(frame).unwrap_err();
        assert!(matches!(err, RpcError::InvalidFrame { .. }));
    }

    #[test]
    fn test_trailing_message_rejected() {
        let frame = FrameBuilder::new()
            .push(&sample_header())
            .push(&sample_payload())
            .push(&sample_payload())
            .finish()
            .unwrap();
        let err = decode::<RpcRequestHeaderProto, RpcSaslProto>(frame).unwrap_err();
        assert!(matches!(err, RpcError::InvalidFrame { .. }));
    }

    #[test]
    fn test_truncated_submessage_is_decode_error() {
        // Delimiter claims 10 bytes but only 2 follow.
        let frame = Bytes::from_static(&[0, 0, 0, 3, 10, 1, 2]);
        let mut reader = FrameReader::new(frame).unwrap();
        let err = reader.next_message::<RpcRequestHeaderProto>().unwrap_err();
        assert!(matches!(err, RpcError::Decode(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_garbage_message_is_decode_error() {
        // One delimited message of 2 bytes: field 1 with wire type 7 (invalid).
        let frame = Bytes::from_static(&[0, 0, 0, 3, 2, 0x0f, 0]);
        let mut reader = FrameReader::new(frame).unwrap();
        let err = reader.next_message::<RpcRequestHeaderProto>().unwrap_err();
        assert!(matches!(err, RpcError::Decode(_)));
    }

    #[test]
    fn test_reader_walks_three_messages() {
        let frame = FrameBuilder::new()
            .push(&sample_header())
            .push(&sample_payload())
            .push(&sample_header())
            .finish()
            .unwrap();
        let mut reader = FrameReader::new(frame).unwrap();
        let _: RpcRequestHeaderProto = reader.next_message().unwrap();
        let _: RpcSaslProto = reader.next_message().unwrap();
        assert!(reader.remaining() > 0);
        let _: RpcRequestHeaderProto = reader.next_message().unwrap();
        reader.finish().unwrap();
    }

    #[test]
    fn test_parse_length_limit() {
        assert_eq!(parse_length([0, 0, 1, 0], 1024).unwrap(), 256);
        let err = parse_length([0, 0, 4, 1], 1024).unwrap_err();
        assert!(matches!(
            err,
            RpcError::FrameTooLarge {
                size: 1025,
                max_size: 1024
            }
        ));
    }
}
