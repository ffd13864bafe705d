//! Scripted in-memory NameNode for tests.
//!
//! [`MockNamenode`] is the server end of a stream. Tests drive it step by
//! step: read what the client sent, assert on it, write the reply. Nothing
//! is automatic beyond [`MockNamenode::accept_simple`], so every frame a test
//! expects is visible in the test body.

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use prost::Message;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::connection::{Connection, RawStream};
use crate::error::{Result, RpcError};
use crate::frame::{self, FrameBuilder, FrameReader, DEFAULT_MAX_FRAME_LEN, LENGTH_PREFIX_SIZE};
use crate::handshake::{self, PREAMBLE_LEN};
use crate::mechanism::{MechanismFactory, SaslMechanism};
use crate::proto::common::rpc_response_header_proto::{RpcErrorCodeProto, RpcStatusProto};
use crate::proto::common::rpc_sasl_proto::{SaslAuth, SaslState};
use crate::proto::common::{
    IpcConnectionContextProto, RequestHeaderProto, RpcRequestHeaderProto,
    RpcResponseHeaderProto, RpcSaslProto,
};
use crate::sasl::SASL_CALL_ID;

/// Per-frame I/O timeout of connections created by [`MockNamenode::pair`].
pub const MOCK_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// One application call as received by the mock.
#[derive(Debug, Clone)]
pub struct MockCall<R> {
    /// Outer RPC header.
    pub header: RpcRequestHeaderProto,
    /// Method header.
    pub method: RequestHeaderProto,
    /// Decoded request.
    pub request: R,
}

/// Server end of a client connection.
pub struct MockNamenode {
    stream: Box<dyn RawStream>,
}

impl std::fmt::Debug for MockNamenode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockNamenode").finish_non_exhaustive()
    }
}

impl MockNamenode {
    /// Wraps the server end of any stream.
    pub fn new<S: RawStream + 'static>(stream: S) -> Self {
        Self {
            stream: Box::new(stream),
        }
    }

    /// Creates a client [`Connection`] wired to a fresh mock over an
    /// in-memory pipe.
    pub fn pair() -> (Connection, MockNamenode) {
        let (client, server) = tokio::io::duplex(256 * 1024);
        let conn = Connection::from_stream(client, "mock", MOCK_IO_TIMEOUT, DEFAULT_MAX_FRAME_LEN);
        (conn, MockNamenode::new(server))
    }

    /// Accepts one TCP client from `listener`.
    pub async fn accept(listener: &TcpListener) -> Result<Self> {
        let (stream, _) = listener.accept().await?;
        Ok(Self::new(stream))
    }

    /// Reads the 7-byte preamble.
    pub async fn read_preamble(&mut self) -> Result<[u8; PREAMBLE_LEN]> {
        let mut buf = [0u8; PREAMBLE_LEN];
        self.stream.read_exact(&mut buf).await?;
        Ok(buf)
    }

    /// Consumes the setup of a simple-auth client: preamble and connection
    /// context. Returns the context.
    pub async fn accept_simple(&mut self) -> Result<IpcConnectionContextProto> {
        let preamble = self.read_preamble().await?;
        if preamble[..4] != handshake::RPC_HEADER_MAGIC[..] {
            return Err(RpcError::invalid_frame("bad preamble magic"));
        }
        let (_, ctx) = self.recv_context().await?;
        Ok(ctx)
    }

    /// Reads one whole frame, prefix included.
    pub async fn recv_frame(&mut self) -> Result<Bytes> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        self.stream.read_exact(&mut prefix).await?;
        let len = frame::parse_length(prefix, DEFAULT_MAX_FRAME_LEN)? as usize;
        let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + len);
        buf.put_slice(&prefix);
        buf.resize(LENGTH_PREFIX_SIZE + len, 0);
        self.stream.read_exact(&mut buf[LENGTH_PREFIX_SIZE..]).await?;
        Ok(buf.freeze())
    }

    /// Reads one SASL frame.
    pub async fn recv_sasl(&mut self) -> Result<(RpcRequestHeaderProto, RpcSaslProto)> {
        let frame = self.recv_frame().await?;
        frame::decode(frame)
    }

    /// Reads the connection context frame.
    pub async fn recv_context(
        &mut self,
    ) -> Result<(RpcRequestHeaderProto, IpcConnectionContextProto)> {
        let frame = self.recv_frame().await?;
        frame::decode(frame)
    }

    /// Reads one application call.
    pub async fn recv_call<R: Message + Default>(&mut self) -> Result<MockCall<R>> {
        let frame = self.recv_frame().await?;
        let mut reader = FrameReader::new(frame)?;
        let header = reader.next_message()?;
        let method = reader.next_message()?;
        let request = reader.next_message()?;
        reader.finish()?;
        Ok(MockCall {
            header,
            method,
            request,
        })
    }

    /// Sends a SASL message with call id -33.
    pub async fn send_sasl(
        &mut self,
        state: SaslState,
        token: Option<Vec<u8>>,
        auths: Vec<SaslAuth>,
    ) -> Result<()> {
        let msg = RpcSaslProto {
            version: None,
            state: state as i32,
            token,
            auths,
        };
        self.reply(SASL_CALL_ID, &msg).await
    }

    /// Sends a successful response to `call_id`.
    pub async fn reply<M: Message>(&mut self, call_id: i32, msg: &M) -> Result<()> {
        let header = response_header(call_id, RpcStatusProto::Success);
        let frame = frame::encode(&header, msg)?;
        self.send_raw(&frame).await
    }

    /// Sends an error response (status `ERROR`, header only).
    pub async fn reply_error(&mut self, call_id: i32, class_name: &str, message: &str) -> Result<()> {
        self.send_failure(call_id, RpcStatusProto::Error, class_name, message)
            .await
    }

    /// Sends a fatal response (status `FATAL`, header only).
    pub async fn reply_fatal(&mut self, call_id: i32, class_name: &str, message: &str) -> Result<()> {
        self.send_failure(call_id, RpcStatusProto::Fatal, class_name, message)
            .await
    }

    /// Sends a success header with no payload.
    pub async fn reply_header_only(&mut self, call_id: i32) -> Result<()> {
        let header = response_header(call_id, RpcStatusProto::Success);
        let frame = FrameBuilder::new().push(&header).finish()?;
        self.send_raw(&frame).await
    }

    async fn send_failure(
        &mut self,
        call_id: i32,
        status: RpcStatusProto,
        class_name: &str,
        message: &str,
    ) -> Result<()> {
        let code = match status {
            RpcStatusProto::Fatal => RpcErrorCodeProto::FatalUnknown,
            _ => RpcErrorCodeProto::ErrorApplication,
        };
        let header = RpcResponseHeaderProto {
            exception_class_name: Some(class_name.to_string()),
            error_msg: Some(message.to_string()),
            error_detail: Some(code as i32),
            ..response_header(call_id, status)
        };
        let frame = FrameBuilder::new().push(&header).finish()?;
        self.send_raw(&frame).await
    }

    /// Writes raw bytes.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }
}

fn response_header(call_id: i32, status: RpcStatusProto) -> RpcResponseHeaderProto {
    RpcResponseHeaderProto {
        call_id: call_id as u32,
        status: status as i32,
        server_ipc_version_num: Some(handshake::RPC_VERSION as u32),
        ..Default::default()
    }
}

/// A `KERBEROS/GSSAPI` offer as a NameNode sends it.
pub fn kerberos_auth() -> SaslAuth {
    SaslAuth {
        method: "KERBEROS".to_string(),
        mechanism: "GSSAPI".to_string(),
        protocol: Some("nn".to_string()),
        server_id: Some("namenode.example.com".to_string()),
        challenge: None,
    }
}

/// Factory for [`ScriptedMechanism`]s that answer a fixed number of
/// challenges.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedFactory {
    steps: usize,
}

impl ScriptedFactory {
    /// Mechanisms from this factory accept `steps` challenges.
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }
}

impl MechanismFactory for ScriptedFactory {
    fn create(&self, auth: &SaslAuth) -> Result<Box<dyn SaslMechanism>> {
        Ok(Box::new(ScriptedMechanism {
            name: auth.mechanism.clone(),
            steps_left: self.steps,
        }))
    }
}

/// Mechanism that sends `initial`, answers challenge `c` with `reply-c`, and
/// fails once its steps are used up.
#[derive(Debug)]
pub struct ScriptedMechanism {
    name: String,
    steps_left: usize,
}

impl SaslMechanism for ScriptedMechanism {
    fn name(&self) -> &str {
        &self.name
    }

    fn initial_response(&mut self) -> Result<Vec<u8>> {
        Ok(b"initial".to_vec())
    }

    fn evaluate_challenge(&mut self, challenge: &[u8]) -> Result<Vec<u8>> {
        if self.steps_left == 0 {
            return Err(RpcError::Sasl {
                mechanism: self.name.clone(),
                reason: "no more steps".to_string(),
            });
        }
        self.steps_left -= 1;
        let mut token = b"reply-".to_vec();
        token.extend_from_slice(challenge);
        Ok(token)
    }

    fn is_complete(&self) -> bool {
        self.steps_left == 0
    }
}
