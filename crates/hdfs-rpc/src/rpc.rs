//! RPC call dispatcher.
//!
//! A [`NamenodeConnection`] is a [`Connection`] that has completed the
//! preamble, authentication and connection context. Calls go out one at a
//! time: [`NamenodeConnection::execute`] writes one request frame and reads
//! exactly one response frame, which must carry the same call id.

use std::time::Duration;

use prost::Message;
use tracing::{debug, warn};

use crate::config::{AuthMode, ConnectionOptions};
use crate::connection::Connection;
use crate::error::{RemoteException, Result, RpcError};
use crate::frame::{FrameBuilder, FrameReader};
use crate::handshake::{self, CLIENT_PROTOCOL, CLIENT_PROTOCOL_VERSION};
use crate::mechanism::{KerberosFactory, MechanismFactory};
use crate::proto::common::rpc_request_header_proto::OperationProto;
use crate::proto::common::rpc_response_header_proto::RpcStatusProto;
use crate::proto::common::{
    RequestHeaderProto, RpcKindProto, RpcRequestHeaderProto, RpcResponseHeaderProto,
};
use crate::sasl::SaslAuthenticator;

/// Builds the outer header of a request frame.
pub(crate) fn request_header(
    call_id: i32,
    retry_count: i32,
    client_id: &[u8],
) -> RpcRequestHeaderProto {
    RpcRequestHeaderProto {
        rpc_kind: Some(RpcKindProto::RpcProtocolBuffer as i32),
        rpc_op: Some(OperationProto::RpcFinalPacket as i32),
        call_id,
        client_id: client_id.to_vec(),
        retry_count: Some(retry_count),
    }
}

/// Checks that `header` answers `expected_call_id` and reports success.
///
/// The call id travels as `uint32` and is compared as its `i32` bit pattern,
/// so the reserved negative ids match.
pub(crate) fn check_response(
    header: &RpcResponseHeaderProto,
    method: &str,
    expected_call_id: i32,
) -> Result<()> {
    let call_id = header.call_id as i32;
    if call_id != expected_call_id {
        return Err(RpcError::violation(
            method,
            format!(
                "response carries call id {} but call {} is outstanding",
                call_id, expected_call_id
            ),
        ));
    }
    match RpcStatusProto::try_from(header.status) {
        Ok(RpcStatusProto::Success) => Ok(()),
        Ok(_) => Err(RemoteException {
            method: method.to_string(),
            class_name: header.exception_class_name().to_string(),
            message: header.error_msg().to_string(),
            code: header.error_detail.unwrap_or_default(),
        }
        .into()),
        Err(_) => Err(RpcError::violation(
            method,
            format!("unknown response status {}", header.status),
        )),
    }
}

/// An established, authenticated session with a NameNode.
#[derive(Debug)]
pub struct NamenodeConnection {
    conn: Connection,
    client_id: Vec<u8>,
    next_call_id: i32,
    rpc_timeout: Duration,
}

impl NamenodeConnection {
    /// Connects to `options.addr` and runs the full setup, using GSSAPI for
    /// Kerberos.
    pub async fn connect(options: &ConnectionOptions) -> Result<Self> {
        Self::connect_with(options, &KerberosFactory).await
    }

    /// Like [`connect`](Self::connect) with an explicit mechanism factory.
    pub async fn connect_with(
        options: &ConnectionOptions,
        factory: &dyn MechanismFactory,
    ) -> Result<Self> {
        let conn = Connection::open(options).await?;
        Self::establish(conn, options, factory).await
    }

    /// Runs preamble, SASL (for Kerberos) and connection context over an
    /// open connection. The connection is closed if any step fails.
    pub async fn establish(
        mut conn: Connection,
        options: &ConnectionOptions,
        factory: &dyn MechanismFactory,
    ) -> Result<Self> {
        let client_id = uuid::Uuid::new_v4().as_bytes().to_vec();
        match Self::setup(&mut conn, options, factory, &client_id).await {
            Ok(()) => {
                debug!(addr = %conn.peer_addr(), user = %options.user, "namenode session established");
                Ok(Self {
                    conn,
                    client_id,
                    next_call_id: 0,
                    rpc_timeout: Duration::from_millis(options.rpc_timeout_ms),
                })
            }
            Err(e) => {
                conn.close();
                Err(e)
            }
        }
    }

    async fn setup(
        conn: &mut Connection,
        options: &ConnectionOptions,
        factory: &dyn MechanismFactory,
        client_id: &[u8],
    ) -> Result<()> {
        handshake::write_preamble(conn, options.auth).await?;
        if options.auth == AuthMode::Kerberos {
            SaslAuthenticator::new(conn, factory).run().await?;
        }
        handshake::send_connection_context(conn, &options.user, client_id).await
    }

    /// Issues `method` with `request` and decodes the response.
    ///
    /// Transport and protocol failures, timeouts and fatal server statuses
    /// close the connection. A remote exception leaves it usable.
    pub async fn execute<Req, Resp>(&mut self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Message,
        Resp: Message + Default,
    {
        if !self.conn.is_open() {
            return Err(RpcError::NotConnected);
        }
        let call_id = self.next_call_id();
        let timeout = self.rpc_timeout;
        let result = match tokio::time::timeout(timeout, self.round_trip(call_id, method, request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(RpcError::Timeout {
                op: method.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        };
        if let Err(ref e) = result {
            if e.is_fatal() && self.conn.is_open() {
                warn!(method, call_id, error = %e, "call failed, closing connection");
                self.conn.close();
            }
        }
        result
    }

    async fn round_trip<Req, Resp>(&mut self, call_id: i32, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Message,
        Resp: Message + Default,
    {
        let header = request_header(call_id, 0, &self.client_id);
        let method_header = RequestHeaderProto {
            method_name: method.to_string(),
            declaring_class_protocol_name: CLIENT_PROTOCOL.to_string(),
            client_protocol_version: CLIENT_PROTOCOL_VERSION,
        };
        let frame = FrameBuilder::new()
            .push(&header)
            .push(&method_header)
            .push(request)
            .finish()?;
        debug!(method, call_id, len = frame.len(), "dispatching call");
        self.conn.write_frame(&frame).await?;

        let frame = self.conn.read_frame().await?;
        let mut reader = FrameReader::new(frame)?;
        let header: RpcResponseHeaderProto = reader.next_message()?;
        if header.status() == RpcStatusProto::Fatal {
            self.conn.close();
        }
        check_response(&header, method, call_id)?;
        let response = reader.next_message()?;
        reader.finish()?;
        Ok(response)
    }

    fn next_call_id(&mut self) -> i32 {
        let id = self.next_call_id;
        self.next_call_id = id.wrapping_add(1) & i32::MAX;
        id
    }

    /// The 16-byte client id sent with every call.
    pub fn client_id(&self) -> &[u8] {
        &self.client_id
    }

    /// Remote address.
    pub fn peer_addr(&self) -> &str {
        self.conn.peer_addr()
    }

    /// False once the connection has been discarded.
    pub fn is_open(&self) -> bool {
        self.conn.is_open()
    }

    /// Closes the socket. Idempotent.
    pub fn close(&mut self) {
        self.conn.close();
    }
}
