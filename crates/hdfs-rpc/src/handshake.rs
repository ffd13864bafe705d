//! Connection preamble and connection context.
//!
//! After TCP connect the client writes a 7-byte preamble, then (for SASL)
//! authenticates, then sends an `IpcConnectionContextProto` naming the user
//! and protocol. The server answers neither the preamble nor the context.

use tracing::debug;

use crate::config::AuthMode;
use crate::connection::Connection;
use crate::error::Result;
use crate::frame;
use crate::proto::common::{IpcConnectionContextProto, UserInformationProto};
use crate::rpc;

/// Magic bytes opening every connection.
pub const RPC_HEADER_MAGIC: &[u8; 4] = b"hrpc";

/// IPC protocol version spoken by this client.
pub const RPC_VERSION: u8 = 9;

/// Default service class.
pub const RPC_SERVICE_CLASS: u8 = 0;

/// Call id reserved for the connection context frame.
pub const CONNECTION_CONTEXT_CALL_ID: i32 = -3;

/// Protocol every call is declared against.
pub const CLIENT_PROTOCOL: &str = "org.apache.hadoop.hdfs.protocol.ClientProtocol";

/// Version of [`CLIENT_PROTOCOL`] sent in each method header.
pub const CLIENT_PROTOCOL_VERSION: u64 = 1;

/// Length of the preamble.
pub const PREAMBLE_LEN: usize = 7;

/// Builds the preamble for `auth`.
pub fn preamble(auth: AuthMode) -> [u8; PREAMBLE_LEN] {
    let mut out = [0u8; PREAMBLE_LEN];
    out[..4].copy_from_slice(RPC_HEADER_MAGIC);
    out[4] = RPC_VERSION;
    out[5] = RPC_SERVICE_CLASS;
    out[6] = auth.preamble_byte();
    out
}

/// Writes the preamble as the first bytes on `conn`.
pub async fn write_preamble(conn: &mut Connection, auth: AuthMode) -> Result<()> {
    conn.write_raw(&preamble(auth)).await?;
    debug!(addr = %conn.peer_addr(), ?auth, "sent connection preamble");
    Ok(())
}

/// Builds the context message. An empty user leaves the user info out and
/// lets the server derive it from the authenticated principal.
pub fn connection_context(user: &str) -> IpcConnectionContextProto {
    let user_info = if user.is_empty() {
        None
    } else {
        Some(UserInformationProto {
            effective_user: Some(user.to_string()),
            real_user: None,
        })
    };
    IpcConnectionContextProto {
        user_info,
        protocol: Some(CLIENT_PROTOCOL.to_string()),
    }
}

/// Sends the connection context. No response follows.
pub async fn send_connection_context(
    conn: &mut Connection,
    user: &str,
    client_id: &[u8],
) -> Result<()> {
    let header = rpc::request_header(CONNECTION_CONTEXT_CALL_ID, -1, client_id);
    let frame = frame::encode(&header, &connection_context(user))?;
    conn.write_frame(&frame).await?;
    debug!(addr = %conn.peer_addr(), user, "sent connection context");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockNamenode;

    #[test]
    fn test_preamble_bytes() {
        assert_eq!(preamble(AuthMode::Simple), [b'h', b'r', b'p', b'c', 9, 0, 0]);
        assert_eq!(
            preamble(AuthMode::Kerberos),
            [b'h', b'r', b'p', b'c', 9, 0, 0xDF]
        );
    }

    #[test]
    fn test_context_without_user() {
        let ctx = connection_context("");
        assert!(ctx.user_info.is_none());
        assert_eq!(ctx.protocol.as_deref(), Some(CLIENT_PROTOCOL));
    }

    #[tokio::test]
    async fn test_context_frame_layout() {
        let (mut conn, mut server) = MockNamenode::pair();
        let client_id = vec![7u8; 16];
        send_connection_context(&mut conn, "alice", &client_id)
            .await
            .unwrap();

        let (header, ctx) = server.recv_context().await.unwrap();
        assert_eq!(header.call_id, CONNECTION_CONTEXT_CALL_ID);
        assert_eq!(header.retry_count, Some(-1));
        assert_eq!(header.client_id, client_id);
        let user = ctx.user_info.unwrap();
        assert_eq!(user.effective_user.as_deref(), Some("alice"));
        assert_eq!(ctx.protocol.as_deref(), Some(CLIENT_PROTOCOL));
    }

    #[tokio::test]
    async fn test_write_preamble() {
        let (mut conn, mut server) = MockNamenode::pair();
        write_preamble(&mut conn, AuthMode::Kerberos).await.unwrap();
        let bytes = server.read_preamble().await.unwrap();
        assert_eq!(&bytes[..4], b"hrpc");
        assert_eq!(bytes[6], 0xDF);
    }
}
