//! Connection options.

use serde::{Deserialize, Serialize};

use crate::frame::DEFAULT_MAX_FRAME_LEN;

/// Default NameNode RPC port.
pub const DEFAULT_NAMENODE_PORT: u16 = 8020;

/// How the connection authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Trust the user name sent in the connection context.
    #[default]
    Simple,
    /// SASL handshake with the first KERBEROS mechanism the server offers.
    Kerberos,
}

impl AuthMode {
    /// Auth protocol byte of the connection preamble.
    pub fn preamble_byte(&self) -> u8 {
        match self {
            AuthMode::Simple => 0,
            // -33 as a signed byte
            AuthMode::Kerberos => 0xDF,
        }
    }
}

/// Options for one NameNode connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// `host:port` of the NameNode.
    pub addr: String,
    /// Effective user announced in the connection context.
    pub user: String,
    /// Authentication mode.
    pub auth: AuthMode,
    /// TCP connect timeout in milliseconds (default: 5000).
    pub connect_timeout_ms: u64,
    /// Timeout for each frame read or write in milliseconds (default: 60000).
    pub io_timeout_ms: u64,
    /// Timeout for a whole call, write and response, in milliseconds (default: 60000).
    pub rpc_timeout_ms: u64,
    /// Largest accepted frame body in bytes.
    pub max_frame_len: u32,
    /// Whether to enable TCP_NODELAY.
    pub nodelay: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            addr: format!("localhost:{}", DEFAULT_NAMENODE_PORT),
            user: String::new(),
            auth: AuthMode::Simple,
            connect_timeout_ms: 5000,
            io_timeout_ms: 60_000,
            rpc_timeout_ms: 60_000,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            nodelay: true,
        }
    }
}
