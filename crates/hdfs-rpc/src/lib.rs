#![warn(missing_docs)]

//! HDFS NameNode RPC core: length-prefixed protobuf framing, SASL/Kerberos handshake, call dispatch

pub mod config;
pub mod connection;
pub mod error;
pub mod exception;
pub mod frame;
pub mod handshake;
pub mod mechanism;
pub mod mock;
#[allow(missing_docs)]
pub mod proto;
pub mod rpc;
pub mod sasl;

pub use config::{AuthMode, ConnectionOptions};
pub use connection::Connection;
pub use error::{RemoteException, Result, RpcError};
pub use exception::{ErrorKind, ServerError};
pub use mechanism::{KerberosFactory, MechanismFactory, SaslMechanism};
pub use rpc::NamenodeConnection;
pub use sasl::{NegotiationState, SaslAuthenticator};
