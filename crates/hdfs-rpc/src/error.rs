//! Error types for the RPC core.

use thiserror::Error;

use crate::exception::{self, ServerError};

/// Exception reported by the NameNode in a response header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method}: {message} ({class_name})")]
pub struct RemoteException {
    /// RPC method that failed, `sasl` for handshake replies.
    pub method: String,
    /// Fully qualified java class name of the server exception.
    pub class_name: String,
    /// Exception message.
    pub message: String,
    /// Numeric `RpcErrorCodeProto` detail, 0 when absent.
    pub code: i32,
}

impl RemoteException {
    /// Classifies the exception into a local error kind.
    pub fn interpret(&self) -> ServerError {
        let mut err = exception::interpret(&self.class_name, &self.message);
        err.code = Some(self.code);
        err
    }
}

/// Errors raised by the RPC core.
#[derive(Debug, Error)]
pub enum RpcError {
    /// TCP connect did not finish in time.
    #[error("connection timeout after {timeout_ms}ms to {addr}")]
    ConnectTimeout { addr: String, timeout_ms: u64 },

    /// A read, write or whole call exceeded its deadline.
    #[error("{op} timed out after {timeout_ms}ms")]
    Timeout { op: String, timeout_ms: u64 },

    /// The connection was already closed.
    #[error("not connected")]
    NotConnected,

    /// A frame could not be split into its delimited messages.
    #[error("invalid frame: {reason}")]
    InvalidFrame { reason: String },

    /// Declared frame length exceeds the configured maximum.
    #[error("frame too large: {size} bytes (max {max_size})")]
    FrameTooLarge { size: u32, max_size: u32 },

    /// The server broke the call or handshake sequence.
    #[error("protocol violation in {method}: {reason}")]
    ProtocolViolation { method: String, reason: String },

    /// No offered SASL auth uses Kerberos.
    #[error("no supported SASL mechanism offered (server offered: {offered:?})")]
    UnsupportedMechanism { offered: Vec<String> },

    /// The SASL mechanism rejected a step.
    #[error("SASL {mechanism} failed: {reason}")]
    Sasl { mechanism: String, reason: String },

    /// Options or build features do not allow the requested mode.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// Exception returned by the NameNode.
    #[error(transparent)]
    Remote(#[from] RemoteException),

    /// Malformed protobuf payload.
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Socket failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RpcError {
    /// Whether the error leaves the connection in an indeterminate state.
    ///
    /// Only remote exceptions are per-call; everything else means the
    /// connection must be closed and discarded.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RpcError::Remote(_))
    }

    pub(crate) fn violation(method: &str, reason: impl Into<String>) -> Self {
        RpcError::ProtocolViolation {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_frame(reason: impl Into<String>) -> Self {
        RpcError::InvalidFrame {
            reason: reason.into(),
        }
    }
}

/// Result alias for the RPC core.
pub type Result<T> = std::result::Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::ErrorKind;

    #[test]
    fn test_remote_is_not_fatal() {
        let err = RpcError::Remote(RemoteException {
            method: "getFileInfo".to_string(),
            class_name: "java.io.FileNotFoundException".to_string(),
            message: "File does not exist: /x".to_string(),
            code: 1,
        });
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_transport_errors_are_fatal() {
        assert!(RpcError::NotConnected.is_fatal());
        assert!(RpcError::invalid_frame("short").is_fatal());
        assert!(RpcError::violation("sasl", "out of order").is_fatal());
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(RpcError::from(io).is_fatal());
    }

    #[test]
    fn test_remote_exception_interpret_keeps_code() {
        let remote = RemoteException {
            method: "rename2".to_string(),
            class_name: "org.apache.hadoop.fs.FileAlreadyExistsException".to_string(),
            message: "rename destination /b already exists".to_string(),
            code: 1,
        };
        let err = remote.interpret();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert_eq!(err.code, Some(1));
        assert_eq!(err.message, "rename destination /b already exists");
    }

    #[test]
    fn test_display() {
        let err = RpcError::FrameTooLarge {
            size: 200,
            max_size: 100,
        };
        assert_eq!(err.to_string(), "frame too large: 200 bytes (max 100)");
        let err = RpcError::UnsupportedMechanism {
            offered: vec!["TOKEN".to_string()],
        };
        assert!(err.to_string().contains("TOKEN"));
    }
}
