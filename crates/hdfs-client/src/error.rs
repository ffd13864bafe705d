//! Errors returned by filesystem operations.

use std::io;

use hdfs_rpc::{ErrorKind, RpcError, ServerError};
use thiserror::Error;

/// Failure of one NameNode request, before a path is attached.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The NameNode rejected the request.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Transport, protocol or handshake failure.
    #[error(transparent)]
    Rpc(RpcError),
}

impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Remote(remote) => ClientError::Server(remote.interpret()),
            other => ClientError::Rpc(other),
        }
    }
}

impl ClientError {
    /// Classified kind of a server error; `None` for local failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Server(e) => Some(e.kind),
            ClientError::Rpc(_) => None,
        }
    }

    /// Converts into a standard I/O error.
    pub fn into_io(self) -> io::Error {
        match self {
            ClientError::Server(e) => e.into_io(),
            ClientError::Rpc(RpcError::Io(e)) => e,
            ClientError::Rpc(e) => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}

/// An error tied to the operation and path that caused it.
#[derive(Debug, Error)]
#[error("{op} {path}: {source}")]
pub struct PathError {
    /// Operation name, e.g. `rename`.
    pub op: &'static str,
    /// Path the failure is reported against.
    pub path: String,
    /// Underlying failure.
    pub source: ClientError,
}

impl PathError {
    pub(crate) fn new(op: &'static str, path: &str, source: impl Into<ClientError>) -> Self {
        Self {
            op,
            path: path.to_string(),
            source: source.into(),
        }
    }

    /// Classified kind, if the server reported the failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.source.kind()
    }

    /// Whether the path does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }

    /// Whether the target already exists.
    pub fn is_already_exists(&self) -> bool {
        self.kind() == Some(ErrorKind::AlreadyExists)
    }
}

/// Errors loading a [`ClientConfig`](crate::config::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    /// Malformed TOML.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither `.toml` nor `.json`.
    #[error("unsupported config file extension: {0}")]
    UnsupportedExtension(String),

    /// Neither the file nor the environment names a NameNode.
    #[error("no namenode address configured")]
    MissingNamenode,
}

/// Result of a path operation.
pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hdfs_rpc::RemoteException;

    fn remote(class_name: &str) -> RpcError {
        RpcError::Remote(RemoteException {
            method: "getFileInfo".to_string(),
            class_name: class_name.to_string(),
            message: "File does not exist: /missing".to_string(),
            code: 1,
        })
    }

    #[test]
    fn test_remote_is_interpreted() {
        let err = ClientError::from(remote("java.io.FileNotFoundException"));
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert_eq!(err.into_io().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_transport_error_has_no_kind() {
        let err = ClientError::from(RpcError::NotConnected);
        assert_eq!(err.kind(), None);
        assert!(matches!(err, ClientError::Rpc(RpcError::NotConnected)));
    }

    #[test]
    fn test_path_error_display() {
        let err = PathError::new("stat", "/missing", remote("java.io.FileNotFoundException"));
        assert!(err.is_not_found());
        assert!(!err.is_already_exists());
        assert_eq!(
            err.to_string(),
            "stat /missing: file does not exist: File does not exist: /missing"
        );
    }
}
