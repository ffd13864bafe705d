//! Classification of server exception class names into local error kinds.

use std::fmt;
use std::io;

use thiserror::Error;

/// Closed set of error kinds a remote exception is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The path does not exist.
    NotFound,
    /// The target already exists.
    AlreadyExists,
    /// The caller lacks permission, or the ACL request was rejected.
    PermissionDenied,
    /// Transient condition (standby, safe mode, lease held elsewhere).
    Retriable,
    /// Any other server-side failure.
    Remote,
}

impl ErrorKind {
    /// The closest standard library error kind.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            ErrorKind::NotFound => io::ErrorKind::NotFound,
            ErrorKind::AlreadyExists => io::ErrorKind::AlreadyExists,
            ErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
            ErrorKind::Retriable => io::ErrorKind::WouldBlock,
            ErrorKind::Remote => io::ErrorKind::Other,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "file does not exist",
            ErrorKind::AlreadyExists => "file already exists",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::Retriable => "operation should be retried",
            ErrorKind::Remote => "remote operation failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Known exception classes. Anything not listed is [`ErrorKind::Remote`].
const EXCEPTION_KINDS: &[(&str, ErrorKind)] = &[
    ("java.io.FileNotFoundException", ErrorKind::NotFound),
    ("org.apache.hadoop.fs.UnresolvedLinkException", ErrorKind::NotFound),
    ("org.apache.hadoop.fs.FileAlreadyExistsException", ErrorKind::AlreadyExists),
    ("org.apache.hadoop.security.AccessControlException", ErrorKind::PermissionDenied),
    ("org.apache.hadoop.hdfs.protocol.AclException", ErrorKind::PermissionDenied),
    ("org.apache.hadoop.security.authorize.AuthorizationException", ErrorKind::PermissionDenied),
    ("org.apache.hadoop.ipc.RetriableException", ErrorKind::Retriable),
    ("org.apache.hadoop.ipc.StandbyException", ErrorKind::Retriable),
    ("org.apache.hadoop.hdfs.server.namenode.SafeModeException", ErrorKind::Retriable),
    ("org.apache.hadoop.hdfs.protocol.AlreadyBeingCreatedException", ErrorKind::Retriable),
    ("org.apache.hadoop.hdfs.server.namenode.LeaseExpiredException", ErrorKind::Retriable),
    ("org.apache.hadoop.hdfs.protocol.RecoveryInProgressException", ErrorKind::Retriable),
];

/// A classified server exception.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServerError {
    /// Local classification.
    pub kind: ErrorKind,
    /// Server exception class name, as reported.
    pub class_name: String,
    /// Server message, verbatim.
    pub message: String,
    /// Numeric error detail, when the response carried one.
    pub code: Option<i32>,
}

impl ServerError {
    /// Converts into a standard I/O error of the matching kind.
    pub fn into_io(self) -> io::Error {
        io::Error::new(self.kind.io_kind(), self)
    }
}

/// Looks up the kind for a class name. Surrounding whitespace is ignored.
pub fn classify(class_name: &str) -> ErrorKind {
    let name = class_name.trim();
    EXCEPTION_KINDS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Remote)
}

/// Maps an exception class name and message to a [`ServerError`].
///
/// Total over all inputs. An empty message is replaced by the class name so
/// the resulting error never reads blank.
pub fn interpret(class_name: &str, fallback_message: &str) -> ServerError {
    let message = if !fallback_message.trim().is_empty() {
        fallback_message.to_string()
    } else if !class_name.trim().is_empty() {
        class_name.to_string()
    } else {
        "unknown remote exception".to_string()
    };
    ServerError {
        kind: classify(class_name),
        class_name: class_name.to_string(),
        message,
        code: None,
    }
}
