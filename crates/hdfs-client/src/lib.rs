#![warn(missing_docs)]

//! HDFS client: stat, rename, getfacl, listings and tree walks over one NameNode session

pub mod acl;
pub mod client;
pub mod config;
pub mod error;
pub mod flags;
pub mod permission;
pub mod rename;
pub mod stat;

pub use acl::{AclEntry, AclEntryType, AclScope, AclStatus};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, PathError, Result};
pub use flags::{merge_flags, Flag};
pub use stat::{FileStatus, FileType};
