//! Protobuf messages exchanged with the NameNode.
//!
//! Field numbers and types follow Hadoop's `.proto` definitions
//! (`RpcHeader.proto`, `IpcConnectionContext.proto`, `ProtobufRpcEngine.proto`,
//! `ClientNamenodeProtocol.proto`, `hdfs.proto`, `acl.proto`). Only the
//! messages this client sends or reads are declared.

pub mod common;
pub mod hdfs;
