//! Common fixtures: a loopback listener and scripted NameNode replies.

#![allow(dead_code)]

use hdfs_client::Client;
use hdfs_rpc::mock::MockNamenode;
use hdfs_rpc::proto::hdfs::hdfs_file_status_proto::FileType;
use hdfs_rpc::proto::hdfs::{
    FsPermissionProto, GetFileInfoRequestProto, GetFileInfoResponseProto, HdfsFileStatusProto,
};
use hdfs_rpc::ConnectionOptions;
use tokio::net::TcpListener;

pub const NOT_FOUND: &str = "java.io.FileNotFoundException";

/// Binds a loopback listener and a lazily connecting client pointed at it.
pub async fn listen() -> (TcpListener, Client) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let options = ConnectionOptions {
        addr: listener.local_addr().unwrap().to_string(),
        user: "alice".to_string(),
        io_timeout_ms: 5000,
        rpc_timeout_ms: 5000,
        ..Default::default()
    };
    (listener, Client::new(options))
}

/// Accepts one simple-auth session.
pub async fn accept(listener: &TcpListener) -> MockNamenode {
    let mut nn = MockNamenode::accept(listener).await.unwrap();
    nn.accept_simple().await.unwrap();
    nn
}

pub fn status(name: &str, file_type: FileType, perm: u32) -> HdfsFileStatusProto {
    HdfsFileStatusProto {
        file_type: file_type as i32,
        path: name.as_bytes().to_vec(),
        length: if file_type == FileType::IsDir { 0 } else { 1024 },
        permission: Some(FsPermissionProto { perm }),
        owner: "alice".to_string(),
        group: "eng".to_string(),
        modification_time: 1_700_000_000_000,
        access_time: 1_700_000_000_000,
        symlink: None,
        block_replication: Some(3),
        blocksize: Some(128 * 1024 * 1024),
        file_id: None,
        children_num: None,
    }
}

/// Answers one `getFileInfo` for `path`.
pub async fn answer_file_info(nn: &mut MockNamenode, path: &str, fs: Option<HdfsFileStatusProto>) {
    let call = nn.recv_call::<GetFileInfoRequestProto>().await.unwrap();
    assert_eq!(call.method.method_name, "getFileInfo");
    assert_eq!(call.request.src, path);
    nn.reply(call.header.call_id, &GetFileInfoResponseProto { fs })
        .await
        .unwrap();
}

/// Answers one `getFileInfo` with a remote exception.
pub async fn fail_file_info(nn: &mut MockNamenode, path: &str, class_name: &str, message: &str) {
    let call = nn.recv_call::<GetFileInfoRequestProto>().await.unwrap();
    assert_eq!(call.request.src, path);
    nn.reply_error(call.header.call_id, class_name, message)
        .await
        .unwrap();
}
