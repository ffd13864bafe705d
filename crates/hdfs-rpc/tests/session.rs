//! End-to-end session tests over loopback TCP against the scripted NameNode.

use hdfs_rpc::handshake::{CLIENT_PROTOCOL, CONNECTION_CONTEXT_CALL_ID};
use hdfs_rpc::mock::{kerberos_auth, MockNamenode, ScriptedFactory};
use hdfs_rpc::proto::common::rpc_sasl_proto::SaslState;
use hdfs_rpc::proto::hdfs::{GetFileInfoRequestProto, GetFileInfoResponseProto};
use hdfs_rpc::{AuthMode, ConnectionOptions, NamenodeConnection, RpcError};
use tokio::net::TcpListener;

async fn listen() -> (TcpListener, ConnectionOptions) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let options = ConnectionOptions {
        addr: listener.local_addr().unwrap().to_string(),
        user: "hdfs".to_string(),
        ..Default::default()
    };
    (listener, options)
}

#[tokio::test]
async fn test_kerberos_session_then_calls() {
    let (listener, mut options) = listen().await;
    options.auth = AuthMode::Kerberos;

    let server = tokio::spawn(async move {
        let mut nn = MockNamenode::accept(&listener).await.unwrap();
        let preamble = nn.read_preamble().await.unwrap();
        assert_eq!(preamble, [b'h', b'r', b'p', b'c', 9, 0, 0xDF]);

        nn.recv_sasl().await.unwrap();
        nn.send_sasl(SaslState::Negotiate, None, vec![kerberos_auth()])
            .await
            .unwrap();
        let (_, initiate) = nn.recv_sasl().await.unwrap();
        assert_eq!(initiate.state, SaslState::Initiate as i32);
        nn.send_sasl(SaslState::Challenge, Some(b"c0".to_vec()), vec![])
            .await
            .unwrap();
        nn.recv_sasl().await.unwrap();
        nn.send_sasl(SaslState::Success, None, vec![]).await.unwrap();

        let (header, ctx) = nn.recv_context().await.unwrap();
        assert_eq!(header.call_id, CONNECTION_CONTEXT_CALL_ID);
        assert_eq!(header.client_id.len(), 16);
        assert_eq!(ctx.protocol.as_deref(), Some(CLIENT_PROTOCOL));

        for expected in 0..3 {
            let call = nn.recv_call::<GetFileInfoRequestProto>().await.unwrap();
            assert_eq!(call.header.call_id, expected);
            assert_eq!(call.header.client_id, header.client_id);
            nn.reply(call.header.call_id, &GetFileInfoResponseProto { fs: None })
                .await
                .unwrap();
        }
    });

    let mut session = NamenodeConnection::connect_with(&options, &ScriptedFactory::new(1))
        .await
        .unwrap();
    for _ in 0..3 {
        let req = GetFileInfoRequestProto {
            src: "/".to_string(),
        };
        let _: GetFileInfoResponseProto = session.execute("getFileInfo", &req).await.unwrap();
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_simple_session_skips_sasl() {
    let (listener, options) = listen().await;

    let server = tokio::spawn(async move {
        let mut nn = MockNamenode::accept(&listener).await.unwrap();
        let ctx = nn.accept_simple().await.unwrap();
        assert_eq!(
            ctx.user_info.unwrap().effective_user.as_deref(),
            Some("hdfs")
        );
    });

    let session = NamenodeConnection::connect_with(&options, &ScriptedFactory::new(0))
        .await
        .unwrap();
    assert!(session.is_open());
    server.await.unwrap();
}

#[tokio::test]
async fn test_failed_handshake_closes_connection() {
    let (listener, mut options) = listen().await;
    options.auth = AuthMode::Kerberos;

    let server = tokio::spawn(async move {
        let mut nn = MockNamenode::accept(&listener).await.unwrap();
        nn.read_preamble().await.unwrap();
        nn.recv_sasl().await.unwrap();
        nn.send_sasl(SaslState::Negotiate, None, vec![]).await.unwrap();
        nn
    });

    let err = NamenodeConnection::connect_with(&options, &ScriptedFactory::new(0))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::UnsupportedMechanism { .. }));
    let _nn = server.await.unwrap();
}

#[cfg(not(feature = "kerberos"))]
#[tokio::test]
async fn test_kerberos_requires_feature() {
    let (listener, mut options) = listen().await;
    options.auth = AuthMode::Kerberos;

    let server = tokio::spawn(async move {
        let mut nn = MockNamenode::accept(&listener).await.unwrap();
        nn.read_preamble().await.unwrap();
        nn.recv_sasl().await.unwrap();
        nn.send_sasl(SaslState::Negotiate, None, vec![kerberos_auth()])
            .await
            .unwrap();
        nn
    });

    let err = NamenodeConnection::connect(&options).await.unwrap_err();
    assert!(matches!(err, RpcError::Config { .. }));
    let _nn = server.await.unwrap();
}

#[tokio::test]
async fn test_connect_refused() {
    let (listener, options) = listen().await;
    drop(listener);
    assert!(NamenodeConnection::connect(&options).await.is_err());
}
