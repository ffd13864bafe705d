//! The [`Client`] handle and its single NameNode session.

use std::sync::Arc;

use hdfs_rpc::{
    ConnectionOptions, KerberosFactory, MechanismFactory, NamenodeConnection, RpcError,
};
use prost::Message;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError};

/// HDFS client over one NameNode connection.
///
/// Operations serialize on an internal mutex, so at most one call is in
/// flight. The connection is opened on first use; after a fatal error it is
/// discarded and the next operation opens a fresh one. Failed calls are not
/// retried.
pub struct Client {
    options: ConnectionOptions,
    factory: Arc<dyn MechanismFactory>,
    session: Mutex<Option<NamenodeConnection>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("addr", &self.options.addr)
            .field("user", &self.options.user)
            .field("auth", &self.options.auth)
            .finish()
    }
}

impl Client {
    /// Creates a client that connects lazily, authenticating with GSSAPI
    /// when Kerberos is configured.
    pub fn new(options: ConnectionOptions) -> Self {
        Self::with_factory(options, Arc::new(KerberosFactory))
    }

    /// Creates a client with an explicit SASL mechanism factory.
    pub fn with_factory(options: ConnectionOptions, factory: Arc<dyn MechanismFactory>) -> Self {
        Self {
            options,
            factory,
            session: Mutex::new(None),
        }
    }

    /// Creates a lazily connecting client from a resolved config.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.connection_options()?))
    }

    /// Creates a client and establishes its session immediately.
    pub async fn connect(options: ConnectionOptions) -> Result<Self, ClientError> {
        let client = Self::new(options);
        client.ensure_connected().await?;
        Ok(client)
    }

    /// Options the client connects with.
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Opens the session if there is none.
    pub async fn ensure_connected(&self) -> Result<(), ClientError> {
        let mut session = self.session.lock().await;
        self.reconnect_if_needed(&mut session).await
    }

    async fn reconnect_if_needed(
        &self,
        session: &mut Option<NamenodeConnection>,
    ) -> Result<(), ClientError> {
        if session.as_ref().is_some_and(|s| s.is_open()) {
            return Ok(());
        }
        debug!(addr = %self.options.addr, reconnect = session.is_some(), "opening namenode session");
        *session = None;
        let fresh = NamenodeConnection::connect_with(&self.options, self.factory.as_ref()).await?;
        *session = Some(fresh);
        Ok(())
    }

    /// Issues one call on the shared session.
    pub(crate) async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp, ClientError>
    where
        Req: Message,
        Resp: Message + Default,
    {
        let mut guard = self.session.lock().await;
        self.reconnect_if_needed(&mut guard).await?;
        let session = guard.as_mut().ok_or(RpcError::NotConnected)?;
        Ok(session.execute(method, request).await?)
    }

    /// Whether a live session is held.
    pub async fn is_connected(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| s.is_open())
    }

    /// Closes the session. The next operation reconnects.
    pub async fn close(&self) {
        if let Some(mut session) = self.session.lock().await.take() {
            session.close();
        }
    }
}
