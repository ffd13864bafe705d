//! Raw frame transport over one NameNode socket.

use std::future::Future;
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::config::ConnectionOptions;
use crate::error::{Result, RpcError};
use crate::frame::{self, LENGTH_PREFIX_SIZE};

/// Byte stream a [`Connection`] can run over.
pub trait RawStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> RawStream for T {}

/// One socket to a NameNode, carrying whole frames.
///
/// Methods take `&mut self`: one reader or writer at a time. Any failed read
/// or write closes the connection, since the stream position is unknown
/// afterwards.
pub struct Connection {
    stream: Option<Box<dyn RawStream>>,
    peer_addr: String,
    io_timeout: Duration,
    max_frame_len: u32,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer_addr", &self.peer_addr)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Connection {
    /// Opens a TCP connection to `options.addr`.
    pub async fn open(options: &ConnectionOptions) -> Result<Self> {
        let addr = options.addr.as_str();
        let timeout = Duration::from_millis(options.connect_timeout_ms);
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| RpcError::ConnectTimeout {
                addr: addr.to_string(),
                timeout_ms: options.connect_timeout_ms,
            })??;
        if options.nodelay {
            stream.set_nodelay(true)?;
        }
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.to_string());
        debug!(addr = %peer_addr, "namenode TCP connected");
        Ok(Self::from_stream(
            stream,
            peer_addr,
            Duration::from_millis(options.io_timeout_ms),
            options.max_frame_len,
        ))
    }

    /// Wraps an already connected stream.
    pub fn from_stream<S: RawStream + 'static>(
        stream: S,
        peer_addr: impl Into<String>,
        io_timeout: Duration,
        max_frame_len: u32,
    ) -> Self {
        Self {
            stream: Some(Box::new(stream)),
            peer_addr: peer_addr.into(),
            io_timeout,
            max_frame_len,
        }
    }

    /// Writes raw bytes, used for the connection preamble.
    pub async fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let timeout = self.io_timeout;
        let stream = self.stream.as_mut().ok_or(RpcError::NotConnected)?;
        let result = deadline("write", timeout, async {
            stream.write_all(bytes).await?;
            stream.flush().await
        })
        .await;
        self.close_on_error(result)
    }

    /// Writes one complete frame and flushes it.
    pub async fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.write_raw(frame).await
    }

    /// Reads one complete frame, length prefix included.
    pub async fn read_frame(&mut self) -> Result<Bytes> {
        let timeout = self.io_timeout;
        let max_len = self.max_frame_len;
        let stream = self.stream.as_mut().ok_or(RpcError::NotConnected)?;
        let result = deadline("read", timeout, async {
            let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
            stream.read_exact(&mut prefix).await?;
            let len = match frame::parse_length(prefix, max_len) {
                Ok(len) => len as usize,
                Err(e) => return Ok(Err(e)),
            };
            let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + len);
            buf.put_slice(&prefix);
            buf.resize(LENGTH_PREFIX_SIZE + len, 0);
            stream.read_exact(&mut buf[LENGTH_PREFIX_SIZE..]).await?;
            Ok::<_, std::io::Error>(Ok(buf.freeze()))
        })
        .await
        .and_then(|inner| inner);
        self.close_on_error(result)
    }

    /// Releases the socket. Safe to call more than once.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!(addr = %self.peer_addr, "namenode connection closed");
        }
    }

    /// Whether the socket is still held.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Remote address as a string.
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    fn close_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            warn!(addr = %self.peer_addr, error = %e, "discarding namenode connection");
            self.close();
        }
        result
    }
}

async fn deadline<T, F>(op: &str, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(RpcError::Io),
        Err(_) => Err(RpcError::Timeout {
            op: op.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
