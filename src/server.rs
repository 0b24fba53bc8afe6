use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::Version;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::error::{RequestError, RouteError};
use crate::http::config::RouterConfig;
use crate::http::req::{RawRequest, TIME_LIMIT};
use crate::http::res::Response;
use crate::http::router::Router;
use crate::http::types::{App, ServerWriter};

const MAX_DRAIN: u64 = 64 * 1024;

/// Minimal host for the router: one request per connection, one `Router`
/// per request, connection closed once the response is finished.
pub struct HTTPServer {
    pub addr: SocketAddr,
    pub config: RouterConfig,
    pub app: Arc<App>,
}

impl HTTPServer {
    pub fn new(addr: SocketAddr, config: RouterConfig, app: Arc<App>) -> Self {
        Self { addr, config, app }
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener).await
    }

    /// Accept loop on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        tracing::info!(addr = %listener.local_addr()?, "http server listening");
        let server = Arc::new(self);

        loop {
            let (socket, peer_addr) = listener.accept().await?;
            let server = server.clone();

            tokio::spawn(async move {
                if let Err(e) = server.handle_http(socket, peer_addr).await {
                    tracing::error!(%peer_addr, error = %e, "connection failed");
                }
            });
        }
    }

    async fn handle_http(&self, socket: TcpStream, peer_addr: SocketAddr) -> anyhow::Result<()> {
        let (reader, writer) = socket.into_split();
        let mut reader = BufReader::new(reader);
        let writer = BufWriter::new(writer);

        // 1. one request off the wire
        let raw = match RawRequest::read_from(&mut reader, Some(peer_addr)).await {
            Ok(raw) => raw,
            Err(e) => return Self::reject(e, reader, writer).await,
        };

        // 2. fresh router, may already be ended with 405
        let mut router = Router::new(raw, writer, &self.config).await?;

        // 3. registrations in program order
        match (self.app)(&mut router).await {
            Ok(()) | Err(RouteError::Ended) => {}
            // the router logged it and answered 500 where it still could
            Err(e) => tracing::debug!(error = %e, "app finished with an error"),
        }

        // 4. complete and close
        router.finish().await?;
        let mut writer = router.into_inner();
        writer.shutdown().await?;
        Ok(())
    }

    /// Answers a request that could not be parsed, then drains what the
    /// client already sent so the close is not turned into a reset.
    async fn reject<R>(err: RequestError, mut reader: R, writer: ServerWriter) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let Some(status) = err.status() else {
            tracing::debug!(error = %err, "connection dropped before a request arrived");
            return Ok(());
        };
        tracing::debug!(error = %err, status = status.as_u16(), "rejecting request");

        let mut res = Response::new(writer, Version::HTTP_11);
        res.status(status)
            .json(&json!({ "error": status.as_u16(), "msg": err.to_string() }))
            .await?;
        res.finish().await?;
        let mut writer = res.into_inner();
        writer.shutdown().await?;

        let mut sink = tokio::io::sink();
        let mut rest = (&mut reader).take(MAX_DRAIN);
        let _ = timeout(Duration::from_millis(TIME_LIMIT), tokio::io::copy(&mut rest, &mut sink)).await;
        Ok(())
    }
}
