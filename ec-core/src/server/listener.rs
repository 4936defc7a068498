use crate::conf::ServerConfig;
use crate::server::handler::{Exchange, ServeContext, handle_request};
use crate::server::response::{empty_response, write_response};
use crate::shutdown::Shutdown;
use crate::stream::{Readiness, wait_readable};
use anyhow::{Context, Result};
use http::StatusCode;
use std::io::{self, BufReader, Read};
use std::net::{Shutdown as SocketShutdown, SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::time::{Duration, Instant};

/// How long one accept poll waits before the shutdown flag is checked again.
const ACCEPT_POLL_MS: u16 = 200;

/// Upper bound on unread request bytes drained before closing a connection.
const LINGER_DRAIN_BYTES: u64 = 64 * 1024;
const LINGER_TIMEOUT: Duration = Duration::from_millis(250);

/// Single-threaded HTTP server for the log directory.
///
/// Connections are handled one at a time on the thread calling [`serve`],
/// one request per connection.
///
/// [`serve`]: LogServer::serve
#[derive(Debug)]
pub struct LogServer {
    listener: TcpListener,
    ctx: ServeContext,
    read_timeout: Duration,
}

impl LogServer {
    pub fn bind(cfg: &ServerConfig, log_dir: &Path) -> Result<Self> {
        let addr = cfg.bind_addr();
        let listener =
            TcpListener::bind(&addr).with_context(|| format!("failed to bind {addr}"))?;
        // Readiness comes from poll; accept must never park the loop.
        listener
            .set_nonblocking(true)
            .context("failed to make listener non-blocking")?;

        Ok(Self {
            listener,
            ctx: ServeContext {
                log_dir: log_dir.to_path_buf(),
                suffix: cfg.suffix.clone(),
                max_body_bytes: cfg.max_body_bytes,
            },
            read_timeout: Duration::from_millis(cfg.read_timeout_ms),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and answer connections until shutdown is requested.
    ///
    /// While a client has sent nothing, shutdown is noticed within one accept
    /// poll. A client that stalls partway through a request still holds the
    /// loop for up to `read_timeout_ms`.
    pub fn serve(&self, shutdown: &Shutdown) -> Result<()> {
        while !shutdown.is_requested() {
            let readiness =
                wait_readable(&self.listener, ACCEPT_POLL_MS).context("failed to poll listener")?;
            if readiness == Readiness::Idle {
                continue;
            }

            match self.listener.accept() {
                Ok((stream, peer)) => self.handle_connection(stream, peer, shutdown),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => tracing::warn!(error = %e, "accept failed"),
            }
        }

        tracing::info!("log server stopping");
        Ok(())
    }

    fn handle_connection(&self, stream: TcpStream, peer: SocketAddr, shutdown: &Shutdown) {
        let started = Instant::now();

        if let Err(e) = self.configure(&stream) {
            tracing::warn!(%peer, error = %e, "failed to configure connection");
            return;
        }

        let mut reader = BufReader::new(&stream);
        let exchange = match self.await_request(&stream, started, shutdown) {
            Ok(FirstByte::Ready) => handle_request(&mut reader, &self.ctx),
            Ok(FirstByte::TimedOut) => Some(Exchange {
                method: None,
                path: None,
                response: empty_response(StatusCode::REQUEST_TIMEOUT),
            }),
            Ok(FirstByte::Shutdown) => {
                tracing::debug!(%peer, "dropping idle connection for shutdown");
                return;
            }
            Err(e) => {
                tracing::debug!(%peer, error = %e, "failed to poll connection");
                return;
            }
        };
        let Some(exchange) = exchange else {
            return;
        };

        let status = exchange.response.status().as_u16();
        let method = exchange.method.as_ref().map(|m| m.as_str()).unwrap_or("-");
        let uri = exchange.path.as_deref().unwrap_or("-");
        tracing::info!(
            %peer,
            method,
            uri,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );

        let mut writer = &stream;
        if let Err(e) = write_response(&mut writer, &exchange.response) {
            tracing::debug!(%peer, error = %e, "failed to write response");
            return;
        }

        linger_close(reader);
    }

    /// Wait for the request to start, in accept-poll slices so an idle client
    /// cannot hold off shutdown.
    fn await_request(
        &self,
        stream: &TcpStream,
        started: Instant,
        shutdown: &Shutdown,
    ) -> io::Result<FirstByte> {
        let deadline = started + self.read_timeout;
        loop {
            if shutdown.is_requested() {
                return Ok(FirstByte::Shutdown);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            let slice = remaining.as_millis().min(u128::from(ACCEPT_POLL_MS)) as u16;
            if slice == 0 {
                return Ok(FirstByte::TimedOut);
            }

            if wait_readable(stream, slice)? == Readiness::Ready {
                return Ok(FirstByte::Ready);
            }
        }
    }

    fn configure(&self, stream: &TcpStream) -> io::Result<()> {
        // Some platforms hand out accepted sockets in the listener's mode.
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(self.read_timeout))?;
        stream.set_write_timeout(Some(self.read_timeout))
    }
}

enum FirstByte {
    Ready,
    TimedOut,
    Shutdown,
}

/// Close our side, then drain what the client is still sending so the
/// close does not turn into a reset that eats the response.
fn linger_close(mut reader: BufReader<&TcpStream>) {
    let stream = *reader.get_ref();
    if stream.shutdown(SocketShutdown::Write).is_err() {
        return;
    }
    if stream.set_read_timeout(Some(LINGER_TIMEOUT)).is_err() {
        return;
    }
    let _ = io::copy(
        &mut reader.by_ref().take(LINGER_DRAIN_BYTES),
        &mut io::sink(),
    );
}
