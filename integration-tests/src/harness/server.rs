use crate::harness::init_test_tracing;
use ec_core::conf::EcConfig;
use ec_core::server::LogServer;
use ec_core::shutdown::Shutdown;
use reqwest::blocking::{Client, RequestBuilder};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;

/// Handle to a running log server backed by a scratch log directory.
///
/// The server is stopped and its directory removed on drop.
pub struct TestServer {
    base_url: String,
    addr: String,
    client: Client,
    log_dir: TempDir,
    shutdown: Shutdown,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start() -> Self {
        Self::start_with(|_| {})
    }

    /// Start a server after letting `patch` adjust the default config.
    ///
    /// The listen address, port and log directory are always overridden so
    /// tests can run in parallel.
    pub fn start_with(patch: impl FnOnce(&mut EcConfig)) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing();

        let log_dir = tempfile::tempdir().expect("failed to create log dir");

        let mut cfg = EcConfig::default();
        patch(&mut cfg);
        cfg.server.listen = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.log.dir = log_dir.path().to_path_buf();

        let server = LogServer::bind(&cfg.server, &cfg.log.dir).expect("failed to bind log server");
        let addr = server
            .local_addr()
            .expect("listener has no local address")
            .to_string();

        let shutdown = Shutdown::new();
        let handle = thread::spawn({
            let shutdown = shutdown.clone();
            move || {
                server.serve(&shutdown).expect("log server failed");
            }
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build client");

        Self {
            base_url: format!("http://{addr}"),
            addr,
            client,
            log_dir,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send raw bytes and return the raw response.
    ///
    /// For requests a well-behaved client would refuse to produce.
    pub fn raw(&self, request: &[u8]) -> String {
        let mut stream = self.connect();
        stream.write_all(request).unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    /// Send `request` and keep the write side open, as a client that stalls
    /// would. Returns whatever the server sends before closing.
    pub fn stalled(&self, request: &[u8]) -> String {
        let mut stream = self.connect();
        stream.write_all(request).unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    /// A connection on which nothing has been sent yet.
    pub fn connect(&self) -> TcpStream {
        let stream = TcpStream::connect(&self.addr).expect("failed to connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        stream
    }

    pub fn log_dir(&self) -> &Path {
        self.log_dir.path()
    }

    pub fn write_log(&self, name: &str, contents: &str) {
        std::fs::write(self.log_dir().join(name), contents).expect("failed to write log fixture");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.request();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
