use integration_tests::harness::TestServer;
use std::io::Read;
use std::thread;
use std::time::{Duration, Instant};

fn quick_timeout() -> TestServer {
    TestServer::start_with(|cfg| cfg.server.read_timeout_ms = 200)
}

/// A body that stops arriving is answered once the read timeout expires
#[test]
fn stalled_post_body_times_out() {
    let srv = quick_timeout();

    let res = srv.stalled(b"POST /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc");

    assert!(
        res.starts_with("HTTP/1.1 408 Request Timeout\r\n"),
        "unexpected response: {res}"
    );
}

#[test]
fn stalled_request_head_times_out() {
    let srv = quick_timeout();

    let res = srv.stalled(b"GET /foo HTTP/1.1\r\nHost: localhost\r\n");

    assert!(
        res.starts_with("HTTP/1.1 408 Request Timeout\r\n"),
        "unexpected response: {res}"
    );
}

#[test]
fn silent_client_times_out() {
    let srv = quick_timeout();

    let res = srv.stalled(b"");

    assert!(
        res.starts_with("HTTP/1.1 408 Request Timeout\r\n"),
        "unexpected response: {res}"
    );
}

/// An idle client must not delay shutdown until its read timeout
#[test]
fn idle_connection_does_not_hold_off_shutdown() {
    // Arrange
    let srv = TestServer::start_with(|cfg| cfg.server.read_timeout_ms = 5_000);
    let mut idle = srv.connect();
    // Let the accept loop pick the connection up.
    thread::sleep(Duration::from_millis(400));

    // Act
    let started = Instant::now();
    drop(srv);
    let elapsed = started.elapsed();

    // Assert
    assert!(elapsed < Duration::from_secs(2), "shutdown took {elapsed:?}");
    let mut buf = Vec::new();
    let _ = idle.read_to_end(&mut buf);
    assert!(buf.is_empty(), "unexpected response: {buf:?}");
}
