//! Integration tests for the TCP server.
//!
//! These tests verify the server works correctly as a complete system:
//! notice bursts, report/reply sessions, capacity enforcement, slot
//! release, and graceful shutdown. Each test spins up a real server on
//! an ephemeral loopback port with its own temp directory and drives
//! it with plain TCP clients speaking the line protocol.
//!
//! Tests CAN use `.unwrap()` and `.expect()`; the panic-free behavior
//! of production code is verified through assertions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hygro_protocol::Notice;
use hygrod::eventlog::EventLog;
use hygrod::registry::DeviceRegistry;
use hygrod::server::Server;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Constants
// ============================================================================

/// Maximum time to wait for a server-side state change to be observable
const STATE_WAIT_TIMEOUT: Duration = Duration::from_millis(500);

/// Interval between state checks
const STATE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Grace period for server shutdown
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_millis(100);

// ============================================================================
// Test Helpers
// ============================================================================

/// Test server context that manages server lifecycle and cleanup.
struct TestServer {
    addr: SocketAddr,
    server: Arc<Server>,
    registry: DeviceRegistry,
    cancel_token: CancellationToken,
    temp_dir: TempDir,
}

impl TestServer {
    /// Spawns a new test server with the given capacity.
    async fn spawn(capacity: usize) -> Self {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let registry =
            DeviceRegistry::open(temp_dir.path().join("table.tsv")).expect("open registry");
        let events = EventLog::new(temp_dir.path().join("logs"));
        let cancel_token = CancellationToken::new();

        let server = Arc::new(Server::new(
            registry.clone(),
            events,
            capacity,
            cancel_token.clone(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("listener address");

        let run_server = Arc::clone(&server);
        tokio::spawn(async move {
            run_server.run(listener).await;
        });

        TestServer {
            addr,
            server,
            registry,
            cancel_token,
            temp_dir,
        }
    }

    /// Creates a client connection to the server.
    async fn connect(&self) -> TestClient {
        let stream = TcpStream::connect(self.addr).await.expect("connect to server");
        TestClient::new(stream)
    }

    /// Returns the number of connections currently in the live set.
    async fn active_connections(&self) -> usize {
        self.server.connections().active().await
    }

    /// Waits until the live set holds exactly `expected` connections.
    async fn wait_for_active(&self, expected: usize) {
        let start = tokio::time::Instant::now();
        while start.elapsed() < STATE_WAIT_TIMEOUT {
            if self.active_connections().await == expected {
                return;
            }
            sleep(STATE_POLL_INTERVAL).await;
        }
        panic!(
            "Expected {expected} active connections within {STATE_WAIT_TIMEOUT:?}, found {}",
            self.active_connections().await
        );
    }

    /// Shuts down the server gracefully.
    async fn shutdown(self) {
        self.cancel_token.cancel();
        sleep(SHUTDOWN_GRACE_PERIOD).await;
    }
}

/// Test client connection with protocol helpers.
struct TestClient {
    reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: tokio::net::tcp::OwnedWriteHalf,
}

impl TestClient {
    fn new(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads notice lines until the empty terminator line.
    async fn read_notice_burst(&mut self) -> Vec<String> {
        let mut notices = Vec::new();
        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line).await.unwrap();
            if bytes_read == 0 || line.trim().is_empty() {
                return notices;
            }
            notices.push(line.trim_end().to_string());
        }
    }

    /// Sends one line to the server.
    async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
        self.writer.flush().await.unwrap();
    }

    /// Receives one line from the server; `None` at EOF.
    async fn recv_line(&mut self) -> Option<String> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await.unwrap();
        if bytes_read == 0 {
            None
        } else {
            Some(line.trim_end().to_string())
        }
    }

    /// Sends a report and returns the reply line.
    async fn report(&mut self, line: &str) -> String {
        self.send_line(line).await;
        self.recv_line().await.expect("reply line")
    }
}

// ============================================================================
// Connection Tests
// ============================================================================

#[tokio::test]
async fn test_welcome_notice_on_connect() {
    let server = TestServer::spawn(10).await;
    let mut client = server.connect().await;

    let notices = client.read_notice_burst().await;
    assert_eq!(notices, vec![Notice::Welcome.text()]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_report_reply_end_to_end() {
    let server = TestServer::spawn(10).await;
    let mut client = server.connect().await;
    client.read_notice_burst().await;

    // Too humid for 15 degrees: blue LED and buzzer.
    assert_eq!(client.report("1.2.3.1 15 80").await, "0.2.1");

    // Humidity exactly optimal: green LED only.
    assert_eq!(client.report("2.0.0.2 22 50").await, "0.1.0");

    // Too dry for 25 degrees: humidifier on, red LED.
    assert_eq!(client.report("1.1.1.1 25 30").await, "1.0.0");

    server.shutdown().await;
}

#[tokio::test]
async fn test_replies_in_arrival_order() {
    let server = TestServer::spawn(10).await;
    let mut client = server.connect().await;
    client.read_notice_burst().await;

    // Send three reports back-to-back, then read the three replies.
    client.send_line("1.1.1.1 15 80").await;
    client.send_line("1.1.1.1 22 50").await;
    client.send_line("1.1.1.1 25 30").await;

    assert_eq!(client.recv_line().await.unwrap(), "0.2.1");
    assert_eq!(client.recv_line().await.unwrap(), "0.1.0");
    assert_eq!(client.recv_line().await.unwrap(), "1.0.0");

    server.shutdown().await;
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_report_registers_device() {
    let server = TestServer::spawn(10).await;
    let mut client = server.connect().await;
    client.read_notice_burst().await;

    client.report("1.2.3.1 20 60").await;

    let record = server
        .registry
        .resolve(&"1.2.3.1".parse().unwrap())
        .await
        .expect("device registered by first report");
    assert_eq!(
        record.location,
        "Building A, floor 2, room 3, temperature/humidity sensor"
    );
    assert_eq!(record.source_address, "127.0.0.1");

    // And the record was persisted.
    let table = std::fs::read_to_string(server.temp_dir.path().join("table.tsv")).unwrap();
    assert_eq!(table.lines().count(), 1);
    assert!(table.starts_with("1.2.3.1\t127.0.0.1\t"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_repeat_reports_register_once() {
    let server = TestServer::spawn(10).await;
    let mut client = server.connect().await;
    client.read_notice_burst().await;

    for _ in 0..3 {
        client.report("2.1.1.1 20 60").await;
    }

    assert_eq!(server.registry.device_count().await, 1);
    let table = std::fs::read_to_string(server.temp_dir.path().join("table.tsv")).unwrap();
    assert_eq!(table.lines().count(), 1);

    server.shutdown().await;
}

// ============================================================================
// Capacity Tests
// ============================================================================

#[tokio::test]
async fn test_capacity_rejection() {
    let server = TestServer::spawn(2).await;

    let mut first = server.connect().await;
    first.read_notice_burst().await;
    let mut second = server.connect().await;
    second.read_notice_burst().await;
    server.wait_for_active(2).await;

    // Third client gets the rejection notices, then EOF.
    let mut third = server.connect().await;
    let notices = third.read_notice_burst().await;
    assert_eq!(
        notices,
        vec![Notice::TooManyConnections.text(), Notice::Closing.text()]
    );
    assert_eq!(third.recv_line().await, None);

    // The rejected connection never entered the live set.
    assert_eq!(server.active_connections().await, 2);

    // Admitted clients keep working.
    assert_eq!(first.report("1.1.1.1 15 80").await, "0.2.1");
    assert_eq!(second.report("1.1.2.1 25 30").await, "1.0.0");

    server.shutdown().await;
}

#[tokio::test]
async fn test_slot_released_after_disconnect() {
    let server = TestServer::spawn(1).await;

    let mut first = server.connect().await;
    first.read_notice_burst().await;
    server.wait_for_active(1).await;

    drop(first);
    server.wait_for_active(0).await;

    // The freed slot admits a new client.
    let mut second = server.connect().await;
    let notices = second.read_notice_burst().await;
    assert_eq!(notices, vec![Notice::Welcome.text()]);
    assert_eq!(second.report("1.1.1.1 22 50").await, "0.1.0");

    server.shutdown().await;
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_report_ends_only_that_session() {
    let server = TestServer::spawn(10).await;

    let mut healthy = server.connect().await;
    healthy.read_notice_burst().await;
    let mut broken = server.connect().await;
    broken.read_notice_burst().await;

    // The malformed report closes the offending session.
    broken.send_line("1.2.3.1 abc 50").await;
    assert_eq!(broken.recv_line().await, None);

    // The other session is untouched.
    assert_eq!(healthy.report("1.2.3.1 15 80").await, "0.2.1");

    server.shutdown().await;
}

#[tokio::test]
async fn test_session_slot_freed_after_protocol_error() {
    let server = TestServer::spawn(1).await;

    let mut broken = server.connect().await;
    broken.read_notice_burst().await;
    broken.send_line("9.9.9.9 20 50").await;
    assert_eq!(broken.recv_line().await, None);

    server.wait_for_active(0).await;

    let mut next = server.connect().await;
    assert_eq!(next.read_notice_burst().await, vec![Notice::Welcome.text()]);

    server.shutdown().await;
}

// ============================================================================
// Event Log Tests
// ============================================================================

#[tokio::test]
async fn test_event_log_written() {
    let server = TestServer::spawn(10).await;
    let mut client = server.connect().await;
    client.read_notice_burst().await;
    client.report("1.2.3.1 20 60").await;

    // The report event trails the reply; poll for it.
    let log_root = server.temp_dir.path().join("logs");
    let start = tokio::time::Instant::now();
    let mut contents = String::new();
    while start.elapsed() < STATE_WAIT_TIMEOUT {
        contents = read_log_tree(&log_root);
        if contents.contains("location:") {
            break;
        }
        sleep(STATE_POLL_INTERVAL).await;
    }

    assert!(
        contents.contains("connected, ip: 127.0.0.1"),
        "Expected a connect line, got: {contents}"
    );
    assert!(
        contents.contains(
            "client ip: [127.0.0.1], location: [Building A, floor 2, room 3, temperature/humidity sensor]"
        ),
        "Expected a report line, got: {contents}"
    );
    for line in contents.lines() {
        assert!(
            line.starts_with('['),
            "Every entry carries a timestamp prefix, got: {line}"
        );
    }

    server.shutdown().await;
}

/// Concatenates every log file under the month-sharded tree.
fn read_log_tree(root: &std::path::Path) -> String {
    let mut contents = String::new();
    let Ok(months) = std::fs::read_dir(root) else {
        return contents;
    };
    for month in months.flatten() {
        let Ok(days) = std::fs::read_dir(month.path()) else {
            continue;
        };
        for day in days.flatten() {
            if let Ok(text) = std::fs::read_to_string(day.path()) {
                contents.push_str(&text);
            }
        }
    }
    contents
}

// ============================================================================
// Concurrent Clients Tests
// ============================================================================

#[tokio::test]
async fn test_multiple_clients_concurrent() {
    let server = TestServer::spawn(10).await;

    let mut handles = Vec::new();
    for i in 0..5u8 {
        let addr = server.addr;
        let handle = tokio::spawn(async move {
            let stream = TcpStream::connect(addr).await.unwrap();
            let mut client = TestClient::new(stream);
            client.read_notice_burst().await;

            // Each client reports a distinct room on floor 1.
            let identifier = format!("1.1.{}.1", (i % 3) + 1);
            let reply = client.report(&format!("{identifier} 15 80")).await;
            assert_eq!(reply, "0.2.1");
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.expect("concurrent client task should succeed");
    }

    server.shutdown().await;
}

// ============================================================================
// Graceful Shutdown Tests
// ============================================================================

#[tokio::test]
async fn test_graceful_shutdown_stops_accepting() {
    let server = TestServer::spawn(10).await;
    let addr = server.addr;

    server.shutdown().await;

    // The listener is gone; new connections are refused.
    assert!(TcpStream::connect(addr).await.is_err());
}
