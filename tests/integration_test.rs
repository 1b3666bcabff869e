//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero con un
//! document root temporal, y lo apaga con `ShutdownHandle`.

use pool_server::config::Config;
use pool_server::pool::Lifecycle;
use pool_server::server::{Server, ShutdownHandle};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Servidor corriendo en background
struct TestServer {
    server: Arc<Server>,
    addr: SocketAddr,
    handle: ShutdownHandle,
    accept: Option<JoinHandle<()>>,
    root: PathBuf,
}

impl TestServer {
    fn start(name: &str, threads: usize, queue_capacity: usize) -> Self {
        let root = std::env::temp_dir().join(format!("pool_server_it_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("index.html"), "<html><body>home</body></html>").unwrap();
        fs::write(root.join("css").join("site.css"), "body { color: red; }").unwrap();
        fs::write(root.join("logo.png"), [0x89, b'P', b'N', b'G', 0x0D, 0x0A]).unwrap();

        let config = Config {
            port: 0,
            host: "127.0.0.1".to_string(),
            root: root.clone(),
            threads,
            queue_capacity,
            read_timeout_ms: 2_000,
            ..Config::default()
        };

        let server = Arc::new(Server::bind(&config).expect("bind"));
        let addr = server.local_addr().unwrap();
        let handle = server.shutdown_handle().unwrap();
        let accept = thread::spawn({
            let server = Arc::clone(&server);
            move || server.run().expect("accept loop")
        });

        Self {
            server,
            addr,
            handle,
            accept: Some(accept),
            root,
        }
    }

    fn stop(&mut self) {
        self.handle.trigger();
        if let Some(accept) = self.accept.take() {
            accept.join().unwrap();
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.stop();
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(raw).unwrap();
    stream.flush().unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    response
}

fn send_request(addr: SocketAddr, method: &str, path: &str) -> String {
    let raw = format!("{} {} HTTP/1.1\r\nHost: localhost\r\n\r\n", method, path);
    String::from_utf8_lossy(&send_raw(addr, raw.as_bytes())).into_owned()
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

#[test]
fn test_root_serves_index() {
    let server = TestServer::start("index", 2, 8);
    let response = send_request(server.addr, "GET", "/");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert!(response.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert!(response.contains("Content-Length: 30\r\n"));
    assert!(response.contains("Connection: close\r\n"));
    assert_eq!(extract_body(&response), "<html><body>home</body></html>");
}

#[test]
fn test_nested_file_and_mime_type() {
    let server = TestServer::start("nested", 2, 8);
    let response = send_request(server.addr, "GET", "/css/site.css");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Type: text/css; charset=utf-8\r\n"));
    assert_eq!(extract_body(&response), "body { color: red; }");
}

#[test]
fn test_binary_file() {
    let server = TestServer::start("binary", 2, 8);
    let response = send_raw(server.addr, b"GET /logo.png HTTP/1.1\r\n\r\n");

    assert!(response.ends_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A]));
    assert!(String::from_utf8_lossy(&response).contains("Content-Type: image/png\r\n"));
}

#[test]
fn test_not_found() {
    let server = TestServer::start("notfound", 2, 8);
    let response = send_request(server.addr, "GET", "/missing.html");

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(extract_body(&response).contains("404 Not Found"));
}

#[test]
fn test_traversal_is_not_served() {
    let server = TestServer::start("traversal", 2, 8);
    let response = send_request(server.addr, "GET", "/../../etc/passwd");

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_method_not_allowed() {
    let server = TestServer::start("method", 2, 8);

    for method in ["POST", "HEAD", "PUT", "DELETE"] {
        let response = send_request(server.addr, method, "/index.html");
        assert!(
            response.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"),
            "{} got: {}",
            method,
            response
        );
        assert!(response.contains("Allow: GET\r\n"));
    }
}

#[test]
fn test_bad_request() {
    let server = TestServer::start("badrequest", 2, 8);

    let response = String::from_utf8_lossy(&send_raw(server.addr, b"\x00\x01\x02garbage\r\n\r\n")).into_owned();
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let response = String::from_utf8_lossy(&send_raw(server.addr, b"GET\r\n\r\n")).into_owned();
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[test]
fn test_concurrent_clients() {
    // Más clientes que workers + capacidad: el accept loop recibe
    // backpressure pero todos terminan atendidos.
    let mut server = TestServer::start("concurrent", 4, 2);
    let addr = server.addr;

    let clients: Vec<_> = (0..20)
        .map(|_| thread::spawn(move || send_request(addr, "GET", "/")))
        .collect();

    for client in clients {
        let response = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    server.stop();
    let stats = server.server.pool_stats();
    assert_eq!(stats.lifecycle, Lifecycle::Stopped);
    assert_eq!(stats.submitted, 20);
    assert_eq!(stats.handled, 20);
    assert_eq!(stats.current_load, 0);

    let metrics = server.server.metrics().snapshot();
    assert_eq!(metrics.status_codes.get(&200), Some(&20));
}

#[test]
fn test_shutdown_is_idempotent() {
    let mut server = TestServer::start("idempotent", 2, 4);
    let response = send_request(server.addr, "GET", "/");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    let other = server.handle.clone();
    let t = thread::spawn(move || other.trigger());
    server.stop();
    t.join().unwrap();
    server.stop();

    assert_eq!(server.server.pool_stats().lifecycle, Lifecycle::Stopped);
}
