//! # Handler de Conexiones
//! src/handler/mod.rs
//!
//! Lo que ejecuta cada worker por conexión:
//!
//! ```text
//! leer request line → parsear → archivo o error → escribir → cerrar
//! ```
//!
//! El handler siempre cierra la conexión antes de retornar y nunca propaga
//! errores al pool.

pub mod files;

use crate::http::{Method, RequestLine, Response, StatusCode};
use crate::metrics::MetricsCollector;
use files::FileError;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Máximo de bytes que se leen buscando el fin de la request line
pub const MAX_REQUEST_LINE: usize = 8192;

/// Valor del header `Server`
const SERVER_NAME: &str = concat!("pool_server/", env!("CARGO_PKG_VERSION"));

/// Sirve archivos estáticos desde un document root
#[derive(Clone)]
pub struct ConnectionHandler {
    root: PathBuf,
    read_timeout: Option<Duration>,
    metrics: MetricsCollector,
}

impl ConnectionHandler {
    pub fn new(root: impl Into<PathBuf>, read_timeout: Option<Duration>, metrics: MetricsCollector) -> Self {
        Self {
            root: root.into(),
            read_timeout,
            metrics,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Atiende una conexión completa y la cierra
    pub fn handle(&self, mut stream: TcpStream) {
        let start = Instant::now();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let response = match read_request_line(&mut stream, self.read_timeout) {
            Ok(buffer) if buffer.is_empty() => {
                debug!(%peer, "connection closed before request");
                self.metrics.record_empty_connection();
                close(stream);
                return;
            }
            Ok(buffer) if buffer.len() >= MAX_REQUEST_LINE && !buffer.contains(&b'\n') => {
                debug!(%peer, "request line too long");
                Response::error(StatusCode::BadRequest)
            }
            Ok(buffer) => self.respond(&buffer),
            Err(e) if is_timeout(&e) => {
                debug!(%peer, "timed out waiting for request line");
                Response::error(StatusCode::BadRequest)
            }
            Err(e) => {
                warn!(%peer, error = %e, "failed to read request");
                close(stream);
                return;
            }
        };
        let response = response.with_header("Server", SERVER_NAME);

        match stream.write_all(&response.to_bytes()).and_then(|()| stream.flush()) {
            Ok(()) => {
                let latency = start.elapsed();
                self.metrics
                    .record_response(response.status().as_u16(), response.body().len(), latency);
                info!(
                    %peer,
                    status = response.status().as_u16(),
                    bytes = response.body().len(),
                    latency_ms = latency.as_secs_f64() * 1000.0,
                    "response sent"
                );
            }
            Err(e) => {
                self.metrics.record_write_failure();
                warn!(%peer, error = %e, "failed to write response");
            }
        }

        close(stream);
    }

    /// Construye la respuesta para los bytes recibidos
    pub fn respond(&self, request: &[u8]) -> Response {
        let line = match RequestLine::parse(request) {
            Ok(line) => line,
            Err(e) => {
                debug!(error = %e, "bad request line");
                return Response::error(StatusCode::BadRequest);
            }
        };

        debug!(
            method = line.method().as_str(),
            path = line.path(),
            version = line.version().unwrap_or("-"),
            "request line parsed"
        );

        match line.method() {
            Method::Get => self.serve(line.path()),
            Method::Other(method) => {
                debug!(%method, path = line.path(), "method not allowed");
                Response::error(StatusCode::MethodNotAllowed)
            }
        }
    }

    fn serve(&self, url_path: &str) -> Response {
        let path = match files::resolve(&self.root, url_path) {
            Some(path) => path,
            None => {
                debug!(path = url_path, "path escapes document root");
                return Response::error(StatusCode::NotFound);
            }
        };

        match files::load(&path) {
            Ok(body) => Response::new(StatusCode::Ok, crate::http::mime::mime_type(&path), body),
            Err(FileError::NotFound) => Response::error(StatusCode::NotFound),
            Err(FileError::Io(e)) => {
                warn!(path = %path.display(), error = %e, "failed to read file");
                Response::error(StatusCode::InternalServerError)
            }
        }
    }
}

/// Fuente de la request line con timeout de lectura ajustable
pub trait TimedRead: Read {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl TimedRead for TcpStream {
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }
}

/// Lee hasta el primer `\n`, EOF o `MAX_REQUEST_LINE` bytes.
///
/// `timeout` acota la línea completa, no cada `read`: un cliente que manda
/// un byte a la vez no puede retener al worker más allá del deadline.
pub fn read_request_line<R: TimedRead>(reader: &mut R, timeout: Option<Duration>) -> io::Result<Vec<u8>> {
    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    while buffer.len() < MAX_REQUEST_LINE {
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "request line deadline exceeded"));
            }
            reader.set_read_timeout(Some(remaining))?;
        }

        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        let take = n.min(MAX_REQUEST_LINE - buffer.len());
        buffer.extend_from_slice(&chunk[..take]);
        if chunk[..take].contains(&b'\n') {
            break;
        }
    }

    Ok(buffer)
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

/// Tiempo máximo que se drena la entrada antes de cerrar
const LINGER: Duration = Duration::from_millis(100);

/// Cierra la conexión sin provocar un RST si el cliente mandó más datos
/// (headers) de los que se leyeron. El drenado se corta por tiempo o por
/// bytes, lo que ocurra primero.
fn close(mut stream: TcpStream) {
    let _ = stream.shutdown(Shutdown::Write);

    let deadline = Instant::now() + LINGER;
    let mut sink = [0u8; 1024];
    let mut drained = 0usize;
    while drained < 64 * 1024 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || stream.set_read_timeout(Some(remaining)).is_err() {
            break;
        }
        match stream.read(&mut sink) {
            Ok(0) | Err(_) => break,
            Ok(n) => drained += n,
        }
    }
}
