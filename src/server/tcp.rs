//! # Servidor TCP con Thread Pool
//! src/server/tcp.rs
//!
//! El accept loop es el único productor del pool: cada conexión aceptada
//! se entrega con `submit`, que bloquea si la cola está llena. Así un pool
//! lento frena al accept loop en vez de hacer crecer la cola.

use crate::config::Config;
use crate::error::ServerError;
use crate::handler::ConnectionHandler;
use crate::metrics::MetricsCollector;
use crate::pool::{PoolStats, ThreadPool};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Servidor HTTP/1.1 de archivos estáticos
pub struct Server {
    listener: TcpListener,
    pool: ThreadPool<TcpStream>,
    metrics: MetricsCollector,
    stop: Arc<AtomicBool>,
}

impl Server {
    /// Valida la configuración, hace bind y arranca el pool
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            addr: address.clone(),
            source,
        })?;

        let metrics = MetricsCollector::new();
        let handler = ConnectionHandler::new(&config.root, config.read_timeout(), metrics.clone());
        let pool = ThreadPool::new(
            config.pool_config(),
            move |stream: TcpStream| handler.handle(stream),
            dispose_connection,
        )?;

        info!(address = %listener.local_addr()?, root = %config.root.display(), "server listening");

        Ok(Self {
            listener,
            pool,
            metrics,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle para detener el accept loop desde otro thread
    pub fn shutdown_handle(&self) -> io::Result<ShutdownHandle> {
        Ok(ShutdownHandle {
            stop: Arc::clone(&self.stop),
            wake_addr: wake_address(self.local_addr()?),
        })
    }

    /// Conexiones esperando en la cola del pool
    pub fn pool_load(&self) -> usize {
        self.pool.current_load()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Acepta conexiones hasta que se pida shutdown; luego apaga el pool.
    pub fn run(&self) -> Result<(), ServerError> {
        info!("accept loop started");

        for stream in self.listener.incoming() {
            if self.stop.load(Ordering::SeqCst) {
                if let Ok(stream) = stream {
                    dispose_connection(stream);
                }
                break;
            }

            match stream {
                Ok(stream) => {
                    debug!(peer = ?stream.peer_addr().ok(), "connection accepted");
                    if let Err(rejected) = self.pool.submit(stream) {
                        debug!("pool rejected connection, closing it");
                        dispose_connection(rejected.into_inner());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                }
            }
        }

        info!("accept loop stopped, shutting down pool");
        self.pool.shutdown();
        self.log_summary();
        Ok(())
    }

    /// Registra las estadísticas finales como JSON
    fn log_summary(&self) {
        let summary = serde_json::json!({
            "pool": self.pool.stats(),
            "http": self.metrics.snapshot(),
        });
        info!(summary = %summary, "server stopped");
    }
}

/// Cierra una conexión que nunca llegó a un handler. El socket se libera
/// aquí, con o sin error en el shutdown.
pub fn dispose_connection(stream: TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Both) {
        debug!(error = %e, "shutdown of disposed connection failed");
    }
    drop(stream);
}

/// Detiene el accept loop. Se puede clonar y usar desde cualquier thread.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Marca el stop y despierta el `accept` bloqueado con una conexión
    /// propia. Idempotente.
    pub fn trigger(&self) {
        if self.stop.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("shutdown requested");
        match TcpStream::connect_timeout(&self.wake_addr, Duration::from_secs(1)) {
            Ok(stream) => drop(stream),
            Err(e) => warn!(error = %e, "failed to wake accept loop"),
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Un listener en 0.0.0.0/:: se despierta conectando por loopback
fn wake_address(local: SocketAddr) -> SocketAddr {
    let ip = match local.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local.port())
}
