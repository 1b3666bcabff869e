//! # Pool Server
//! src/lib.rs
//!
//! Servidor TCP concurrente que acepta conexiones, las entrega a un pool
//! fijo de workers a través de una cola acotada y sincronizada, y sirve
//! archivos estáticos sobre un subconjunto reducido de HTTP/1.1.
//!
//! ## Arquitectura
//!
//! - `pool`: cola acotada + pool de workers (el núcleo)
//! - `server`: accept loop, `ShutdownHandle` y manejo de señales
//! - `handler`: atiende una conexión (request line → archivo o error)
//! - `http`: request line, responses, status codes, tipos MIME
//! - `metrics`: métricas de respuestas
//! - `config`, `logging`, `error`: configuración, tracing y errores
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use pool_server::config::Config;
//! use pool_server::server::{spawn_signal_listener, Server};
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("bind");
//! spawn_signal_listener(server.shutdown_handle().expect("addr")).expect("signal thread");
//! server.run().expect("accept loop");
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod pool;
pub mod server;

pub use error::{PoolError, Rejected, ServerError};
pub use pool::{PoolConfig, ThreadPool};
