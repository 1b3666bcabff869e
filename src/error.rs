//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores del pool y del servidor. Los errores del handler
//! HTTP viven en `http::request` porque nunca salen del handler.

use std::fmt;
use std::io;

/// Errores al construir el pool de workers
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Se pidió un pool sin threads
    #[error("thread count must be >= 1")]
    InvalidThreadCount,

    /// Se pidió una cola con capacidad 0
    #[error("queue capacity must be >= 1")]
    InvalidCapacity,

    /// Falló la creación del thread `index`; los anteriores ya fueron unidos
    #[error("failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },
}

/// El pool (o la cola) está cerrando y no aceptó el item.
///
/// El item regresa al caller, que es responsable de liberarlo
/// (por ejemplo, cerrar la conexión).
pub struct Rejected<T>(pub T);

impl<T> Rejected<T> {
    /// Recupera el item rechazado
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected").finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool is shutting down, item rejected")
    }
}

impl<T> std::error::Error for Rejected<T> {}

/// Errores fatales del servidor (arranque o accept loop)
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
