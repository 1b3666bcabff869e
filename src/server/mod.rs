//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! - `tcp`: listener, accept loop y `ShutdownHandle`
//! - `signal`: thread que traduce SIGINT/SIGTERM en un shutdown ordenado

pub mod signal;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use signal::spawn_signal_listener;
pub use tcp::{dispose_connection, Server, ShutdownHandle};
