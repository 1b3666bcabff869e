//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./pool_server --port 8081 --threads 8 --queue-capacity 128 --root ./www
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8081 POOL_THREADS=8 DOC_ROOT=/srv/www ./pool_server
//! ```

use crate::logging::LogConfig;
use crate::pool::{PoolConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_THREADS};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Configuración del servidor de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "pool_server")]
#[command(about = "Servidor HTTP/1.1 de archivos estáticos con thread pool y cola acotada")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8081", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio desde el que se sirven los archivos
    #[arg(long, default_value = "./www", env = "DOC_ROOT")]
    pub root: PathBuf,

    // === Pool ===
    /// Número de workers (0 usa el valor por defecto, 4)
    #[arg(short, long, default_value = "4", env = "POOL_THREADS")]
    pub threads: usize,

    /// Capacidad máxima de la cola de conexiones
    #[arg(long = "queue-capacity", default_value = "64", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    // === Conexiones ===
    /// Timeout de lectura de la request line en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Logging ===
    /// Nivel de log (trace, debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Emitir logs en formato JSON
    #[arg(long = "log-json", env = "LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use pool_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8081");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(format!("Unknown log level: {}", self.log_level));
        }
        Ok(())
    }

    /// Número de workers a lanzar; 0 se reemplaza por `DEFAULT_THREADS`
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            warn!(default = DEFAULT_THREADS, "thread count 0 requested, using default");
            DEFAULT_THREADS
        } else {
            self.threads
        }
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.effective_threads(), self.queue_capacity)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        match self.read_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Configuración de logging derivada de los flags
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.parse().unwrap_or(tracing::Level::INFO),
            json_format: self.log_json,
            ..LogConfig::default()
        }
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        info!(
            address = %self.address(),
            root = %self.root.display(),
            threads = self.threads,
            queue_capacity = self.queue_capacity,
            read_timeout_ms = self.read_timeout_ms,
            "server configuration"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8081,
            host: "0.0.0.0".to_string(),
            root: PathBuf::from("./www"),
            threads: DEFAULT_THREADS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            read_timeout_ms: 5_000,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.threads, 4);
        assert_eq!(config.queue_capacity, 64);
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_queue_capacity() {
        let mut config = Config::default();
        config.queue_capacity = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Queue capacity"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().unwrap_err().contains("log level"));
    }

    #[test]
    fn test_zero_threads_uses_default() {
        let mut config = Config::default();
        config.threads = 0;
        assert_eq!(config.effective_threads(), DEFAULT_THREADS);
        assert_eq!(config.pool_config().threads, DEFAULT_THREADS);
    }

    #[test]
    fn test_read_timeout() {
        let mut config = Config::default();
        assert_eq!(config.read_timeout(), Some(Duration::from_millis(5_000)));
        config.read_timeout_ms = 0;
        assert_eq!(config.read_timeout(), None);
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "pool_server",
            "--port",
            "9000",
            "--threads",
            "8",
            "--queue-capacity",
            "2",
            "--root",
            "/srv/www",
            "--log-json",
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.threads, 8);
        assert_eq!(config.queue_capacity, 2);
        assert_eq!(config.root, PathBuf::from("/srv/www"));
        assert!(config.log_json);
        assert!(config.log_config().json_format);
    }

    #[test]
    fn test_print_summary() {
        // No debe hacer panic
        Config::default().print_summary();
    }
}
