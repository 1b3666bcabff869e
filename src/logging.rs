//! # Logging
//! src/logging.rs
//!
//! Inicializa el subscriber global de `tracing`. `RUST_LOG` tiene prioridad
//! sobre el nivel configurado.
//!
//! ```rust
//! use pool_server::logging::{self, LogConfig};
//!
//! logging::init(LogConfig::default());
//! tracing::info!("server starting");
//! ```

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Configuración del logging
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Nivel mínimo cuando `RUST_LOG` no está definido
    pub level: Level,

    /// Emitir eventos como JSON
    pub json_format: bool,

    /// Incluir nombre e id del thread (útil para ver qué worker atendió)
    pub show_thread_info: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            show_thread_info: true,
        }
    }
}

static INIT: Once = Once::new();

/// Instala el subscriber global. Solo la primera llamada tiene efecto.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

        let registry = tracing_subscriber::registry().with(env_filter);

        let result = if config.json_format {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_thread_names(config.show_thread_info),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_thread_names(config.show_thread_info)
                        .with_thread_ids(config.show_thread_info),
                )
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("logging already initialized: {}", e);
        }
    });
}
