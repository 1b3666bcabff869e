//! # Pool Server - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, arranca el servidor y espera SIGINT/SIGTERM
//! para un apagado ordenado.

use pool_server::config::Config;
use pool_server::logging;
use pool_server::server::{spawn_signal_listener, Server};
use pool_server::ServerError;
use tracing::error;

fn main() {
    let config = Config::new();
    logging::init(config.log_config());
    config.print_summary();

    if let Err(e) = run(&config) {
        error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), ServerError> {
    let server = Server::bind(config)?;

    // El thread de señales solo dispara el handle; el pool se apaga al
    // salir del accept loop.
    let _signal_thread = spawn_signal_listener(server.shutdown_handle()?)?;

    server.run()
}
