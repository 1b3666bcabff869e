//! # Señales de Terminación
//! src/server/signal.rs
//!
//! SIGINT/SIGTERM se esperan en un thread dedicado con un runtime de tokio
//! de un solo thread. Al recibir una, se llama `ShutdownHandle::trigger()`
//! desde contexto normal: nada de trabajo dentro del signal handler.

use crate::server::tcp::ShutdownHandle;
use std::io;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// Lanza el thread que espera la señal y dispara el shutdown
pub fn spawn_signal_listener(handle: ShutdownHandle) -> io::Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("signal-listener".to_string())
        .spawn(move || {
            runtime.block_on(wait_for_termination());
            info!("termination signal received");
            handle.trigger();
        })
}

async fn wait_for_termination() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
