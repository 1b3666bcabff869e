//! # Worker del Pool
//! src/pool/worker.rs
//!
//! Cada worker es un thread de larga vida:
//!
//! ```text
//! Idle --pop: Item--> Busy --handler retorna--> Idle
//! Idle --pop: Drained--> Terminated
//! ```

use crate::pool::queue::{BoundedQueue, Popped};
use crate::pool::stats::PoolCounters;
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Función que procesa un item (el handler de conexiones en el servidor)
pub type HandlerFn<T> = dyn Fn(T) + Send + Sync + 'static;

/// Cuerpo de un thread antes de ser lanzado
pub(crate) type WorkerBody = Box<dyn FnOnce() + Send + 'static>;

/// Handle de un worker ya lanzado
pub(crate) struct Worker {
    index: usize,
    handle: JoinHandle<()>,
}

impl Worker {
    pub(crate) fn new(index: usize, handle: JoinHandle<()>) -> Self {
        Self { index, handle }
    }

    /// Espera a que el thread termine
    pub(crate) fn join(self) {
        if self.handle.thread().id() == thread::current().id() {
            warn!(worker = self.index, "shutdown called from inside a worker, skipping self-join");
            return;
        }

        if self.handle.join().is_err() {
            error!(worker = self.index, "worker thread terminated abnormally");
        } else {
            debug!(worker = self.index, "worker joined");
        }
    }
}

/// Lanza un thread del sistema operativo con nombre `pool-worker-{index}`
pub(crate) fn os_spawn(index: usize, body: WorkerBody) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("pool-worker-{}", index))
        .spawn(body)
}

/// Construye el cuerpo del worker `index`; el índice se captura por valor
pub(crate) fn body<T: Send + 'static>(
    index: usize,
    queue: Arc<BoundedQueue<T>>,
    handler: Arc<HandlerFn<T>>,
    counters: Arc<PoolCounters>,
) -> WorkerBody {
    Box::new(move || worker_loop(index, &queue, handler.as_ref(), &counters))
}

/// Loop principal del worker
fn worker_loop<T>(
    index: usize,
    queue: &BoundedQueue<T>,
    handler: &HandlerFn<T>,
    counters: &PoolCounters,
) {
    debug!(worker = index, "worker started");

    loop {
        let item = match queue.pop() {
            Popped::Item(item) => item,
            Popped::Drained => break,
        };

        counters.worker_busy();

        // Un panic del handler no debe matar al worker; el item se libera
        // durante el unwind.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(item)));

        let panicked = match outcome {
            Ok(()) => false,
            Err(payload) => {
                error!(
                    worker = index,
                    panic = %panic_message(payload.as_ref()),
                    "handler panicked, worker keeps serving"
                );
                true
            }
        };

        counters.worker_idle(panicked);
    }

    debug!(worker = index, "queue drained, worker terminating");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
