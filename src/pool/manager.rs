//! # Pool de Workers
//! src/pool/manager.rs
//!
//! Coordina N workers fijos que consumen de una `BoundedQueue` compartida,
//! y el apagado ordenado del conjunto.
//!
//! ## Apagado
//!
//! ```text
//! shutdown() → Running → ShuttingDown
//!            → queue.shutdown()         (despierta a todos)
//!            → join de cada worker      (terminan al ver Drained)
//!            → drain_and_dispose        (items que nadie tomó)
//!            → Stopped
//! ```

use crate::error::{PoolError, Rejected};
use crate::pool::queue::BoundedQueue;
use crate::pool::stats::{Lifecycle, PoolCounters, PoolStats};
use crate::pool::worker::{self, HandlerFn, Worker, WorkerBody};
use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use tracing::{error, info, warn};

/// Número de workers por defecto
pub const DEFAULT_THREADS: usize = 4;

/// Capacidad de cola por defecto
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Configuración del pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Número de workers (>= 1)
    pub threads: usize,

    /// Capacidad máxima de la cola (>= 1)
    pub queue_capacity: usize,
}

impl PoolConfig {
    pub fn new(threads: usize, queue_capacity: usize) -> Self {
        Self {
            threads,
            queue_capacity,
        }
    }

    fn validate(&self) -> Result<(), PoolError> {
        if self.threads == 0 {
            return Err(PoolError::InvalidThreadCount);
        }
        if self.queue_capacity == 0 {
            return Err(PoolError::InvalidCapacity);
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_THREADS, DEFAULT_QUEUE_CAPACITY)
    }
}

/// Pool fijo de threads alimentado por una cola acotada.
///
/// `T` es el work item (una conexión en el servidor). El handler recibe la
/// propiedad de cada item y es responsable de liberarlo; el `disposer` solo
/// se usa para los items que quedan en la cola durante el apagado.
pub struct ThreadPool<T: Send + 'static> {
    queue: Arc<BoundedQueue<T>>,
    workers: Mutex<Vec<Worker>>,
    lifecycle: Mutex<Lifecycle>,

    /// Se señala al llegar a `Stopped`
    stopped: Condvar,

    disposer: Box<dyn Fn(T) + Send + Sync + 'static>,
    counters: Arc<PoolCounters>,
    threads: usize,
}

impl<T: Send + 'static> ThreadPool<T> {
    /// Crea el pool y lanza todos sus workers.
    ///
    /// Si un thread no se puede crear, los que ya arrancaron se unen y la
    /// cola se libera antes de retornar el error.
    ///
    /// # Ejemplo
    /// ```
    /// use pool_server::pool::{PoolConfig, ThreadPool};
    ///
    /// let pool = ThreadPool::new(PoolConfig::new(2, 8), |n: u32| println!("{}", n), drop).unwrap();
    /// pool.submit(1).unwrap();
    /// pool.shutdown();
    /// ```
    pub fn new<H, D>(config: PoolConfig, handler: H, disposer: D) -> Result<Self, PoolError>
    where
        H: Fn(T) + Send + Sync + 'static,
        D: Fn(T) + Send + Sync + 'static,
    {
        Self::with_spawner(config, handler, disposer, worker::os_spawn)
    }

    fn with_spawner<H, D, S>(
        config: PoolConfig,
        handler: H,
        disposer: D,
        mut spawn: S,
    ) -> Result<Self, PoolError>
    where
        H: Fn(T) + Send + Sync + 'static,
        D: Fn(T) + Send + Sync + 'static,
        S: FnMut(usize, WorkerBody) -> io::Result<JoinHandle<()>>,
    {
        config.validate()?;

        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));
        let handler: Arc<HandlerFn<T>> = Arc::new(handler);
        let counters = Arc::new(PoolCounters::default());
        let mut workers = Vec::with_capacity(config.threads);

        for index in 0..config.threads {
            let body = worker::body(
                index,
                Arc::clone(&queue),
                Arc::clone(&handler),
                Arc::clone(&counters),
            );

            match spawn(index, body) {
                Ok(handle) => workers.push(Worker::new(index, handle)),
                Err(source) => {
                    error!(worker = index, error = %source, "failed to spawn worker, unwinding pool");
                    queue.shutdown();
                    for worker in workers {
                        worker.join();
                    }
                    queue.drain_and_dispose(&disposer);
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }

        info!(
            threads = config.threads,
            queue_capacity = config.queue_capacity,
            "thread pool started"
        );

        Ok(Self {
            queue,
            workers: Mutex::new(workers),
            lifecycle: Mutex::new(Lifecycle::Running),
            stopped: Condvar::new(),
            disposer: Box::new(disposer),
            counters,
            threads: config.threads,
        })
    }

    /// Entrega un item al pool.
    ///
    /// Bloquea mientras la cola esté llena. `Err(Rejected(item))` significa
    /// que el pool está cerrando y el caller debe liberar el item.
    pub fn submit(&self, item: T) -> Result<(), Rejected<T>> {
        match self.queue.push(item) {
            Ok(()) => {
                self.counters.record_submitted();
                Ok(())
            }
            Err(rejected) => {
                self.counters.record_rejected();
                Err(rejected)
            }
        }
    }

    /// Items esperando en la cola (snapshot sin garantías)
    pub fn current_load(&self) -> usize {
        self.queue.len()
    }

    /// Apaga el pool y bloquea hasta que todos los workers terminen.
    ///
    /// Idempotente: el primer caller hace el trabajo, los concurrentes
    /// esperan a `Stopped` y los posteriores retornan de inmediato.
    pub fn shutdown(&self) {
        let mut lifecycle = self.lock_lifecycle();
        match *lifecycle {
            Lifecycle::Stopped => return,
            Lifecycle::ShuttingDown => {
                while *lifecycle != Lifecycle::Stopped {
                    lifecycle = self
                        .stopped
                        .wait(lifecycle)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                return;
            }
            Lifecycle::Running => *lifecycle = Lifecycle::ShuttingDown,
        }
        drop(lifecycle);

        // Aunque el disposer haga panic, los que esperan en `stopped` se liberan
        let _stopped = StopOnExit {
            lifecycle: &self.lifecycle,
            stopped: &self.stopped,
        };

        info!(pending = self.queue.len(), "thread pool shutting down");
        self.queue.shutdown();

        let workers = std::mem::take(&mut *self.lock_workers());
        for worker in workers {
            worker.join();
        }

        let disposed = self.queue.drain_and_dispose(|item| (self.disposer)(item));
        if disposed > 0 {
            warn!(disposed, "disposed unclaimed items during shutdown");
        }
        self.counters.record_disposed(disposed);
        info!("thread pool stopped");
    }

    /// Estado actual del ciclo de vida
    pub fn lifecycle(&self) -> Lifecycle {
        *self.lock_lifecycle()
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Foto de los contadores del pool
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot(
            self.lifecycle(),
            self.threads,
            self.queue.capacity(),
            self.queue.len(),
        )
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_workers(&self) -> MutexGuard<'_, Vec<Worker>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pasa el ciclo de vida a `Stopped` y despierta a los que esperan al salir
/// de `shutdown`, también durante un unwind
struct StopOnExit<'a> {
    lifecycle: &'a Mutex<Lifecycle>,
    stopped: &'a Condvar,
}

impl Drop for StopOnExit<'_> {
    fn drop(&mut self) {
        *self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner) = Lifecycle::Stopped;
        self.stopped.notify_all();
    }
}

impl<T: Send + 'static> Drop for ThreadPool<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
