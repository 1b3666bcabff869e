//! # Thread Pool
//! src/pool/mod.rs
//!
//! Pool fijo de workers alimentado por una cola FIFO acotada.
//!
//! ```text
//! accept loop ──submit──▶ BoundedQueue ──pop──▶ worker 0..N ──▶ handler
//! ```
//!
//! - `queue`: cola sincronizada con backpressure y señal de shutdown
//! - `worker`: loop de cada thread (Idle/Busy/Terminated)
//! - `manager`: construcción, `submit`, `shutdown` y ciclo de vida
//! - `stats`: contadores para monitoreo

pub mod manager;
pub mod queue;
pub mod stats;
pub mod worker;

pub use manager::{PoolConfig, ThreadPool, DEFAULT_QUEUE_CAPACITY, DEFAULT_THREADS};
pub use queue::{BoundedQueue, Popped};
pub use stats::{Lifecycle, PoolStats};
