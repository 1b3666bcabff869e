//! # Estadísticas del Pool
//! src/pool/stats.rs
//!
//! Contadores atómicos compartidos entre el pool y sus workers. Son solo
//! para monitoreo: ningún contador participa en la sincronización.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Estado del ciclo de vida del pool (monótono)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Running,
    ShuttingDown,
    Stopped,
}

/// Contadores vivos
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    submitted: AtomicU64,
    rejected: AtomicU64,
    handled: AtomicU64,
    disposed: AtomicU64,
    handler_panics: AtomicU64,
    busy_workers: AtomicUsize,
}

impl PoolCounters {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_disposed(&self, count: usize) {
        self.disposed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn worker_busy(&self) {
        self.busy_workers.fetch_add(1, Ordering::Relaxed);
    }

    /// Idle de nuevo; `panicked` indica si el handler terminó en panic
    pub(crate) fn worker_idle(&self, panicked: bool) {
        self.busy_workers.fetch_sub(1, Ordering::Relaxed);
        self.handled.fetch_add(1, Ordering::Relaxed);
        if panicked {
            self.handler_panics.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(
        &self,
        lifecycle: Lifecycle,
        threads: usize,
        queue_capacity: usize,
        current_load: usize,
    ) -> PoolStats {
        PoolStats {
            lifecycle,
            threads,
            queue_capacity,
            current_load,
            busy_workers: self.busy_workers.load(Ordering::Relaxed),
            submitted: self.submitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
            disposed: self.disposed.load(Ordering::Relaxed),
            handler_panics: self.handler_panics.load(Ordering::Relaxed),
        }
    }
}

/// Foto de las estadísticas del pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub lifecycle: Lifecycle,
    pub threads: usize,
    pub queue_capacity: usize,
    pub current_load: usize,
    pub busy_workers: usize,
    pub submitted: u64,
    pub rejected: u64,
    pub handled: u64,
    pub disposed: u64,
    pub handler_panics: u64,
}
