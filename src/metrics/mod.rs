//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Recolección de métricas de las respuestas HTTP:
//! - Respuestas por código de estado
//! - Bytes enviados
//! - Latencias (p50, p95, p99)
//!
//! Las estadísticas del pool viven en `pool::stats`.

pub mod collector;

pub use collector::{LatencySummary, MetricsCollector, MetricsSnapshot};
