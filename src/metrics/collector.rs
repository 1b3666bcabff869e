//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta métricas de las respuestas HTTP enviadas por los workers.

use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Máximo de latencias guardadas para calcular percentiles
const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    /// Respuestas enviadas
    total_responses: u64,

    /// Conexiones cerradas por el cliente sin mandar request
    empty_connections: u64,

    /// Respuestas que no se pudieron escribir completas
    write_failures: u64,

    /// Respuestas por código de estado
    status_codes: BTreeMap<u16, u64>,

    /// Bytes de body enviados
    bytes_sent: u64,

    /// Ventana de latencias (microsegundos), las más viejas se descartan
    latencies: VecDeque<u64>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData::default())),
            start_time: Instant::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registra una respuesta enviada
    pub fn record_response(&self, status_code: u16, body_bytes: usize, latency: Duration) {
        let mut data = self.lock();

        data.total_responses += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;
        data.bytes_sent += body_bytes as u64;

        if data.latencies.len() >= MAX_LATENCY_SAMPLES {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency.as_micros() as u64);
    }

    /// Registra una conexión cerrada antes de mandar la request line
    pub fn record_empty_connection(&self) {
        self.lock().empty_connections += 1;
    }

    /// Registra una respuesta que falló al escribirse
    pub fn record_write_failure(&self) {
        self.lock().write_failures += 1;
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.lock();
        let (p50, p95, p99, avg) = calculate_percentiles(&data.latencies);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            total_responses: data.total_responses,
            empty_connections: data.empty_connections,
            write_failures: data.write_failures,
            status_codes: data.status_codes.clone(),
            bytes_sent: data.bytes_sent,
            latency_us: LatencySummary {
                p50,
                p95,
                p99,
                avg,
                samples: data.latencies.len(),
            },
        }
    }
}

/// Calcula percentiles de latencia
fn calculate_percentiles(latencies: &VecDeque<u64>) -> (u64, u64, u64, u64) {
    if latencies.is_empty() {
        return (0, 0, 0, 0);
    }

    let mut sorted: Vec<u64> = latencies.iter().copied().collect();
    sorted.sort_unstable();

    let len = sorted.len();
    let p50 = sorted[len * 50 / 100];
    let p95 = sorted[len * 95 / 100];
    let p99 = sorted[len * 99 / 100];

    let sum: u64 = sorted.iter().sum();
    let avg = sum / len as u64;

    (p50, p95, p99, avg)
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Resumen de latencias en microsegundos
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub avg: u64,
    pub samples: usize,
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub total_responses: u64,
    pub empty_connections: u64,
    pub write_failures: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub bytes_sent: u64,
    pub latency_us: LatencySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_responses() {
        let collector = MetricsCollector::new();

        collector.record_response(200, 100, Duration::from_millis(10));
        collector.record_response(200, 50, Duration::from_millis(20));
        collector.record_response(404, 80, Duration::from_millis(5));
        collector.record_empty_connection();
        collector.record_write_failure();

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_responses, 3);
        assert_eq!(snapshot.status_codes.get(&200), Some(&2));
        assert_eq!(snapshot.status_codes.get(&404), Some(&1));
        assert_eq!(snapshot.bytes_sent, 230);
        assert_eq!(snapshot.empty_connections, 1);
        assert_eq!(snapshot.write_failures, 1);
    }

    #[test]
    fn test_percentiles() {
        let collector = MetricsCollector::new();

        for i in 1..=100 {
            collector.record_response(200, 0, Duration::from_micros(i));
        }

        let latency = collector.snapshot().latency_us;
        assert!(latency.p50 > 0);
        assert!(latency.p95 > latency.p50);
        assert!(latency.p99 > latency.p95);
        assert_eq!(latency.samples, 100);
    }

    #[test]
    fn test_latency_window_management() {
        let collector = MetricsCollector::new();

        for i in 0..15_000 {
            collector.record_response(200, 0, Duration::from_micros(i));
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_responses, 15_000);
        assert_eq!(snapshot.latency_us.samples, MAX_LATENCY_SAMPLES);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let collector = MetricsCollector::new();
        collector.record_response(405, 10, Duration::from_millis(1));

        let json = serde_json::to_value(collector.snapshot()).unwrap();
        assert_eq!(json["total_responses"], 1);
        assert_eq!(json["status_codes"]["405"], 1);
        assert!(json["latency_us"]["p50"].is_u64());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MetricsCollector::default().snapshot();
        assert_eq!(snapshot.total_responses, 0);
        assert_eq!(snapshot.latency_us.avg, 0);
        assert!(snapshot.status_codes.is_empty());
    }
}
