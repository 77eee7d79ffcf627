use std::net::SocketAddr;

// ── Request-driven counters ──────────────────────────────────────

/// Counter: check-ins. Labels: outcome (confirmed | waiting).
pub const CHECK_INS_TOTAL: &str = "vacancy_check_ins_total";

/// Counter: check-outs that released an active booking.
pub const CHECK_OUTS_TOTAL: &str = "vacancy_check_outs_total";

/// Counter: bookings moved from a standard to a priority queue.
pub const PROMOTIONS_TOTAL: &str = "vacancy_promotions_total";

/// Counter: listener deliveries that returned an error or panicked.
pub const LISTENER_FAILURES_TOTAL: &str = "vacancy_listener_failures_total";

// ── Utilization gauges ──────────────────────────────────────────

/// Gauge: rooms under active assignment.
pub const ACTIVE_ASSIGNMENTS: &str = "vacancy_active_assignments";

/// Gauge: bookings in any waiting queue.
pub const WAITING_BOOKINGS: &str = "vacancy_waiting_bookings";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}
