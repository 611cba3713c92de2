//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_cleanup, record_cache_lookup,
    record_cache_write, record_http_request, record_realtime_event, PrometheusMetrics,
};
