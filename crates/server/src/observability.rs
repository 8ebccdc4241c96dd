use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

// Prometheus metrics (default registry)
pub static QUOTES_SERVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "motivate_quotes_served_total",
        "Total random quotes served"
    )
    .expect("register quotes_served_total")
});

pub static QUOTES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "motivate_quotes_created_total",
        "Total quotes created through the API"
    )
    .expect("register quotes_created_total")
});

pub static MAIL_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "motivate_mail_sent_total",
        "Total quote mails sent"
    )
    .expect("register mail_sent_total")
});

pub static MAIL_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "motivate_mail_failures_total",
        "Total quote mails that failed to send"
    )
    .expect("register mail_failures_total")
});

pub static QUOTES_STORED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "motivate_quotes_stored",
        "Quotes currently held in the store"
    )
    .expect("register quotes_stored")
});

/// Register every metric up front so `/metrics` lists them before first use.
pub fn init_metrics() {
    Lazy::force(&QUOTES_SERVED_TOTAL);
    Lazy::force(&QUOTES_CREATED_TOTAL);
    Lazy::force(&MAIL_SENT_TOTAL);
    Lazy::force(&MAIL_FAILURES_TOTAL);
    Lazy::force(&QUOTES_STORED);
}

pub fn encode_metrics()-> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
