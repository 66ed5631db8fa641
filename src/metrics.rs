use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::middleware::gate::classify;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `Ok(None)` when observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Counts and times every request, labelled by route template and by whether
/// the gate treats the path as an API or a page.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let surface = classify(req.uri().path()).surface.as_str();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    gauge!("http_requests_active", "surface" => surface).increment(1.0);

    let response = next.run(req).await;

    let status = response.status();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "surface" => surface,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "route" => route)
        .record(start.elapsed().as_secs_f64());

    if status.is_redirection() {
        counter!("http_redirects_total", "surface" => surface).increment(1);
    }

    gauge!("http_requests_active", "surface" => surface).decrement(1.0);

    response
}

/// Router for the metrics listener
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics

pub fn track_user_created(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_created_total", "role" => role.to_string()).increment(1);
}

pub fn track_user_login_success(role: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_user_login_failure(reason: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason.to_string()).increment(1);
}

pub fn track_session_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("sessions_issued_total").increment(1);
}

pub fn track_session_refreshed() {
    if !is_observability_enabled() {
        return;
    }
    counter!("sessions_refreshed_total").increment(1);
}

/// `kind` is one of `redirect`, `unauthenticated`, `forbidden`.
pub fn track_gate_denied(kind: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("gate_denials_total", "kind" => kind).increment(1);
}

pub fn track_enrollment_denied(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("enrollment_gate_denials_total", "reason" => reason).increment(1);
}

pub fn track_enrollment_upsert(created: bool) {
    if !is_observability_enabled() {
        return;
    }
    let outcome = if created { "created" } else { "updated" };
    counter!("enrollment_upserts_total", "outcome" => outcome).increment(1);
}
