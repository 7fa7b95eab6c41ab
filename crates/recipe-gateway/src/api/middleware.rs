use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Logs every inbound request when it starts and when it finishes.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let span = info_span!("request", method = %request.method(), uri = %request.uri());
    async move {
        info!("Started");
        let started = Instant::now();
        let response = next.run(request).await;
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Finished"
        );
        response
    }
    .instrument(span)
    .await
}
