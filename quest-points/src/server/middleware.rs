use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, info_span, Instrument};

/// Logs every request and runs the handler inside a span carrying method and uri.
pub async fn trace_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let span = info_span!("http_request", method = %method, uri = %uri);

    async move {
        info!("Incoming request");
        let response = next.run(request).await;
        info!(status = response.status().as_u16(), "Request completed");
        response
    }
    .instrument(span)
    .await
}
