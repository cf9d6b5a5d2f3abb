//! Request logging middleware configuration
//!
//! Every request gets an `http_request` span. The feedback handler fills in
//! `outcome` and `missing`; the response hook fills in `status`.

use http::{Request, Response};
use std::time::Duration;
use tower_http::{
    classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier},
    trace::{
        DefaultOnBodyChunk, DefaultOnEos, MakeSpan, OnFailure, OnRequest, OnResponse, TraceLayer,
    },
};
use tracing::{field::Empty, info_span, Span};

pub type RequestTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpan,
    RequestStarted,
    ResponseFinished,
    DefaultOnBodyChunk,
    DefaultOnEos,
    RequestFailed,
>;

pub fn logging_layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(RequestStarted)
        .on_response(ResponseFinished)
        .on_failure(RequestFailed)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            content_type = ?request.headers().get(http::header::CONTENT_TYPE),
            status = Empty,
            outcome = Empty,
            missing = Empty,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestStarted;

impl<B> OnRequest<B> for RequestStarted {
    fn on_request(&mut self, request: &Request<B>, _span: &Span) {
        tracing::debug!(
            "started processing request {} {}",
            request.method(),
            request.uri().path()
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFinished;

impl<B> OnResponse<B> for ResponseFinished {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        let latency_ms = latency.as_millis();
        span.record("status", status.as_u16());

        if status.is_success() {
            tracing::info!(latency_ms, "request completed successfully");
        } else if status.is_client_error() {
            tracing::warn!(latency_ms, "client error response");
        } else {
            tracing::error!(latency_ms, "server error response");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFailed;

impl OnFailure<ServerErrorsFailureClass> for RequestFailed {
    fn on_failure(&mut self, error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
        tracing::error!(latency_ms = latency.as_millis(), error = %error, "request failed");
    }
}
