//! Feedback form page and submission endpoint

use crate::{
    error::{AppError, Result},
    extractors::SubmissionPayload,
    models::{ResponseMessage, SubmissionOutcome},
    AppState,
};
use axum::{
    extract::{FromRequest, Request, State},
    response::{Html, IntoResponse},
    Json,
};
use tracing::{field::display, info, warn, Span};

const FEEDBACK_PAGE: &str = include_str!("../../assets/feedback.html");

pub async fn handle_form_page() -> Html<&'static str> {
    Html(FEEDBACK_PAGE)
}

/// `POST /api/feedback`: 200 when name, email and message are all present, 400 otherwise.
pub async fn handle_feedback(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse> {
    let submission_id = uuid::Uuid::new_v4();

    let payload = SubmissionPayload::from_request(request, &state).await;
    let SubmissionPayload(submission) = match payload {
        Ok(payload) => payload,
        Err(err) => {
            Span::current().record("outcome", "invalid");
            warn!(%submission_id, error = %err, "feedback payload could not be decoded");
            state.metrics.record_invalid_payload();
            return Err(err);
        }
    };

    match submission.check() {
        SubmissionOutcome::Accepted => {
            Span::current().record("outcome", "accepted");
            info!(%submission_id, "feedback accepted");
            state.metrics.record_accepted();
            Ok(Json(ResponseMessage::success()))
        }
        SubmissionOutcome::Rejected { missing } => {
            Span::current()
                .record("outcome", "rejected")
                .record("missing", display(missing.join(",")));
            warn!(%submission_id, missing = ?missing, "feedback rejected");
            state.metrics.record_rejected(&missing);
            Err(AppError::MissingFields(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::routes::create_routes;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        create_routes().with_state(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn json_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn urlencoded_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn raw_request(content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri("/api/feedback");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(body.into()).unwrap()
    }

    fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
        let boundary = "feedback-test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_complete_json_submission() {
        let (status, body) = send(
            app(AppState::default()),
            json_request(json!({"name": "Ann", "email": "a@b.com", "message": "hi"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Success!"}));
    }

    #[tokio::test]
    async fn test_empty_name_json_submission() {
        let (status, body) = send(
            app(AppState::default()),
            json_request(json!({"name": "", "email": "a@b.com", "message": "hi"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Missing required fields"}));
    }

    #[tokio::test]
    async fn test_absent_field_json_submission() {
        let (status, body) = send(
            app(AppState::default()),
            json_request(json!({"name": "Ann", "email": "a@b.com"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_urlencoded_submission() {
        let (status, body) = send(
            app(AppState::default()),
            urlencoded_request("name=Ann&email=a%40b.com&message=hi"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Success!");

        let (status, _) = send(
            app(AppState::default()),
            urlencoded_request("name=Ann&email=&message=hi"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_multipart_submission() {
        let (status, body) = send(
            app(AppState::default()),
            multipart_request(&[
                ("name", "Ann"),
                ("email", "a@b.com"),
                ("message", "hi"),
                ("extra", "x"),
            ]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Success!");

        let (status, body) = send(
            app(AppState::default()),
            multipart_request(&[("name", "Ann"), ("message", "hi")]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_unsupported_content_type() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("name=Ann"))
            .unwrap();

        let (status, body) = send(app(AppState::default()), request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["message"], "Unsupported content type");
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_payload() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();

        let state = AppState::default();
        let (status, body) = send(app(state.clone()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid form payload");
        assert_eq!(state.metrics.snapshot().invalid_payloads, 1);
    }

    #[tokio::test]
    async fn test_only_post_is_accepted() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/feedback")
            .body(Body::empty())
            .unwrap();

        let response = app(AppState::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_outcomes_update_metrics() {
        let state = AppState::default();

        send(
            app(state.clone()),
            json_request(json!({"name": "Ann", "email": "a@b.com", "message": "hi"})),
        )
        .await;
        send(app(state.clone()), json_request(json!({"email": "a@b.com"}))).await;

        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.accepted_submissions, 1);
        assert_eq!(snapshot.rejected_submissions, 1);
        assert_eq!(snapshot.missing_by_field.len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_fields_keep_first_value_in_every_encoding() {
        let accepted = [
            urlencoded_request("name=Ann&name=&email=a%40b.com&message=hi"),
            raw_request(
                Some("application/json"),
                r#"{"name": "Ann", "name": "", "email": "a@b.com", "message": "hi"}"#,
            ),
            multipart_request(&[
                ("name", "Ann"),
                ("name", ""),
                ("email", "a@b.com"),
                ("message", "hi"),
            ]),
        ];
        for request in accepted {
            let (status, body) = send(app(AppState::default()), request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Success!");
        }

        let rejected = [
            urlencoded_request("name=&name=Bob&email=a%40b.com&message=hi"),
            raw_request(
                Some("application/json"),
                r#"{"name": "", "name": "Bob", "email": "a@b.com", "message": "hi"}"#,
            ),
            multipart_request(&[
                ("name", ""),
                ("name", "Bob"),
                ("email", "a@b.com"),
                ("message", "hi"),
            ]),
        ];
        for request in rejected {
            let (status, body) = send(app(AppState::default()), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Missing required fields");
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported() {
        let (status, body) = send(
            app(AppState::default()),
            raw_request(None, "name=Ann&email=a%40b.com&message=hi"),
        )
        .await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["message"], "Unsupported content type");
    }

    #[tokio::test]
    async fn test_malformed_multipart_is_invalid_payload() {
        let request = raw_request(
            Some("multipart/form-data; boundary=feedback-test-boundary"),
            "this is not a multipart body",
        );

        let (status, body) = send(app(AppState::default()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid form payload");
    }

    #[tokio::test]
    async fn test_non_string_json_value_is_invalid_payload() {
        let request = raw_request(
            Some("application/json"),
            r#"{"name": 7, "email": "a@b.com", "message": "hi"}"#,
        );

        let (status, body) = send(app(AppState::default()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid form payload");
    }

    #[tokio::test]
    async fn test_empty_bodies_miss_every_field() {
        let requests = [
            raw_request(Some("application/json"), ""),
            raw_request(Some("application/json"), "{}"),
            raw_request(Some("application/x-www-form-urlencoded"), ""),
            raw_request(Some("multipart/form-data; boundary=feedback-test-boundary"), ""),
            multipart_request(&[]),
        ];

        for request in requests {
            let state = AppState::default();
            let (status, body) = send(app(state.clone()), request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Missing required fields");
            assert_eq!(state.metrics.snapshot().rejected_submissions, 1);
        }
    }

    #[tokio::test]
    async fn test_form_page_suppresses_native_submission() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let response = app(AppState::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("event.preventDefault()"));
        assert!(page.contains("\"/api/feedback\""));
        for field in ["name=\"name\"", "name=\"email\"", "name=\"message\""] {
            assert!(page.contains(field), "form is missing {field}");
        }
    }
}
