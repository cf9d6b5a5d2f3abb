//! Extractor that reads a feedback submission in whichever encoding the client chose

use crate::{
    error::AppError,
    models::{FormSubmission, REQUIRED_FIELDS},
};
use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer,
};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Body encodings accepted by the feedback endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    Multipart,
    UrlEncoded,
    Json,
}

impl PayloadEncoding {
    pub fn from_content_type(value: &str) -> Option<Self> {
        let mime: mime::Mime = value.parse().ok()?;

        match (mime.type_(), mime.subtype(), mime.suffix()) {
            (mime::MULTIPART, mime::FORM_DATA, _) => Some(PayloadEncoding::Multipart),
            (mime::APPLICATION, mime::WWW_FORM_URLENCODED, _) => Some(PayloadEncoding::UrlEncoded),
            (mime::APPLICATION, mime::JSON, _) => Some(PayloadEncoding::Json),
            (mime::APPLICATION, _, Some(mime::JSON)) => Some(PayloadEncoding::Json),
            _ => None,
        }
    }
}

pub struct SubmissionPayload(pub FormSubmission);

#[async_trait]
impl<S> FromRequest<S> for SubmissionPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or(AppError::UnsupportedMediaType)?;
        let encoding = PayloadEncoding::from_content_type(&content_type)
            .ok_or(AppError::UnsupportedMediaType)?;

        debug!(?encoding, "decoding feedback submission");

        let method = req.method().clone();
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;

        if carries_no_fields(&body, &content_type, encoding) {
            return Ok(SubmissionPayload(FormSubmission::default()));
        }

        let mut req = Request::new(Body::from(body));
        *req.method_mut() = method;
        *req.headers_mut() = headers;

        let submission = match encoding {
            PayloadEncoding::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;
                read_multipart(multipart).await?
            }
            PayloadEncoding::UrlEncoded => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;
                FormSubmission::from_fields(pairs)
            }
            PayloadEncoding::Json => {
                let Json(JsonFields(fields)) = Json::<JsonFields>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;
                FormSubmission::from_fields(fields)
            }
        };

        Ok(SubmissionPayload(submission))
    }
}

/// A blank body, or a multipart body holding only its closing delimiter.
fn carries_no_fields(body: &[u8], content_type: &str, encoding: PayloadEncoding) -> bool {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return true;
    }

    if encoding != PayloadEncoding::Multipart {
        return false;
    }

    content_type
        .parse::<mime::Mime>()
        .ok()
        .and_then(|parsed| parsed.get_param(mime::BOUNDARY).map(|b| b.as_str().to_owned()))
        .is_some_and(|boundary| text == format!("--{}--", boundary))
}

/// Text parts named like form fields are kept, the first occurrence wins.
async fn read_multipart(mut multipart: Multipart) -> Result<FormSubmission, AppError> {
    let mut submission = FormSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::InvalidPayload(err.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if field.file_name().is_some()
            || !REQUIRED_FIELDS.contains(&name.as_str())
            || submission.field(&name).is_some()
        {
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| AppError::InvalidPayload(err.body_text()))?;
        submission.set_first(&name, value);
    }

    Ok(submission)
}

/// Top-level string members of a JSON object, in document order.
///
/// Repeated keys are all kept so the first one can win, `null` reads as an
/// absent field, and any other non-string value is rejected.
struct JsonFields(Vec<(String, String)>);

impl<'de> Deserialize<'de> for JsonFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = JsonFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of form fields")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    match value {
                        Value::String(text) => fields.push((key, text)),
                        Value::Null => {}
                        other => {
                            return Err(de::Error::custom(format!(
                                "field `{}` must be a string, found {}",
                                key, other
                            )))
                        }
                    }
                }
                Ok(JsonFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
