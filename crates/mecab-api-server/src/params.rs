//! Request parameters of the tokenize endpoint.
//!
//! Parameters come from the URL query and from a form body
//! (`application/x-www-form-urlencoded` or `multipart/form-data`). A value
//! in the body wins over the same key in the query, and the first
//! occurrence of a key wins within each source.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

/// Name of the text parameter, misspelling included
pub const SENTENCE_KEY: &str = "sentense";
pub const PARSERS_KEY: &str = "parsers";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pub sentense: String,
    pub parsers: String,
}

#[derive(Debug, Default)]
struct Fields {
    sentense: Option<String>,
    parsers: Option<String>,
}

impl Fields {
    fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            SENTENCE_KEY => &mut self.sentense,
            PARSERS_KEY => &mut self.parsers,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn from_urlencoded(input: &[u8]) -> Result<Self, ParamsRejection> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(input).map_err(|e| ParamsRejection::Form(e.to_string()))?;

        let mut fields = Fields::default();
        for (key, value) in pairs {
            fields.set(&key, value);
        }
        Ok(fields)
    }

    /// Fill unset fields from `other`
    fn or(self, other: Fields) -> Fields {
        Fields {
            sentense: self.sentense.or(other.sentense),
            parsers: self.parsers.or(other.parsers),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParamsRejection {
    #[error("Invalid form data: {0}")]
    Form(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error("Failed to read body: {0}")]
    Body(String),
}

impl IntoResponse for ParamsRejection {
    fn into_response(self) -> Response {
        tracing::debug!("Rejecting request: {}", self);
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

impl<S> FromRequest<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = ParamsRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = match req.uri().query() {
            Some(query) => Fields::from_urlencoded(query.as_bytes())?,
            None => Fields::default(),
        };

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = if content_type.starts_with("application/x-www-form-urlencoded") {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| ParamsRejection::Body(e.body_text()))?;
            Fields::from_urlencoded(&bytes)?
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ParamsRejection::Multipart(e.body_text()))?;
            read_multipart(multipart).await?
        } else {
            Fields::default()
        };

        let fields = body.or(query);
        Ok(RequestParams {
            sentense: fields.sentense.unwrap_or_default(),
            parsers: fields.parsers.unwrap_or_default(),
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Fields, ParamsRejection> {
    let mut fields = Fields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ParamsRejection::Multipart(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ParamsRejection::Multipart(e.body_text()))?;
        fields.set(&name, value);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http;

    use super::*;

    async fn extract(req: Request) -> Result<RequestParams, ParamsRejection> {
        RequestParams::from_request(req, &()).await
    }

    #[tokio::test]
    async fn reads_query() {
        let req = http::Request::builder()
            .uri("/?sentense=%E7%8A%AC&parsers=mecab_unidic")
            .body(Body::empty())
            .unwrap();

        let params = extract(req).await.unwrap();
        assert_eq!(params.sentense, "犬");
        assert_eq!(params.parsers, "mecab_unidic");
    }

    #[tokio::test]
    async fn missing_parameters_are_empty() {
        let req = http::Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(extract(req).await.unwrap(), RequestParams::default());
    }

    #[tokio::test]
    async fn form_body_wins_over_query() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/?sentense=query&parsers=mecab_unidic")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("sentense=body"))
            .unwrap();

        let params = extract(req).await.unwrap();
        assert_eq!(params.sentense, "body");
        assert_eq!(params.parsers, "mecab_unidic");
    }

    #[tokio::test]
    async fn first_value_of_repeated_key_wins() {
        let req = http::Request::builder()
            .uri("/?sentense=first&sentense=second")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract(req).await.unwrap().sentense, "first");
    }

    #[tokio::test]
    async fn reads_multipart_fields() {
        let body = "--XYZ\r\n\
                    Content-Disposition: form-data; name=\"sentense\"\r\n\r\n\
                    犬が走る\r\n\
                    --XYZ\r\n\
                    Content-Disposition: form-data; name=\"parsers\"\r\n\r\n\
                    mecab_ipadic,mecab_unidic\r\n\
                    --XYZ--\r\n";
        let req = http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .unwrap();

        let params = extract(req).await.unwrap();
        assert_eq!(params.sentense, "犬が走る");
        assert_eq!(params.parsers, "mecab_ipadic,mecab_unidic");
    }

    #[tokio::test]
    async fn other_bodies_are_ignored() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/?sentense=query")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"sentense":"json"}"#))
            .unwrap();

        assert_eq!(extract(req).await.unwrap().sentense, "query");
    }
}
