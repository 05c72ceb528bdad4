//! Response envelope module
//!
//! Every handler answers with an [`ApiResponse`]: a status code, a header map
//! and a JSON-encoded body string. The envelope is returned verbatim to the
//! invoker, or converted to a hyper response when served locally.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::logger;

/// Headers attached to every envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    pub fn from_config(http: &HttpConfig) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if http.enable_cors {
            headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
            headers.insert(
                "Access-Control-Allow-Headers".to_string(),
                "Content-Type".to_string(),
            );
            headers.insert(
                "Access-Control-Allow-Methods".to_string(),
                "GET, POST, PUT, DELETE".to_string(),
            );
        }
        Self(headers)
    }
}

impl Default for ResponseHeaders {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    /// Serialize `body` as the JSON payload
    pub fn json<T: Serialize>(
        status: StatusCode,
        body: &T,
        headers: &ResponseHeaders,
    ) -> Result<Self> {
        let body = serde_json::to_string(body).map_err(Error::Serialize)?;
        Ok(Self::raw(status, body, headers))
    }

    /// `{"message": ...}` body
    pub fn message(status: StatusCode, message: &str, headers: &ResponseHeaders) -> Self {
        Self::value(status, &json!({ "message": message }), headers)
    }

    /// `{"error": ...}` body
    pub fn error(status: StatusCode, message: &str, headers: &ResponseHeaders) -> Self {
        Self::value(status, &json!({ "error": message }), headers)
    }

    /// Routing miss
    pub fn not_found(headers: &ResponseHeaders) -> Self {
        Self::error(StatusCode::NOT_FOUND, "Not Found", headers)
    }

    /// Generic answer for unhandled failures
    pub fn internal_error(headers: &ResponseHeaders) -> Self {
        Self::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            headers,
        )
    }

    fn value(status: StatusCode, body: &Value, headers: &ResponseHeaders) -> Self {
        Self::raw(status, body.to_string(), headers)
    }

    fn raw(status: StatusCode, body: String, headers: &ResponseHeaders) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: headers.0.clone(),
            body,
        }
    }

    /// Body parsed back into JSON
    pub fn body_json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(Error::Serialize)
    }

    /// Convert to a hyper response for the local HTTP host
    pub fn into_http(self) -> Response<Full<Bytes>> {
        let mut builder = Response::builder().status(self.status_code);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|e| {
                logger::log_error(&format!("Failed to build {} response: {e}", self.status_code));
                let mut fallback = Response::new(Full::new(Bytes::from(
                    r#"{"error":"Internal Server Error"}"#,
                )));
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_are_json_only() {
        let resp = ApiResponse::not_found(&ResponseHeaders::default());
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.headers["Content-Type"], "application/json");
        assert_eq!(resp.body_json().unwrap(), json!({"error": "Not Found"}));
    }

    #[test]
    fn test_cors_headers_when_enabled() {
        let headers = ResponseHeaders::from_config(&HttpConfig { enable_cors: true });
        let resp = ApiResponse::message(StatusCode::OK, "ok", &headers);
        assert_eq!(resp.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(resp.headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let resp = ApiResponse::message(StatusCode::CREATED, "ノート新規作成 (仮)", &ResponseHeaders::default());
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        let body: Value = serde_json::from_str(value["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["message"], "ノート新規作成 (仮)");
    }

    #[test]
    fn test_into_http_keeps_status_and_headers() {
        let resp = ApiResponse::error(StatusCode::BAD_REQUEST, "userId is required", &ResponseHeaders::default())
            .into_http();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
