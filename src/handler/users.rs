//! Users handlers
//!
//! Each request turns into exactly one store call: a point lookup, a scan or
//! an upsert. Store failures and unparseable bodies are returned as errors for
//! the dispatcher to answer.

use chrono::Utc;
use hyper::StatusCode;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::{ApiRequest, ApiResponse, ResponseHeaders};
use crate::store::{UserRecord, UserStore};

/// Timestamp layout for `createdAt`: ISO-8601, UTC, microseconds, no offset
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Parse the create body; only a JSON object is accepted
///
/// Repeated keys keep the last value.
fn parse_body(raw: Option<&str>) -> Result<Map<String, Value>> {
    match raw {
        Some(raw) => serde_json::from_str(raw).map_err(Error::MalformedBody),
        None => Ok(Map::new()),
    }
}

/// String field of the body; missing and `null` both read as `None`
fn string_field(body: &Map<String, Value>, key: &'static str) -> Result<Option<String>> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::InvalidField(key)),
    }
}

pub struct UsersHandler {
    store: Arc<dyn UserStore>,
}

impl UsersHandler {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// `userId` query parameter selects a single record, otherwise the whole table
    pub async fn get_users(
        &self,
        request: &ApiRequest,
        headers: &ResponseHeaders,
    ) -> Result<ApiResponse> {
        match request.query_param("userId").filter(|id| !id.is_empty()) {
            Some(user_id) => match self.store.get(user_id).await? {
                Some(record) => ApiResponse::json(StatusCode::OK, &record, headers),
                None => {
                    tracing::debug!(user_id, "user not found");
                    Ok(ApiResponse::error(
                        StatusCode::NOT_FOUND,
                        "User not found",
                        headers,
                    ))
                }
            },
            None => {
                // One page only; no continuation.
                let records = self.store.scan().await?;
                tracing::debug!(count = records.len(), "scanned users");
                ApiResponse::json(StatusCode::OK, &records, headers)
            }
        }
    }

    /// Upsert a record built from the body; only `userId` is validated
    pub async fn create_user(
        &self,
        request: &ApiRequest,
        headers: &ResponseHeaders,
    ) -> Result<ApiResponse> {
        let body = parse_body(request.body.as_deref())?;

        let Some(user_id) = string_field(&body, "userId")?.filter(|id| !id.is_empty()) else {
            return Ok(ApiResponse::error(
                StatusCode::BAD_REQUEST,
                "userId is required",
                headers,
            ));
        };

        let record = UserRecord {
            user_id,
            email: string_field(&body, "email")?.unwrap_or_default(),
            name: string_field(&body, "name")?.unwrap_or_default(),
            created_at: Utc::now().format(CREATED_AT_FORMAT).to_string(),
        };

        self.store.put(record.clone()).await?;
        tracing::debug!(user_id = %record.user_id, "stored user");

        ApiResponse::json(StatusCode::CREATED, &record, headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    fn handler() -> UsersHandler {
        UsersHandler::new(Arc::new(MemoryStore::new()))
    }

    async fn create(handler: &UsersHandler, body: &str) -> ApiResponse {
        let req = ApiRequest::new("POST", "/users").with_body(body);
        handler
            .create_user(&req, &ResponseHeaders::default())
            .await
            .unwrap()
    }

    async fn get(handler: &UsersHandler, user_id: Option<&str>) -> ApiResponse {
        let mut req = ApiRequest::new("GET", "/users");
        if let Some(id) = user_id {
            req = req.with_query("userId", id);
        }
        handler
            .get_users(&req, &ResponseHeaders::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_fills_defaults() {
        let handler = handler();
        let resp = create(&handler, r#"{"userId":"u1","email":"a@x.com"}"#).await;
        assert_eq!(resp.status_code, 201);

        let body = resp.body_json().unwrap();
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["name"], "");
        let created_at = body["createdAt"].as_str().unwrap();
        assert!(!created_at.is_empty());
        assert!(chrono::NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT).is_ok());
        assert!(!created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_create_requires_user_id() {
        let handler = handler();
        for body in [r"{}", r#"{"userId":""}"#, r#"{"email":"a@x.com"}"#] {
            let resp = create(&handler, body).await;
            assert_eq!(resp.status_code, 400, "body: {body}");
            assert_eq!(resp.body_json().unwrap(), json!({"error": "userId is required"}));
        }

        let req = ApiRequest::new("POST", "/users");
        let resp = handler
            .create_user(&req, &ResponseHeaders::default())
            .await
            .unwrap();
        assert_eq!(resp.status_code, 400);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_body() {
        let handler = handler();
        let req = ApiRequest::new("POST", "/users").with_body("{not json");
        let result = handler.create_user(&req, &ResponseHeaders::default()).await;
        assert!(matches!(result, Err(Error::MalformedBody(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_body() {
        let handler = handler();
        for body in [r#"["u1","a@x.com","n"]"#, r#""u1""#, "42", "null"] {
            let req = ApiRequest::new("POST", "/users").with_body(body);
            let result = handler.create_user(&req, &ResponseHeaders::default()).await;
            assert!(matches!(result, Err(Error::MalformedBody(_))), "body: {body}");
        }
        assert_eq!(get(&handler, None).await.body_json().unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_create_repeated_key_keeps_last() {
        let handler = handler();
        let resp = create(&handler, r#"{"userId":"a","userId":"b"}"#).await;
        assert_eq!(resp.status_code, 201);
        assert_eq!(resp.body_json().unwrap()["userId"], "b");
        assert_eq!(get(&handler, Some("a")).await.status_code, 404);
    }

    #[tokio::test]
    async fn test_create_null_fields_default() {
        let handler = handler();
        let resp = create(&handler, r#"{"userId":"u1","email":null,"name":null}"#).await;
        assert_eq!(resp.status_code, 201);
        let body = resp.body_json().unwrap();
        assert_eq!(body["email"], "");
        assert_eq!(body["name"], "");

        let resp = create(&handler, r#"{"userId":null}"#).await;
        assert_eq!(resp.status_code, 400);
    }

    #[tokio::test]
    async fn test_create_rejects_non_string_fields() {
        let handler = handler();
        for (body, field) in [
            (r#"{"userId":7}"#, "userId"),
            (r#"{"userId":"u1","email":["a@x.com"]}"#, "email"),
            (r#"{"userId":"u1","name":false}"#, "name"),
        ] {
            let req = ApiRequest::new("POST", "/users").with_body(body);
            let result = handler.create_user(&req, &ResponseHeaders::default()).await;
            assert!(
                matches!(result, Err(Error::InvalidField(f)) if f == field),
                "body: {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_get_returns_stored_record() {
        let handler = handler();
        let created = create(&handler, r#"{"userId":"u1","name":"Alice"}"#).await;

        let resp = get(&handler, Some("u1")).await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body_json().unwrap(), created.body_json().unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let resp = get(&handler(), Some("missing")).await;
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.body_json().unwrap(), json!({"error": "User not found"}));
    }

    #[tokio::test]
    async fn test_scan_lists_all_users() {
        let handler = handler();
        assert_eq!(get(&handler, None).await.body_json().unwrap(), json!([]));

        create(&handler, r#"{"userId":"u1"}"#).await;
        create(&handler, r#"{"userId":"u2"}"#).await;

        let resp = get(&handler, None).await;
        assert_eq!(resp.status_code, 200);
        let body = resp.body_json().unwrap();
        let mut ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["userId"].as_str())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_empty_user_id_query_scans() {
        let handler = handler();
        create(&handler, r#"{"userId":"u1"}"#).await;
        let resp = get(&handler, Some("")).await;
        assert_eq!(resp.status_code, 200);
        assert!(resp.body_json().unwrap().is_array());
    }

    #[tokio::test]
    async fn test_create_overwrites_existing_user() {
        let handler = handler();
        create(&handler, r#"{"userId":"u1","name":"Alice","email":"a@x.com"}"#).await;
        create(&handler, r#"{"userId":"u1","name":"Bob"}"#).await;

        let body: Value = get(&handler, Some("u1")).await.body_json().unwrap();
        assert_eq!(body["name"], "Bob");
        assert_eq!(body["email"], "");

        let all = get(&handler, None).await.body_json().unwrap();
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    struct FailingStore;

    #[async_trait]
    impl UserStore for FailingStore {
        async fn get(&self, _user_id: &str) -> std::result::Result<Option<UserRecord>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("unavailable")))
        }

        async fn scan(&self) -> std::result::Result<Vec<UserRecord>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("unavailable")))
        }

        async fn put(&self, _record: UserRecord) -> std::result::Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("unavailable")))
        }
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let handler = UsersHandler::new(Arc::new(FailingStore));
        let headers = ResponseHeaders::default();

        let get_one = ApiRequest::new("GET", "/users").with_query("userId", "u1");
        assert!(matches!(
            handler.get_users(&get_one, &headers).await,
            Err(Error::Store(_))
        ));

        let scan = ApiRequest::new("GET", "/users");
        assert!(matches!(
            handler.get_users(&scan, &headers).await,
            Err(Error::Store(_))
        ));

        let create = ApiRequest::new("POST", "/users").with_body(r#"{"userId":"u1"}"#);
        assert!(matches!(
            handler.create_user(&create, &headers).await,
            Err(Error::Store(_))
        ));
    }
}
