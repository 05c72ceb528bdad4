//! Lambda Runtime API host
//!
//! Polls the runtime for proxy events, deserializes each one into an
//! [`ApiRequest`] and answers it with the dispatcher's envelope.

use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::handler::Dispatcher;
use crate::http::{ApiRequest, ApiResponse};

/// Response for one invocation
///
/// Never fails: routing misses and handler errors are already envelopes.
pub async fn handle_invocation(
    dispatcher: &Dispatcher,
    event: LambdaEvent<ApiRequest>,
) -> std::result::Result<ApiResponse, lambda_runtime::Error> {
    let (request, context) = event.into_parts();
    tracing::debug!(
        request_id = %context.request_id,
        method = %request.http_method,
        path = %request.path,
        "invocation"
    );
    Ok(dispatcher.handle(&request).await)
}

/// Run until the runtime shuts the process down
pub async fn run(dispatcher: Dispatcher) -> Result<()> {
    let dispatcher = Arc::new(dispatcher);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiRequest>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { handle_invocation(&dispatcher, event).await }
    }))
    .await
    .map_err(|e| Error::Runtime(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::store::MemoryStore;
    use lambda_runtime::Context;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(MemoryStore::new()), &HttpConfig::default())
    }

    fn event(payload: serde_json::Value) -> LambdaEvent<ApiRequest> {
        let request: ApiRequest = serde_json::from_value(payload).unwrap();
        LambdaEvent::new(request, Context::default())
    }

    #[tokio::test]
    async fn test_invocation_returns_envelope() {
        let d = dispatcher();

        let resp = handle_invocation(&d, event(json!({"httpMethod": "GET", "path": "/notes/n1"})))
            .await
            .unwrap();
        assert_eq!(resp.status_code, 200);
        assert!(resp.body.contains("n1"));

        let resp = handle_invocation(&d, event(json!({"httpMethod": "GET", "path": "/nowhere"})))
            .await
            .unwrap();
        assert_eq!(resp.status_code, 404);

        let encoded = serde_json::to_value(&resp).unwrap();
        assert_eq!(encoded["statusCode"], 404);
        assert_eq!(encoded["headers"]["Content-Type"], "application/json");
        assert_eq!(encoded["body"], r#"{"error":"Not Found"}"#);
    }

    #[tokio::test]
    async fn test_invocations_share_the_store() {
        let d = dispatcher();
        let created = handle_invocation(
            &d,
            event(json!({"httpMethod": "POST", "path": "/users", "body": "{\"userId\":\"u1\"}"})),
        )
        .await
        .unwrap();
        assert_eq!(created.status_code, 201);

        let fetched = handle_invocation(
            &d,
            event(json!({
                "httpMethod": "GET",
                "path": "/users",
                "queryStringParameters": {"userId": "u1"}
            })),
        )
        .await
        .unwrap();
        assert_eq!(fetched.status_code, 200);
        assert_eq!(fetched.body_json().unwrap(), created.body_json().unwrap());
    }
}
