//! Standard response envelope helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success body: `{"data": ...}`.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Failure body: `{"error": {"msg": ...}}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub msg: String,
}

pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(Envelope { data })).into_response()
}

pub fn success_ok<T: Serialize>(data: T) -> Response {
    success(StatusCode::OK, data)
}

pub fn success_created<T: Serialize>(data: T) -> Response {
    success(StatusCode::CREATED, data)
}

pub fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: ErrorDetail { msg: msg.into() },
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::CONTENT_TYPE;

    async fn body_string(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn success_wraps_data() {
        let resp = success_created(serde_json::json!({"id": 1}));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_string(resp).await, r#"{"data":{"id":1}}"#);
    }

    #[tokio::test]
    async fn unit_payload_is_null_data() {
        let resp = success_ok(());
        assert_eq!(body_string(resp).await, r#"{"data":null}"#);
    }

    #[tokio::test]
    async fn error_wraps_msg() {
        let resp = error_response(StatusCode::NOT_FOUND, "todo 999 not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            body_string(resp).await,
            r#"{"error":{"msg":"todo 999 not found"}}"#
        );
    }
}
