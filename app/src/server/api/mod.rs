//! REST API handlers.

pub mod stamp;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn err_json_carries_status_and_message() {
        let (status, Json(body)) = err_json(422, "bad crop");
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "bad crop");
        assert_eq!(body["status"], "error");
    }

    #[test]
    fn err_json_falls_back_to_500() {
        let (status, _) = err_json(42, "nonsense");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
