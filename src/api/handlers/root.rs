use axum::response::{IntoResponse, Json};
use serde_json::json;

// axum handler for the undocumented liveness route
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "B2B Organizations Management API",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, response::IntoResponse};

    #[tokio::test]
    async fn liveness_message() {
        let response = root().await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["message"], "B2B Organizations Management API");
    }
}
