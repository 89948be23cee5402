// Copyright 2025 Logisight Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! HTTP handlers for the dashboard API

pub mod dashboard;
pub mod extract;
pub mod health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use logisight_core::ApiResponse;
use logisight_query::{Logisight, QueryError};
use thiserror::Error;

pub use dashboard::{
    deliveries_trend, filter_options, kpi_snapshot, partner_performance, region_summary,
    run_named_view, service_mode_breakdown, weather_impact,
};
pub use extract::DashboardQuery;
pub use health::{health_check, warehouse_health};

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Logisight,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_bad_request_is_failure_envelope() {
        let response = ApiError::BadRequest("Failed to deserialize query string".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to deserialize query string");
    }
}
