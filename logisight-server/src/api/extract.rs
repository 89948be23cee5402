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

//! Filter parameters from the query string

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use logisight_core::RawFilterParams;

use super::ApiError;

/// Dashboard filters taken from the query string.
///
/// A repeated parameter keeps its first value. Unknown parameters are
/// ignored. A query string that cannot be decoded is answered with the
/// failure envelope and status 400.
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery(pub RawFilterParams);

#[async_trait]
impl<S> FromRequestParts<S> for DashboardQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(DashboardQuery(RawFilterParams::from_pairs(pairs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> RawFilterParams {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        DashboardQuery::from_request_parts(&mut parts, &())
            .await
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn test_repeated_parameter_keeps_first() {
        let raw = extract("/api/kpi?region=North&region=South&groupBy=week").await;
        assert_eq!(raw.region.as_deref(), Some("North"));
        assert_eq!(raw.group_by.as_deref(), Some("week"));
    }

    #[tokio::test]
    async fn test_percent_encoded_values() {
        let raw = extract("/api/kpi?partner=Acme%20Freight&serviceMode=same+day").await;
        assert_eq!(raw.partner.as_deref(), Some("Acme Freight"));
        assert_eq!(raw.service_mode.as_deref(), Some("same day"));
    }

    #[tokio::test]
    async fn test_no_query_string() {
        let raw = extract("/api/kpi").await;
        assert_eq!(raw, RawFilterParams::default());
    }
}
