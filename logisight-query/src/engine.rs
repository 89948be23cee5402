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

//! Aggregation engine
//!
//! [`Logisight`] is the one entry point callers use: every view operation
//! normalizes the raw request for its view, builds the statement from the
//! catalog and runs it on the shared read-only pool.
//!
//! **Thread Safety:** cheap to clone and safe to share; clones share the
//! pool and the catalog. Requests hold no state between calls.

use std::sync::Arc;

use logisight_core::{Dimension, Granularity, RawFilterParams, View};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::AnyPool;
use sqlx::query::QueryAs;
use sqlx::Any;
use tracing::{debug, info};

use crate::builder::{build_query, distinct_labels_sql, BindValue, BuiltQuery};
use crate::catalog::ViewCatalog;
use crate::dialect::Dialect;
use crate::error::{QueryError, QueryResult};
use crate::rows::{
    FilterOptions, KpiRow, KpiSnapshot, PartnerPerformanceRow, RegionSummaryRow, ServiceModeRow,
    TrendPoint, ViewPayload, WeatherImpactRow,
};
use crate::shaper::shape_kpi;
use crate::warehouse::WarehouseConfig;

#[derive(Clone)]
pub struct Logisight {
    pool: AnyPool,
    dialect: Dialect,
    catalog: Arc<ViewCatalog>,
}

impl Logisight {
    /// Open the warehouse pool described by `config`
    pub async fn connect(config: &WarehouseConfig) -> QueryResult<Self> {
        let dialect = config.dialect()?;
        let pool = config.open_pool().await?;
        Self::with_pool(pool, dialect)
    }

    /// Wrap an existing pool whose SQL flavor is `dialect`. Fails if the
    /// view catalog is inconsistent.
    pub fn with_pool(pool: AnyPool, dialect: Dialect) -> QueryResult<Self> {
        let catalog = ViewCatalog::standard()?;
        info!(views = catalog.len(), ?dialect, "View catalog validated");
        Ok(Self {
            pool,
            dialect,
            catalog: Arc::new(catalog),
        })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn catalog(&self) -> &ViewCatalog {
        &self.catalog
    }

    /// Statement the engine would run for `view` and `raw`
    pub fn build(&self, view: View, raw: &RawFilterParams) -> QueryResult<BuiltQuery> {
        let spec = self
            .catalog
            .spec(view)
            .ok_or(QueryError::NotAggregated(view))?;
        let filters = raw.normalize(view);
        let built = build_query(spec, &filters, self.dialect)?;
        debug!(
            view = %view,
            granularity = filters.granularity.map(Granularity::as_str),
            joins = built.joins.len(),
            params = built.params.len(),
            sql = %built.sql,
            "Built view query"
        );
        Ok(built)
    }

    async fn fetch_all<O>(&self, view: View, raw: &RawFilterParams) -> QueryResult<Vec<O>>
    where
        O: for<'r> sqlx::FromRow<'r, AnyRow> + Send + Unpin,
    {
        let built = self.build(view, raw)?;
        let rows = bind_params::<O>(&built).fetch_all(&self.pool).await?;
        debug!(view = %view, rows = rows.len(), "View query finished");
        Ok(rows)
    }

    pub async fn deliveries_trend(&self, raw: &RawFilterParams) -> QueryResult<Vec<TrendPoint>> {
        self.fetch_all(View::DeliveriesTrend, raw).await
    }

    /// Single headline record; a filter matching nothing yields all zeros
    pub async fn kpi_snapshot(&self, raw: &RawFilterParams) -> QueryResult<KpiSnapshot> {
        let built = self.build(View::KpiSnapshot, raw)?;
        let row = bind_params::<KpiRow>(&built)
            .fetch_optional(&self.pool)
            .await?;
        Ok(shape_kpi(row))
    }

    pub async fn partner_performance(
        &self,
        raw: &RawFilterParams,
    ) -> QueryResult<Vec<PartnerPerformanceRow>> {
        self.fetch_all(View::PartnerPerformance, raw).await
    }

    pub async fn region_summary(
        &self,
        raw: &RawFilterParams,
    ) -> QueryResult<Vec<RegionSummaryRow>> {
        self.fetch_all(View::RegionSummary, raw).await
    }

    pub async fn service_mode_breakdown(
        &self,
        raw: &RawFilterParams,
    ) -> QueryResult<Vec<ServiceModeRow>> {
        self.fetch_all(View::ServiceModeBreakdown, raw).await
    }

    pub async fn weather_impact(&self, raw: &RawFilterParams) -> QueryResult<Vec<WeatherImpactRow>> {
        self.fetch_all(View::WeatherImpact, raw).await
    }

    /// Distinct labels of every filterable dimension, fetched concurrently.
    /// Ignores filters and dates.
    pub async fn filter_options(&self) -> QueryResult<FilterOptions> {
        let partners_sql = distinct_labels_sql(Dimension::Partner);
        let regions_sql = distinct_labels_sql(Dimension::Region);
        let modes_sql = distinct_labels_sql(Dimension::ServiceMode);
        let weather_sql = distinct_labels_sql(Dimension::Weather);

        let (partners, regions, service_modes, weather_conditions) = futures::try_join!(
            sqlx::query_scalar::<_, String>(&partners_sql).fetch_all(&self.pool),
            sqlx::query_scalar::<_, String>(&regions_sql).fetch_all(&self.pool),
            sqlx::query_scalar::<_, String>(&modes_sql).fetch_all(&self.pool),
            sqlx::query_scalar::<_, String>(&weather_sql).fetch_all(&self.pool),
        )?;

        Ok(FilterOptions {
            partners,
            regions,
            service_modes,
            weather_conditions,
        })
    }

    /// Run any view by name; used by the generic route and the CLI
    pub async fn run_view(&self, view: View, raw: &RawFilterParams) -> QueryResult<ViewPayload> {
        let payload = match view {
            View::DeliveriesTrend => ViewPayload::DeliveriesTrend(self.deliveries_trend(raw).await?),
            View::KpiSnapshot => ViewPayload::KpiSnapshot(self.kpi_snapshot(raw).await?),
            View::PartnerPerformance => {
                ViewPayload::PartnerPerformance(self.partner_performance(raw).await?)
            }
            View::RegionSummary => ViewPayload::RegionSummary(self.region_summary(raw).await?),
            View::ServiceModeBreakdown => {
                ViewPayload::ServiceModeBreakdown(self.service_mode_breakdown(raw).await?)
            }
            View::WeatherImpact => ViewPayload::WeatherImpact(self.weather_impact(raw).await?),
            View::FilterOptions => ViewPayload::FilterOptions(self.filter_options().await?),
        };
        Ok(payload)
    }

    /// Round-trip a trivial statement to prove the warehouse is reachable
    pub async fn ping(&self) -> QueryResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Close the pool; later queries fail with a database error
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Warehouse pool closed");
    }
}

fn bind_params<'q, O>(built: &'q BuiltQuery) -> QueryAs<'q, Any, O, AnyArguments<'q>>
where
    O: for<'r> sqlx::FromRow<'r, AnyRow>,
{
    let mut query = sqlx::query_as::<Any, O>(&built.sql);
    for param in &built.params {
        query = match param {
            BindValue::Text(value) => query.bind(value.as_str()),
            BindValue::Int(value) => query.bind(*value),
        };
    }
    query
}
