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

//! View catalog
//!
//! Declarative definition of every aggregation view: which fact table it
//! reads, what it groups by, which metrics it projects and how rows are
//! ordered. Joins are never spelled out here; they are derived per request
//! from the grouping and the active filters (see [`crate::builder`]).
//!
//! The catalog is validated once, when the engine is created.

use std::collections::HashMap;

use logisight_core::{Dimension, FactTable, View};

use crate::error::CatalogError;
use crate::metrics::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Truncated calendar date at the request's granularity
    Period,
    /// A dimension's label column
    Dimension(Dimension),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPolicy {
    PeriodAscending,
    /// Metric descending, ties broken by group label ascending
    Descending(Metric),
    /// Service-mode priority table, ties broken by name
    ServiceModeRank,
    /// Single-row aggregates
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
    pub view: View,
    pub fact: FactTable,
    pub grouping: Option<Grouping>,
    pub metrics: &'static [Metric],
    pub order: OrderPolicy,
}

impl ViewSpec {
    /// Dimension whose label is the group key, if any
    pub fn group_dimension(&self) -> Option<Dimension> {
        match self.grouping {
            Some(Grouping::Dimension(dim)) => Some(dim),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let filter_dims = self
            .view
            .accepted_filters()
            .iter()
            .map(|field| field.dimension());
        let required = std::iter::once(Dimension::Time)
            .chain(self.group_dimension())
            .chain(filter_dims);

        for dimension in required {
            if !self.fact.joins(dimension) {
                return Err(CatalogError::DimensionNotJoinable {
                    view: self.view,
                    fact: self.fact,
                    dimension,
                });
            }
        }

        for metric in self.metrics {
            if !metric.is_available_on(self.fact) {
                return Err(CatalogError::MetricUnavailable {
                    view: self.view,
                    fact: self.fact,
                    metric: *metric,
                });
            }
        }

        let order_fits = match self.order {
            OrderPolicy::PeriodAscending => self.grouping == Some(Grouping::Period),
            OrderPolicy::ServiceModeRank => {
                self.group_dimension() == Some(Dimension::ServiceMode)
            }
            OrderPolicy::Descending(metric) => {
                if !self.metrics.contains(&metric) {
                    return Err(CatalogError::OrderMetricNotProjected {
                        view: self.view,
                        metric,
                    });
                }
                self.grouping.is_some()
            }
            OrderPolicy::Unordered => self.grouping.is_none(),
        };
        if !order_fits {
            return Err(CatalogError::OrderingMismatch { view: self.view });
        }

        Ok(())
    }
}

const TREND_METRICS: &[Metric] = &[
    Metric::TotalDeliveries,
    Metric::SuccessfulDeliveries,
    Metric::DelayedDeliveries,
    Metric::FailedDeliveries,
    Metric::AvgRating,
    Metric::AvgDeliveryTime,
    Metric::TotalRevenue,
];

const KPI_METRICS: &[Metric] = &[
    Metric::TotalDeliveries,
    Metric::SuccessRate,
    Metric::AvgRating,
    Metric::TotalRevenue,
    Metric::AvgDeliveryTime,
    Metric::OnTimeDeliveries,
];

const PARTNER_METRICS: &[Metric] = &[
    Metric::TotalDeliveries,
    Metric::SuccessRate,
    Metric::OnTimeRate,
    Metric::AvgRating,
    Metric::TotalRevenue,
    Metric::CostEfficiency,
];

const REGION_METRICS: &[Metric] = &[
    Metric::TotalDeliveries,
    Metric::SuccessRate,
    Metric::AvgRating,
    Metric::TotalRevenue,
];

const SERVICE_MODE_METRICS: &[Metric] = &[
    Metric::TotalDeliveries,
    Metric::SuccessfulDeliveries,
    Metric::DelayedDeliveries,
    Metric::FailedDeliveries,
    Metric::SuccessRate,
    Metric::AvgDeliveryTime,
    Metric::AvgRating,
    Metric::TotalRevenue,
];

const WEATHER_METRICS: &[Metric] = &[
    Metric::TotalDeliveries,
    Metric::SuccessRate,
    Metric::AvgDeliveryTime,
    Metric::DelayedCount,
];

/// The six aggregation views served by the dashboard
pub fn standard_specs() -> Vec<ViewSpec> {
    vec![
        ViewSpec {
            view: View::DeliveriesTrend,
            fact: FactTable::Delivery,
            grouping: Some(Grouping::Period),
            metrics: TREND_METRICS,
            order: OrderPolicy::PeriodAscending,
        },
        ViewSpec {
            view: View::KpiSnapshot,
            fact: FactTable::Delivery,
            grouping: None,
            metrics: KPI_METRICS,
            order: OrderPolicy::Unordered,
        },
        ViewSpec {
            view: View::PartnerPerformance,
            fact: FactTable::PartnerPerformance,
            grouping: Some(Grouping::Dimension(Dimension::Partner)),
            metrics: PARTNER_METRICS,
            order: OrderPolicy::Descending(Metric::SuccessRate),
        },
        ViewSpec {
            view: View::RegionSummary,
            fact: FactTable::Delivery,
            grouping: Some(Grouping::Dimension(Dimension::Region)),
            metrics: REGION_METRICS,
            order: OrderPolicy::Descending(Metric::TotalDeliveries),
        },
        ViewSpec {
            view: View::ServiceModeBreakdown,
            fact: FactTable::Delivery,
            grouping: Some(Grouping::Dimension(Dimension::ServiceMode)),
            metrics: SERVICE_MODE_METRICS,
            order: OrderPolicy::ServiceModeRank,
        },
        ViewSpec {
            view: View::WeatherImpact,
            fact: FactTable::Delivery,
            grouping: Some(Grouping::Dimension(Dimension::Weather)),
            metrics: WEATHER_METRICS,
            order: OrderPolicy::Descending(Metric::TotalDeliveries),
        },
    ]
}

/// Validated lookup of view definitions
#[derive(Debug, Clone)]
pub struct ViewCatalog {
    specs: HashMap<View, ViewSpec>,
}

impl ViewCatalog {
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_specs(standard_specs())
    }

    /// Validate `specs` and require one definition per aggregation view.
    /// Filter options is a plain dimension lookup and never has a spec.
    pub fn from_specs(specs: Vec<ViewSpec>) -> Result<Self, CatalogError> {
        let mut by_view = HashMap::with_capacity(specs.len());
        for spec in specs {
            spec.validate()?;
            let view = spec.view;
            if view == View::FilterOptions {
                return Err(CatalogError::NotAggregatable(view));
            }
            if by_view.insert(view, spec).is_some() {
                return Err(CatalogError::DuplicateView(view));
            }
        }

        for view in View::ALL {
            if view != View::FilterOptions && !by_view.contains_key(&view) {
                return Err(CatalogError::MissingView(view));
            }
        }

        Ok(Self { specs: by_view })
    }

    pub fn spec(&self, view: View) -> Option<&ViewSpec> {
        self.specs.get(&view)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
