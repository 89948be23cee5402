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

//! Filter normalization
//!
//! Incoming dashboard filters are loosely typed optional strings. Normalizing
//! them never fails: missing dates take the reporting-year defaults, empty
//! strings count as absent, and unknown `groupBy` values fall back to daily
//! buckets. Values are not validated; an inverted or malformed date range
//! simply matches no facts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::FilterField;
use crate::view::View;

pub const DEFAULT_START_DATE: &str = "2024-01-01";
pub const DEFAULT_END_DATE: &str = "2024-12-31";

/// Filter parameters exactly as received (query string or CLI flags)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilterParams {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub partner: Option<String>,
    #[serde(default)]
    pub service_mode: Option<String>,
    #[serde(default)]
    pub group_by: Option<String>,
}

/// Time bucket for the delivery trend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Parse a `groupBy` value; anything unrecognised is a daily bucket
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value {
            Some("week") => Granularity::Week,
            Some("month") => Granularity::Month,
            Some("day") | Some("") | None => Granularity::Day,
            Some(other) => {
                debug!("Unknown groupBy '{}', using daily buckets", other);
                Granularity::Day
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

/// Inclusive calendar date range, kept as `YYYY-MM-DD` text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// True when `start` sorts after `end`; such a range matches nothing
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_DATE.to_string(),
            end: DEFAULT_END_DATE.to_string(),
        }
    }
}

/// Filters after defaulting, scoped to one view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DashboardFilters {
    pub view: View,
    pub date_range: DateRange,
    pub region: Option<String>,
    pub partner: Option<String>,
    pub service_mode: Option<String>,
    /// Present only for views that bucket by time
    pub granularity: Option<Granularity>,
}

impl DashboardFilters {
    pub fn value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Region => self.region.as_deref(),
            FilterField::Partner => self.partner.as_deref(),
            FilterField::ServiceMode => self.service_mode.as_deref(),
        }
    }

    /// Active filters in the view's declared order
    pub fn active_filters(&self) -> impl Iterator<Item = (FilterField, &str)> + '_ {
        self.view
            .accepted_filters()
            .iter()
            .filter_map(move |field| self.value(*field).map(|value| (*field, value)))
    }
}

impl RawFilterParams {
    /// Build from raw query-string pairs. The first occurrence of a
    /// parameter wins and unknown parameters are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            let slot = match key {
                "startDate" => &mut raw.start_date,
                "endDate" => &mut raw.end_date,
                "groupBy" => &mut raw.group_by,
                _ => match FilterField::ALL.into_iter().find(|f| f.param_name() == key) {
                    Some(FilterField::Region) => &mut raw.region,
                    Some(FilterField::Partner) => &mut raw.partner,
                    Some(FilterField::ServiceMode) => &mut raw.service_mode,
                    None => continue,
                },
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        raw
    }

    /// Fill defaults and drop anything the view does not use
    pub fn normalize(&self, view: View) -> DashboardFilters {
        let scoped = |field: FilterField, value: &Option<String>| {
            if view.accepts(field) {
                non_empty(value)
            } else {
                None
            }
        };

        DashboardFilters {
            view,
            date_range: DateRange {
                start: non_empty(&self.start_date)
                    .unwrap_or_else(|| DEFAULT_START_DATE.to_string()),
                end: non_empty(&self.end_date).unwrap_or_else(|| DEFAULT_END_DATE.to_string()),
            },
            region: scoped(FilterField::Region, &self.region),
            partner: scoped(FilterField::Partner, &self.partner),
            service_mode: scoped(FilterField::ServiceMode, &self.service_mode),
            granularity: view
                .uses_granularity()
                .then(|| Granularity::parse_lenient(self.group_by.as_deref())),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
