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

//! SQL dialects of the supported warehouses
//!
//! The production warehouse is MySQL; SQLite serves local files and tests.
//! Both take `?` placeholders, so only expressions and quoting differ.

use logisight_core::Granularity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
    MySql,
}

/// Value class of a projected metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Count,
    Decimal,
}

impl Dialect {
    /// Dialect for a URL scheme (`sqlite`, `mysql`/`mariadb`)
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "sqlite" => Some(Dialect::Sqlite),
            "mysql" | "mariadb" => Some(Dialect::MySql),
            _ => None,
        }
    }

    pub fn quote_ident(self, ident: &str) -> String {
        match self {
            Dialect::Sqlite => format!("\"{ident}\""),
            Dialect::MySql => format!("`{ident}`"),
        }
    }

    /// Bucket label over a date column.
    ///
    /// Weeks follow ISO 8601 in both dialects: the week belongs to the year
    /// of its Thursday and the label is `YYYY-Www`.
    pub fn period_expression(self, granularity: Granularity, date_column: &str) -> String {
        match (self, granularity) {
            (Dialect::Sqlite, Granularity::Day) => format!("strftime('%Y-%m-%d', {date_column})"),
            (Dialect::Sqlite, Granularity::Month) => format!("strftime('%Y-%m', {date_column})"),
            (Dialect::Sqlite, Granularity::Week) => {
                let thursday = format!("date({date_column}, '-3 days', 'weekday 4')");
                format!(
                    "(strftime('%Y', {thursday}) || '-W' || printf('%02d', (CAST(strftime('%j', {thursday}) AS INTEGER) - 1) / 7 + 1))"
                )
            }
            (Dialect::MySql, Granularity::Day) => format!("DATE_FORMAT({date_column}, '%Y-%m-%d')"),
            (Dialect::MySql, Granularity::Month) => format!("DATE_FORMAT({date_column}, '%Y-%m')"),
            // %x is the ISO year, %v the Monday-based ISO week
            (Dialect::MySql, Granularity::Week) => format!("DATE_FORMAT({date_column}, '%x-W%v')"),
        }
    }

    /// Pin an aggregate to the type the row decoders expect.
    ///
    /// MySQL returns DECIMAL for SUM and for arithmetic over integers, which
    /// the pool cannot decode as a plain number. Requires MySQL 8.0.17+.
    pub fn numeric(self, expr: &str, kind: NumericKind) -> String {
        match (self, kind) {
            (Dialect::Sqlite, _) => expr.to_string(),
            (Dialect::MySql, NumericKind::Count) => format!("CAST({expr} AS SIGNED)"),
            (Dialect::MySql, NumericKind::Decimal) => format!("CAST({expr} AS DOUBLE)"),
        }
    }
}
