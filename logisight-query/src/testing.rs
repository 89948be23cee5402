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

//! Seeded throwaway warehouses for tests (feature `test-fixtures`)
//!
//! [`TestWarehouse::seeded`] writes a small star schema into a temp
//! directory. The figures every view should report over it are fixed, so
//! tests can assert exact aggregates.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

use crate::engine::Logisight;
use crate::error::{QueryError, QueryResult};
use crate::warehouse::WarehouseConfig;

const SCHEMA: &[&str] = &[
    "CREATE TABLE dim_time (time_key INTEGER PRIMARY KEY, date_actual TEXT NOT NULL, year INTEGER NOT NULL, month INTEGER NOT NULL, day INTEGER NOT NULL)",
    "CREATE TABLE dim_region (region_key INTEGER PRIMARY KEY, region_name TEXT)",
    "CREATE TABLE dim_partner (partner_key INTEGER PRIMARY KEY, partner_name TEXT)",
    "CREATE TABLE dim_service_mode (service_key INTEGER PRIMARY KEY, service_mode TEXT)",
    "CREATE TABLE dim_weather (weather_key INTEGER PRIMARY KEY, weather_condition TEXT)",
    "CREATE TABLE fact_delivery (
        delivery_key INTEGER PRIMARY KEY AUTOINCREMENT,
        time_key INTEGER NOT NULL REFERENCES dim_time(time_key),
        region_key INTEGER NOT NULL REFERENCES dim_region(region_key),
        partner_key INTEGER NOT NULL REFERENCES dim_partner(partner_key),
        service_key INTEGER NOT NULL REFERENCES dim_service_mode(service_key),
        weather_key INTEGER NOT NULL REFERENCES dim_weather(weather_key),
        is_successful INTEGER NOT NULL,
        is_delayed INTEGER NOT NULL,
        delivery_rating REAL,
        delivery_time_hours REAL,
        delivery_cost REAL
    )",
    "CREATE TABLE fact_partner_performance (
        time_key INTEGER NOT NULL REFERENCES dim_time(time_key),
        partner_key INTEGER NOT NULL REFERENCES dim_partner(partner_key),
        region_key INTEGER NOT NULL REFERENCES dim_region(region_key),
        service_key INTEGER NOT NULL REFERENCES dim_service_mode(service_key),
        total_deliveries INTEGER NOT NULL,
        success_rate REAL,
        on_time_rate REAL,
        avg_rating REAL,
        total_revenue REAL,
        cost_per_delivery REAL
    )",
];

// Two region keys share the name "North"; filters and grouping go by name.
const REGIONS: &[(i64, &str)] = &[(1, "North"), (2, "South"), (3, "East"), (4, "North")];
const PARTNERS: &[(i64, &str)] = &[(1, "Acme Freight"), (2, "Bolt Couriers"), (3, "Cargo Co")];
const SERVICE_MODES: &[(i64, &str)] = &[
    (1, "standard"),
    (2, "express"),
    (3, "same day"),
    (4, "two day"),
    (5, "drone"),
];
const WEATHER: &[(i64, Option<&str>)] = &[
    (1, Some("Clear")),
    (2, Some("Rain")),
    (3, Some("Snow")),
    (4, None),
];

/// (time_key, region, partner, service, weather, successful, delayed, rating, hours, cost)
type DeliveryFact = (i64, i64, i64, i64, i64, i64, i64, f64, f64, f64);

const DELIVERIES: &[DeliveryFact] = &[
    (20240101, 1, 1, 1, 1, 1, 0, 4.0, 10.0, 100.0),
    (20240101, 1, 2, 2, 2, 1, 1, 3.0, 20.0, 50.0),
    (20240102, 2, 1, 3, 1, 0, 1, 2.0, 30.0, 25.0),
    (20240108, 2, 3, 4, 3, 1, 0, 5.0, 4.0, 75.0),
    (20240215, 4, 2, 5, 1, 1, 0, 4.6, 1.0, 10.0),
    (20240215, 2, 1, 1, 2, 0, 1, 1.0, 48.0, 40.0),
    (20240331, 1, 3, 2, 1, 1, 0, 4.0, 6.0, 60.0),
    // outside the default 2024 range
    (20231231, 1, 1, 1, 1, 1, 0, 5.0, 5.0, 999.0),
    (20250101, 2, 2, 1, 1, 0, 1, 1.0, 10.0, 500.0),
];

/// (time_key, partner, region, service, total, success_rate, on_time_rate, rating, revenue, cost)
type PartnerFact = (i64, i64, i64, i64, i64, f64, f64, f64, f64, f64);

const PARTNER_PERFORMANCE: &[PartnerFact] = &[
    (20240101, 1, 1, 1, 10, 90.0, 80.0, 4.0, 1000.0, 10.0),
    (20240201, 1, 2, 2, 20, 80.0, 70.0, 3.0, 1500.0, 12.0),
    (20240101, 2, 1, 2, 5, 95.0, 90.0, 4.5, 300.0, 8.0),
    (20240301, 3, 2, 1, 8, 70.0, 60.0, 3.5, 400.0, 15.0),
    (20230601, 3, 1, 1, 100, 10.0, 10.0, 1.0, 50.0, 99.0),
];

/// A SQLite warehouse living as long as this value
pub struct TestWarehouse {
    _dir: TempDir,
    path: PathBuf,
}

impl TestWarehouse {
    /// Schema plus the fixed sample data
    pub async fn seeded() -> QueryResult<Self> {
        let warehouse = Self::empty().await?;
        let mut conn = warehouse.writer().await?;
        seed(&mut conn).await?;
        conn.close().await?;
        Ok(warehouse)
    }

    /// Schema only, no rows in any table
    pub async fn empty() -> QueryResult<Self> {
        let dir = tempfile::tempdir().map_err(sqlx::Error::Io)?;
        let path = dir.path().join("logistics_dw.db");
        let warehouse = Self { _dir: dir, path };

        let mut conn = warehouse.writer().await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&mut conn).await?;
        }
        conn.close().await?;
        Ok(warehouse)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }

    pub fn config(&self) -> WarehouseConfig {
        WarehouseConfig {
            max_connections: 4,
            acquire_timeout_secs: 5,
            ..WarehouseConfig::for_url(self.database_url())
        }
    }

    pub async fn engine(&self) -> QueryResult<Logisight> {
        Logisight::connect(&self.config()).await
    }

    async fn writer(&self) -> QueryResult<SqliteConnection> {
        let conn = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .connect()
            .await?;
        Ok(conn)
    }
}

async fn seed(conn: &mut SqliteConnection) -> QueryResult<()> {
    let mut tx = conn.begin().await?;

    let first = calendar_day(2023, 1, 1)?;
    let last = calendar_day(2025, 12, 31)?;
    let mut day = first;
    while day <= last {
        let key = i64::from(day.year()) * 10_000 + i64::from(day.month()) * 100 + i64::from(day.day());
        sqlx::query(
            "INSERT INTO dim_time (time_key, date_actual, year, month, day) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(key)
        .bind(day.format("%Y-%m-%d").to_string())
        .bind(day.year())
        .bind(day.month())
        .bind(day.day())
        .execute(&mut *tx)
        .await?;
        day += Duration::days(1);
    }

    for &(key, name) in REGIONS {
        sqlx::query("INSERT INTO dim_region (region_key, region_name) VALUES (?, ?)")
            .bind(key)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    for &(key, name) in PARTNERS {
        sqlx::query("INSERT INTO dim_partner (partner_key, partner_name) VALUES (?, ?)")
            .bind(key)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    for &(key, name) in SERVICE_MODES {
        sqlx::query("INSERT INTO dim_service_mode (service_key, service_mode) VALUES (?, ?)")
            .bind(key)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    for &(key, name) in WEATHER {
        sqlx::query("INSERT INTO dim_weather (weather_key, weather_condition) VALUES (?, ?)")
            .bind(key)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    for &(time, region, partner, service, weather, ok, delayed, rating, hours, cost) in DELIVERIES
    {
        sqlx::query(
            "INSERT INTO fact_delivery (time_key, region_key, partner_key, service_key, weather_key, \
             is_successful, is_delayed, delivery_rating, delivery_time_hours, delivery_cost) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(time)
        .bind(region)
        .bind(partner)
        .bind(service)
        .bind(weather)
        .bind(ok)
        .bind(delayed)
        .bind(rating)
        .bind(hours)
        .bind(cost)
        .execute(&mut *tx)
        .await?;
    }

    for &(time, partner, region, service, total, success, on_time, rating, revenue, cost) in
        PARTNER_PERFORMANCE
    {
        sqlx::query(
            "INSERT INTO fact_partner_performance (time_key, partner_key, region_key, service_key, \
             total_deliveries, success_rate, on_time_rate, avg_rating, total_revenue, cost_per_delivery) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(time)
        .bind(partner)
        .bind(region)
        .bind(service)
        .bind(total)
        .bind(success)
        .bind(on_time)
        .bind(rating)
        .bind(revenue)
        .bind(cost)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

fn calendar_day(year: i32, month: u32, day: u32) -> QueryResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| QueryError::Config(format!("invalid calendar day {year}-{month}-{day}")))
}
