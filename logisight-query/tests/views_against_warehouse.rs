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

//! Every view against the seeded sample warehouse

use logisight_core::{RawFilterParams, View};
use logisight_query::testing::TestWarehouse;
use logisight_query::{KpiSnapshot, Logisight, QueryError};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

async fn seeded() -> (TestWarehouse, Logisight) {
    let warehouse = TestWarehouse::seeded().await.unwrap();
    let engine = warehouse.engine().await.unwrap();
    (warehouse, engine)
}

fn params() -> RawFilterParams {
    RawFilterParams::default()
}

#[tokio::test]
async fn test_kpi_snapshot_default_range() {
    let (_wh, engine) = seeded().await;
    let kpi = engine.kpi_snapshot(&params()).await.unwrap();
    assert_eq!(kpi.total_deliveries, 7);
    assert_close(kpi.success_rate, 71.43);
    assert_close(kpi.avg_rating, 3.37);
    assert_close(kpi.total_revenue, 360.0);
    assert_close(kpi.avg_delivery_time, 17.0);
    assert_eq!(kpi.on_time_deliveries, 4);
}

#[tokio::test]
async fn test_kpi_snapshot_region_matches_every_key_with_that_name() {
    let (_wh, engine) = seeded().await;
    let kpi = engine
        .kpi_snapshot(&RawFilterParams {
            region: Some("North".into()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(kpi.total_deliveries, 4);
    assert_close(kpi.success_rate, 100.0);
    assert_close(kpi.avg_rating, 3.9);
    assert_close(kpi.total_revenue, 220.0);
    assert_close(kpi.avg_delivery_time, 9.25);
    assert_eq!(kpi.on_time_deliveries, 3);
}

#[tokio::test]
async fn test_kpi_snapshot_partner_filter() {
    let (_wh, engine) = seeded().await;
    let kpi = engine
        .kpi_snapshot(&RawFilterParams {
            partner: Some("Acme Freight".into()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(kpi.total_deliveries, 3);
    assert_close(kpi.success_rate, 33.33);
    assert_close(kpi.avg_rating, 2.33);
    assert_close(kpi.total_revenue, 165.0);
    assert_close(kpi.avg_delivery_time, 29.33);
    assert_eq!(kpi.on_time_deliveries, 1);
}

#[tokio::test]
async fn test_kpi_snapshot_empty_match_is_zero() {
    let (_wh, engine) = seeded().await;
    let kpi = engine
        .kpi_snapshot(&RawFilterParams {
            start_date: Some("2030-01-01".into()),
            end_date: Some("2030-12-31".into()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(kpi, KpiSnapshot::zero());
}

#[tokio::test]
async fn test_region_summary() {
    let (_wh, engine) = seeded().await;
    let rows = engine.region_summary(&params()).await.unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.region_name.as_str()).collect();
    assert_eq!(names, vec!["North", "South"]);

    assert_eq!(rows[0].total_deliveries, 4);
    assert_close(rows[0].success_rate, 100.0);
    assert_close(rows[0].avg_rating, 3.9);
    assert_close(rows[0].total_revenue, 220.0);

    assert_eq!(rows[1].total_deliveries, 3);
    assert_close(rows[1].success_rate, 33.33);
    assert_close(rows[1].avg_rating, 2.67);
    assert_close(rows[1].total_revenue, 140.0);
}

#[tokio::test]
async fn test_region_summary_filtered_to_one_region() {
    let (_wh, engine) = seeded().await;
    let rows = engine
        .region_summary(&RawFilterParams {
            region: Some("South".into()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].region_name, "South");
    assert_eq!(rows[0].total_deliveries, 3);
}

#[tokio::test]
async fn test_service_mode_breakdown_follows_priority() {
    let (_wh, engine) = seeded().await;
    let rows = engine.service_mode_breakdown(&params()).await.unwrap();
    let modes: Vec<_> = rows.iter().map(|r| r.service_mode.as_str()).collect();
    assert_eq!(
        modes,
        vec!["same day", "express", "two day", "standard", "drone"]
    );

    let same_day = &rows[0];
    assert_eq!(same_day.total_deliveries, 1);
    assert_eq!(same_day.successful_deliveries, 0);
    assert_eq!(same_day.delayed_deliveries, 1);
    assert_eq!(same_day.failed_deliveries, 1);
    assert_close(same_day.success_rate, 0.0);
    assert_close(same_day.avg_delivery_time, 30.0);
    assert_close(same_day.avg_rating, 2.0);
    assert_close(same_day.total_revenue, 25.0);

    let express = &rows[1];
    assert_eq!(express.total_deliveries, 2);
    assert_eq!(express.successful_deliveries, 2);
    assert_eq!(express.delayed_deliveries, 1);
    assert_eq!(express.failed_deliveries, 0);
    assert_close(express.success_rate, 100.0);
    assert_close(express.avg_delivery_time, 13.0);
    assert_close(express.avg_rating, 3.5);
    assert_close(express.total_revenue, 110.0);

    let standard = &rows[3];
    assert_eq!(standard.total_deliveries, 2);
    assert_eq!(standard.failed_deliveries, 1);
    assert_close(standard.success_rate, 50.0);
    assert_close(standard.avg_delivery_time, 29.0);

    let drone = &rows[4];
    assert_eq!(drone.total_deliveries, 1);
    assert_close(drone.avg_rating, 4.6);
    assert_close(drone.total_revenue, 10.0);
}

#[tokio::test]
async fn test_weather_impact() {
    let (_wh, engine) = seeded().await;
    let rows = engine.weather_impact(&params()).await.unwrap();
    let conditions: Vec<_> = rows.iter().map(|r| r.weather_condition.as_str()).collect();
    assert_eq!(conditions, vec!["Clear", "Rain", "Snow"]);

    assert_eq!(rows[0].total_deliveries, 4);
    assert_close(rows[0].success_rate, 75.0);
    assert_close(rows[0].avg_delivery_time, 11.75);
    assert_eq!(rows[0].delayed_count, 1);

    assert_eq!(rows[1].total_deliveries, 2);
    assert_close(rows[1].success_rate, 50.0);
    assert_close(rows[1].avg_delivery_time, 34.0);
    assert_eq!(rows[1].delayed_count, 2);

    assert_eq!(rows[2].total_deliveries, 1);
    assert_close(rows[2].success_rate, 100.0);
    assert_eq!(rows[2].delayed_count, 0);
}

#[tokio::test]
async fn test_trend_by_day() {
    let (_wh, engine) = seeded().await;
    let points = engine.deliveries_trend(&params()).await.unwrap();
    let dates: Vec<_> = points.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(
        dates,
        vec!["2024-01-01", "2024-01-02", "2024-01-08", "2024-02-15", "2024-03-31"]
    );

    let first = &points[0];
    assert_eq!(first.total_deliveries, 2);
    assert_eq!(first.successful_deliveries, 2);
    assert_eq!(first.delayed_deliveries, 1);
    assert_eq!(first.failed_deliveries, 0);
    assert_close(first.avg_rating, 3.5);
    assert_close(first.avg_delivery_time, 15.0);
    assert_close(first.total_revenue, 150.0);

    let feb = &points[3];
    assert_eq!(feb.total_deliveries, 2);
    assert_eq!(feb.successful_deliveries, 1);
    assert_eq!(feb.failed_deliveries, 1);
    assert_close(feb.avg_rating, 2.8);
    assert_close(feb.avg_delivery_time, 24.5);
    assert_close(feb.total_revenue, 50.0);
}

#[tokio::test]
async fn test_trend_by_month_and_week() {
    let (_wh, engine) = seeded().await;

    let months = engine
        .deliveries_trend(&RawFilterParams {
            group_by: Some("month".into()),
            ..params()
        })
        .await
        .unwrap();
    let buckets: Vec<_> = months
        .iter()
        .map(|p| (p.date.as_str(), p.total_deliveries))
        .collect();
    assert_eq!(buckets, vec![("2024-01", 4), ("2024-02", 2), ("2024-03", 1)]);

    let weeks = engine
        .deliveries_trend(&RawFilterParams {
            group_by: Some("week".into()),
            ..params()
        })
        .await
        .unwrap();
    let buckets: Vec<_> = weeks
        .iter()
        .map(|p| (p.date.as_str(), p.total_deliveries))
        .collect();
    assert_eq!(
        buckets,
        vec![
            ("2024-W01", 3),
            ("2024-W02", 1),
            ("2024-W07", 2),
            ("2024-W13", 1)
        ]
    );
}

#[tokio::test]
async fn test_trend_week_belongs_to_iso_year() {
    let (_wh, engine) = seeded().await;
    let weeks = engine
        .deliveries_trend(&RawFilterParams {
            start_date: Some("2023-12-01".into()),
            end_date: Some("2023-12-31".into()),
            group_by: Some("week".into()),
            ..params()
        })
        .await
        .unwrap();
    let labels: Vec<_> = weeks.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(labels, vec!["2023-W52"]);
}

#[tokio::test]
async fn test_unknown_granularity_falls_back_to_day() {
    let (_wh, engine) = seeded().await;
    let by_default = engine.deliveries_trend(&params()).await.unwrap();
    let by_unknown = engine
        .deliveries_trend(&RawFilterParams {
            group_by: Some("fortnight".into()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(by_default, by_unknown);
}

#[tokio::test]
async fn test_partner_performance() {
    let (_wh, engine) = seeded().await;
    let rows = engine.partner_performance(&params()).await.unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.partner_name.as_str()).collect();
    assert_eq!(names, vec!["Bolt Couriers", "Acme Freight", "Cargo Co"]);

    let acme = &rows[1];
    assert_eq!(acme.total_deliveries, 30);
    assert_close(acme.success_rate, 85.0);
    assert_close(acme.on_time_rate, 75.0);
    assert_close(acme.avg_rating, 3.5);
    assert_close(acme.total_revenue, 2500.0);
    assert_close(acme.cost_efficiency, 11.0);

    let cargo = &rows[2];
    assert_eq!(cargo.total_deliveries, 8);
    assert_close(cargo.cost_efficiency, 15.0);
}

#[tokio::test]
async fn test_partner_performance_filters() {
    let (_wh, engine) = seeded().await;

    let south = engine
        .partner_performance(&RawFilterParams {
            region: Some("South".into()),
            ..params()
        })
        .await
        .unwrap();
    let summary: Vec<_> = south
        .iter()
        .map(|r| (r.partner_name.as_str(), r.total_deliveries))
        .collect();
    assert_eq!(summary, vec![("Acme Freight", 20), ("Cargo Co", 8)]);
    assert_close(south[0].success_rate, 80.0);

    let express = engine
        .partner_performance(&RawFilterParams {
            service_mode: Some("express".into()),
            ..params()
        })
        .await
        .unwrap();
    let names: Vec<_> = express.iter().map(|r| r.partner_name.as_str()).collect();
    assert_eq!(names, vec!["Bolt Couriers", "Acme Freight"]);
}

#[tokio::test]
async fn test_filter_options() {
    let (_wh, engine) = seeded().await;
    let options = engine.filter_options().await.unwrap();
    assert_eq!(
        options.partners,
        vec!["Acme Freight", "Bolt Couriers", "Cargo Co"]
    );
    assert_eq!(options.regions, vec!["East", "North", "South"]);
    assert_eq!(
        options.service_modes,
        vec!["drone", "express", "same day", "standard", "two day"]
    );
    assert_eq!(options.weather_conditions, vec!["Clear", "Rain", "Snow"]);
}

#[tokio::test]
async fn test_ignored_filters_do_not_change_results() {
    let (_wh, engine) = seeded().await;
    let plain = engine.weather_impact(&params()).await.unwrap();
    let with_partner = engine
        .weather_impact(&RawFilterParams {
            partner: Some("Acme Freight".into()),
            service_mode: Some("express".into()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(plain, with_partner);
}

#[tokio::test]
async fn test_unknown_filter_value_yields_empty_views() {
    let (_wh, engine) = seeded().await;
    let raw = RawFilterParams {
        region: Some("Atlantis".into()),
        ..params()
    };
    assert!(engine.deliveries_trend(&raw).await.unwrap().is_empty());
    assert!(engine.region_summary(&raw).await.unwrap().is_empty());
    assert_eq!(engine.kpi_snapshot(&raw).await.unwrap(), KpiSnapshot::zero());
}

#[tokio::test]
async fn test_inverted_range_is_empty_not_an_error() {
    let (_wh, engine) = seeded().await;
    let raw = RawFilterParams {
        start_date: Some("2024-12-31".into()),
        end_date: Some("2024-01-01".into()),
        ..params()
    };
    assert!(engine.deliveries_trend(&raw).await.unwrap().is_empty());
    assert!(engine.partner_performance(&raw).await.unwrap().is_empty());
    assert!(engine.service_mode_breakdown(&raw).await.unwrap().is_empty());
    assert_eq!(engine.kpi_snapshot(&raw).await.unwrap(), KpiSnapshot::zero());
}

#[tokio::test]
async fn test_successful_plus_failed_equals_total() {
    let (_wh, engine) = seeded().await;
    for group_by in ["day", "week", "month"] {
        let raw = RawFilterParams {
            group_by: Some(group_by.into()),
            start_date: Some("2023-01-01".into()),
            end_date: Some("2025-12-31".into()),
            ..params()
        };
        for point in engine.deliveries_trend(&raw).await.unwrap() {
            assert_eq!(
                point.successful_deliveries + point.failed_deliveries,
                point.total_deliveries
            );
        }
    }
    for row in engine.service_mode_breakdown(&params()).await.unwrap() {
        assert_eq!(
            row.successful_deliveries + row.failed_deliveries,
            row.total_deliveries
        );
    }
}

#[tokio::test]
async fn test_views_are_idempotent() {
    let (_wh, engine) = seeded().await;
    let raw = RawFilterParams {
        region: Some("North".into()),
        group_by: Some("week".into()),
        ..params()
    };
    for view in View::ALL {
        let first = serde_json::to_string(&engine.run_view(view, &raw).await.unwrap()).unwrap();
        let second = serde_json::to_string(&engine.run_view(view, &raw).await.unwrap()).unwrap();
        assert_eq!(first, second, "{view} is not deterministic");
    }
}

#[tokio::test]
async fn test_run_view_dispatches_by_name() {
    let (_wh, engine) = seeded().await;
    let payload = engine.run_view(View::KpiSnapshot, &params()).await.unwrap();
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["total_deliveries"], 7);

    let payload = engine.run_view(View::FilterOptions, &params()).await.unwrap();
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["weatherConditions"][0], "Clear");
}

#[tokio::test]
async fn test_empty_warehouse() {
    let warehouse = TestWarehouse::empty().await.unwrap();
    let engine = warehouse.engine().await.unwrap();
    assert_eq!(
        engine.kpi_snapshot(&params()).await.unwrap(),
        KpiSnapshot::zero()
    );
    assert!(engine.weather_impact(&params()).await.unwrap().is_empty());
    let options = engine.filter_options().await.unwrap();
    assert!(options.partners.is_empty());
}

#[tokio::test]
async fn test_engine_never_writes() {
    let (_wh, engine) = seeded().await;
    let result = sqlx::query("DELETE FROM fact_delivery")
        .execute(engine.pool())
        .await;
    assert!(result.is_err());
    assert_eq!(engine.kpi_snapshot(&params()).await.unwrap().total_deliveries, 7);
}

#[tokio::test]
async fn test_closed_pool_reports_database_error() {
    let (_wh, engine) = seeded().await;
    engine.ping().await.unwrap();
    engine.close().await;
    let err = engine.region_summary(&params()).await.unwrap_err();
    assert!(matches!(err, QueryError::Database(_)));
}
