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

//! Logisight CLI
//!
//! Runs one dashboard view against a warehouse and prints the response
//! envelope as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use logisight_core::{ApiResponse, RawFilterParams, View};
use logisight_query::{Logisight, WarehouseConfig};
use serde::Serialize;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "logisight")]
#[command(about = "Logisight - logistics dashboard aggregations", long_about = None)]
struct Cli {
    /// Warehouse URL (mysql://… or sqlite://…)
    #[arg(
        short,
        long,
        env = "LOGISIGHT_DATABASE_URL",
        default_value = "sqlite://logistics_dw.db"
    )]
    database: String,

    /// Maximum pooled connections
    #[arg(long, env = "LOGISIGHT_DB_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delivery counts and averages per day, week or month
    DeliveriesTrend(FilterArgs),

    /// Headline totals for the filtered range
    KpiSnapshot(FilterArgs),

    /// Per-partner performance
    PartnerPerformance(FilterArgs),

    /// Per-region totals
    RegionSummary(FilterArgs),

    /// Per-service-mode breakdown in priority order
    ServiceModeBreakdown(FilterArgs),

    /// Per-weather-condition impact
    WeatherImpact(FilterArgs),

    /// Distinct partners, regions, service modes and weather conditions
    FilterOptions,

    /// Check that the warehouse is reachable
    Check,
}

/// Dashboard filters; values a view does not use are ignored
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,

    #[arg(long)]
    region: Option<String>,

    #[arg(long)]
    partner: Option<String>,

    #[arg(long)]
    service_mode: Option<String>,

    /// day, week or month
    #[arg(long)]
    group_by: Option<String>,
}

impl From<FilterArgs> for RawFilterParams {
    fn from(args: FilterArgs) -> Self {
        RawFilterParams {
            start_date: args.start_date,
            end_date: args.end_date,
            region: args.region,
            partner: args.partner,
            service_mode: args.service_mode,
            group_by: args.group_by,
        }
    }
}

impl Commands {
    /// View and filters to run; `None` for the connectivity check
    fn into_view(self) -> Option<(View, RawFilterParams)> {
        let (view, filters) = match self {
            Commands::DeliveriesTrend(f) => (View::DeliveriesTrend, f),
            Commands::KpiSnapshot(f) => (View::KpiSnapshot, f),
            Commands::PartnerPerformance(f) => (View::PartnerPerformance, f),
            Commands::RegionSummary(f) => (View::RegionSummary, f),
            Commands::ServiceModeBreakdown(f) => (View::ServiceModeBreakdown, f),
            Commands::WeatherImpact(f) => (View::WeatherImpact, f),
            Commands::FilterOptions => (View::FilterOptions, FilterArgs::default()),
            Commands::Check => return None,
        };
        Some((view, filters.into()))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the envelope
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = WarehouseConfig {
        max_connections: cli.max_connections,
        ..WarehouseConfig::for_url(cli.database.clone())
    };

    let engine = match Logisight::connect(&config).await {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "Failed to open warehouse");
            print_json(&ApiResponse::<()>::failure(e.to_string()))?;
            std::process::exit(1);
        }
    };

    let Some((view, params)) = cli.command.into_view() else {
        engine
            .ping()
            .await
            .context("Warehouse is not reachable")?;
        info!(dialect = ?engine.dialect(), "Warehouse is reachable");
        println!("✓ Warehouse reachable ({:?})", engine.dialect());
        engine.close().await;
        return Ok(());
    };

    let outcome = engine.run_view(view, &params).await;
    engine.close().await;

    match outcome {
        Ok(payload) => {
            info!(view = %view, rows = payload.row_count(), "View finished");
            print_json(&ApiResponse::ok(payload))
        }
        Err(e) => {
            error!(view = %view, error = %e, "View failed");
            print_json(&ApiResponse::<()>::failure(e.to_string()))?;
            std::process::exit(1);
        }
    }
}
